//! Artifact persistence: dual JSON/bincode encoding of decision models,
//! written atomically (temp file + `fs::rename`), following
//! `src/storage/wal.rs`'s directory-creation-on-open idiom and its use of
//! `fs::rename` for crash-safe archival, generalized here to every artifact
//! write (spec §5's "no partially written solution artifact").

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::decision::DecisionModel;
use crate::error::ArtifactError;

/// The small index record written alongside a decision model's full body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionModelHeader {
    pub category: String,
    pub covered_elements: Vec<String>,
    pub body_path: Option<PathBuf>,
}

/// A minimal serializable projection of a [`DecisionModel`] sufficient to
/// round-trip through JSON/bincode for artifact persistence. The full
/// in-memory payload (vertex/edge handles, topology matrices) is an
/// implementation detail of identification; what a solution artifact
/// records is the category and the string-identifier covered set, per
/// spec §6's wire contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionModelBody {
    pub category: String,
    pub covered_elements: Vec<String>,
}

fn header_for(category: &str, covered_elements: Vec<String>, body_path: Option<PathBuf>) -> DecisionModelHeader {
    DecisionModelHeader { category: category.to_string(), covered_elements, body_path }
}

fn atomic_write(path: &Path, bytes: &[u8]) -> Result<(), ArtifactError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| ArtifactError::Io {
            path: parent.display().to_string(),
            source,
        })?;
    }
    let tmp_path = path.with_extension(format!(
        "{}.tmp",
        path.extension().and_then(|e| e.to_str()).unwrap_or("")
    ));
    fs::write(&tmp_path, bytes).map_err(|source| ArtifactError::Io {
        path: tmp_path.display().to_string(),
        source,
    })?;
    fs::rename(&tmp_path, path).map_err(|source| ArtifactError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(())
}

/// Creates `run_dir/subdir` if absent and writes one JSON header+body pair
/// for `model`, following the `header_<preffix>_<category>_<suffix>` /
/// `body_<preffix>_<category>_<suffix>` naming scheme (the "preffix"
/// spelling is the wire contract's, not a typo to fix).
pub fn write_solution(
    run_dir: &Path,
    subdir: &str,
    suffix: usize,
    model: &DecisionModel,
) -> Result<(), ArtifactError> {
    let category = model.category();
    let covered_elements: Vec<String> = model
        .covered()
        .vertices
        .iter()
        .map(std::string::ToString::to_string)
        .chain(model.covered().edges.iter().map(std::string::ToString::to_string))
        .collect();

    let dir = run_dir.join(subdir);
    let body_path = dir.join(format!("body_run_{category}_{suffix}.json"));
    let header_path = dir.join(format!("header_run_{category}_{suffix}.json"));

    let body = DecisionModelBody { category: category.to_string(), covered_elements: covered_elements.clone() };
    let body_bytes = serde_json::to_vec_pretty(&body).map_err(|source| ArtifactError::Encoding {
        path: body_path.display().to_string(),
        format: "json",
        source,
    })?;
    atomic_write(&body_path, &body_bytes)?;

    let header = header_for(category, covered_elements, Some(body_path.clone()));
    let header_bytes = serde_json::to_vec_pretty(&header).map_err(|source| ArtifactError::Encoding {
        path: header_path.display().to_string(),
        format: "json",
        source,
    })?;
    atomic_write(&header_path, &header_bytes)?;

    // Compact binary encoding of the same schema, per spec §6's "two
    // interchangeable encodings" requirement.
    let body_cbor_path = dir.join(format!("body_run_{category}_{suffix}.bin"));
    let body_cbor = bincode::serialize(&body)?;
    atomic_write(&body_cbor_path, &body_cbor)?;

    Ok(())
}

/// Ensures the four standard run-path subdirectories exist, matching
/// `src/storage/wal.rs::Wal::new`'s directory-creation-on-open idiom.
pub fn ensure_run_layout(run_dir: &Path) -> Result<(), ArtifactError> {
    for sub in ["identified", "explored", "reverse", "output"] {
        let dir = run_dir.join(sub);
        fs::create_dir_all(&dir).map_err(|source| ArtifactError::Io {
            path: dir.display().to_string(),
            source,
        })?;
    }
    Ok(())
}
