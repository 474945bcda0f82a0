//! The exploration driver (spec §4.6): drives a chosen explorer's solution
//! stream, reverse-identifies each solution back onto an overlay of the
//! design graph, and persists one artifact pair per solution.

use std::path::Path;

use dside_graph::{Graph, VertexId};

use crate::decision::DecisionModel;
use crate::error::{ArtifactError, ExplorationError};
use crate::explorer::{ExploreOptions, Explorer};
use crate::persist;

/// An append-only overlay of new Mapping/Scheduling edges and scheduler
/// property mutations layered on top of `G`. `G` itself never changes
/// within a run (spec §3's lifecycle rule); reverse identification
/// accumulates into this instead.
#[derive(Debug, Clone, Default)]
pub struct DesignAnnotations {
    pub new_edges: Vec<(VertexId, VertexId, &'static str)>,
    pub scheduler_trigger_times: Vec<(VertexId, Vec<u64>)>,
    pub scheduler_periods: Vec<(VertexId, u64)>,
}

impl DesignAnnotations {
    /// Every vertex id referenced by this overlay's edges/properties, for
    /// the well-typing check (spec §8 property 8).
    fn referenced_vertices(&self) -> Vec<VertexId> {
        let mut ids = Vec::new();
        for &(s, t, _) in &self.new_edges {
            ids.push(s);
            ids.push(t);
        }
        for (v, _) in &self.scheduler_trigger_times {
            ids.push(*v);
        }
        for (v, _) in &self.scheduler_periods {
            ids.push(*v);
        }
        ids
    }
}

/// A reverse-identification rule: projects solution decision models onto
/// design annotations. Applied once per solution, not to a fixpoint —
/// the same shape as a forward rule, run exactly once (spec §9).
pub trait ReverseRule: Send + Sync {
    fn name(&self) -> &'static str;
    fn apply(&self, solutions: &[DecisionModel], design: &DesignAnnotations) -> DesignAnnotations;
}

/// Projects a `JobScheduling` solution's `pre_mappings`/`pre_schedulings`
/// into Mapping/Scheduling edges between actors and the processor each job
/// landed on, grounded on `idesyde/identification/rules.py`'s
/// `trigger_time` annotation step.
pub struct MapJobsToProcessors;

impl ReverseRule for MapJobsToProcessors {
    fn name(&self) -> &'static str {
        "map_jobs_to_processors"
    }

    fn apply(&self, solutions: &[DecisionModel], design: &DesignAnnotations) -> DesignAnnotations {
        let mut out = design.clone();
        for s in solutions {
            let DecisionModel::JobScheduling(js) = s else { continue };
            for &(job_idx, proc_idx) in &js.pre_mappings {
                let Some(&actor_vertex) = js.jobs.get(job_idx).and_then(|j| js.actors.get(j.actor))
                else {
                    continue;
                };
                let Some(proc) = js.processors.get(proc_idx) else { continue };
                let Some(&proc_vertex) = proc.0.first() else { continue };
                out.new_edges.push((actor_vertex, proc_vertex, "mapping"));
            }
            for &(job_idx, proc_idx, start) in &js.pre_schedulings {
                let Some(proc) = js.processors.get(proc_idx) else { continue };
                let Some(&proc_vertex) = proc.0.first() else { continue };
                if let Some(job) = js.jobs.get(job_idx) {
                    let _ = job;
                    out.scheduler_trigger_times
                        .push((proc_vertex, vec![start]));
                }
            }
        }
        out
    }
}

/// Outcome of driving one `(explorer, decision model)` pair to completion.
#[derive(Debug, Clone, Default)]
pub struct ExplorationSummary {
    pub solutions_emitted: usize,
    pub errors: Vec<ExplorationError>,
}

/// Drives the explorer's solution stream: for each solution, reverse-
/// identifies it, checks the well-typing invariant, and persists one
/// header+body artifact pair, stopping early on `opts.max_sols` or
/// `opts.total_timeout_sec`.
pub fn run(
    g: &Graph,
    explorer: &dyn Explorer,
    d: &DecisionModel,
    opts: &ExploreOptions,
    reverse_rules: &[Box<dyn ReverseRule>],
    run_dir: &Path,
) -> Result<ExplorationSummary, ArtifactError> {
    let deadline = (opts.total_timeout_sec > 0)
        .then(|| std::time::Instant::now() + std::time::Duration::from_secs(u64::from(opts.total_timeout_sec)));

    let mut stream = explorer.explore(d, opts);
    let mut summary = ExplorationSummary::default();
    let mut suffix = 0usize;

    loop {
        if opts.max_sols > 0 && summary.solutions_emitted >= opts.max_sols as usize {
            stream.cancel();
            break;
        }
        if let Some(dl) = deadline {
            if std::time::Instant::now() >= dl {
                stream.cancel();
                break;
            }
        }
        let Some(solution) = stream.next() else { break };

        let mut annotations = DesignAnnotations::default();
        for rule in reverse_rules {
            annotations = rule.apply(std::slice::from_ref(&solution), &annotations);
        }

        if let Err(err) = check_well_typed(g, &solution, &annotations) {
            tracing::warn!(error = %err, "reverse-identification produced an ill-typed annotation; skipping solution");
            summary.errors.push(err);
            continue;
        }

        persist::write_solution(run_dir, "explored", suffix, &solution)?;
        suffix += 1;
        summary.solutions_emitted += 1;
    }

    Ok(summary)
}

fn check_well_typed(
    g: &Graph,
    solution: &DecisionModel,
    annotations: &DesignAnnotations,
) -> Result<(), ExplorationError> {
    let covered = solution.covered();
    for v in annotations.referenced_vertices() {
        let in_g = (v.0 as usize) < g.vertices().len();
        let in_covered = covered.vertices.contains(&v);
        if !in_g && !in_covered {
            return Err(ExplorationError::IllTypedReverseAnnotation { reference: v.to_string() });
        }
    }
    Ok(())
}
