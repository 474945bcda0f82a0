//! Dominance filter: reduces an `identified` set down to the non-dominated
//! frontier per category, per spec §4.4.
//!
//! `choose` is `idesyde/identification/api.py::choose_decision_models`'s
//! two-stage procedure: an optional category-name whitelist is applied
//! first (discard every model whose category is not listed), then the
//! dominated-removal fixpoint runs over whatever remains.

use crate::decision::DecisionModel;
use crate::dominance::{dominates, Dominance};
use crate::error::ConfigurationError;

/// Filters `models` to `whitelist`'s category names (when given), then
/// repeatedly removes any model strictly dominated by another until no
/// further removal is possible.
///
/// # Errors
///
/// Returns [`ConfigurationError::DominanceCycleSuspected`] if the
/// whitelist-filtered input was nonempty and the dominance-removal loop
/// emptied it anyway — evidence a category's dominance relation is not
/// antisymmetric. A whitelist that filters everything out is not a cycle;
/// it is reported as an empty, successful result.
pub fn choose(
    models: Vec<DecisionModel>,
    whitelist: Option<&[&str]>,
) -> Result<Vec<DecisionModel>, ConfigurationError> {
    let filtered: Vec<DecisionModel> = match whitelist {
        Some(names) => models.into_iter().filter(|m| names.contains(&m.category())).collect(),
        None => models,
    };
    let input_len = filtered.len();
    if filtered.is_empty() {
        return Ok(filtered);
    }

    let mut kept = filtered;
    loop {
        let mut dominated_at = None;
        'search: for (i, a) in kept.iter().enumerate() {
            for (j, b) in kept.iter().enumerate() {
                if i == j {
                    continue;
                }
                if dominates(b, a) == Dominance::Gt {
                    dominated_at = Some(i);
                    break 'search;
                }
            }
        }
        match dominated_at {
            Some(i) => {
                kept.remove(i);
            }
            None => break,
        }
    }

    if kept.is_empty() {
        return Err(ConfigurationError::DominanceCycleSuspected { input_len });
    }

    Ok(kept)
}
