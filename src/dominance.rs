//! Per-category dominance, and the cross-category case the standard rule
//! catalogue relies on (a characterized multicore model dominates the
//! uncharacterized one it wraps, at equal coverage).

use crate::decision::DecisionModel;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dominance {
    Lt,
    Eq,
    Gt,
    Incomparable,
}

/// `a dominates b` iff `covered(a) superset covered(b)` and `a` strictly
/// refines `b` on at least one payload dimension. Returns the ordering of
/// `a` relative to `b`.
#[must_use]
pub fn dominates(a: &DecisionModel, b: &DecisionModel) -> Dominance {
    use DecisionModel::{
        JobScheduling, SdfExecution, SdfToMultiCore, SdfToMultiCoreCharacterized, SdfToOrders,
        TimeTriggeredPlatform,
    };

    match (a, b) {
        (SdfExecution(x), SdfExecution(y)) => by_coverage(&x.covered, &y.covered, || {
            x.pass.len().cmp(&y.pass.len())
        }),
        (SdfToOrders(x), SdfToOrders(y)) => by_coverage(&x.covered, &y.covered, || {
            x.orderings.len().cmp(&y.orderings.len())
        }),
        (SdfToMultiCore(x), SdfToMultiCore(y)) => by_coverage(&x.covered, &y.covered, || {
            x.paths.len().cmp(&y.paths.len())
        }),
        (SdfToMultiCoreCharacterized(x), SdfToMultiCoreCharacterized(y)) => {
            by_coverage(&x.covered, &y.covered, || {
                (x.wcet.len() + x.wcct.len()).cmp(&(y.wcet.len() + y.wcct.len()))
            })
        }
        (TimeTriggeredPlatform(x), TimeTriggeredPlatform(y)) => {
            by_coverage(&x.covered, &y.covered, || {
                x.scheduler_assignment.len().cmp(&y.scheduler_assignment.len())
            })
        }
        (JobScheduling(x), JobScheduling(y)) => by_coverage(&x.covered, &y.covered, || {
            (x.wcet.len() + x.wcct.len()).cmp(&(y.wcet.len() + y.wcct.len()))
        }),
        // A characterized model dominates the uncharacterized multicore
        // model it wraps, when coverage is equal: it strictly refines it
        // by definition (it has wcet/wcct populated, the uncharacterized
        // model has none).
        (SdfToMultiCoreCharacterized(x), SdfToMultiCore(y)) if x.covered == *y.covered => {
            Dominance::Gt
        }
        (SdfToMultiCore(x), SdfToMultiCoreCharacterized(y)) if *x.covered == y.covered => {
            Dominance::Lt
        }
        _ => Dominance::Incomparable,
    }
}

fn by_coverage(
    a: &crate::decision::CoveredSet,
    b: &crate::decision::CoveredSet,
    payload_cmp: impl FnOnce() -> std::cmp::Ordering,
) -> Dominance {
    use std::cmp::Ordering;

    let a_ge_b = a.is_superset_of(b);
    let b_ge_a = b.is_superset_of(a);

    match (a_ge_b, b_ge_a) {
        (true, true) => match payload_cmp() {
            Ordering::Greater => Dominance::Gt,
            Ordering::Less => Dominance::Lt,
            Ordering::Equal => Dominance::Eq,
        },
        (true, false) => Dominance::Gt,
        (false, true) => Dominance::Lt,
        (false, false) => Dominance::Incomparable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision::{CoveredSet, SdfExecutionModel};
    use dside_graph::VertexId;
    use dside_sdf::Topology;

    fn exec(covered_vertices: &[u32], pass_len: usize) -> DecisionModel {
        let mut covered = CoveredSet::default();
        for &v in covered_vertices {
            covered.vertices.insert(VertexId(v));
        }
        DecisionModel::SdfExecution(SdfExecutionModel {
            covered,
            actors: vec![],
            channels: vec![],
            topology: Topology::zeros(0, 0),
            repetition: vec![],
            initial_tokens: vec![],
            pass: vec![0; pass_len],
        })
    }

    #[test]
    fn strict_coverage_superset_dominates() {
        let big = exec(&[0, 1, 2], 3);
        let small = exec(&[0, 1], 2);
        assert_eq!(dominates(&big, &small), Dominance::Gt);
        assert_eq!(dominates(&small, &big), Dominance::Lt);
    }

    #[test]
    fn equal_coverage_and_payload_is_eq() {
        let a = exec(&[0, 1], 2);
        let b = exec(&[0, 1], 2);
        assert_eq!(dominates(&a, &b), Dominance::Eq);
    }

    #[test]
    fn disjoint_coverage_is_incomparable() {
        let a = exec(&[0], 1);
        let b = exec(&[1], 1);
        assert_eq!(dominates(&a, &b), Dominance::Incomparable);
    }

    #[test]
    fn dominance_is_irreflexive_for_strict_variants() {
        // Eq is not Gt/Lt: a model never strictly dominates itself.
        let a = exec(&[0, 1], 2);
        assert_eq!(dominates(&a, &a), Dominance::Eq);
    }
}
