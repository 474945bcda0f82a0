//! The explorer/decision-model matcher: computes the non-dominated
//! `(explorer, decision model)` frontier, grounded on
//! `idesyde/exploration/api.py::choose_explorer`'s fixpoint-removal loop.

use crate::decision::DecisionModel;
use crate::explorer::Explorer;

/// Which of an explorer-pair's [`crate::explorer::DominanceFlags`] decides
/// the matcher's removal step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DominanceCriterion {
    Completeness,
    Speed,
}

/// Computes `P = {(e, d) | e.can_explore(d)}`, then repeatedly removes any
/// pair `(e, d)` for which some other registered explorer `e'` both can
/// explore `d` and dominates `e` on `d` under `criterion`. Returns indices
/// into `explorers` and `identified` for the surviving frontier.
#[must_use]
pub fn match_all(
    identified: &[DecisionModel],
    explorers: &[Box<dyn Explorer>],
    criterion: DominanceCriterion,
) -> Vec<(usize, usize)> {
    let mut pairs: Vec<(usize, usize)> = Vec::new();
    for (di, d) in identified.iter().enumerate() {
        for (ei, e) in explorers.iter().enumerate() {
            if e.can_explore(d) {
                pairs.push((ei, di));
            }
        }
    }

    loop {
        let mut remove_at = None;
        'search: for (i, &(ei, di)) in pairs.iter().enumerate() {
            for &(ej, dj) in &pairs {
                if dj != di || ej == ei {
                    continue;
                }
                let flags = explorers[ej].dominance(explorers[ei].as_ref(), &identified[di]);
                let wins = match criterion {
                    DominanceCriterion::Completeness => flags.complete,
                    DominanceCriterion::Speed => flags.fast,
                };
                if wins {
                    remove_at = Some(i);
                    break 'search;
                }
            }
        }
        match remove_at {
            Some(i) => {
                pairs.remove(i);
            }
            None => break,
        }
    }

    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision::{CoveredSet, JobSchedulingModel, OrderedFloat};
    use crate::explorer::{BruteForceExplorer, DominanceFlags, NullExplorer};

    fn trivial_job_scheduling() -> DecisionModel {
        DecisionModel::JobScheduling(JobSchedulingModel {
            covered: CoveredSet::default(),
            actors: vec![],
            channels: vec![],
            jobs: vec![dside_sdf::Job { actor: 0, firing: 1 }],
            processors: vec![crate::decision::AbstractProcessor(vec![dside_graph::VertexId(0)])],
            communicators: vec![],
            proc_capacity: vec![1],
            comm_slot_capacity: vec![],
            wcet: vec![((0, 0), OrderedFloat(1.0))],
            wcct: vec![],
            weak_precedence: vec![],
            strong_precedence: vec![],
            pre_mappings: vec![],
            pre_schedulings: vec![],
            permitted_locations: vec![],
            paths: vec![],
            throughput_importance: OrderedFloat(0.0),
            latency_importance: OrderedFloat(0.0),
        })
    }

    #[test]
    fn only_capable_explorer_survives() {
        let identified = vec![trivial_job_scheduling()];
        let explorers: Vec<Box<dyn crate::explorer::Explorer>> =
            vec![Box::new(BruteForceExplorer::default()), Box::new(NullExplorer)];
        let frontier = match_all(&identified, &explorers, DominanceCriterion::Completeness);
        assert_eq!(frontier, vec![(0, 0)]);
    }

    struct AlwaysCompleteExplorer;
    impl crate::explorer::Explorer for AlwaysCompleteExplorer {
        fn name(&self) -> &str {
            "always-complete"
        }
        fn can_explore(&self, _d: &DecisionModel) -> bool {
            true
        }
        fn dominance(&self, _other: &dyn crate::explorer::Explorer, _d: &DecisionModel) -> DominanceFlags {
            DominanceFlags { complete: true, fast: false }
        }
        fn bid(&self, _d: &DecisionModel) -> crate::explorer::Bid {
            crate::explorer::Bid::default()
        }
        fn explore(
            &self,
            _d: &DecisionModel,
            _opts: &crate::explorer::ExploreOptions,
        ) -> crate::explorer::BoxedSolutionStream {
            unimplemented!("not exercised by this test")
        }
    }

    #[test]
    fn dominated_explorer_is_removed_from_frontier() {
        let identified = vec![trivial_job_scheduling()];
        let explorers: Vec<Box<dyn crate::explorer::Explorer>> =
            vec![Box::new(BruteForceExplorer::default()), Box::new(AlwaysCompleteExplorer)];
        let frontier = match_all(&identified, &explorers, DominanceCriterion::Completeness);
        assert_eq!(frontier, vec![(1, 0)]);
    }
}
