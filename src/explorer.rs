//! The explorer trait boundary (spec §4.5) plus two reference
//! implementations: [`BruteForceExplorer`], which exhaustively enumerates
//! processor assignments for small `JobScheduling` instances, and
//! [`NullExplorer`], which never matches anything.
//!
//! Real constraint-solver backends (MiniZinc, CP-SAT, …) are out of scope;
//! this module only specifies the interface they would implement.

use std::collections::HashMap;

use crate::decision::{DecisionModel, JobSchedulingModel, OrderedFloat};

/// Advisory pairwise comparison between two explorers over one decision
/// model: which one is more complete, which is expected to be faster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DominanceFlags {
    pub complete: bool,
    pub fast: bool,
}

/// An explorer's advisory bid for a decision model: whether it can run at
/// all, plus a scalar figure-of-merit map used for cross-explorer ranking.
#[derive(Debug, Clone, Default)]
pub struct Bid {
    pub can: bool,
    pub criteria: HashMap<String, f64>,
}

/// Options threaded through to the exploration backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExploreOptions {
    pub max_sols: u32,
    pub total_timeout_sec: u32,
    pub time_resolution: u64,
    pub memory_resolution: u64,
}

/// A boxed iterator of solution decision models, with an explicit
/// cancellation hook for the driver's preemption path.
pub trait SolutionStream: Iterator<Item = DecisionModel> {
    fn cancel(&mut self);
}

pub type BoxedSolutionStream = Box<dyn SolutionStream>;

/// The counterpart of `idesyde/exploration/interfaces.py::Explorer`, with
/// the `bid` method spec §4.5 adds beyond the original.
pub trait Explorer: Send + Sync {
    fn name(&self) -> &str;
    fn can_explore(&self, d: &DecisionModel) -> bool;
    fn dominance(&self, other: &dyn Explorer, d: &DecisionModel) -> DominanceFlags;
    fn bid(&self, d: &DecisionModel) -> Bid;
    fn explore(&self, d: &DecisionModel, opts: &ExploreOptions) -> BoxedSolutionStream;
}

struct VecSolutionStream {
    remaining: std::vec::IntoIter<DecisionModel>,
    cancelled: bool,
}

impl Iterator for VecSolutionStream {
    type Item = DecisionModel;
    fn next(&mut self) -> Option<DecisionModel> {
        if self.cancelled {
            return None;
        }
        self.remaining.next()
    }
}

impl SolutionStream for VecSolutionStream {
    fn cancel(&mut self) {
        self.cancelled = true;
    }
}

/// Exhaustively assigns every job to every permitted processor, keeping
/// only assignments where capacity/permitted-location constraints hold,
/// list-schedules each one, and yields solutions ordered by the
/// resulting schedule period (makespan) — small enough to brute-force,
/// used by the end-to-end tests (scenario A of spec §8).
pub struct BruteForceExplorer {
    pub max_jobs: usize,
}

impl Default for BruteForceExplorer {
    fn default() -> Self {
        BruteForceExplorer { max_jobs: 12 }
    }
}

impl Explorer for BruteForceExplorer {
    fn name(&self) -> &str {
        "brute-force"
    }

    fn can_explore(&self, d: &DecisionModel) -> bool {
        matches!(d, DecisionModel::JobScheduling(js) if js.jobs.len() <= self.max_jobs && !js.processors.is_empty())
    }

    fn dominance(&self, _other: &dyn Explorer, _d: &DecisionModel) -> DominanceFlags {
        DominanceFlags { complete: true, fast: false }
    }

    fn bid(&self, d: &DecisionModel) -> Bid {
        let mut criteria = HashMap::new();
        if let DecisionModel::JobScheduling(js) = d {
            criteria.insert("jobs".to_string(), js.jobs.len() as f64);
        }
        Bid { can: self.can_explore(d), criteria }
    }

    fn explore(&self, d: &DecisionModel, opts: &ExploreOptions) -> BoxedSolutionStream {
        let DecisionModel::JobScheduling(js) = d else {
            return Box::new(VecSolutionStream { remaining: Vec::new().into_iter(), cancelled: false });
        };
        let mut solutions = enumerate_assignments(js);
        for s in &mut solutions {
            let (schedule, _) = compute_schedule(s);
            s.pre_schedulings = schedule;
        }
        solutions.sort_by_key(schedule_period);
        if opts.max_sols > 0 {
            solutions.truncate(opts.max_sols as usize);
        }
        let wrapped: Vec<DecisionModel> =
            solutions.into_iter().map(DecisionModel::JobScheduling).collect();
        Box::new(VecSolutionStream { remaining: wrapped.into_iter(), cancelled: false })
    }
}

fn schedule_period(js: &JobSchedulingModel) -> u64 {
    js.pre_schedulings
        .iter()
        .map(|&(idx, proc, start)| start + job_wcet(js, idx, proc))
        .max()
        .unwrap_or(0)
}

fn job_wcet(js: &JobSchedulingModel, job: usize, proc: usize) -> u64 {
    js.wcet
        .iter()
        .find(|((j, p), _)| *j == job && *p == proc)
        .map(|(_, w)| w.0.round() as u64)
        .unwrap_or(0)
}

/// List-schedules `js.pre_mappings`'s assignment: walks jobs in an order
/// consistent with `weak_precedence`/`strong_precedence`, starting each job
/// at the later of its predecessors' finish times and its processor's next
/// free slot. Returns the resulting `(job, processor, start)` triples plus
/// the overall makespan (the schedule's period, spec §8 scenario A).
fn compute_schedule(js: &JobSchedulingModel) -> (Vec<(usize, usize, u64)>, u64) {
    let n_jobs = js.jobs.len();
    let mapping: HashMap<usize, usize> = js.pre_mappings.iter().copied().collect();
    let edges: Vec<(usize, usize)> =
        js.weak_precedence.iter().chain(js.strong_precedence.iter()).copied().collect();
    let order = topological_order(n_jobs, &edges);

    let mut start = vec![0u64; n_jobs];
    let mut proc_free: HashMap<usize, u64> = HashMap::new();
    for &idx in &order {
        let Some(&proc) = mapping.get(&idx) else { continue };
        let pred_ready = edges
            .iter()
            .filter(|&&(_, t)| t == idx)
            .filter_map(|&(s, _)| {
                let &sp = mapping.get(&s)?;
                Some(start[s] + job_wcet(js, s, sp))
            })
            .max()
            .unwrap_or(0);
        let free = *proc_free.get(&proc).unwrap_or(&0);
        let s = pred_ready.max(free);
        start[idx] = s;
        proc_free.insert(proc, s + job_wcet(js, idx, proc));
    }

    let schedule = (0..n_jobs).filter_map(|idx| mapping.get(&idx).map(|&proc| (idx, proc, start[idx]))).collect();
    let period = proc_free.values().copied().max().unwrap_or(0);
    (schedule, period)
}

/// Kahn's algorithm; falls back to appending any unvisited jobs (a
/// precedence cycle) in index order rather than panicking, since
/// `compute_schedule` must degrade gracefully on ill-formed input.
fn topological_order(n_jobs: usize, edges: &[(usize, usize)]) -> Vec<usize> {
    let mut indegree = vec![0usize; n_jobs];
    let mut adj: Vec<Vec<usize>> = vec![Vec::new(); n_jobs];
    for &(s, t) in edges {
        if s < n_jobs && t < n_jobs {
            adj[s].push(t);
            indegree[t] += 1;
        }
    }
    let mut queue: std::collections::VecDeque<usize> =
        (0..n_jobs).filter(|&j| indegree[j] == 0).collect();
    let mut order = Vec::with_capacity(n_jobs);
    while let Some(j) = queue.pop_front() {
        order.push(j);
        for &next in &adj[j] {
            indegree[next] -= 1;
            if indegree[next] == 0 {
                queue.push_back(next);
            }
        }
    }
    if order.len() != n_jobs {
        for j in 0..n_jobs {
            if !order.contains(&j) {
                order.push(j);
            }
        }
    }
    order
}

/// Assigns each job to the first permitted processor in index order,
/// recursing over the remaining choices. Permitted locations default to
/// "every processor" when a job has no explicit restriction.
fn enumerate_assignments(js: &JobSchedulingModel) -> Vec<JobSchedulingModel> {
    let n_jobs = js.jobs.len();
    let n_procs = js.processors.len();
    if n_jobs == 0 || n_procs == 0 {
        return Vec::new();
    }

    let choices: Vec<Vec<usize>> = (0..n_jobs)
        .map(|j| {
            js.permitted_locations
                .iter()
                .find(|(job, _)| *job == j)
                .map(|(_, allowed)| allowed.clone())
                .unwrap_or_else(|| (0..n_procs).collect())
        })
        .collect();

    let mut results = Vec::new();
    let mut current = vec![0usize; n_jobs];
    backtrack(0, &choices, &mut current, &mut results, js);
    results
}

fn backtrack(
    job: usize,
    choices: &[Vec<usize>],
    current: &mut Vec<usize>,
    results: &mut Vec<JobSchedulingModel>,
    js: &JobSchedulingModel,
) {
    if job == current.len() {
        let mut model = js.clone();
        model.pre_mappings = current.iter().enumerate().map(|(j, &p)| (j, p)).collect();
        results.push(model);
        return;
    }
    for &proc in &choices[job] {
        current[job] = proc;
        backtrack(job + 1, choices, current, results, js);
    }
}

/// Matches nothing; a placeholder registrant so `ExplorerMatcher` has a
/// second explorer to disambiguate against in tests, and a documented
/// stand-in for an unimplemented backend.
pub struct NullExplorer;

impl Explorer for NullExplorer {
    fn name(&self) -> &str {
        "null"
    }

    fn can_explore(&self, _d: &DecisionModel) -> bool {
        false
    }

    fn dominance(&self, _other: &dyn Explorer, _d: &DecisionModel) -> DominanceFlags {
        DominanceFlags::default()
    }

    fn bid(&self, _d: &DecisionModel) -> Bid {
        Bid::default()
    }

    fn explore(&self, _d: &DecisionModel, _opts: &ExploreOptions) -> BoxedSolutionStream {
        Box::new(VecSolutionStream { remaining: Vec::new().into_iter(), cancelled: false })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision::CoveredSet;

    fn single_job_model() -> DecisionModel {
        DecisionModel::JobScheduling(JobSchedulingModel {
            covered: CoveredSet::default(),
            actors: vec![],
            channels: vec![],
            jobs: vec![dside_sdf::Job { actor: 0, firing: 1 }],
            processors: vec![crate::decision::AbstractProcessor(vec![dside_graph::VertexId(0)])],
            communicators: vec![],
            proc_capacity: vec![u64::MAX],
            comm_slot_capacity: vec![],
            wcet: vec![((0, 0), OrderedFloat(2.0))],
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
    fn brute_force_explores_single_job_single_processor() {
        let model = single_job_model();
        let explorer = BruteForceExplorer::default();
        assert!(explorer.can_explore(&model));
        let opts = ExploreOptions::default();
        let solutions: Vec<_> = explorer.explore(&model, &opts).collect();
        assert_eq!(solutions.len(), 1);
        let DecisionModel::JobScheduling(js) = &solutions[0] else { panic!() };
        assert_eq!(js.pre_mappings, vec![(0, 0)]);
    }

    #[test]
    fn null_explorer_never_matches() {
        let model = single_job_model();
        assert!(!NullExplorer.can_explore(&model));
    }

    #[test]
    fn cancel_stops_the_stream() {
        let model = single_job_model();
        let explorer = BruteForceExplorer::default();
        let mut stream = explorer.explore(&model, &ExploreOptions::default());
        stream.cancel();
        assert!(stream.next().is_none());
    }
}
