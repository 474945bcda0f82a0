//! The standard identification rule catalogue: ten rules, each its own
//! zero-sized `struct X; impl Rule for X`, grounded on
//! `idesyde/identification/rules.py`'s `SDFAppRule` and sibling rule
//! classes from the original Python implementation this system is
//! modeled on.
//!
//! A rule is a pure function `(G, &[DecisionModel]) -> RuleOutcome`. Most
//! rules here follow one of two shapes:
//!
//! - **One-shot rules** (1, 3, 5) compute directly from `G` (and, for 3,
//!   one prerequisite model) and always return `fixed: true` the moment
//!   they have an answer, since `G` never changes within a run.
//! - **Refinement rules** (6–9) build a candidate decision model from an
//!   existing one; if the candidate is not yet present in `identified`
//!   they emit it and stay active (`fixed: false`), otherwise they report
//!   `fixed: true` — no further refinement is possible.

use std::collections::HashMap;

use dside_graph::{EdgeId, Graph, VertexId};
use dside_sdf::Topology;

use crate::decision::{
    AbstractCommunicator, AbstractProcessor, CoveredSet, DecisionModel, JobSchedulingModel,
    OrderedFloat, SdfExecutionModel, SdfToMultiCoreCharacterizedModel, SdfToMultiCoreModel,
    SdfToOrdersModel, TimeTriggeredPlatformModel,
};
use crate::graphx::{edge_i64_prop, f64_prop, i64_prop, str_prop};
use crate::vocab;

/// The outcome of one rule invocation: whether the rule has reached its
/// local fixpoint, and an optional newly identified decision model.
#[derive(Debug, Clone, Default)]
pub struct RuleOutcome {
    pub fixed: bool,
    pub produced: Option<DecisionModel>,
}

/// A pure identification rule: `(G, identified) -> RuleOutcome`.
pub trait Rule: Send + Sync {
    fn name(&self) -> &'static str;
    fn apply(&self, g: &Graph, identified: &[DecisionModel]) -> RuleOutcome;
}

/// Builds the ten rules of the standard catalogue in one place, the way
/// the rest of this codebase centralizes rule construction rather than
/// relying on a global registration side effect.
#[must_use]
pub fn standard_rule_catalogue() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(IdentifyConsistentSdfApplication),
        Box::new(IdentifyOrderingsAtopSdf),
        Box::new(IdentifyProcessorsAndInterconnect),
        Box::new(CharacterizeWithWcetWcct),
        Box::new(IdentifyTimeTriggeredPlatform),
        Box::new(JobifyAndCompose),
        Box::new(EnrichWithInstrumentation),
        Box::new(EnrichWithLocationRequirements),
        Box::new(EnrichFromExplicitAnnotations),
        Box::new(MergeJobSchedulingSiblings),
    ]
}

fn sorted_vertices_with_trait(g: &Graph, trait_name: &str) -> Vec<VertexId> {
    let mut ids: Vec<VertexId> = g
        .vertices()
        .iter()
        .filter(|v| v.is_a(trait_name))
        .map(|v| v.id)
        .collect();
    ids.sort();
    ids
}

fn sorted_edges_with_trait(g: &Graph, trait_name: &str) -> Vec<EdgeId> {
    let mut ids: Vec<EdgeId> = g
        .edges()
        .iter()
        .filter(|e| e.is_a(trait_name))
        .map(|e| e.id)
        .collect();
    ids.sort();
    ids
}

fn build_topology(g: &Graph, actors: &[VertexId], channels: &[EdgeId]) -> (Topology, Vec<i64>) {
    let mut topology = Topology::zeros(channels.len(), actors.len());
    let mut initial_tokens = vec![0i64; channels.len()];
    for (row, &cid) in channels.iter().enumerate() {
        let e = g.edge(cid);
        let production = edge_i64_prop(e, vocab::PRODUCTION);
        let consumption = edge_i64_prop(e, vocab::CONSUMPTION);
        initial_tokens[row] = edge_i64_prop(e, vocab::INITIAL_TOKENS);
        if let Some(src_col) = actors.iter().position(|&a| a == e.source) {
            topology.set(row, src_col, production);
        }
        if let Some(tgt_col) = actors.iter().position(|&a| a == e.target) {
            let existing = topology.get(row, tgt_col);
            topology.set(row, tgt_col, existing - consumption);
        }
    }
    (topology, initial_tokens)
}

fn all_pairs_shortest_paths(
    g: &Graph,
    nodes: &[VertexId],
) -> Vec<((VertexId, VertexId), Vec<Vec<VertexId>>)> {
    let mut paths = Vec::new();
    for &p in nodes {
        for &q in nodes {
            if p == q {
                continue;
            }
            let found = g.shortest_paths(p, q);
            if !found.is_empty() {
                paths.push(((p, q), found));
            }
        }
    }
    paths
}

fn slot_capacity_for(g: &Graph, communicators: &[VertexId]) -> std::collections::BTreeMap<VertexId, u32> {
    communicators
        .iter()
        .map(|&c| {
            let v = g.vertex(c);
            let slots = if v.is_a(vocab::TDM) {
                i64_prop(v, vocab::SLOTS).unwrap_or(0).max(0) as u32
            } else {
                0
            };
            (c, slots)
        })
        .collect()
}

/// Rule 1: identify a consistent SDF application.
pub struct IdentifyConsistentSdfApplication;

impl Rule for IdentifyConsistentSdfApplication {
    fn name(&self) -> &'static str {
        "identify_consistent_sdf_application"
    }

    fn apply(&self, g: &Graph, _identified: &[DecisionModel]) -> RuleOutcome {
        let actors = sorted_vertices_with_trait(g, vocab::ACTOR);
        if actors.is_empty() {
            return RuleOutcome { fixed: true, produced: None };
        }
        let channels: Vec<EdgeId> = sorted_edges_with_trait(g, vocab::CHANNEL)
            .into_iter()
            .filter(|&c| {
                let e = g.edge(c);
                actors.contains(&e.source) && actors.contains(&e.target)
            })
            .collect();

        let (topology, initial_tokens) = build_topology(g, &actors, &channels);
        let nullspace = dside_sdf::nullspace(&topology);
        if nullspace.len() != 1 {
            return RuleOutcome { fixed: true, produced: None };
        }
        let repetition = dside_sdf::integralize(&nullspace[0]);
        let Some(pass) = dside_sdf::pass(&topology, &repetition, &initial_tokens) else {
            return RuleOutcome { fixed: true, produced: None };
        };

        let covered = CoveredSet {
            vertices: actors.iter().copied().collect(),
            edges: channels.iter().copied().collect(),
        };
        let produced = DecisionModel::SdfExecution(SdfExecutionModel {
            covered,
            actors,
            channels,
            topology,
            repetition,
            initial_tokens,
            pass,
        });
        RuleOutcome { fixed: true, produced: Some(produced) }
    }
}

/// Rule 2: identify orderings atop a consistent SDF application.
pub struct IdentifyOrderingsAtopSdf;

impl Rule for IdentifyOrderingsAtopSdf {
    fn name(&self) -> &'static str {
        "identify_orderings_atop_sdf"
    }

    fn apply(&self, g: &Graph, identified: &[DecisionModel]) -> RuleOutcome {
        let Some(exec) = identified.iter().find_map(|d| match d {
            DecisionModel::SdfExecution(m) => Some(m),
            _ => None,
        }) else {
            return RuleOutcome { fixed: false, produced: None };
        };

        let schedulers = sorted_vertices_with_trait(g, vocab::SCHEDULER);
        if schedulers.is_empty() {
            return RuleOutcome { fixed: true, produced: None };
        }
        let orderings = sorted_edges_with_trait(g, vocab::SCHEDULING_EDGE);

        let mut covered = exec.covered.clone();
        covered.vertices.extend(schedulers.iter().copied());
        covered.edges.extend(orderings.iter().copied());

        let produced = DecisionModel::SdfToOrders(SdfToOrdersModel {
            covered,
            execution: Box::new(exec.clone()),
            orderings,
        });
        RuleOutcome { fixed: true, produced: Some(produced) }
    }
}

/// Rule 3: identify processors and the communication interconnect.
pub struct IdentifyProcessorsAndInterconnect;

impl Rule for IdentifyProcessorsAndInterconnect {
    fn name(&self) -> &'static str {
        "identify_processors_and_interconnect"
    }

    fn apply(&self, g: &Graph, identified: &[DecisionModel]) -> RuleOutcome {
        let Some(orders) = identified.iter().find_map(|d| match d {
            DecisionModel::SdfToOrders(m) => Some(m),
            _ => None,
        }) else {
            return RuleOutcome { fixed: false, produced: None };
        };

        let processors = sorted_vertices_with_trait(g, vocab::PROCESSING_COMPONENT);
        if processors.is_empty() {
            return RuleOutcome { fixed: true, produced: None };
        }
        let communicators = sorted_vertices_with_trait(g, vocab::COMMUNICATION_COMPONENT);
        // Resolved Open Question, SPEC_FULL.md §12 item 1: `SdfToOrders`
        // must carry at least as many orderings as there are processors
        // plus communicators once the platform is known.
        if orders.orderings.len() < processors.len() + communicators.len() {
            return RuleOutcome { fixed: true, produced: None };
        }
        let paths = all_pairs_shortest_paths(g, &processors);
        let slot_capacity = slot_capacity_for(g, &communicators);

        let mut covered = orders.covered.clone();
        covered.vertices.extend(processors.iter().copied());
        covered.vertices.extend(communicators.iter().copied());

        let produced = DecisionModel::SdfToMultiCore(SdfToMultiCoreModel {
            covered,
            sdf_to_orders: Box::new(orders.clone()),
            processors,
            communicators,
            slot_capacity,
            paths,
        });
        RuleOutcome { fixed: true, produced: Some(produced) }
    }
}

fn vertex_identifier(g: &Graph, v: VertexId) -> &str {
    &g.vertex(v).identifier
}

/// Rule 4: characterize with WCET/WCCT annotations.
pub struct CharacterizeWithWcetWcct;

impl Rule for CharacterizeWithWcetWcct {
    fn name(&self) -> &'static str {
        "characterize_with_wcet_wcct"
    }

    fn apply(&self, g: &Graph, identified: &[DecisionModel]) -> RuleOutcome {
        let Some(mc) = identified.iter().find_map(|d| match d {
            DecisionModel::SdfToMultiCore(m) => Some(m),
            _ => None,
        }) else {
            return RuleOutcome { fixed: false, produced: None };
        };

        let actors = &mc.sdf_to_orders.execution.actors;
        let wcet_vertices: Vec<_> = g
            .vertices()
            .iter()
            .filter(|v| v.is_a(vocab::WCET_ANNOTATION))
            .collect();

        let mut wcet = Vec::new();
        for &a in actors {
            for &p in &mc.processors {
                let best = wcet_vertices
                    .iter()
                    .filter(|v| {
                        str_prop(v, vocab::ACTOR_REF) == Some(vertex_identifier(g, a))
                            && str_prop(v, vocab::PROCESSOR_REF) == Some(vertex_identifier(g, p))
                    })
                    .filter_map(|v| f64_prop(v, vocab::VALUE))
                    .fold(None, |acc: Option<f64>, v| {
                        Some(acc.map_or(v, |cur| cur.max(v)))
                    });
                match best {
                    Some(v) => wcet.push(((a, p), OrderedFloat(v))),
                    None => return RuleOutcome { fixed: true, produced: None },
                }
            }
        }

        let wcct_vertices: Vec<_> = g
            .vertices()
            .iter()
            .filter(|v| v.is_a(vocab::WCCT_ANNOTATION))
            .collect();
        let mut wcct = Vec::new();
        for &c in &mc.sdf_to_orders.execution.channels {
            for &comm in &mc.communicators {
                let best = wcct_vertices
                    .iter()
                    .filter(|v| {
                        str_prop(v, vocab::CHANNEL_REF) == Some(vertex_identifier(g, g.edge(c).source))
                            && str_prop(v, vocab::COMMUNICATOR_REF) == Some(vertex_identifier(g, comm))
                    })
                    .filter_map(|v| f64_prop(v, vocab::VALUE))
                    .fold(None, |acc: Option<f64>, v| {
                        Some(acc.map_or(v, |cur| cur.max(v)))
                    });
                if let Some(v) = best {
                    wcct.push(((c, comm), OrderedFloat(v)));
                }
            }
        }
        if wcct.is_empty() && !mc.communicators.is_empty() && !mc.sdf_to_orders.execution.channels.is_empty() {
            return RuleOutcome { fixed: true, produced: None };
        }

        let throughput_importance = g
            .vertices()
            .iter()
            .filter(|v| v.is_a(vocab::GOAL_MINIMUM_THROUGHPUT))
            .filter_map(|v| f64_prop(v, vocab::IMPORTANCE))
            .fold(0.0f64, f64::max);
        let latency_importance = g
            .vertices()
            .iter()
            .filter(|v| v.is_a(vocab::GOAL_LATENCY))
            .filter_map(|v| f64_prop(v, vocab::IMPORTANCE))
            .fold(0.0f64, f64::max);

        let covered = mc.covered.clone();
        let produced = DecisionModel::SdfToMultiCoreCharacterized(SdfToMultiCoreCharacterizedModel {
            covered,
            multicore: Box::new(mc.clone()),
            wcet,
            wcct,
            throughput_importance: OrderedFloat(throughput_importance),
            latency_importance: OrderedFloat(latency_importance),
        });
        RuleOutcome { fixed: true, produced: Some(produced) }
    }
}

/// Rule 5: identify a time-triggered platform independently of any SDF
/// application.
pub struct IdentifyTimeTriggeredPlatform;

impl Rule for IdentifyTimeTriggeredPlatform {
    fn name(&self) -> &'static str {
        "identify_time_triggered_platform"
    }

    fn apply(&self, g: &Graph, _identified: &[DecisionModel]) -> RuleOutcome {
        let schedulers = sorted_vertices_with_trait(g, vocab::SCHEDULER);
        let processors = sorted_vertices_with_trait(g, vocab::PROCESSING_COMPONENT);
        let communicators = sorted_vertices_with_trait(g, vocab::COMMUNICATION_COMPONENT);
        if schedulers.is_empty() || (processors.is_empty() && communicators.is_empty()) {
            return RuleOutcome { fixed: true, produced: None };
        }

        let paths = all_pairs_shortest_paths(g, &processors);

        let mut scheduler_assignment = Vec::new();
        let mut sched_iter = schedulers.iter();
        for &pc in processors.iter().chain(communicators.iter()) {
            match sched_iter.next() {
                Some(&s) => scheduler_assignment.push((pc, s)),
                None => break,
            }
        }

        let covered = CoveredSet {
            vertices: schedulers
                .iter()
                .chain(processors.iter())
                .chain(communicators.iter())
                .copied()
                .collect(),
            edges: Default::default(),
        };

        let produced = DecisionModel::TimeTriggeredPlatform(TimeTriggeredPlatformModel {
            covered,
            schedulers,
            processors,
            communicators,
            paths,
            scheduler_assignment,
        });
        RuleOutcome { fixed: true, produced: Some(produced) }
    }
}

/// Rule 6: jobify the SDF application and compose it with a time-triggered
/// platform into a job-scheduling problem.
pub struct JobifyAndCompose;

impl Rule for JobifyAndCompose {
    fn name(&self) -> &'static str {
        "jobify_and_compose"
    }

    fn apply(&self, g: &Graph, identified: &[DecisionModel]) -> RuleOutcome {
        let exec = identified.iter().find_map(|d| match d {
            DecisionModel::SdfExecution(m) => Some(m),
            _ => None,
        });
        let ttp = identified.iter().find_map(|d| match d {
            DecisionModel::TimeTriggeredPlatform(m) => Some(m),
            _ => None,
        });
        let (Some(exec), Some(ttp)) = (exec, ttp) else {
            return RuleOutcome { fixed: false, produced: None };
        };
        if identified.iter().any(|d| matches!(d, DecisionModel::JobScheduling(_))) {
            return RuleOutcome { fixed: true, produced: None };
        }

        let channel_endpoints: Vec<(usize, usize)> = exec
            .channels
            .iter()
            .map(|&c| {
                let e = g.edge(c);
                let s = exec.actors.iter().position(|&a| a == e.source).unwrap_or(0);
                let t = exec.actors.iter().position(|&a| a == e.target).unwrap_or(0);
                (s, t)
            })
            .collect();

        let job_graph = dside_sdf::job_expansion(
            &exec.topology,
            &exec.repetition,
            &exec.initial_tokens,
            &channel_endpoints,
        );

        let processors: Vec<AbstractProcessor> =
            ttp.processors.iter().map(|&v| AbstractProcessor(vec![v])).collect();
        let communicators: Vec<AbstractCommunicator> = ttp
            .communicators
            .iter()
            .map(|&v| AbstractCommunicator(vec![v]))
            .collect();

        let proc_capacity: Vec<u64> = ttp
            .processors
            .iter()
            .map(|&p| i64_prop(g.vertex(p), vocab::MEMORY_CAPACITY).unwrap_or(i64::MAX).max(0) as u64)
            .collect();
        let comm_slot_capacity: Vec<u32> = {
            let caps = slot_capacity_for(g, &ttp.communicators);
            ttp.communicators.iter().map(|c| *caps.get(c).unwrap_or(&0)).collect()
        };

        let proc_index: HashMap<VertexId, usize> =
            ttp.processors.iter().enumerate().map(|(i, &p)| (p, i)).collect();
        let paths: Vec<((usize, usize), Vec<Vec<usize>>)> = ttp
            .paths
            .iter()
            .filter_map(|((a, b), vps)| {
                let ai = *proc_index.get(a)?;
                let bi = *proc_index.get(b)?;
                let converted = vps
                    .iter()
                    .map(|p| p.iter().filter_map(|v| proc_index.get(v).copied()).collect())
                    .collect();
                Some(((ai, bi), converted))
            })
            .collect();

        let (throughput_importance, latency_importance) = identified
            .iter()
            .find_map(|d| match d {
                DecisionModel::SdfToMultiCoreCharacterized(c)
                    if c.multicore.sdf_to_orders.execution.actors == exec.actors =>
                {
                    Some((c.throughput_importance, c.latency_importance))
                }
                _ => None,
            })
            .unwrap_or((OrderedFloat(0.0), OrderedFloat(0.0)));

        let mut covered = exec.covered.clone();
        covered = covered.union(&ttp.covered);

        let produced = DecisionModel::JobScheduling(JobSchedulingModel {
            covered,
            actors: exec.actors.clone(),
            channels: exec.channels.clone(),
            jobs: job_graph.jobs,
            processors,
            communicators,
            proc_capacity,
            comm_slot_capacity,
            wcet: Vec::new(),
            wcct: Vec::new(),
            weak_precedence: job_graph.weak_next,
            strong_precedence: job_graph.strong_next,
            pre_mappings: Vec::new(),
            pre_schedulings: Vec::new(),
            permitted_locations: Vec::new(),
            paths,
            throughput_importance,
            latency_importance,
        });
        RuleOutcome { fixed: false, produced: Some(produced) }
    }
}

/// Runs `refine` over every `JobScheduling` model currently identified,
/// emitting the first refined candidate not already present. Shared by
/// rules 7–9, all of which have this "refine until no further change"
/// shape.
fn refine_job_scheduling(
    identified: &[DecisionModel],
    refine: impl Fn(&JobSchedulingModel) -> JobSchedulingModel,
) -> RuleOutcome {
    let mut any = false;
    for d in identified {
        if let DecisionModel::JobScheduling(js) = d {
            any = true;
            let candidate = refine(js);
            if candidate != *js {
                let wrapped = DecisionModel::JobScheduling(candidate);
                if !identified.contains(&wrapped) {
                    return RuleOutcome { fixed: false, produced: Some(wrapped) };
                }
            }
        }
    }
    RuleOutcome { fixed: any, produced: None }
}

/// Rule 7: enrich `JobScheduling` with instrumentation-derived wcet/wcct,
/// using the time-scale normalization of spec §4.3.
pub struct EnrichWithInstrumentation;

impl Rule for EnrichWithInstrumentation {
    fn name(&self) -> &'static str {
        "enrich_with_instrumentation"
    }

    fn apply(&self, g: &Graph, identified: &[DecisionModel]) -> RuleOutcome {
        refine_job_scheduling(identified, |js| instrument(g, js))
    }
}

fn instrument(g: &Graph, js: &JobSchedulingModel) -> JobSchedulingModel {
    let mut clock_rate = HashMap::new();
    for v in g.vertices().iter().filter(|v| v.is_a(vocab::CLOCK_RATE)) {
        if let (Some(proc_ref), Some(hz)) =
            (str_prop(v, vocab::PROCESSOR_REF), i64_prop(v, vocab::CLOCK_RATE_HZ))
        {
            clock_rate.insert(proc_ref.to_string(), hz);
        }
    }
    let mut op_cycles: HashMap<(String, String), i64> = HashMap::new();
    for v in g.vertices().iter().filter(|v| v.is_a(vocab::OP_CYCLES)) {
        if let (Some(actor_ref), Some(proc_ref), Some(cycles)) = (
            str_prop(v, vocab::ACTOR_REF),
            str_prop(v, vocab::PROCESSOR_REF),
            i64_prop(v, vocab::VALUE),
        ) {
            op_cycles.insert((actor_ref.to_string(), proc_ref.to_string()), cycles);
        }
    }
    if clock_rate.is_empty() || op_cycles.is_empty() {
        return js.clone();
    }

    let w_min = op_cycles.values().copied().filter(|&w| w > 0).min();
    let f_max = clock_rate.values().copied().filter(|&f| f > 0).max();
    let (Some(w_min), Some(f_max)) = (w_min, f_max) else {
        return js.clone();
    };
    let time_scale = compute_time_scale(w_min, f_max);

    let mut wcet = js.wcet.clone();
    for (ai, &actor) in js.actors.iter().enumerate() {
        for (pi, proc) in js.processors.iter().enumerate() {
            let Some(&proc_v) = proc.0.first() else { continue };
            let actor_id = vertex_identifier(g, actor).to_string();
            let proc_id = vertex_identifier(g, proc_v).to_string();
            let Some(&w) = op_cycles.get(&(actor_id, proc_id.clone())) else {
                continue;
            };
            let Some(&f) = clock_rate.get(&proc_id) else { continue };
            if f == 0 {
                continue;
            }
            let computed = (time_scale * w) / f;
            for (idx, &firing) in js.jobs.iter().enumerate() {
                if firing.actor == ai {
                    let key = (idx, pi);
                    match wcet.iter_mut().find(|(k, _)| *k == key) {
                        Some((_, v)) => *v = OrderedFloat(v.0.max(computed as f64)),
                        None => wcet.push((key, OrderedFloat(computed as f64))),
                    }
                }
            }
        }
    }

    JobSchedulingModel { wcet, ..js.clone() }
}

/// Smallest power of 1000 such that `(scale * w) / f >= 1` as integer
/// division, per spec §4.3.
fn compute_time_scale(w_min_nonzero: i64, f_max_nonzero: i64) -> i64 {
    let mut scale: i64 = 1;
    while (scale * w_min_nonzero) / f_max_nonzero < 1 {
        scale *= 1000;
    }
    scale
}

/// Rule 8: enrich `JobScheduling` with `LocationRequirement` narrowing.
pub struct EnrichWithLocationRequirements;

impl Rule for EnrichWithLocationRequirements {
    fn name(&self) -> &'static str {
        "enrich_with_location_requirements"
    }

    fn apply(&self, g: &Graph, identified: &[DecisionModel]) -> RuleOutcome {
        refine_job_scheduling(identified, |js| apply_location_requirements(g, js))
    }
}

fn apply_location_requirements(g: &Graph, js: &JobSchedulingModel) -> JobSchedulingModel {
    let requirements: Vec<_> = g
        .vertices()
        .iter()
        .filter(|v| v.is_a(vocab::LOCATION_REQUIREMENT))
        .collect();
    if requirements.is_empty() {
        return js.clone();
    }

    let mut permitted_locations = js.permitted_locations.clone();
    for req in &requirements {
        let Some(actor_ref) = str_prop(req, vocab::ACTOR_REF) else { continue };
        let allowed: Vec<String> = crate::graphx::str_list_prop(req, vocab::PROCESSORS);
        if allowed.is_empty() {
            continue;
        }
        let allowed_idx: Vec<usize> = js
            .processors
            .iter()
            .enumerate()
            .filter(|(_, p)| {
                p.0.first()
                    .map(|&v| allowed.iter().any(|a| a == vertex_identifier(g, v)))
                    .unwrap_or(false)
            })
            .map(|(i, _)| i)
            .collect();
        if allowed_idx.is_empty() {
            continue;
        }
        for (ai, &actor) in js.actors.iter().enumerate() {
            if vertex_identifier(g, actor) != actor_ref {
                continue;
            }
            for (idx, &firing) in js.jobs.iter().enumerate() {
                if firing.actor == ai
                    && !permitted_locations.iter().any(|(j, _)| *j == idx)
                {
                    permitted_locations.push((idx, allowed_idx.clone()));
                }
            }
        }
    }

    JobSchedulingModel { permitted_locations, ..js.clone() }
}

/// Rule 9: merge explicit WCET/WCCT annotations into `JobScheduling`,
/// taking the maximum over parallel annotations and over any
/// previously-computed value.
pub struct EnrichFromExplicitAnnotations;

impl Rule for EnrichFromExplicitAnnotations {
    fn name(&self) -> &'static str {
        "enrich_from_explicit_annotations"
    }

    fn apply(&self, g: &Graph, identified: &[DecisionModel]) -> RuleOutcome {
        refine_job_scheduling(identified, |js| apply_explicit_annotations(g, js))
    }
}

fn apply_explicit_annotations(g: &Graph, js: &JobSchedulingModel) -> JobSchedulingModel {
    let mut wcet = js.wcet.clone();
    for v in g.vertices().iter().filter(|v| v.is_a(vocab::WCET_ANNOTATION)) {
        let (Some(actor_ref), Some(proc_ref), Some(value)) = (
            str_prop(v, vocab::ACTOR_REF),
            str_prop(v, vocab::PROCESSOR_REF),
            f64_prop(v, vocab::VALUE),
        ) else {
            continue;
        };
        for (ai, &actor) in js.actors.iter().enumerate() {
            if vertex_identifier(g, actor) != actor_ref {
                continue;
            }
            for (pi, proc) in js.processors.iter().enumerate() {
                if proc.0.first().map(|&p| vertex_identifier(g, p)) != Some(proc_ref) {
                    continue;
                }
                for (idx, &firing) in js.jobs.iter().enumerate() {
                    if firing.actor != ai {
                        continue;
                    }
                    let key = (idx, pi);
                    match wcet.iter_mut().find(|(k, _)| *k == key) {
                        Some((_, cur)) => *cur = OrderedFloat(cur.0.max(value)),
                        None => wcet.push((key, OrderedFloat(value))),
                    }
                }
            }
        }
    }

    let mut wcct = js.wcct.clone();
    for v in g.vertices().iter().filter(|v| v.is_a(vocab::WCCT_ANNOTATION)) {
        let (Some(channel_ref), Some(comm_ref), Some(value)) = (
            str_prop(v, vocab::CHANNEL_REF),
            str_prop(v, vocab::COMMUNICATOR_REF),
            f64_prop(v, vocab::VALUE),
        ) else {
            continue;
        };
        for &channel in &js.channels {
            let edge = g.edge(channel);
            if vertex_identifier(g, edge.source) != channel_ref {
                continue;
            }
            let (Some(src_actor), Some(dst_actor)) = (
                js.actors.iter().position(|&a| a == edge.source),
                js.actors.iter().position(|&a| a == edge.target),
            ) else {
                continue;
            };
            for (mi, comm) in js.communicators.iter().enumerate() {
                if comm.0.first().map(|&c| vertex_identifier(g, c)) != Some(comm_ref) {
                    continue;
                }
                for &(i, j) in &js.strong_precedence {
                    let (Some(fi), Some(fj)) = (js.jobs.get(i), js.jobs.get(j)) else { continue };
                    if fi.actor != src_actor || fj.actor != dst_actor {
                        continue;
                    }
                    let key = (i, j, mi);
                    match wcct.iter_mut().find(|(k, _)| *k == key) {
                        Some((_, cur)) => *cur = OrderedFloat(cur.0.max(value)),
                        None => wcct.push((key, OrderedFloat(value))),
                    }
                }
            }
        }
    }

    JobSchedulingModel { wcet, wcct, ..js.clone() }
}

/// Rule 10: merge `JobScheduling` siblings that cover the same underlying
/// platform.
pub struct MergeJobSchedulingSiblings;

impl Rule for MergeJobSchedulingSiblings {
    fn name(&self) -> &'static str {
        "merge_job_scheduling_siblings"
    }

    fn apply(&self, _g: &Graph, identified: &[DecisionModel]) -> RuleOutcome {
        let siblings: Vec<&JobSchedulingModel> = identified
            .iter()
            .filter_map(|d| match d {
                DecisionModel::JobScheduling(m) => Some(m),
                _ => None,
            })
            .collect();

        for i in 0..siblings.len() {
            for j in (i + 1)..siblings.len() {
                let (a, b) = (siblings[i], siblings[j]);
                if a.processors != b.processors || a.communicators != b.communicators {
                    continue;
                }
                let merged = merge_job_scheduling(a, b);
                let wrapped = DecisionModel::JobScheduling(merged);
                if !identified.contains(&wrapped) {
                    return RuleOutcome { fixed: false, produced: Some(wrapped) };
                }
            }
        }
        RuleOutcome { fixed: true, produced: None }
    }
}

fn merge_job_scheduling(a: &JobSchedulingModel, b: &JobSchedulingModel) -> JobSchedulingModel {
    let mut jobs = a.jobs.clone();
    for j in &b.jobs {
        if !jobs.contains(j) {
            jobs.push(*j);
        }
    }

    let mut wcet = a.wcet.clone();
    for (k, v) in &b.wcet {
        match wcet.iter_mut().find(|(kk, _)| kk == k) {
            Some((_, cur)) => *cur = OrderedFloat(cur.0.max(v.0)),
            None => wcet.push((*k, *v)),
        }
    }
    let mut wcct = a.wcct.clone();
    for (k, v) in &b.wcct {
        match wcct.iter_mut().find(|(kk, _)| kk == k) {
            Some((_, cur)) => *cur = OrderedFloat(cur.0.max(v.0)),
            None => wcct.push((*k, *v)),
        }
    }

    let mut weak_precedence = a.weak_precedence.clone();
    for e in &b.weak_precedence {
        if !weak_precedence.contains(e) {
            weak_precedence.push(*e);
        }
    }
    let mut strong_precedence = a.strong_precedence.clone();
    for e in &b.strong_precedence {
        if !strong_precedence.contains(e) {
            strong_precedence.push(*e);
        }
    }

    JobSchedulingModel {
        covered: a.covered.union(&b.covered),
        actors: a.actors.clone(),
        channels: a.channels.clone(),
        jobs,
        processors: a.processors.clone(),
        communicators: a.communicators.clone(),
        proc_capacity: a.proc_capacity.clone(),
        comm_slot_capacity: a.comm_slot_capacity.clone(),
        wcet,
        wcct,
        weak_precedence,
        strong_precedence,
        pre_mappings: a.pre_mappings.clone(),
        pre_schedulings: a.pre_schedulings.clone(),
        permitted_locations: a.permitted_locations.clone(),
        paths: a.paths.clone(),
        throughput_importance: OrderedFloat(a.throughput_importance.0.max(b.throughput_importance.0)),
        latency_importance: OrderedFloat(a.latency_importance.0.max(b.latency_importance.0)),
    }
}
