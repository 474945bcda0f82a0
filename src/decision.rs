//! The decision-model category hierarchy, flattened to a tagged union.
//!
//! Composition in the source hierarchy (`SDFToOrders` wraps `SDFExecution`,
//! etc.) becomes a `Box<...Model>` field holding the child by value. Every
//! variant carries a [`CoveredSet`]: the subset of the design graph it
//! references, which must be a subset of `G` for the model to be
//! well-formed.

use std::collections::BTreeSet;

use dside_graph::{EdgeId, VertexId};
use dside_sdf::{Job, Topology};

/// A bit-pattern-compared float newtype so payload structs that carry
/// weights can still derive `PartialEq`/`Eq`/`Hash`, which the rule
/// engine's structural-equality dedup of `identified: Vec<DecisionModel>`
/// requires.
#[derive(Debug, Clone, Copy)]
pub struct OrderedFloat(pub f64);

impl PartialEq for OrderedFloat {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}
impl Eq for OrderedFloat {}
impl std::hash::Hash for OrderedFloat {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}
impl PartialOrd for OrderedFloat {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.0.partial_cmp(&other.0)
    }
}

/// The union of vertex and edge identifiers a decision model references.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CoveredSet {
    pub vertices: BTreeSet<VertexId>,
    pub edges: BTreeSet<EdgeId>,
}

impl CoveredSet {
    #[must_use]
    pub fn is_superset_of(&self, other: &CoveredSet) -> bool {
        self.vertices.is_superset(&other.vertices) && self.edges.is_superset(&other.edges)
    }

    #[must_use]
    pub fn union(&self, other: &CoveredSet) -> CoveredSet {
        CoveredSet {
            vertices: self.vertices.union(&other.vertices).copied().collect(),
            edges: self.edges.union(&other.edges).copied().collect(),
        }
    }
}

/// An abstract processor: an ordered tuple of platform vertices, most
/// physical to most cyber.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AbstractProcessor(pub Vec<VertexId>);

/// An abstract communicator, same shape as [`AbstractProcessor`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AbstractCommunicator(pub Vec<VertexId>);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SdfExecutionModel {
    pub covered: CoveredSet,
    /// Actors in topology-column order.
    pub actors: Vec<VertexId>,
    /// Channels in topology-row order.
    pub channels: Vec<EdgeId>,
    pub topology: Topology,
    pub repetition: Vec<i64>,
    pub initial_tokens: Vec<i64>,
    pub pass: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SdfToOrdersModel {
    pub covered: CoveredSet,
    pub execution: Box<SdfExecutionModel>,
    /// Pre-existing scheduling edges carried from the design.
    pub orderings: Vec<EdgeId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SdfToMultiCoreModel {
    pub covered: CoveredSet,
    pub sdf_to_orders: Box<SdfToOrdersModel>,
    pub processors: Vec<VertexId>,
    pub communicators: Vec<VertexId>,
    /// Non-TDM communicators offer `0` scheduled slots by construction
    /// (resolved Open Question, SPEC_FULL.md §12 item 2). A `BTreeMap`
    /// rather than a `HashMap` so the containing struct can derive `Hash`.
    pub slot_capacity: std::collections::BTreeMap<VertexId, u32>,
    pub paths: Vec<((VertexId, VertexId), Vec<Vec<VertexId>>)>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SdfToMultiCoreCharacterizedModel {
    pub covered: CoveredSet,
    pub multicore: Box<SdfToMultiCoreModel>,
    /// `(actor, processor) -> wcet`.
    pub wcet: Vec<((VertexId, VertexId), OrderedFloat)>,
    /// `(channel, communicator) -> wcct`.
    pub wcct: Vec<((EdgeId, VertexId), OrderedFloat)>,
    pub throughput_importance: OrderedFloat,
    pub latency_importance: OrderedFloat,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TimeTriggeredPlatformModel {
    pub covered: CoveredSet,
    pub schedulers: Vec<VertexId>,
    pub processors: Vec<VertexId>,
    pub communicators: Vec<VertexId>,
    pub paths: Vec<((VertexId, VertexId), Vec<Vec<VertexId>>)>,
    /// `(processor or communicator) -> scheduler`, first-fit assignment.
    pub scheduler_assignment: Vec<(VertexId, VertexId)>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobSchedulingModel {
    pub covered: CoveredSet,
    /// The actor each `Job.actor` index refers to; parallels the source
    /// `SdfExecutionModel::actors` ordering.
    pub actors: Vec<VertexId>,
    /// The channel each strong-precedence edge's communicator assembly
    /// was derived from; parallels `SdfExecutionModel::channels`.
    pub channels: Vec<EdgeId>,
    pub jobs: Vec<Job>,
    pub processors: Vec<AbstractProcessor>,
    pub communicators: Vec<AbstractCommunicator>,
    /// Indexed by position in `processors`.
    pub proc_capacity: Vec<u64>,
    /// Indexed by position in `communicators`.
    pub comm_slot_capacity: Vec<u32>,
    /// `(job_index, processor_index) -> wcet`.
    pub wcet: Vec<((usize, usize), OrderedFloat)>,
    /// `(job_index, job_index, communicator_index) -> wcct`.
    pub wcct: Vec<((usize, usize, usize), OrderedFloat)>,
    pub weak_precedence: Vec<(usize, usize)>,
    pub strong_precedence: Vec<(usize, usize)>,
    /// Jobs pre-mapped to a processor index by the design.
    pub pre_mappings: Vec<(usize, usize)>,
    /// Jobs pre-scheduled at a given start-time slot on a processor.
    pub pre_schedulings: Vec<(usize, usize, u64)>,
    /// Job -> permitted processor indices, when restricted.
    pub permitted_locations: Vec<(usize, Vec<usize>)>,
    /// All shortest paths between processor-index pairs; the first entry
    /// is used by default for wcct assembly (scenario F).
    pub paths: Vec<((usize, usize), Vec<Vec<usize>>)>,
    pub throughput_importance: OrderedFloat,
    pub latency_importance: OrderedFloat,
}

/// The flattened category hierarchy. Dominance is a `match` over
/// same-category pairs, implemented in [`crate::dominance`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DecisionModel {
    SdfExecution(SdfExecutionModel),
    SdfToOrders(SdfToOrdersModel),
    SdfToMultiCore(SdfToMultiCoreModel),
    SdfToMultiCoreCharacterized(SdfToMultiCoreCharacterizedModel),
    TimeTriggeredPlatform(TimeTriggeredPlatformModel),
    JobScheduling(JobSchedulingModel),
}

impl DecisionModel {
    #[must_use]
    pub fn category(&self) -> &'static str {
        match self {
            DecisionModel::SdfExecution(_) => "SdfExecution",
            DecisionModel::SdfToOrders(_) => "SdfToOrders",
            DecisionModel::SdfToMultiCore(_) => "SdfToMultiCore",
            DecisionModel::SdfToMultiCoreCharacterized(_) => "SdfToMultiCoreCharacterized",
            DecisionModel::TimeTriggeredPlatform(_) => "TimeTriggeredPlatform",
            DecisionModel::JobScheduling(_) => "JobScheduling",
        }
    }

    #[must_use]
    pub fn covered(&self) -> &CoveredSet {
        match self {
            DecisionModel::SdfExecution(m) => &m.covered,
            DecisionModel::SdfToOrders(m) => &m.covered,
            DecisionModel::SdfToMultiCore(m) => &m.covered,
            DecisionModel::SdfToMultiCoreCharacterized(m) => &m.covered,
            DecisionModel::TimeTriggeredPlatform(m) => &m.covered,
            DecisionModel::JobScheduling(m) => &m.covered,
        }
    }
}
