//! The closed vocabulary of trait names and property keys the standard
//! rule catalogue reads off the design graph. The graph loader (out of
//! scope; see spec §1) is expected to populate vertices/edges using these
//! names.

pub const ACTOR: &str = "actor";
pub const CHANNEL: &str = "channel";
pub const PROCESSING_COMPONENT: &str = "processing_component";
pub const COMMUNICATION_COMPONENT: &str = "communication_component";
pub const TDM: &str = "tdm";
pub const SCHEDULER: &str = "scheduler";
pub const TIME_TRIGGERED: &str = "time_triggered";
pub const SCHEDULING_EDGE: &str = "scheduling_edge";
pub const WCET_ANNOTATION: &str = "wcet_annotation";
pub const WCCT_ANNOTATION: &str = "wcct_annotation";
pub const LOCATION_REQUIREMENT: &str = "location_requirement";
pub const GOAL_MINIMUM_THROUGHPUT: &str = "goal_minimum_throughput";
pub const GOAL_LATENCY: &str = "goal_latency";
pub const CLOCK_RATE: &str = "clock_rate";
pub const OP_CYCLES: &str = "op_cycles";

// Property keys.
pub const PRODUCTION: &str = "production";
pub const CONSUMPTION: &str = "consumption";
pub const INITIAL_TOKENS: &str = "initial_tokens";
pub const SLOTS: &str = "slots";
pub const ACTOR_REF: &str = "actor";
pub const PROCESSOR_REF: &str = "processor";
pub const CHANNEL_REF: &str = "channel";
pub const COMMUNICATOR_REF: &str = "communicator";
pub const VALUE: &str = "value";
pub const IMPORTANCE: &str = "importance";
pub const PROCESSORS: &str = "processors";
pub const CLOCK_RATE_HZ: &str = "clock_rate_hz";
pub const SIGNAL_SIZE: &str = "signal_size";
pub const BANDWIDTH: &str = "bandwidth";
pub const MEMORY_CAPACITY: &str = "memory_capacity";
