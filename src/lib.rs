//! # Design Space Identification & Exploration
//!
//! An orchestrator for model-based cyber-physical system design: a rule
//! engine identifies typed decision models (consistent SDF applications,
//! multicore platforms, job-scheduling problems, …) from an attributed
//! design graph by running a catalogue of identification rules to a
//! fixpoint, filters the result to its non-dominated frontier, matches
//! surviving models against registered explorers, drives the chosen
//! explorer's solution stream, and reverse-identifies each solution back
//! onto the design graph as an overlay of new annotations.
//!
//! Pipeline, module by module:
//!
//! - [`dside_graph`] (`G`) — the attributed design graph vertex/edge/trait
//!   vocabulary, an external crate so a design-model loader can depend on
//!   just the data model.
//! - [`dside_sdf`] (`M`) — the pure SDF math kernel: nullspace,
//!   repetition-vector integralization, PASS construction, job expansion.
//! - [`decision`] (`D`) — the tagged-union decision-model category
//!   hierarchy.
//! - [`rules`] / [`engine`] (`R`) — the standard identification rule
//!   catalogue and the sequential/parallel fixpoint engines that run it.
//! - [`dominance`] / [`choice`] (`C`) — per-category dominance and the
//!   dominance filter.
//! - [`explorer`] / [`matcher`] (`E`) — the explorer trait boundary and
//!   the non-dominated `(explorer, model)` frontier matcher.
//! - [`reverse`] (`X`) — the exploration driver: drives a chosen explorer,
//!   reverse-identifies each solution, persists artifacts.
//! - [`orchestrator`] (`O`) — the run-level state machine tying the above
//!   together.
//! - [`persist`] — artifact header/body persistence.
//! - [`config`] / [`error`] — ambient configuration and error taxonomy.

pub mod choice;
pub mod config;
pub mod decision;
pub mod dominance;
pub mod engine;
pub mod error;
pub mod explorer;
pub mod graphx;
pub mod matcher;
pub mod orchestrator;
pub mod persist;
pub mod reverse;
pub mod rules;
pub mod vocab;

pub use config::Config;
pub use decision::DecisionModel;
pub use error::DsideError;
pub use orchestrator::{Orchestrator, RunSummary};
