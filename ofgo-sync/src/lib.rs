//! # ofgo-sync
//!
//! Workspace synchronization and harness consolidation.
//!
//! - [`mirror`] — delete-then-copy directory mirroring
//! - [`selector`] — project-scoped selection of run-output directories
//! - [`reconcile`] — durable/working reconciliation and validation
//! - [`retention`] — purge and relocation of sample store entries
//! - [`consolidate`] — numbered harness files from relocated samples
//! - [`pipeline`] — the full per-project state machine around an external
//!   [`HarnessGenerator`]
//! - [`fuzzers`] — compiled fuzzer discovery for compile checks

pub mod consolidate;
pub mod error;
pub mod fuzzers;
pub mod mirror;
pub mod pipeline;
pub mod reconcile;
pub mod retention;
pub mod selector;

pub use consolidate::{consolidate, ConsolidatedHarness, ConsolidationReport};
pub use error::SyncError;
pub use mirror::{mirror, remove_path};
pub use pipeline::{
    GenerationRequest, GeneratorError, HarnessGenerator, Pipeline, PipelineError, PipelineRun,
    Stage,
};
pub use reconcile::{reconcile, validate, ReconcileOutcome};
pub use retention::SampleRetention;
pub use selector::{MatchKind, PatternSelector, Selected};
