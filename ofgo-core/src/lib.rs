//! ofgo core library — domain types, filesystem layout, settings, input
//! validation and errors.
//!
//! - [`types`] — project / run-output / harness identifiers and [`Language`]
//! - [`layout`] — where everything lives under the base directory
//! - [`config`] — [`Settings`] from `ofgo.yaml` and the environment
//! - [`metadata`] — the `language:` declaration in `project.yaml`
//! - [`input`] — repository URL and e-mail validation
//! - [`error`] — [`CoreError`]

pub mod config;
pub mod error;
pub mod input;
pub mod layout;
pub mod metadata;
pub mod types;

pub use config::Settings;
pub use error::CoreError;
pub use layout::Layout;
pub use types::{HarnessFile, Language, ProjectId, RunOutputId, SampleIndex};
