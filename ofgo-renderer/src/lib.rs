//! # ofgo-renderer
//!
//! Tera-based scaffolding of new OSS-Fuzz project directories.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use ofgo_core::{Language, ProjectId};
//! use ofgo_renderer::{ScaffoldRequest, Scaffolder};
//!
//! fn scaffold(store: &Path) -> Result<(), ofgo_renderer::RenderError> {
//!     let scaffolder = Scaffolder::new(None)?;
//!     let request = ScaffoldRequest {
//!         repo: "https://github.com/agronholm/anyio".into(),
//!         email: "dev@example.com".into(),
//!         name: ProjectId::new("anyio").expect("valid id"),
//!         language: Language::Python,
//!     };
//!     let dir = scaffolder.scaffold(&request, store)?;
//!     println!("scaffolded {}", dir.display());
//!     Ok(())
//! }
//! ```

pub mod context;
pub mod engine;
pub mod error;
pub mod scaffold;

pub use context::TemplateContext;
pub use engine::{template_key, RenderedFile, TemplateEngine};
pub use error::RenderError;
pub use scaffold::{ScaffoldRequest, Scaffolder};
