//! Error types for ofgo-renderer.

use std::path::PathBuf;

use thiserror::Error;

use ofgo_core::Language;

/// All errors that can arise from project scaffolding.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Tera template engine error.
    #[error("template engine error: {0}")]
    Tera(#[from] tera::Error),

    /// The language is known but no template set exists for it.
    #[error("templates for {language} have not been implemented yet")]
    TemplatesNotImplemented { language: Language },

    /// Scaffolding never overwrites an existing project.
    #[error("project already exists at {path}")]
    AlreadyExists { path: PathBuf },

    /// Filesystem error while loading templates or writing output.
    #[error("template io error at {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> RenderError {
    RenderError::Io {
        path: path.into(),
        source,
    }
}
