//! Error types for ofgo-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from parsing onboarding inputs and configuration.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Underlying I/O failure, annotated with the path being read.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A project id that is empty or not filesystem-safe.
    #[error("invalid project id '{value}': {reason}")]
    InvalidProjectId { value: String, reason: &'static str },

    /// The `language:` declaration is missing, empty, or outside the supported table.
    #[error("{}", unsupported_language_message(.value))]
    UnsupportedLanguage { value: Option<String> },

    /// A repository URL that is malformed or not an HTTPS GitHub/GitLab URL.
    #[error("invalid repository URL '{url}': {reason}")]
    InvalidRepoUrl { url: String, reason: String },

    /// An e-mail address that does not look like one.
    #[error("invalid email '{0}'")]
    InvalidEmail(String),

    /// `ofgo.yaml` exists but could not be parsed.
    #[error("failed to parse config at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

fn unsupported_language_message(value: &Option<String>) -> String {
    match value.as_deref() {
        None | Some("") => "unable to identify language".to_string(),
        Some(other) => format!("language not supported: {other}"),
    }
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> CoreError {
    CoreError::Io {
        path: path.into(),
        source,
    }
}
