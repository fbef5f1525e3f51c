//! Error types for ofgo-sync.

use std::path::PathBuf;

use thiserror::Error;

use ofgo_core::{CoreError, ProjectId};

/// All errors that can arise from workspace synchronization and consolidation.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Neither a durable nor a working copy of the project exists.
    #[error("cannot find project folder at {working} or a generated project at {durable}")]
    ProjectNotFound { durable: PathBuf, working: PathBuf },

    /// One or more of `build.sh`, `project.yaml`, `Dockerfile` is missing.
    #[error("project at {dir} is missing required files: {}", .missing.join(", "))]
    MissingRequiredFiles { dir: PathBuf, missing: Vec<String> },

    /// The source of a mirror does not exist.
    #[error("mirror source {path} does not exist")]
    SourceMissing { path: PathBuf },

    /// Mirroring a tree onto itself would delete it.
    #[error("refusing to mirror {path} onto itself")]
    SelfMirror { path: PathBuf },

    /// The project has no `project.yaml` to read the language from.
    #[error("metadata file {path} not found for project '{project}'")]
    MetadataMissing { project: ProjectId, path: PathBuf },

    /// The language declaration is missing or outside the supported table.
    #[error("project '{project}' at {path}: {source}")]
    UnsupportedLanguage {
        project: ProjectId,
        path: PathBuf,
        #[source]
        source: CoreError,
    },

    /// A matched run-output directory lacks its sample payload.
    #[error("run output '{run_output}' of project '{project}' has no payload at {path}")]
    PayloadMissing {
        project: ProjectId,
        run_output: String,
        path: PathBuf,
    },

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
