//! Durable/working copy reconciliation and required-file validation.
//!
//! The durable store (`gen-projects/<p>`) outlives every run, so it wins
//! whenever it exists. A working copy without a durable counterpart (an
//! upstream OSS-Fuzz project, or one checked out by hand) is promoted into
//! the durable store instead.

use std::path::{Path, PathBuf};

use crate::error::{io_err, SyncError};
use crate::mirror::mirror;

/// Files every onboardable project must contain somewhere in its tree.
pub const REQUIRED_FILES: &[&str] = &["build.sh", "project.yaml", "Dockerfile"];

/// Which direction reconciliation copied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Durable copy existed and replaced the working copy.
    DurableToWorking,
    /// Only the working copy existed; it was promoted into durable storage.
    WorkingToDurable,
}

impl ReconcileOutcome {
    /// The directory that was authoritative.
    pub fn authoritative<'a>(&self, durable: &'a Path, working: &'a Path) -> &'a Path {
        match self {
            ReconcileOutcome::DurableToWorking => durable,
            ReconcileOutcome::WorkingToDurable => working,
        }
    }
}

/// Make `durable` and `working` identical, preferring `durable`.
pub fn reconcile(durable: &Path, working: &Path) -> Result<ReconcileOutcome, SyncError> {
    if durable.exists() {
        tracing::info!("found generated project at {}", durable.display());
        mirror(durable, working)?;
        Ok(ReconcileOutcome::DurableToWorking)
    } else if working.exists() {
        tracing::info!("found pre-existing project at {}", working.display());
        mirror(working, durable)?;
        Ok(ReconcileOutcome::WorkingToDurable)
    } else {
        Err(SyncError::ProjectNotFound {
            durable: durable.to_path_buf(),
            working: working.to_path_buf(),
        })
    }
}

/// Fail unless every name in [`REQUIRED_FILES`] appears as a file somewhere
/// under `dir`.
pub fn validate(dir: &Path) -> Result<(), SyncError> {
    let mut missing: Vec<&str> = REQUIRED_FILES.to_vec();
    let mut stack: Vec<PathBuf> = vec![dir.to_path_buf()];

    while let Some(current) = stack.pop() {
        if missing.is_empty() {
            break;
        }
        let entries = std::fs::read_dir(&current).map_err(|e| io_err(&current, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| io_err(&current, e))?;
            let file_type = entry.file_type().map_err(|e| io_err(entry.path(), e))?;
            if file_type.is_dir() {
                stack.push(entry.path());
            } else {
                let name = entry.file_name();
                missing.retain(|required| name.as_os_str() != *required);
            }
        }
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(SyncError::MissingRequiredFiles {
            dir: dir.to_path_buf(),
            missing: missing.into_iter().map(str::to_string).collect(),
        })
    }
}
