//! Harness consolidation.
//!
//! ## `consolidate` — 5-step protocol
//!
//! 1. Delete stale `fuzz_harness-NN_MM.<ext>` files from the working copy.
//! 2. Resolve `<ext>` from the `language:` line of `project.yaml`.
//! 3. Select the project's run outputs in the sample store (name order).
//! 4. Copy `<run-output>/NN.fuzz_target` → `fuzz_harness-NN_MM.<ext>`,
//!    ordinals counting from 1.
//! 5. Mirror the working copy back into the durable store.
//!
//! No rollback: a missing payload aborts at step 4 and harnesses copied so
//! far stay in the working copy for inspection.

use std::path::{Path, PathBuf};

use ofgo_core::{metadata, CoreError, HarnessFile, Layout, ProjectId, RunOutputId, SampleIndex};

use crate::error::{io_err, SyncError};
use crate::mirror::{ensure_dir, mirror};
use crate::selector::PatternSelector;

/// One consolidated harness.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsolidatedHarness {
    pub run_output: RunOutputId,
    pub ordinal: u32,
    pub path: PathBuf,
}

/// Outcome of a consolidation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsolidationReport {
    /// Stale harness files deleted in step 1.
    pub removed: Vec<PathBuf>,
    pub harnesses: Vec<ConsolidatedHarness>,
}

impl ConsolidationReport {
    pub fn is_empty(&self) -> bool {
        self.harnesses.is_empty()
    }
}

/// Delete every file directly inside `project_dir` whose name parses as a
/// [`HarnessFile`]. Returns the removed paths.
pub fn clean_old_harnesses(project_dir: &Path) -> Result<Vec<PathBuf>, SyncError> {
    tracing::info!("cleaning old harnesses in {}", project_dir.display());
    let mut removed = Vec::new();
    let entries = match std::fs::read_dir(project_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(removed),
        Err(e) => return Err(io_err(project_dir, e)),
    };
    for entry in entries {
        let entry = entry.map_err(|e| io_err(project_dir, e))?;
        let is_file = entry
            .file_type()
            .map_err(|e| io_err(entry.path(), e))?
            .is_file();
        let name = entry.file_name();
        if is_file && HarnessFile::parse(&name.to_string_lossy()).is_some() {
            let path = entry.path();
            std::fs::remove_file(&path).map_err(|e| io_err(&path, e))?;
            tracing::debug!("removed stale harness {}", path.display());
            removed.push(path);
        }
    }
    removed.sort();
    Ok(removed)
}

/// Resolve the harness file extension for the project checked out at `dir`.
pub fn harness_extension(project: &ProjectId, dir: &Path) -> Result<&'static str, SyncError> {
    let path = dir.join(metadata::METADATA_FILE);
    if !path.is_file() {
        return Err(SyncError::MetadataMissing {
            project: project.clone(),
            path,
        });
    }
    match metadata::read_language(dir) {
        Ok(language) => Ok(language.extension()),
        Err(CoreError::Io { path, source }) => Err(io_err(path, source)),
        Err(source) => Err(SyncError::UnsupportedLanguage {
            project: project.clone(),
            path,
            source,
        }),
    }
}

/// Steps 1–4: rebuild the harness files in the project's working copy
/// without persisting them.
pub fn consolidate_working(
    layout: &Layout,
    project: &ProjectId,
    sample: SampleIndex,
) -> Result<ConsolidationReport, SyncError> {
    let working = layout.working_dir(project);
    if !working.is_dir() {
        return Err(SyncError::ProjectNotFound {
            durable: layout.durable_dir(project),
            working,
        });
    }

    // Step 1
    let removed = clean_old_harnesses(&working)?;

    // Step 2
    let extension = harness_extension(project, &working)?;

    // Step 3
    let selector = PatternSelector::new(project.clone()).with_known_projects(&layout.known_projects());
    let run_outputs = selector.select_run_outputs(&layout.samples_root())?;

    // Step 4
    let mut harnesses = Vec::with_capacity(run_outputs.len());
    for (ordinal, (run_output, dir)) in (1u32..).zip(run_outputs) {
        let source = dir.join(sample.payload_file_name());
        if !source.is_file() {
            return Err(SyncError::PayloadMissing {
                project: project.clone(),
                run_output: run_output.to_string(),
                path: source,
            });
        }
        let target = working.join(HarnessFile::new(sample, ordinal, extension).file_name());
        std::fs::copy(&source, &target).map_err(|e| io_err(&source, e))?;
        tracing::info!("consolidated {} -> {}", run_output, target.display());
        harnesses.push(ConsolidatedHarness {
            run_output,
            ordinal,
            path: target,
        });
    }

    if harnesses.is_empty() {
        tracing::warn!("no generated harnesses found for '{project}'");
    }
    Ok(ConsolidationReport { removed, harnesses })
}

/// Step 5: mirror the working copy into the durable store.
pub fn persist(layout: &Layout, project: &ProjectId) -> Result<(), SyncError> {
    ensure_dir(&layout.durable_root())?;
    mirror(&layout.working_dir(project), &layout.durable_dir(project))
}

/// Consolidate the sample store's payloads for `project` into its working
/// copy and persist the result to the durable store.
///
/// Zero matching run outputs is a successful, empty report.
pub fn consolidate(
    layout: &Layout,
    project: &ProjectId,
    sample: SampleIndex,
) -> Result<ConsolidationReport, SyncError> {
    let report = consolidate_working(layout, project, sample)?;
    persist(layout, project)?;
    Ok(report)
}
