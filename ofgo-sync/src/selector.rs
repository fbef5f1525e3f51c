//! Project-scoped selection of directory entries.
//!
//! Two conventions are recognised:
//!
//! | Kind                 | Matches                                          |
//! |----------------------|--------------------------------------------------|
//! | [`MatchKind::Exact`] | `<project>` only                                 |
//! | [`MatchKind::RunScoped`] | `<project>-<function>-<digits>` (anchored)   |
//!
//! Run-scoped names are parsed into [`RunOutputId`]. When the caller supplies
//! the set of known project ids, a name that is also a run output of a longer
//! known id (`anyio-mirror` vs `anyio`) is attributed to that project and
//! excluded.

use std::path::{Path, PathBuf};

use ofgo_core::{ProjectId, RunOutputId};

use crate::error::{io_err, SyncError};

/// Which naming convention to select by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Exact,
    RunScoped,
}

/// A selected directory entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selected {
    pub path: PathBuf,
    /// Present for run-scoped matches.
    pub run_output: Option<RunOutputId>,
}

impl Selected {
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Selects directory entries belonging to one project.
#[derive(Debug, Clone)]
pub struct PatternSelector {
    project: ProjectId,
    /// Longer project ids that start with `<project>-`.
    rivals: Vec<ProjectId>,
}

impl PatternSelector {
    pub fn new(project: ProjectId) -> Self {
        Self {
            project,
            rivals: Vec::new(),
        }
    }

    /// Register other known project ids for prefix-collision resolution.
    /// Only ids that extend `<project>-` are kept.
    pub fn with_known_projects<'a>(mut self, known: impl IntoIterator<Item = &'a ProjectId>) -> Self {
        let prefix = format!("{}-", self.project);
        self.rivals = known
            .into_iter()
            .filter(|id| id.as_str().starts_with(&prefix))
            .cloned()
            .collect();
        self
    }

    pub fn project(&self) -> &ProjectId {
        &self.project
    }

    /// Match a single entry name.
    pub fn matches(&self, name: &str, kind: MatchKind) -> Option<Option<RunOutputId>> {
        match kind {
            MatchKind::Exact => (name == self.project.as_str()).then_some(None),
            MatchKind::RunScoped => self.run_output(name).map(Some),
        }
    }

    /// Parse `name` as a run output of this project, honouring rivals.
    pub fn run_output(&self, name: &str) -> Option<RunOutputId> {
        let id = RunOutputId::parse_for(&self.project, name)?;
        let claimed_by_rival = self
            .rivals
            .iter()
            .any(|rival| RunOutputId::parse_for(rival, name).is_some());
        (!claimed_by_rival).then_some(id)
    }

    /// List the immediate directories of `root` matching `kind`, in
    /// lexicographic name order. A missing `root` selects nothing.
    pub fn select(&self, root: &Path, kind: MatchKind) -> Result<Vec<Selected>, SyncError> {
        let entries = match std::fs::read_dir(root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(vec![]),
            Err(e) => return Err(io_err(root, e)),
        };

        let mut selected = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| io_err(root, e))?;
            let is_dir = entry
                .file_type()
                .map_err(|e| io_err(entry.path(), e))?
                .is_dir();
            if !is_dir {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if let Some(run_output) = self.matches(&name, kind) {
                selected.push(Selected {
                    path: entry.path(),
                    run_output,
                });
            }
        }
        selected.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));
        Ok(selected)
    }

    /// Run-scoped selection returning only the typed ids and paths.
    pub fn select_run_outputs(
        &self,
        root: &Path,
    ) -> Result<Vec<(RunOutputId, PathBuf)>, SyncError> {
        Ok(self
            .select(root, MatchKind::RunScoped)?
            .into_iter()
            .filter_map(|s| s.run_output.map(|id| (id, s.path)))
            .collect())
    }
}
