//! Sample retention: purge stale run outputs before a run, relocate fresh
//! ones into the sample store after it.
//!
//! Sample store entries are never updated in place. Every generation run
//! purges the project's entries and repopulates them, so discovery during
//! consolidation only ever sees the latest run.

use std::path::Path;

use ofgo_core::{ProjectId, RunOutputId};

use crate::error::SyncError;
use crate::mirror::{ensure_dir, mirror, remove_path};
use crate::selector::PatternSelector;

/// Purge and relocate run outputs for one project.
#[derive(Debug, Clone)]
pub struct SampleRetention {
    selector: PatternSelector,
}

impl SampleRetention {
    pub fn new(selector: PatternSelector) -> Self {
        Self { selector }
    }

    pub fn for_project(project: ProjectId) -> Self {
        Self::new(PatternSelector::new(project))
    }

    /// Remove every run output of the project directly under `root`.
    /// Returns the removed ids; an empty selection is not an error.
    pub fn purge(&self, root: &Path) -> Result<Vec<RunOutputId>, SyncError> {
        let mut removed = Vec::new();
        for (id, path) in self.selector.select_run_outputs(root)? {
            remove_path(&path)?;
            tracing::info!("purged {}", path.display());
            removed.push(id);
        }
        Ok(removed)
    }

    /// Mirror every run output of the project under `run_outputs_root` into
    /// `samples_root`, keyed by the same directory name. Returns the
    /// relocated ids; empty means the generator produced nothing.
    pub fn relocate(
        &self,
        run_outputs_root: &Path,
        samples_root: &Path,
    ) -> Result<Vec<RunOutputId>, SyncError> {
        let outputs = self.selector.select_run_outputs(run_outputs_root)?;
        if outputs.is_empty() {
            return Ok(vec![]);
        }
        ensure_dir(samples_root)?;

        let mut relocated = Vec::with_capacity(outputs.len());
        for (id, path) in outputs {
            let target = samples_root.join(id.dir_name());
            mirror(&path, &target)?;
            tracing::info!("relocated {} -> {}", id, target.display());
            relocated.push(id);
        }
        Ok(relocated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const GENERATED: &[&str] = &[
        "argcomplete",
        "anyio",
        "argcomplete-argcomplete.finders.completionfinder._call-1",
        "argcomplete-argcomplete.finders.completionfinder.rl_complete-1",
        "anyio-anyio.core.sockets.connect_tcp-1",
        "anyio-anyio.to_process.run_sync-1",
        "jupyter_server-jupyter_server.auth.decorator.authorized.wrapper.inner-1",
        "jupyter_server-jupyter_server.services.contents.manager.asynccontentsmanager.copy-1",
    ];

    fn setup() -> TempDir {
        let tmp = TempDir::new().unwrap();
        for d in GENERATED {
            let dir = tmp.path().join("projects").join(d);
            fs::create_dir_all(&dir).unwrap();
            fs::write(dir.join("test.txt"), "test").unwrap();
        }
        tmp
    }

    fn retention(project: &str) -> SampleRetention {
        SampleRetention::for_project(ProjectId::new(project).unwrap())
    }

    #[test]
    fn relocate_copies_only_the_projects_run_outputs() {
        let tmp = setup();
        let projects = tmp.path().join("projects");
        let samples = tmp.path().join("samples");

        let relocated = retention("argcomplete").relocate(&projects, &samples).unwrap();
        assert_eq!(relocated.len(), 2);

        let mut present: Vec<String> = fs::read_dir(&samples)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        present.sort();
        assert_eq!(
            present,
            vec![
                "argcomplete-argcomplete.finders.completionfinder._call-1",
                "argcomplete-argcomplete.finders.completionfinder.rl_complete-1",
            ]
        );
        assert_eq!(
            fs::read_to_string(samples.join(&present[0]).join("test.txt")).unwrap(),
            "test"
        );
    }

    #[test]
    fn relocate_unknown_project_creates_nothing() {
        let tmp = setup();
        let samples = tmp.path().join("samples");
        let relocated = retention("clamav")
            .relocate(&tmp.path().join("projects"), &samples)
            .unwrap();
        assert!(relocated.is_empty());
        assert!(!samples.exists());
    }

    #[test]
    fn purge_removes_run_outputs_but_not_bare_checkout() {
        let tmp = setup();
        let projects = tmp.path().join("projects");

        let removed = retention("anyio").purge(&projects).unwrap();
        assert_eq!(removed.len(), 2);
        assert!(projects.join("anyio").is_dir());
        assert!(!projects.join("anyio-anyio.core.sockets.connect_tcp-1").exists());
        assert!(projects
            .join("argcomplete-argcomplete.finders.completionfinder._call-1")
            .exists());
    }

    #[test]
    fn purge_is_idempotent() {
        let tmp = setup();
        let projects = tmp.path().join("projects");
        let r = retention("anyio");
        r.purge(&projects).unwrap();
        assert!(r.purge(&projects).unwrap().is_empty());
        assert!(r.purge(&tmp.path().join("absent")).unwrap().is_empty());
    }
}
