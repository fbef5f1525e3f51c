//! Filesystem layout of an onboarding checkout.
//!
//! # Storage layout
//!
//! ```text
//! <base>/
//!   ofgo.yaml                 (optional settings)
//!   oss-fuzz/
//!     projects/<project>/     (working copy, consumed by the generator)
//!     projects/<run-output>/  (generator output, one per candidate function)
//!     build/out/<project>/    (compiled fuzzers)
//!     infra/helper.py
//!   oss-fuzz-gen/
//!   fuzz-introspector/
//!   gen-projects/<project>/   (durable store)
//!   gen-projects/SAMPLES/     (relocated run outputs)
//!   scripts/
//!   templates/<language>/     (template overrides)
//!   work/ofgo/repositories/   (clone area)
//!   results/  report/
//! ```
//!
//! Every path helper is pure; nothing here touches the filesystem except
//! [`Layout::known_projects`].

use std::path::{Path, PathBuf};

use crate::types::{ProjectId, RunOutputId};

/// Name of the sample store directory inside the durable store.
pub const SAMPLES_DIR_NAME: &str = "SAMPLES";

/// All roots used by the pipeline, derived from a single base directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    base: PathBuf,
}

impl Layout {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn config_path(&self) -> PathBuf {
        self.base.join("ofgo.yaml")
    }

    pub fn oss_fuzz_dir(&self) -> PathBuf {
        self.base.join("oss-fuzz")
    }

    /// Working root: `oss-fuzz/projects`.
    pub fn working_root(&self) -> PathBuf {
        self.oss_fuzz_dir().join("projects")
    }

    pub fn working_dir(&self, project: &ProjectId) -> PathBuf {
        self.working_root().join(project.as_str())
    }

    pub fn build_out_dir(&self) -> PathBuf {
        self.oss_fuzz_dir().join("build").join("out")
    }

    pub fn infra_helper(&self) -> PathBuf {
        self.oss_fuzz_dir().join("infra").join("helper.py")
    }

    pub fn oss_fuzz_gen_dir(&self) -> PathBuf {
        self.base.join("oss-fuzz-gen")
    }

    pub fn introspector_dir(&self) -> PathBuf {
        self.base.join("fuzz-introspector")
    }

    /// Durable store: `gen-projects`.
    pub fn durable_root(&self) -> PathBuf {
        self.base.join("gen-projects")
    }

    pub fn durable_dir(&self, project: &ProjectId) -> PathBuf {
        self.durable_root().join(project.as_str())
    }

    /// Sample store: `gen-projects/SAMPLES`.
    pub fn samples_root(&self) -> PathBuf {
        self.durable_root().join(SAMPLES_DIR_NAME)
    }

    pub fn scripts_dir(&self) -> PathBuf {
        self.base.join("scripts")
    }

    pub fn generator_script(&self) -> PathBuf {
        self.scripts_dir().join("run-project-modified.sh")
    }

    pub fn templates_dir(&self) -> PathBuf {
        self.base.join("templates")
    }

    pub fn work_dir(&self) -> PathBuf {
        self.base.join("work")
    }

    pub fn repositories_dir(&self) -> PathBuf {
        self.work_dir().join("ofgo").join("repositories")
    }

    pub fn results_dir(&self) -> PathBuf {
        self.base.join("results")
    }

    pub fn report_dir(&self) -> PathBuf {
        self.base.join("report")
    }

    /// True if the project has a durable or a working copy.
    pub fn project_exists(&self, project: &ProjectId) -> bool {
        self.durable_dir(project).is_dir() || self.working_dir(project).is_dir()
    }

    /// Names of bare project directories in the durable store and the working
    /// root, sorted and deduplicated. Entries that are not valid project ids
    /// (including `SAMPLES`) are skipped, as are working-root run outputs of
    /// another listed project.
    pub fn known_projects(&self) -> Vec<ProjectId> {
        let durable = dir_ids(&self.durable_root());
        let working = dir_ids(&self.working_root());
        let candidates: Vec<&ProjectId> = durable.iter().chain(&working).collect();
        let is_run_output = |name: &ProjectId| {
            candidates
                .iter()
                .any(|p| RunOutputId::parse_for(p, name.as_str()).is_some())
        };
        let mut ids: Vec<ProjectId> = working
            .iter()
            .filter(|name| !is_run_output(*name))
            .chain(&durable)
            .cloned()
            .collect();
        ids.sort();
        ids.dedup();
        ids
    }
}

/// Directory entries of `root` whose names are valid project ids.
fn dir_ids(root: &Path) -> Vec<ProjectId> {
    let Ok(entries) = std::fs::read_dir(root) else {
        return Vec::new();
    };
    entries
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .filter_map(|e| ProjectId::new(e.file_name().to_string_lossy().into_owned()).ok())
        .collect()
}
