//! Onboarding pipeline for one project.
//!
//! ```text
//! UNSYNCED → RECONCILED → VALIDATED → PURGED → GENERATED → RELOCATED
//!          → CONSOLIDATED → PERSISTED
//! ```
//!
//! Each arrow is one component call. Any failure stops the run with a
//! [`PipelineError`] naming the project, the stage that was being entered and
//! the cause. Nothing is retried here.

use std::fmt;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use thiserror::Error;

use ofgo_core::{Layout, ProjectId, RunOutputId, SampleIndex, Settings};

use crate::consolidate::{clean_old_harnesses, consolidate_working, persist, ConsolidationReport};
use crate::error::SyncError;
use crate::mirror::{ensure_dir, mirror};
use crate::reconcile::{reconcile, validate, ReconcileOutcome};
use crate::retention::SampleRetention;
use crate::selector::PatternSelector;

// ---------------------------------------------------------------------------
// Stages and errors
// ---------------------------------------------------------------------------

/// Per-project pipeline state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Unsynced,
    Reconciled,
    Validated,
    Purged,
    Generated,
    Relocated,
    Consolidated,
    Persisted,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Unsynced => "unsynced",
            Stage::Reconciled => "reconcile",
            Stage::Validated => "validate",
            Stage::Purged => "purge",
            Stage::Generated => "generate",
            Stage::Relocated => "relocate",
            Stage::Consolidated => "consolidate",
            Stage::Persisted => "persist",
        };
        f.write_str(name)
    }
}

/// Failure reported by an external harness generator.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct GeneratorError(pub String);

/// Terminal pipeline failure.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{stage} failed for project '{project}': {source}")]
    Stage {
        project: ProjectId,
        stage: Stage,
        #[source]
        source: SyncError,
    },

    #[error("harness generation failed for project '{project}': {source}")]
    Generator {
        project: ProjectId,
        #[source]
        source: GeneratorError,
    },
}

impl PipelineError {
    /// The stage the pipeline was entering when it failed.
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::Stage { stage, .. } => *stage,
            PipelineError::Generator { .. } => Stage::Generated,
        }
    }
}

// ---------------------------------------------------------------------------
// Generator seam
// ---------------------------------------------------------------------------

/// Inputs handed to the external harness generator.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub project: ProjectId,
    pub oss_fuzz_gen_dir: PathBuf,
    pub oss_fuzz_dir: PathBuf,
    pub introspector_dir: PathBuf,
    pub heuristics: String,
    pub harness_count: u32,
    pub sample_count: u32,
    pub model: String,
    pub temperature: f32,
    pub results_dir: PathBuf,
}

impl GenerationRequest {
    pub fn new(layout: &Layout, settings: &Settings, project: ProjectId) -> Self {
        Self {
            project,
            oss_fuzz_gen_dir: layout.oss_fuzz_gen_dir(),
            oss_fuzz_dir: layout.oss_fuzz_dir(),
            introspector_dir: layout.introspector_dir(),
            heuristics: settings.heuristics.clone(),
            harness_count: settings.harness_count,
            sample_count: settings.sample_count,
            model: settings.model.clone(),
            temperature: settings.temperature,
            results_dir: layout.results_dir(),
        }
    }
}

/// An external tool that writes run-output directories into the working
/// root. Blocking; its own timeout policy applies.
pub trait HarnessGenerator {
    fn generate(&self, request: &GenerationRequest) -> Result<(), GeneratorError>;
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Summary of a completed pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineRun {
    pub project: ProjectId,
    pub reconciled: ReconcileOutcome,
    pub purged: Vec<RunOutputId>,
    pub relocated: Vec<RunOutputId>,
    pub consolidation: ConsolidationReport,
    pub stages: Vec<Stage>,
    pub generation_time: Duration,
}

impl PipelineRun {
    /// The generator ran but produced no run outputs for the project.
    pub fn generated_nothing(&self) -> bool {
        self.relocated.is_empty()
    }
}

/// Runs every stage for one project against one layout.
pub struct Pipeline<'a, G: HarnessGenerator + ?Sized> {
    layout: &'a Layout,
    generator: &'a G,
    sample: SampleIndex,
}

impl<'a, G: HarnessGenerator + ?Sized> Pipeline<'a, G> {
    pub fn new(layout: &'a Layout, generator: &'a G) -> Self {
        Self {
            layout,
            generator,
            sample: SampleIndex::FIRST,
        }
    }

    pub fn with_sample(mut self, sample: SampleIndex) -> Self {
        self.sample = sample;
        self
    }

    pub fn run(&self, request: &GenerationRequest) -> Result<PipelineRun, PipelineError> {
        let project = request.project.clone();
        let layout = self.layout;
        let durable = layout.durable_dir(&project);
        let working = layout.working_dir(&project);
        let fail = |stage: Stage| {
            let project = project.clone();
            move |source: SyncError| PipelineError::Stage {
                project,
                stage,
                source,
            }
        };
        let mut stages = vec![Stage::Unsynced];

        let reconciled = reconcile(&durable, &working).map_err(fail(Stage::Reconciled))?;
        stages.push(Stage::Reconciled);

        validate(&durable).map_err(fail(Stage::Validated))?;
        stages.push(Stage::Validated);

        // Sample store setup is part of the purge stage.
        ensure_dir(&layout.samples_root()).map_err(fail(Stage::Purged))?;
        let known = layout.known_projects();
        let retention =
            SampleRetention::new(PatternSelector::new(project.clone()).with_known_projects(&known));
        let mut purged = retention
            .purge(&layout.samples_root())
            .map_err(fail(Stage::Purged))?;
        purged.extend(
            retention
                .purge(&layout.working_root())
                .map_err(fail(Stage::Purged))?,
        );
        clean_old_harnesses(&working).map_err(fail(Stage::Purged))?;
        mirror(&working, &durable).map_err(fail(Stage::Purged))?;
        stages.push(Stage::Purged);

        tracing::info!("beginning harness generation for '{project}'; this may take a long time");
        let started = Instant::now();
        self.generator
            .generate(request)
            .map_err(|source| PipelineError::Generator {
                project: project.clone(),
                source,
            })?;
        let generation_time = started.elapsed();
        tracing::info!("generation completed in {:.4} seconds", generation_time.as_secs_f64());
        stages.push(Stage::Generated);

        let relocated = retention
            .relocate(&layout.working_root(), &layout.samples_root())
            .map_err(fail(Stage::Relocated))?;
        stages.push(Stage::Relocated);

        let consolidation =
            consolidate_working(layout, &project, self.sample).map_err(fail(Stage::Consolidated))?;
        stages.push(Stage::Consolidated);

        persist(layout, &project).map_err(fail(Stage::Persisted))?;
        stages.push(Stage::Persisted);

        Ok(PipelineRun {
            project,
            reconciled,
            purged,
            relocated,
            consolidation,
            stages,
            generation_time,
        })
    }
}
