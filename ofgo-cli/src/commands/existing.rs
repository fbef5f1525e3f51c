//! `ofgo existing` — generate harnesses for a project already on disk.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use ofgo_core::ProjectId;
use ofgo_sync::{GenerationRequest, Pipeline, PipelineRun};

use super::{ModelArgs, Session};
use crate::external::{ReportBuilder, ScriptGenerator};

/// Arguments for `ofgo existing`.
#[derive(Args, Debug)]
pub struct ExistingArgs {
    /// Project name under gen-projects/ or oss-fuzz/projects/.
    #[arg(long)]
    pub project: ProjectId,

    #[command(flatten)]
    pub model: ModelArgs,
}

impl ExistingArgs {
    pub fn run(self, session: &mut Session) -> Result<()> {
        self.model.apply(&mut session.settings);
        generate_harnesses(session, &self.project)?;
        Ok(())
    }
}

/// Validate the model, run the onboarding pipeline and build the report.
pub fn generate_harnesses(session: &mut Session, project: &ProjectId) -> Result<PipelineRun> {
    session.gate.ensure(&session.settings)?;
    tracing::info!("generating harnesses for {project}");

    let layout = &session.layout;
    let generator = ScriptGenerator::new(layout, session.settings.introspector_port);
    let request = GenerationRequest::new(layout, &session.settings, project.clone());
    let run = Pipeline::new(layout, &generator)
        .run(&request)
        .with_context(|| format!("harness generation failed for '{project}'"))?;

    if run.generated_nothing() {
        println!(
            "{} generation produced no run outputs for '{project}'; check the run logs to diagnose the issue",
            "✗".red()
        );
        return Ok(run);
    }

    println!(
        "{} '{project}': {} run outputs relocated, {} harnesses consolidated in {:.1}s",
        "✓".green(),
        run.relocated.len(),
        run.consolidation.harnesses.len(),
        run.generation_time.as_secs_f64()
    );
    match ReportBuilder::new(layout).build() {
        Ok(report) => println!(
            "report generated in {}; to view it run:\n    python -m http.server -b 127.0.0.1 5000 -d {}",
            report.display(),
            report.display()
        ),
        Err(e) => tracing::warn!("{e:#}"),
    }
    Ok(run)
}
