//! `ofgo consolidate` — rebuild numbered harness files from stored samples.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use ofgo_core::{ProjectId, SampleIndex};

use super::Session;

/// Arguments for `ofgo consolidate`.
#[derive(Args, Debug)]
pub struct ConsolidateArgs {
    #[arg(long)]
    pub project: ProjectId,

    /// Which sample of each run output to consolidate.
    #[arg(long, default_value_t = SampleIndex::FIRST)]
    pub sample: SampleIndex,
}

impl ConsolidateArgs {
    pub fn run(self, session: &Session) -> Result<()> {
        let project = &self.project;
        let report = ofgo_sync::consolidate(&session.layout, project, self.sample)
            .with_context(|| format!("consolidation failed for '{project}'"))?;

        if !report.removed.is_empty() {
            println!("removed {} stale harnesses", report.removed.len());
        }
        if report.is_empty() {
            println!("{} no generated samples found for '{project}'", "!".yellow());
            return Ok(());
        }
        for harness in &report.harnesses {
            println!(
                "  {} {} ← {}",
                "+".green(),
                harness
                    .path
                    .file_name()
                    .map(|n| n.to_string_lossy())
                    .unwrap_or_default(),
                harness.run_output
            );
        }
        println!(
            "{} '{project}' — {} harnesses consolidated",
            "✓".green(),
            report.harnesses.len()
        );
        Ok(())
    }
}
