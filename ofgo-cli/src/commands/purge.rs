//! `ofgo purge` — remove a project's entries from the sample store.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use ofgo_core::ProjectId;
use ofgo_sync::{PatternSelector, SampleRetention};

use super::Session;

/// Arguments for `ofgo purge`.
#[derive(Args, Debug)]
pub struct PurgeArgs {
    #[arg(long)]
    pub project: ProjectId,
}

impl PurgeArgs {
    pub fn run(self, session: &Session) -> Result<()> {
        let layout = &session.layout;
        let known = layout.known_projects();
        let retention = SampleRetention::new(
            PatternSelector::new(self.project.clone()).with_known_projects(&known),
        );
        let removed = retention
            .purge(&layout.samples_root())
            .with_context(|| format!("purge failed for '{}'", self.project))?;

        if removed.is_empty() {
            println!("✓ '{}' — nothing to purge", self.project);
            return Ok(());
        }
        for id in &removed {
            println!("  {} {id}", "-".red());
        }
        println!("{} '{}' — {} samples purged", "✓".green(), self.project, removed.len());
        Ok(())
    }
}
