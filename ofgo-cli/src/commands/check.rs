//! `ofgo check` — build a project with OSS-Fuzz and smoke-run its fuzzers.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use ofgo_core::ProjectId;

use super::Session;
use crate::external::OssFuzzHelper;

/// Arguments for `ofgo check`.
#[derive(Args, Debug)]
pub struct CheckArgs {
    #[arg(long)]
    pub project: ProjectId,
}

impl CheckArgs {
    pub fn run(self, session: &Session) -> Result<()> {
        check_project(session, &self.project)
    }
}

/// Compile check against the durable copy of `project`.
pub fn check_project(session: &Session, project: &ProjectId) -> Result<()> {
    let layout = &session.layout;
    // A bare OSS-Fuzz checkout is promoted into the durable store first.
    ofgo_sync::reconcile(&layout.durable_dir(project), &layout.working_dir(project))
        .with_context(|| format!("cannot check '{project}'"))?;
    let fuzzers = OssFuzzHelper::new(layout)
        .check_compilation(project)
        .with_context(|| format!("compile check failed for '{project}'"))?;
    println!(
        "{} '{project}' builds; {} fuzzers ran: {}",
        "✓".green(),
        fuzzers.len(),
        fuzzers.join(", ")
    );
    Ok(())
}
