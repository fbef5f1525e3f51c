//! `ofgo status` — where each project stands.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use ofgo_core::{metadata, HarnessFile, Layout, ProjectId};
use ofgo_sync::PatternSelector;

use super::Session;

/// Arguments for `ofgo status`.
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Show a single project.
    #[arg(long)]
    pub project: Option<ProjectId>,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl StatusArgs {
    pub fn run(self, session: &Session) -> Result<()> {
        let layout = &session.layout;
        let known = layout.known_projects();
        let rows = known
            .iter()
            .filter(|p| self.project.as_ref().map_or(true, |filter| *p == filter))
            .map(|p| build_row(layout, &known, p))
            .collect::<Result<Vec<_>>>()?;
        if self.json {
            return print_json(rows);
        }
        print_table(rows);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProjectState {
    /// Only the upstream OSS-Fuzz checkout exists.
    Upstream,
    /// In the durable store without consolidated harnesses.
    Pending,
    /// In the durable store with consolidated harnesses.
    Onboarded,
}

#[derive(Debug, Clone)]
struct ProjectStatus {
    project: ProjectId,
    state: ProjectState,
    language: Option<String>,
    harnesses: usize,
    samples: usize,
}

#[derive(Serialize)]
struct StatusReportJson {
    summary: StatusSummaryJson,
    projects: Vec<ProjectStatusJson>,
}

#[derive(Serialize)]
struct StatusSummaryJson {
    projects: usize,
    onboarded: usize,
    samples: usize,
}

#[derive(Serialize)]
struct ProjectStatusJson {
    project: String,
    status: String,
    language: Option<String>,
    harnesses: usize,
    samples: usize,
}

#[derive(Tabled)]
struct StatusTableRow {
    #[tabled(rename = "project")]
    project: String,
    #[tabled(rename = "status")]
    status: String,
    #[tabled(rename = "language")]
    language: String,
    #[tabled(rename = "harnesses")]
    harnesses: usize,
    #[tabled(rename = "samples")]
    samples: usize,
}

fn count_harnesses(dir: &Path) -> Result<usize> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(e).with_context(|| format!("failed to read {}", dir.display())),
    };
    Ok(entries
        .filter_map(|e| e.ok())
        .filter(|e| HarnessFile::parse(&e.file_name().to_string_lossy()).is_some())
        .count())
}

fn build_row(layout: &Layout, known: &[ProjectId], project: &ProjectId) -> Result<ProjectStatus> {
    let durable = layout.durable_dir(project);
    let dir = if durable.is_dir() {
        durable
    } else {
        layout.working_dir(project)
    };
    let harnesses = count_harnesses(&dir)?;
    let state = match (layout.durable_dir(project).is_dir(), harnesses) {
        (false, _) => ProjectState::Upstream,
        (true, 0) => ProjectState::Pending,
        (true, _) => ProjectState::Onboarded,
    };
    let language = match metadata::read_language(&dir) {
        Ok(language) => Some(language.to_string()),
        Err(e) => {
            tracing::debug!("no language for {project}: {e}");
            None
        }
    };
    let samples = PatternSelector::new(project.clone())
        .with_known_projects(known)
        .select_run_outputs(&layout.samples_root())
        .with_context(|| format!("failed to list samples for '{project}'"))?
        .len();

    Ok(ProjectStatus {
        project: project.clone(),
        state,
        language,
        harnesses,
        samples,
    })
}

fn print_json(rows: Vec<ProjectStatus>) -> Result<()> {
    let payload = StatusReportJson {
        summary: StatusSummaryJson {
            projects: rows.len(),
            onboarded: rows
                .iter()
                .filter(|r| r.state == ProjectState::Onboarded)
                .count(),
            samples: rows.iter().map(|r| r.samples).sum(),
        },
        projects: rows
            .into_iter()
            .map(|row| ProjectStatusJson {
                project: row.project.to_string(),
                status: state_key(row.state).to_string(),
                language: row.language,
                harnesses: row.harnesses,
                samples: row.samples,
            })
            .collect(),
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&payload).context("failed to serialize status JSON")?
    );
    Ok(())
}

fn print_table(rows: Vec<ProjectStatus>) {
    let onboarded = rows
        .iter()
        .filter(|r| r.state == ProjectState::Onboarded)
        .count();
    println!(
        "ofgo v{} | {} projects | {} onboarded",
        env!("CARGO_PKG_VERSION"),
        rows.len(),
        onboarded,
    );
    if rows.is_empty() {
        println!("No projects found.");
        return;
    }

    println!(
        "Indicators: {} ONBOARDED  {} PENDING  {} UPSTREAM",
        state_indicator(ProjectState::Onboarded),
        state_indicator(ProjectState::Pending),
        state_indicator(ProjectState::Upstream),
    );
    let table_rows: Vec<StatusTableRow> = rows
        .into_iter()
        .map(|row| StatusTableRow {
            project: format!("{} {}", state_indicator(row.state), row.project),
            status: state_label(row.state).to_string(),
            language: row.language.unwrap_or_else(|| "?".to_string()),
            harnesses: row.harnesses,
            samples: row.samples,
        })
        .collect();
    let mut table = Table::new(table_rows);
    table.with(Style::rounded());
    println!("{table}");
}

fn state_key(state: ProjectState) -> &'static str {
    match state {
        ProjectState::Upstream => "upstream",
        ProjectState::Pending => "pending",
        ProjectState::Onboarded => "onboarded",
    }
}

fn state_label(state: ProjectState) -> &'static str {
    match state {
        ProjectState::Upstream => "UPSTREAM",
        ProjectState::Pending => "PENDING",
        ProjectState::Onboarded => "ONBOARDED",
    }
}

fn state_indicator(state: ProjectState) -> String {
    match state {
        ProjectState::Upstream => "■".bright_black().bold().to_string(),
        ProjectState::Pending => "■".yellow().bold().to_string(),
        ProjectState::Onboarded => "■".green().bold().to_string(),
    }
}
