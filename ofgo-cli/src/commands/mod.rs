//! Subcommands and the state they share.

pub mod check;
pub mod consolidate;
pub mod existing;
pub mod onboard;
pub mod purge;
pub mod status;
pub mod template;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;

use ofgo_core::{Layout, ProjectId, Settings};

use crate::model::ModelGate;

/// Per-invocation state: where things live, resolved settings and the
/// model-validation result.
pub struct Session {
    pub layout: Layout,
    pub settings: Settings,
    pub gate: ModelGate,
}

impl Session {
    pub fn open(base: &Path) -> Result<Self> {
        let layout = Layout::new(base);
        let settings = Settings::load(&layout)
            .with_context(|| format!("failed to load settings from {}", layout.config_path().display()))?;
        let gate = ModelGate::from_settings(&settings);
        Ok(Self {
            layout,
            settings,
            gate,
        })
    }

    /// Error unless a durable or working copy of `project` exists.
    pub fn require_project(&self, project: &ProjectId) -> Result<()> {
        if self.layout.project_exists(project) {
            return Ok(());
        }
        anyhow::bail!(
            "project does not exist with name '{project}'. If you're trying to generate a project, provide a URL instead."
        )
    }
}

/// Model flags shared by the generating commands.
#[derive(Args, Debug, Clone, Default)]
pub struct ModelArgs {
    /// OpenAI model name (default from ofgo.yaml, else gpt-4o-mini).
    #[arg(long)]
    pub model: Option<String>,

    /// Sampling temperature for the model.
    #[arg(long)]
    pub temperature: Option<f32>,
}

impl ModelArgs {
    /// Flags win over file and environment settings.
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(model) = &self.model {
            settings.model = model.clone();
        }
        if let Some(temperature) = self.temperature {
            settings.temperature = temperature;
        }
    }
}
