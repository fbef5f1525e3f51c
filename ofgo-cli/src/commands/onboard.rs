//! `ofgo default` — the full onboarding flow.
//!
//! A `--repo` containing a `.` is a repository URL: the project is scaffolded
//! from templates (and the run stops so the starter fuzz target can be
//! edited) or, when already generated, compile-checked. Anything else names
//! an existing project, which is compile-checked. Harness generation follows
//! whenever the project was not freshly scaffolded.

use anyhow::Result;
use clap::Args;

use ofgo_core::{input, ProjectId};

use super::{
    check::check_project,
    existing::generate_harnesses,
    template::{generate_from_templates, TemplateInputs, TemplateOutcome},
    ModelArgs, Session,
};

/// Arguments for `ofgo default`.
#[derive(Args, Debug)]
pub struct OnboardArgs {
    /// Repository URL, or the name of an existing project.
    #[arg(long)]
    pub repo: String,

    /// Maintainer e-mail (URLs only).
    #[arg(long)]
    pub email: Option<String>,

    /// Project language (URLs only).
    #[arg(long)]
    pub language: Option<String>,

    #[command(flatten)]
    pub model: ModelArgs,
}

impl OnboardArgs {
    pub fn run(self, session: &mut Session) -> Result<()> {
        self.model.apply(&mut session.settings);

        let project = if input::looks_like_url(&self.repo) {
            let inputs = TemplateInputs::validate(
                &self.repo,
                self.email.as_deref(),
                self.language.as_deref(),
            )?;
            tracing::info!("template mode was chosen for build files");
            match generate_from_templates(session, inputs)? {
                TemplateOutcome::Scaffolded { .. } => return Ok(()),
                TemplateOutcome::Existing { project } => project,
            }
        } else {
            let project: ProjectId = self.repo.parse()?;
            session.require_project(&project)?;
            tracing::info!("no build necessary");
            check_project(session, &project)?;
            project
        };

        generate_harnesses(session, &project)?;
        Ok(())
    }
}
