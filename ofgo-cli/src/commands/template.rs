//! `ofgo template` — scaffold a new project from the language templates.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use ofgo_core::{input, CoreError, Language, ProjectId};
use ofgo_renderer::{ScaffoldRequest, Scaffolder};

use super::{check::check_project, Session};
use crate::external::clone_repo;

/// Arguments for `ofgo template`.
#[derive(Args, Debug)]
pub struct TemplateArgs {
    /// HTTPS GitHub or GitLab repository URL.
    #[arg(long)]
    pub repo: String,

    /// Maintainer e-mail written into project.yaml.
    #[arg(long)]
    pub email: String,

    /// One of c, c++, go, javascript, jvm, python, ruby, rust, swift.
    #[arg(long)]
    pub language: String,
}

/// What the template step did.
#[derive(Debug)]
pub enum TemplateOutcome {
    /// A fresh project was written; its starter fuzz target needs editing
    /// before generation can find anything.
    Scaffolded { project: ProjectId, dir: PathBuf },
    /// The project was already in the durable store and passed the compile
    /// check.
    Existing { project: ProjectId },
}

/// Validated template inputs.
#[derive(Debug)]
pub struct TemplateInputs {
    pub repo: String,
    pub email: String,
    pub language: Language,
    pub project: ProjectId,
}

impl TemplateInputs {
    /// Check the URL, e-mail and language, then derive the project id.
    pub fn validate(repo: &str, email: Option<&str>, language: Option<&str>) -> Result<Self> {
        let repo = input::sanitize_repo(repo)?;
        let language: Language = match language.map(str::trim).filter(|l| !l.is_empty()) {
            Some(l) => l.parse()?,
            None => return Err(CoreError::UnsupportedLanguage { value: None }.into()),
        };
        let email = input::check_email(email.unwrap_or_default())?;
        let project = input::repo_name(&repo)?;
        Ok(Self {
            repo,
            email,
            language,
            project,
        })
    }
}

impl TemplateArgs {
    pub fn run(self, session: &Session) -> Result<TemplateOutcome> {
        let inputs = TemplateInputs::validate(&self.repo, Some(&self.email), Some(&self.language))?;
        generate_from_templates(session, inputs)
    }
}

/// Clone the repository, then either compile-check the existing durable
/// project or scaffold a new one.
pub fn generate_from_templates(session: &Session, inputs: TemplateInputs) -> Result<TemplateOutcome> {
    let layout = &session.layout;
    let project = inputs.project;
    clone_repo(layout, &inputs.repo, &project)?;

    if layout.durable_dir(&project).exists() {
        tracing::info!(
            "project already exists at {}",
            layout.durable_dir(&project).display()
        );
        check_project(session, &project)?;
        return Ok(TemplateOutcome::Existing { project });
    }

    let scaffolder = Scaffolder::new(Some(&layout.templates_dir()))
        .context("failed to load project templates")?;
    let request = ScaffoldRequest {
        repo: inputs.repo,
        email: inputs.email,
        name: project.clone(),
        language: inputs.language,
    };
    let dir = scaffolder
        .scaffold(&request, &layout.durable_root())
        .with_context(|| format!("failed to scaffold '{project}'"))?;

    println!("{} project config generated at {}", "✓".green(), dir.display());
    println!(
        "{} some config files may need further editing, especially for projects with many dependencies.\n  \
         After updating the config, run:\n    ofgo existing --project {project} --model <model> --temperature <temperature>",
        "!".yellow()
    );
    println!(
        "{} update fuzz_test.{} to be at least a minimal harness; without coverage no functions can be selected for generation.",
        "!".yellow(),
        inputs.language.extension()
    );
    Ok(TemplateOutcome::Scaffolded { project, dir })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inputs_derive_project_from_repo() {
        let inputs = TemplateInputs::validate(
            "https://github.com/agronholm/AnyIO.git",
            Some("dev@example.com"),
            Some("python"),
        )
        .unwrap();
        assert_eq!(inputs.project.as_str(), "anyio");
        assert_eq!(inputs.language, Language::Python);
    }

    #[test]
    fn missing_language_is_unidentified() {
        let err = TemplateInputs::validate(
            "https://github.com/agronholm/anyio",
            Some("dev@example.com"),
            None,
        )
        .unwrap_err();
        assert!(err.to_string().contains("unable to identify language"), "{err}");
    }

    #[test]
    fn bad_email_is_rejected() {
        assert!(TemplateInputs::validate(
            "https://github.com/agronholm/anyio",
            Some("not-an-email"),
            Some("python"),
        )
        .is_err());
    }

    #[test]
    fn non_https_repo_is_rejected() {
        assert!(TemplateInputs::validate(
            "http://github.com/agronholm/anyio",
            Some("dev@example.com"),
            Some("python"),
        )
        .is_err());
    }
}
