//! Template context — the values substituted into a new project's files.

use chrono::{Datelike, Local};
use serde::{Deserialize, Serialize};

use ofgo_core::{Language, ProjectId};

use crate::error::RenderError;

/// Flat rendering payload shared by every template of a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateContext {
    /// Upstream repository URL.
    pub repo: String,
    /// Primary contact written into `project.yaml`.
    pub email: String,
    /// Project id, derived from the repository name.
    pub name: String,
    /// Copyright year for license headers.
    pub year: i32,
    /// `language:` value as OSS-Fuzz spells it.
    pub language: String,
    /// OSS-Fuzz base builder image.
    pub base_image: String,
    /// Harness file extension.
    pub extension: String,
}

impl TemplateContext {
    pub fn new(repo: &str, email: &str, name: &ProjectId, language: Language) -> Self {
        Self {
            repo: repo.to_string(),
            email: email.to_string(),
            name: name.to_string(),
            year: Local::now().year(),
            language: language.name().to_string(),
            base_image: language.base_image().to_string(),
            extension: language.extension().to_string(),
        }
    }

    /// Override the copyright year.
    pub fn with_year(mut self, year: i32) -> Self {
        self.year = year;
        self
    }

    /// Convert to a [`tera::Context`] for rendering.
    pub fn to_tera_context(&self) -> Result<tera::Context, RenderError> {
        tera::Context::from_serialize(self).map_err(RenderError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_come_from_language_table() {
        let name = ProjectId::new("libpng").unwrap();
        let ctx = TemplateContext::new(
            "https://github.com/pnggroup/libpng",
            "dev@example.com",
            &name,
            Language::Cpp,
        );
        assert_eq!(ctx.name, "libpng");
        assert_eq!(ctx.language, "c++");
        assert_eq!(ctx.extension, "cpp");
        assert_eq!(ctx.base_image, "base-builder");
        assert!(ctx.year >= 2024);
    }

    #[test]
    fn to_tera_context_exposes_every_field() {
        let name = ProjectId::new("anyio").unwrap();
        let ctx = TemplateContext::new("https://github.com/agronholm/anyio", "a@b.io", &name, Language::Python)
            .with_year(2031);
        let tera_ctx = ctx.to_tera_context().expect("context conversion");
        let json = tera_ctx.into_json();
        assert_eq!(json["year"], 2031);
        assert_eq!(json["base_image"], "base-builder-python");
    }
}
