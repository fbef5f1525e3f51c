//! Tera rendering engine for project scaffolds.
//!
//! # Template names
//!
//! | Output             | Lookup order                                        |
//! |--------------------|-----------------------------------------------------|
//! | `project.yaml`     | `<lang>/project.yaml.tera`, `shared/project.yaml.tera` |
//! | `Dockerfile`       | `<lang>/Dockerfile.tera`, `shared/Dockerfile.tera`  |
//! | `build.sh`         | `<lang>/build.sh.tera`                              |
//! | `fuzz_test.<ext>`  | `<lang>/fuzz_test.tera`                             |
//!
//! `<lang>` is the [`template_key`] of the language. A language is scaffoldable
//! when both per-language templates exist, embedded or user-supplied.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tera::Tera;

use ofgo_core::Language;

use crate::context::TemplateContext;
use crate::error::{io_err, RenderError};

// Embedded templates, compiled into the binary via include_str!
// Embedded templates — baked into the binary at compile time via include_str!
// ---------------------------------------------------------------------------

const TPLS: &[(&str, &str)] = &[
    ("shared/_header.tera", include_str!("templates/shared/_header.tera")),
    (
        "shared/project.yaml.tera",
        include_str!("templates/shared/project.yaml.tera"),
    ),
    (
        "shared/Dockerfile.tera",
        include_str!("templates/shared/Dockerfile.tera"),
    ),
    ("c/build.sh.tera", include_str!("templates/c/build.sh.tera")),
    ("c/fuzz_test.tera", include_str!("templates/c/fuzz_test.tera")),
    ("cpp/build.sh.tera", include_str!("templates/cpp/build.sh.tera")),
    ("cpp/fuzz_test.tera", include_str!("templates/cpp/fuzz_test.tera")),
    ("go/build.sh.tera", include_str!("templates/go/build.sh.tera")),
    ("go/fuzz_test.tera", include_str!("templates/go/fuzz_test.tera")),
    ("jvm/build.sh.tera", include_str!("templates/jvm/build.sh.tera")),
    ("jvm/fuzz_test.tera", include_str!("templates/jvm/fuzz_test.tera")),
    ("python/build.sh.tera", include_str!("templates/python/build.sh.tera")),
    ("python/fuzz_test.tera", include_str!("templates/python/fuzz_test.tera")),
    ("rust/build.sh.tera", include_str!("templates/rust/build.sh.tera")),
    ("rust/fuzz_test.tera", include_str!("templates/rust/fuzz_test.tera")),
];

/// Directory name holding a language's templates. `c++` is spelled `cpp`.
pub fn template_key(language: Language) -> &'static str {
    match language {
        Language::Cpp => "cpp",
        other => other.name(),
    }
}

// ---------------------------------------------------------------------------
// Template loading helpers
// ---------------------------------------------------------------------------

// Names keep their case: `Dockerfile.tera` must stay distinct from a
// hypothetical `dockerfile.tera`.
fn normalize_template_name(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

fn collect_template_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), RenderError> {
    let entries = std::fs::read_dir(dir).map_err(|e| io_err(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| io_err(dir, e))?;
        let path = entry.path();
        let meta = entry.metadata().map_err(|e| io_err(&path, e))?;
        if meta.is_dir() {
            collect_template_files(&path, out)?;
        } else if meta.is_file() {
            out.push(path);
        }
    }
    Ok(())
}

fn load_user_templates(dir: &Path) -> Result<Vec<(String, String)>, RenderError> {
    if !dir.exists() {
        return Ok(vec![]);
    }
    let mut files = Vec::new();
    collect_template_files(dir, &mut files)?;
    let mut templates = Vec::new();
    for path in files {
        if path.extension().and_then(|s| s.to_str()) != Some("tera") {
            continue;
        }
        let rel = path.strip_prefix(dir).unwrap_or(path.as_path());
        let name = normalize_template_name(rel);
        let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
        tracing::debug!("loaded template override {name}");
        templates.push((name, contents));
    }
    Ok(templates)
}

fn build_tera(user_template_dir: Option<&Path>) -> Result<Tera, RenderError> {
    let mut templates: HashMap<String, String> = HashMap::new();
    for (name, content) in TPLS {
        templates.insert((*name).to_string(), (*content).to_string());
    }
    if let Some(dir) = user_template_dir {
        for (name, content) in load_user_templates(dir)? {
            templates.insert(name, content);
        }
    }

    let mut tera = Tera::default();
    // Generated shell and YAML are not HTML.
    tera.autoescape_on(vec![]);
    tera.add_raw_templates(templates.into_iter().collect::<Vec<_>>())?;
    Ok(tera)
}

// ---------------------------------------------------------------------------
// TemplateEngine
// ---------------------------------------------------------------------------

/// One rendered project file, relative to the project directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    pub file_name: String,
    pub content: String,
}

/// Tera-based engine for rendering templates with optional user overrides.
///
/// `user_template_dir` may contain `.tera` files that override embedded
/// defaults, laid out as `<lang>/<file>.tera` or `shared/<file>.tera`.
pub struct TemplateEngine {
    tera: Tera,
}

impl TemplateEngine {
    pub fn new(user_template_dir: Option<&Path>) -> Result<Self, RenderError> {
        let tera = build_tera(user_template_dir)?;
        Ok(TemplateEngine { tera })
    }

    fn has(&self, name: &str) -> bool {
        self.tera.get_template_names().any(|n| n == name)
    }

    /// Whether both per-language templates are available.
    pub fn supports(&self, language: Language) -> bool {
        let key = template_key(language);
        self.has(&format!("{key}/build.sh.tera")) && self.has(&format!("{key}/fuzz_test.tera"))
    }

    fn resolve(&self, key: &str, file: &str) -> Option<String> {
        [format!("{key}/{file}.tera"), format!("shared/{file}.tera")]
            .into_iter()
            .find(|name| self.has(name))
    }

    /// Render the four project files for `language`.
    pub fn render(
        &self,
        ctx: &TemplateContext,
        language: Language,
    ) -> Result<Vec<RenderedFile>, RenderError> {
        if !self.supports(language) {
            return Err(RenderError::TemplatesNotImplemented { language });
        }
        let key = template_key(language);
        let tera_ctx = ctx.to_tera_context()?;

        let outputs = [
            ("project.yaml", "project.yaml".to_string()),
            ("Dockerfile", "Dockerfile".to_string()),
            ("build.sh", "build.sh".to_string()),
            ("fuzz_test", format!("fuzz_test.{}", language.extension())),
        ];
        let mut results = Vec::with_capacity(outputs.len());
        for (template, file_name) in outputs {
            let name = self
                .resolve(key, template)
                .ok_or(RenderError::TemplatesNotImplemented { language })?;
            let content = self.tera.render(&name, &tera_ctx)?;
            results.push(RenderedFile { file_name, content });
        }
        Ok(results)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
