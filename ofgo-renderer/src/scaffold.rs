//! Writes a rendered project template into the durable store.

use std::path::{Path, PathBuf};

use ofgo_core::{Language, ProjectId};

use crate::context::TemplateContext;
use crate::engine::TemplateEngine;
use crate::error::{io_err, RenderError};

/// Everything needed to scaffold one new project.
#[derive(Debug, Clone)]
pub struct ScaffoldRequest {
    pub repo: String,
    pub email: String,
    pub name: ProjectId,
    pub language: Language,
}

/// Renders new projects into a store directory.
pub struct Scaffolder {
    engine: TemplateEngine,
}

impl Scaffolder {
    /// Embedded templates plus overrides from `user_template_dir`.
    pub fn new(user_template_dir: Option<&Path>) -> Result<Self, RenderError> {
        Ok(Self {
            engine: TemplateEngine::new(user_template_dir)?,
        })
    }

    pub fn supports(&self, language: Language) -> bool {
        self.engine.supports(language)
    }

    /// Render `request` into `<store>/<name>/` and return that directory.
    ///
    /// Fails with [`RenderError::AlreadyExists`] rather than touching an
    /// existing project.
    pub fn scaffold(&self, request: &ScaffoldRequest, store: &Path) -> Result<PathBuf, RenderError> {
        let dir = store.join(request.name.as_str());
        if dir.exists() {
            return Err(RenderError::AlreadyExists { path: dir });
        }
        let ctx = TemplateContext::new(&request.repo, &request.email, &request.name, request.language);
        self.scaffold_with_context(&ctx, request.language, &dir)?;
        Ok(dir)
    }

    /// Render with a caller-provided [`TemplateContext`] into `dir`.
    pub fn scaffold_with_context(
        &self,
        ctx: &TemplateContext,
        language: Language,
        dir: &Path,
    ) -> Result<(), RenderError> {
        // Render everything before creating the directory so a template
        // error leaves nothing behind.
        let files = self.engine.render(ctx, language)?;
        std::fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;
        for file in files {
            let path = dir.join(&file.file_name);
            std::fs::write(&path, &file.content).map_err(|e| io_err(&path, e))?;
            if file.file_name == "build.sh" {
                make_executable(&path)?;
            }
            tracing::debug!("wrote {}", path.display());
        }
        tracing::info!("generated templates at {}", dir.display());
        Ok(())
    }
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<(), RenderError> {
    use std::os::unix::fs::PermissionsExt;
    let mut perms = std::fs::metadata(path)
        .map_err(|e| io_err(path, e))?
        .permissions();
    perms.set_mode(perms.mode() | 0o755);
    std::fs::set_permissions(path, perms).map_err(|e| io_err(path, e))
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<(), RenderError> {
    Ok(())
}
