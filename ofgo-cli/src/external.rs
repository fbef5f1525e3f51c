//! Adapters around the external tools: the harness generator script, the
//! report builder, the OSS-Fuzz helper and git.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use anyhow::{bail, Context, Result};

use ofgo_core::{Layout, ProjectId};
use ofgo_sync::{fuzzers::discover_fuzzers, mirror, remove_path, GenerationRequest, GeneratorError, HarnessGenerator};

// ---------------------------------------------------------------------------
// Process helpers
// ---------------------------------------------------------------------------

fn display_command(cmd: &Command) -> String {
    std::iter::once(cmd.get_program())
        .chain(cmd.get_args())
        .map(|s| s.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Run `cmd` to completion, capturing output. Non-zero exit becomes an error
/// carrying stderr.
fn run_captured(cmd: &mut Command, failure: &str) -> Result<Output> {
    let shown = display_command(cmd);
    tracing::info!("running: {shown}");
    let output = cmd
        .output()
        .with_context(|| format!("failed to start `{shown}`"))?;
    if output.status.success() {
        return Ok(output);
    }
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    bail!("{failure} (status {}):\n{stderr}", output.status)
}

#[cfg(unix)]
fn make_executable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let mut perms = std::fs::metadata(path)?.permissions();
    perms.set_mode(perms.mode() | 0o755);
    std::fs::set_permissions(path, perms)
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

// ---------------------------------------------------------------------------
// Harness generator
// ---------------------------------------------------------------------------

/// Runs `scripts/run-project-modified.sh` with positional arguments.
pub struct ScriptGenerator {
    script: PathBuf,
    work_dir: PathBuf,
    introspector_port: u16,
}

impl ScriptGenerator {
    pub fn new(layout: &Layout, introspector_port: u16) -> Self {
        Self {
            script: layout.generator_script(),
            work_dir: layout.work_dir(),
            introspector_port,
        }
    }

    fn command(&self, request: &GenerationRequest) -> Command {
        let mut cmd = Command::new(&self.script);
        cmd.arg(&request.oss_fuzz_gen_dir)
            .arg(&request.oss_fuzz_dir)
            .arg(&request.introspector_dir)
            .arg(&request.heuristics)
            .arg(request.project.as_str())
            .arg(request.harness_count.to_string())
            .arg(request.sample_count.to_string())
            .arg(&request.model)
            .arg(request.temperature.to_string())
            .arg(&request.results_dir)
            .env("WEBAPP_PORT", self.introspector_port.to_string());
        cmd
    }
}

impl HarnessGenerator for ScriptGenerator {
    /// The script's exit status is only logged: partial runs still leave
    /// usable run outputs, and relocation decides whether anything was made.
    fn generate(&self, request: &GenerationRequest) -> Result<(), GeneratorError> {
        let fail = |what: &str, e: std::io::Error| {
            GeneratorError(format!("{what} {}: {e}", self.script.display()))
        };
        if !self.script.is_file() {
            return Err(GeneratorError(format!(
                "generator script not found at {}",
                self.script.display()
            )));
        }
        make_executable(&self.script).map_err(|e| fail("cannot mark executable", e))?;
        std::fs::create_dir_all(&self.work_dir)
            .map_err(|e| GeneratorError(format!("cannot create {}: {e}", self.work_dir.display())))?;

        let mut cmd = self.command(request);
        tracing::info!("running: {}", display_command(&cmd));
        let status = cmd.status().map_err(|e| fail("cannot run", e))?;
        if !status.success() {
            tracing::warn!("generator exited with {status}");
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Report builder
// ---------------------------------------------------------------------------

/// Builds the HTML report of a generation run with `python -m report.web`.
pub struct ReportBuilder {
    oss_fuzz_gen_dir: PathBuf,
    results_dir: PathBuf,
    report_dir: PathBuf,
}

impl ReportBuilder {
    pub fn new(layout: &Layout) -> Self {
        Self {
            oss_fuzz_gen_dir: layout.oss_fuzz_gen_dir(),
            results_dir: layout.results_dir(),
            report_dir: layout.report_dir(),
        }
    }

    pub fn build(&self) -> Result<&Path> {
        let mut cmd = Command::new("python");
        cmd.current_dir(&self.oss_fuzz_gen_dir)
            .args(["-m", "report.web", "-r"])
            .arg(&self.results_dir)
            .arg("-o")
            .arg(&self.report_dir);
        run_captured(&mut cmd, "failed to build report")?;
        Ok(&self.report_dir)
    }
}

// ---------------------------------------------------------------------------
// OSS-Fuzz helper
// ---------------------------------------------------------------------------

/// Drives `oss-fuzz/infra/helper.py` to confirm a project builds and its
/// fuzzers start.
pub struct OssFuzzHelper<'a> {
    layout: &'a Layout,
}

impl<'a> OssFuzzHelper<'a> {
    pub fn new(layout: &'a Layout) -> Self {
        Self { layout }
    }

    fn helper(&self) -> Command {
        let mut cmd = Command::new("python3");
        cmd.current_dir(self.layout.oss_fuzz_dir())
            .arg(self.layout.infra_helper());
        cmd
    }

    /// Copy the durable project into OSS-Fuzz, build it and run each fuzzer
    /// briefly. Returns the fuzzer names that ran.
    pub fn check_compilation(&self, project: &ProjectId) -> Result<Vec<String>> {
        let layout = self.layout;
        mirror(&layout.durable_dir(project), &layout.working_dir(project))
            .with_context(|| format!("failed to sync '{project}' into oss-fuzz"))?;
        remove_path(&layout.build_out_dir()).context("failed to clear previous build output")?;

        tracing::info!("testing with OSS-Fuzz to ensure compilation");
        tracing::info!("note: the first image pull of the day may take a while");
        let name = project.as_str();
        let steps: [(&[&str], String, String); 3] = [
            (
                &["pull_images"],
                "Successfully pulled OSS-Fuzz images.".to_string(),
                "failed to pull OSS-Fuzz images".to_string(),
            ),
            (
                &["build_image", name, "--pull"],
                format!("Successfully built images for {name}."),
                format!("failed to build images for {name}"),
            ),
            (
                &["build_fuzzers", name],
                format!("Successfully built fuzzers for {name}."),
                format!("failed to build fuzzers for {name}"),
            ),
        ];
        for (args, success, failure) in steps {
            run_captured(self.helper().args(args), &failure)?;
            tracing::info!("{success}");
        }

        let out_dir = layout.build_out_dir().join(name);
        if !out_dir.is_dir() {
            bail!("could not locate fuzzing harnesses at {}", out_dir.display());
        }
        let fuzzers = discover_fuzzers(&out_dir)?;
        if fuzzers.is_empty() {
            bail!("unable to locate any fuzzing harnesses in {}", out_dir.display());
        }
        for fuzzer in &fuzzers {
            run_captured(
                self.helper().args([
                    "run_fuzzer",
                    name,
                    fuzzer,
                    "--",
                    "-max_total_time=5",
                    "-runs=10",
                ]),
                &format!("failed to run {fuzzer}"),
            )?;
            tracing::info!("successfully ran {fuzzer}");
        }
        tracing::info!("all fuzzers ran successfully");
        Ok(fuzzers)
    }
}

// ---------------------------------------------------------------------------
// git
// ---------------------------------------------------------------------------

/// Clone `url` into `work/ofgo/repositories/<name>` with a blobless filter,
/// replacing any earlier clone. Proves the repository is reachable.
pub fn clone_repo(layout: &Layout, url: &str, name: &ProjectId) -> Result<PathBuf> {
    let target = layout.repositories_dir().join(name.as_str());
    remove_path(&target)?;
    std::fs::create_dir_all(layout.repositories_dir())
        .with_context(|| format!("failed to create {}", layout.repositories_dir().display()))?;
    let mut cmd = Command::new("git");
    cmd.args(["clone", "--filter=blob:none", url]).arg(&target);
    run_captured(&mut cmd, &format!("couldn't pull from {url}"))?;
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ofgo_core::Settings;

    #[test]
    fn generator_arguments_are_positional() {
        let layout = Layout::new("/srv/ofgo");
        let settings = Settings::default();
        let request =
            GenerationRequest::new(&layout, &settings, ProjectId::new("anyio").unwrap());
        let generator = ScriptGenerator::new(&layout, 8080);
        let args: Vec<String> = generator
            .command(&request)
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            args,
            vec![
                "/srv/ofgo/oss-fuzz-gen",
                "/srv/ofgo/oss-fuzz",
                "/srv/ofgo/fuzz-introspector",
                "far-reach-low-coverage,low-cov-with-fuzz-keyword,easy-params-far-reach",
                "anyio",
                "2",
                "1",
                "gpt-4o-mini",
                "0.4",
                "/srv/ofgo/results",
            ]
        );
    }

    #[test]
    fn missing_script_is_a_generator_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let layout = Layout::new(tmp.path());
        let request = GenerationRequest::new(
            &layout,
            &Settings::default(),
            ProjectId::new("anyio").unwrap(),
        );
        let err = ScriptGenerator::new(&layout, 8080)
            .generate(&request)
            .unwrap_err();
        assert!(err.to_string().contains("run-project-modified.sh"));
    }

    #[cfg(unix)]
    #[test]
    fn failing_command_reports_stderr() {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", "echo boom >&2; exit 3"]);
        let err = run_captured(&mut cmd, "shell failed").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("shell failed"), "{msg}");
        assert!(msg.contains("boom"), "{msg}");
    }
}
