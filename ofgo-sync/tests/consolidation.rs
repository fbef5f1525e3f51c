//! End-to-end consolidation and pipeline tests against a temporary layout.

use std::cell::RefCell;
use std::fs;
use std::path::Path;

use ofgo_core::{Layout, ProjectId, SampleIndex, Settings};
use ofgo_sync::{
    consolidate, GenerationRequest, GeneratorError, HarnessGenerator, Pipeline, PipelineError,
    Stage, SyncError,
};
use rstest::rstest;
use tempfile::TempDir;

fn pid(s: &str) -> ProjectId {
    ProjectId::new(s).expect("project id")
}

fn write_project(dir: &Path, language: &str) {
    fs::create_dir_all(dir).expect("project dir");
    fs::write(dir.join("build.sh"), "#!/bin/bash -eu\n").expect("build.sh");
    fs::write(dir.join("Dockerfile"), "FROM gcr.io/oss-fuzz-base/base-builder\n")
        .expect("Dockerfile");
    fs::write(dir.join("project.yaml"), format!("language: {language}\n")).expect("project.yaml");
}

fn write_sample(layout: &Layout, name: &str, payload: &str) {
    let dir = layout.samples_root().join(name);
    fs::create_dir_all(&dir).expect("sample dir");
    fs::write(dir.join("01.fuzz_target"), payload).expect("payload");
}

fn harness_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .expect("read dir")
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|n| n.starts_with("fuzz_harness-"))
        .collect();
    names.sort();
    names
}

// ---------------------------------------------------------------------------
// consolidate
// ---------------------------------------------------------------------------

#[test]
fn consolidation_replaces_stale_harnesses_and_persists() {
    let tmp = TempDir::new().unwrap();
    let layout = Layout::new(tmp.path());
    let p = pid("anyio");
    let working = layout.working_dir(&p);
    write_project(&working, "python");
    for i in 1..=5 {
        fs::write(working.join(format!("fuzz_harness-01_0{i}.py")), "stale").unwrap();
    }
    write_sample(&layout, "anyio-anyio.core.sockets.connect_tcp-1", "connect");
    write_sample(&layout, "anyio-anyio.to_process.run_sync-1", "run_sync");
    write_sample(&layout, "argcomplete-argcomplete.finders.completionfinder._call-1", "other");

    let report = consolidate(&layout, &p, SampleIndex::FIRST).unwrap();

    assert_eq!(report.removed.len(), 5);
    assert_eq!(report.harnesses.len(), 2);
    assert_eq!(
        harness_names(&working),
        vec!["fuzz_harness-01_01.py", "fuzz_harness-01_02.py"]
    );
    // Ordinals follow run-output name order.
    assert_eq!(
        fs::read_to_string(working.join("fuzz_harness-01_01.py")).unwrap(),
        "connect"
    );
    assert_eq!(
        harness_names(&layout.durable_dir(&p)),
        harness_names(&working)
    );
}

#[rstest]
#[case("c++", "cpp")]
#[case("jvm", "java")]
#[case("go", "go")]
fn harness_extension_follows_project_language(#[case] language: &str, #[case] ext: &str) {
    let tmp = TempDir::new().unwrap();
    let layout = Layout::new(tmp.path());
    let p = pid("libfoo");
    write_project(&layout.working_dir(&p), language);
    write_sample(&layout, "libfoo-parse_header-3", "payload");

    consolidate(&layout, &p, SampleIndex::FIRST).unwrap();

    assert!(layout
        .working_dir(&p)
        .join(format!("fuzz_harness-01_01.{ext}"))
        .is_file());
}

#[test]
fn no_matching_run_outputs_is_an_empty_success() {
    let tmp = TempDir::new().unwrap();
    let layout = Layout::new(tmp.path());
    let p = pid("anyio");
    write_project(&layout.working_dir(&p), "python");
    fs::write(layout.working_dir(&p).join("fuzz_harness-01_01.py"), "stale").unwrap();

    let report = consolidate(&layout, &p, SampleIndex::FIRST).unwrap();

    assert!(report.is_empty());
    assert_eq!(report.removed.len(), 1);
    assert!(harness_names(&layout.working_dir(&p)).is_empty());
}

#[test]
fn rival_project_outputs_are_not_consolidated() {
    let tmp = TempDir::new().unwrap();
    let layout = Layout::new(tmp.path());
    let p = pid("jupyter");
    write_project(&layout.working_dir(&p), "python");
    write_project(&layout.durable_dir(&pid("jupyter-server")), "python");
    write_sample(&layout, "jupyter-server-jupyter_server.auth.login-1", "rival");
    write_sample(&layout, "jupyter-jupyter.core.paths-1", "own");

    let report = consolidate(&layout, &p, SampleIndex::FIRST).unwrap();

    assert_eq!(report.harnesses.len(), 1);
    assert_eq!(report.harnesses[0].run_output.function, "jupyter.core.paths");
}

#[test]
fn missing_payload_aborts_without_rollback() {
    let tmp = TempDir::new().unwrap();
    let layout = Layout::new(tmp.path());
    let p = pid("anyio");
    let working = layout.working_dir(&p);
    write_project(&working, "python");
    write_sample(&layout, "anyio-a-1", "first");
    fs::create_dir_all(layout.samples_root().join("anyio-b-1")).unwrap();

    let err = consolidate(&layout, &p, SampleIndex::FIRST).unwrap_err();

    assert!(matches!(err, SyncError::PayloadMissing { .. }), "got: {err}");
    assert!(err.to_string().contains("anyio-b-1"));
    assert_eq!(harness_names(&working), vec!["fuzz_harness-01_01.py"]);
    assert!(!layout.durable_dir(&p).exists());
}

#[test]
fn consolidating_an_unknown_project_fails() {
    let tmp = TempDir::new().unwrap();
    let layout = Layout::new(tmp.path());
    let err = consolidate(&layout, &pid("ghost"), SampleIndex::FIRST).unwrap_err();
    assert!(matches!(err, SyncError::ProjectNotFound { .. }));
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Writes the given run outputs into the working root, as the real generator
/// does, and records every request it receives.
struct FakeGenerator {
    outputs: Vec<&'static str>,
    requests: RefCell<Vec<GenerationRequest>>,
}

impl FakeGenerator {
    fn new(outputs: Vec<&'static str>) -> Self {
        Self {
            outputs,
            requests: RefCell::new(Vec::new()),
        }
    }
}

impl HarnessGenerator for FakeGenerator {
    fn generate(&self, request: &GenerationRequest) -> Result<(), GeneratorError> {
        self.requests.borrow_mut().push(request.clone());
        let root = request.oss_fuzz_dir.join("projects");
        for name in &self.outputs {
            let dir = root.join(name);
            fs::create_dir_all(&dir).map_err(|e| GeneratorError(e.to_string()))?;
            fs::write(dir.join("01.fuzz_target"), *name)
                .map_err(|e| GeneratorError(e.to_string()))?;
        }
        Ok(())
    }
}

struct FailingGenerator;

impl HarnessGenerator for FailingGenerator {
    fn generate(&self, _request: &GenerationRequest) -> Result<(), GeneratorError> {
        Err(GeneratorError("exit status 1".into()))
    }
}

#[test]
fn pipeline_walks_every_stage_in_order() {
    let tmp = TempDir::new().unwrap();
    let layout = Layout::new(tmp.path());
    let p = pid("anyio");
    write_project(&layout.durable_dir(&p), "python");
    // Leftovers from a previous run must be purged.
    write_sample(&layout, "anyio-old.function-1", "old");

    let generator = FakeGenerator::new(vec![
        "anyio-anyio.core.sockets.connect_tcp-1",
        "anyio-anyio.to_process.run_sync-1",
    ]);
    let request = GenerationRequest::new(&layout, &Settings::default(), p.clone());
    let run = Pipeline::new(&layout, &generator).run(&request).unwrap();

    assert_eq!(
        run.stages,
        vec![
            Stage::Unsynced,
            Stage::Reconciled,
            Stage::Validated,
            Stage::Purged,
            Stage::Generated,
            Stage::Relocated,
            Stage::Consolidated,
            Stage::Persisted,
        ]
    );
    assert_eq!(run.purged.len(), 1);
    assert_eq!(run.relocated.len(), 2);
    assert!(!layout.samples_root().join("anyio-old.function-1").exists());
    assert_eq!(
        harness_names(&layout.durable_dir(&p)),
        vec!["fuzz_harness-01_01.py", "fuzz_harness-01_02.py"]
    );
    assert_eq!(generator.requests.borrow().len(), 1);
    assert_eq!(generator.requests.borrow()[0].model, "gpt-4o-mini");
}

#[test]
fn pipeline_reports_generator_failure() {
    let tmp = TempDir::new().unwrap();
    let layout = Layout::new(tmp.path());
    let p = pid("anyio");
    write_project(&layout.durable_dir(&p), "python");

    let request = GenerationRequest::new(&layout, &Settings::default(), p);
    let err = Pipeline::new(&layout, &FailingGenerator)
        .run(&request)
        .unwrap_err();

    assert_eq!(err.stage(), Stage::Generated);
    assert!(err.to_string().contains("anyio"));
}

#[test]
fn pipeline_stops_at_validation_when_files_are_missing() {
    let tmp = TempDir::new().unwrap();
    let layout = Layout::new(tmp.path());
    let p = pid("bare");
    fs::create_dir_all(layout.working_dir(&p)).unwrap();
    fs::write(layout.working_dir(&p).join("build.sh"), "").unwrap();

    let generator = FakeGenerator::new(vec![]);
    let request = GenerationRequest::new(&layout, &Settings::default(), p);
    let err = Pipeline::new(&layout, &generator).run(&request).unwrap_err();

    assert!(matches!(
        err,
        PipelineError::Stage {
            stage: Stage::Validated,
            ..
        }
    ));
    assert!(generator.requests.borrow().is_empty());
}

#[test]
fn pipeline_purges_stale_run_outputs_from_the_working_root() {
    let tmp = TempDir::new().unwrap();
    let layout = Layout::new(tmp.path());
    let p = pid("anyio");
    write_project(&layout.durable_dir(&p), "python");
    let stale = layout.working_root().join("anyio-old.function-1");
    fs::create_dir_all(&stale).unwrap();
    fs::write(stale.join("01.fuzz_target"), "old").unwrap();

    let generator = FakeGenerator::new(vec![
        "anyio-anyio.core.sockets.connect_tcp-1",
        "anyio-anyio.to_process.run_sync-1",
    ]);
    let request = GenerationRequest::new(&layout, &Settings::default(), p.clone());
    let run = Pipeline::new(&layout, &generator).run(&request).unwrap();

    assert_eq!(run.purged.len(), 1);
    assert_eq!(run.purged[0].dir_name(), "anyio-old.function-1");
    assert!(!stale.exists());
    assert!(!layout.samples_root().join("anyio-old.function-1").exists());
    assert_eq!(run.consolidation.harnesses.len(), 2);
    assert_eq!(
        harness_names(&layout.durable_dir(&p)),
        vec!["fuzz_harness-01_01.py", "fuzz_harness-01_02.py"]
    );
}

#[test]
fn pipeline_reports_sample_store_setup_as_purge() {
    let tmp = TempDir::new().unwrap();
    let layout = Layout::new(tmp.path());
    let p = pid("anyio");
    write_project(&layout.durable_dir(&p), "python");
    fs::write(layout.samples_root(), "not a directory").unwrap();

    let generator = FakeGenerator::new(vec![]);
    let request = GenerationRequest::new(&layout, &Settings::default(), p);
    let err = Pipeline::new(&layout, &generator).run(&request).unwrap_err();

    assert_eq!(err.stage(), Stage::Purged);
    assert!(generator.requests.borrow().is_empty());
}
