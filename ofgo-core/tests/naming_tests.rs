//! Naming-convention and metadata integration tests.
//!
//! Fixtures mirror real generator output names (anyio, argcomplete,
//! jupyter_server) so prefix collisions are exercised with realistic data.

use assert_fs::prelude::*;
use ofgo_core::{
    metadata, CoreError, HarnessFile, Language, ProjectId, RunOutputId, SampleIndex,
};
use predicates::prelude::*;
use rstest::rstest;

fn pid(s: &str) -> ProjectId {
    ProjectId::new(s).expect("project id")
}

// ---------------------------------------------------------------------------
// 1. Run-output attribution
// ---------------------------------------------------------------------------

#[rstest]
#[case("anyio", "anyio-anyio.core.sockets.connect_tcp-1", true)]
#[case("anyio", "anyio-anyio.to_process.run_sync-1", true)]
#[case("anyio", "anyio", false)]
#[case("anyio", "argcomplete-argcomplete.finders.completionfinder._call-1", false)]
#[case("argcomplete", "argcomplete-argcomplete.finders.completionfinder.rl_complete-1", true)]
#[case("argcomplete", "argcomplete", false)]
#[case(
    "jupyter_server",
    "jupyter_server-jupyter_server.services.contents.manager.asynccontentsmanager.copy-1",
    true
)]
#[case("jupyter", "jupyter_server-jupyter_server.auth.decorator.authorized.wrapper.inner-1", false)]
fn run_output_attribution(#[case] project: &str, #[case] dir: &str, #[case] expected: bool) {
    let parsed = RunOutputId::parse_for(&pid(project), dir);
    assert_eq!(parsed.is_some(), expected, "{project} vs {dir}");
}

// ---------------------------------------------------------------------------
// 2. Language table
// ---------------------------------------------------------------------------

#[rstest]
#[case("c", "c")]
#[case("c++", "cpp")]
#[case("go", "go")]
#[case("javascript", "js")]
#[case("jvm", "java")]
#[case("python", "py")]
#[case("ruby", "rb")]
#[case("rust", "rs")]
#[case("swift", "swift")]
fn language_extension(#[case] name: &str, #[case] ext: &str) {
    let lang: Language = name.parse().expect("supported language");
    assert_eq!(lang.extension(), ext);
    assert_eq!(lang.to_string(), name);
}

#[test]
fn harness_names_use_language_extension() {
    let h = HarnessFile::new(SampleIndex::FIRST, 1, Language::Cpp.extension());
    assert_eq!(h.file_name(), "fuzz_harness-01_01.cpp");
}

// ---------------------------------------------------------------------------
// 3. Reading project.yaml from disk
// ---------------------------------------------------------------------------

#[test]
fn read_language_from_project_dir() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    dir.child("project.yaml")
        .write_str("homepage: \"https://github.com/agronholm/anyio\"\nlanguage: python\n")
        .expect("write");
    assert_eq!(metadata::read_language(dir.path()).unwrap(), Language::Python);
}

#[test]
fn missing_project_yaml_is_io_error_with_path() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let err = metadata::read_language(dir.path()).unwrap_err();
    assert!(matches!(err, CoreError::Io { .. }), "got: {err}");
    assert!(predicate::str::contains("project.yaml").eval(&err.to_string()));
}

#[test]
fn project_id_serde_rejects_invalid_values() {
    let ok: ProjectId = serde_yaml::from_str("libpng").expect("valid id");
    assert_eq!(ok.as_str(), "libpng");
    assert!(serde_yaml::from_str::<ProjectId>("Lib/PNG").is_err());
}
