//! Domain types for onboarding: project ids, run-output ids, harness names,
//! sample indices and the closed language table.
//!
//! Directory and file names produced by the external generator are parsed
//! into these types instead of being matched with ad hoc patterns, so the
//! naming conventions live in exactly one place.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// ProjectId
// ---------------------------------------------------------------------------

/// A lowercase, filesystem-safe project identifier (e.g. `anyio`, `libpng`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProjectId(String);

impl ProjectId {
    /// Validate `value` as a project id.
    ///
    /// Accepts ASCII lowercase letters, digits, `-`, `_`, `.` and `+`.
    /// Rejects empty strings and the `.` / `..` path components.
    pub fn new(value: impl Into<String>) -> Result<Self, CoreError> {
        let value = value.into();
        let invalid = |reason| CoreError::InvalidProjectId {
            value: value.clone(),
            reason,
        };
        if value.is_empty() {
            return Err(invalid("must not be empty"));
        }
        if value == "." || value == ".." {
            return Err(invalid("must not be a relative path component"));
        }
        if let Some(c) = value.chars().find(|c| !is_id_char(*c)) {
            return Err(if c.is_ascii_uppercase() {
                invalid("must be lowercase")
            } else if c == '/' || c == '\\' {
                invalid("must not contain path separators")
            } else {
                invalid("only [a-z0-9._+-] are allowed")
            });
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_id_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '-' | '_' | '.' | '+')
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for ProjectId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ProjectId {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ProjectId> for String {
    fn from(id: ProjectId) -> Self {
        id.0
    }
}

impl AsRef<str> for ProjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// RunOutputId
// ---------------------------------------------------------------------------

/// Name of a directory produced by the generator for one candidate function:
/// `<project>-<function>-<run_index>`.
///
/// The run index may be absent (`<project>-<function>-`); the function part is
/// never empty and may itself contain `-`. The index is kept as the digit
/// string so arbitrarily long runs still match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RunOutputId {
    pub project: ProjectId,
    pub function: String,
    pub run_index: Option<String>,
    name: String,
}

impl RunOutputId {
    /// Parse `name` as a run output of `project`.
    ///
    /// Returns `None` for the bare project directory, for names belonging to
    /// other projects, and for names without a trailing `-<digits>` suffix.
    pub fn parse_for(project: &ProjectId, name: &str) -> Option<Self> {
        let rest = name.strip_prefix(project.as_str())?.strip_prefix('-')?;
        // Digits never contain '-', so the last dash is the only possible split.
        let split = rest.rfind('-')?;
        let (function, suffix) = (&rest[..split], &rest[split + 1..]);
        if function.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let run_index = (!suffix.is_empty()).then(|| suffix.to_string());
        Some(Self {
            project: project.clone(),
            function: function.to_string(),
            run_index,
            name: name.to_string(),
        })
    }

    /// The directory name this id was parsed from.
    pub fn dir_name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for RunOutputId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.name.fmt(f)
    }
}

impl PartialOrd for RunOutputId {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RunOutputId {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.name.cmp(&other.name)
    }
}

// ---------------------------------------------------------------------------
// SampleIndex
// ---------------------------------------------------------------------------

/// Suffix of the per-sample payload file written by the generator.
pub const PAYLOAD_SUFFIX: &str = "fuzz_target";

/// 1-based index of a generated sample within a run-output directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SampleIndex(u32);

impl SampleIndex {
    pub const FIRST: SampleIndex = SampleIndex(1);

    pub fn new(index: u32) -> Option<Self> {
        (index > 0).then_some(Self(index))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Payload file inside a run-output directory: `NN.fuzz_target`.
    pub fn payload_file_name(self) -> String {
        format!("{:02}.{PAYLOAD_SUFFIX}", self.0)
    }
}

impl Default for SampleIndex {
    fn default() -> Self {
        Self::FIRST
    }
}

impl fmt::Display for SampleIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}", self.0)
    }
}

impl FromStr for SampleIndex {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let n: u32 = s
            .trim()
            .parse()
            .map_err(|_| format!("sample index '{s}' is not a number"))?;
        Self::new(n).ok_or_else(|| "sample index must be at least 1".to_string())
    }
}

// ---------------------------------------------------------------------------
// HarnessFile
// ---------------------------------------------------------------------------

/// Prefix shared by every consolidated harness file.
pub const HARNESS_PREFIX: &str = "fuzz_harness-";

/// A consolidated harness file name: `fuzz_harness-<NN>_<MM>.<ext>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HarnessFile {
    pub sample: u32,
    pub ordinal: u32,
    pub extension: String,
}

impl HarnessFile {
    pub fn new(sample: SampleIndex, ordinal: u32, extension: &str) -> Self {
        Self {
            sample: sample.get(),
            ordinal,
            extension: extension.to_string(),
        }
    }

    /// Parse a file name. Both numbers need at least two digits and the
    /// extension must be non-empty.
    pub fn parse(name: &str) -> Option<Self> {
        let (stem, extension) = name.split_once('.')?;
        if extension.is_empty() {
            return None;
        }
        let (sample, ordinal) = parse_harness_stem(stem)?;
        Some(Self {
            sample,
            ordinal,
            extension: extension.to_string(),
        })
    }

    pub fn file_name(&self) -> String {
        format!(
            "{HARNESS_PREFIX}{:02}_{:02}.{}",
            self.sample, self.ordinal, self.extension
        )
    }
}

/// Parse `fuzz_harness-NN_MM` (no extension) into `(sample, ordinal)`.
///
/// Also used to recognise compiled harness binaries, which drop the extension.
pub fn parse_harness_stem(stem: &str) -> Option<(u32, u32)> {
    let numbers = stem.strip_prefix(HARNESS_PREFIX)?;
    let (sample, ordinal) = numbers.split_once('_')?;
    Some((two_plus_digits(sample)?, two_plus_digits(ordinal)?))
}

fn two_plus_digits(s: &str) -> Option<u32> {
    if s.len() < 2 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

impl fmt::Display for HarnessFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.file_name())
    }
}

// ---------------------------------------------------------------------------
// Language
// ---------------------------------------------------------------------------

/// Source languages supported by OSS-Fuzz, each mapped to one harness extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "c")]
    C,
    #[serde(rename = "c++")]
    Cpp,
    #[serde(rename = "go")]
    Go,
    #[serde(rename = "javascript")]
    JavaScript,
    #[serde(rename = "jvm")]
    Jvm,
    #[serde(rename = "python")]
    Python,
    #[serde(rename = "ruby")]
    Ruby,
    #[serde(rename = "rust")]
    Rust,
    #[serde(rename = "swift")]
    Swift,
}

impl Language {
    pub fn all() -> &'static [Language] {
        &[
            Language::C,
            Language::Cpp,
            Language::Go,
            Language::JavaScript,
            Language::Jvm,
            Language::Python,
            Language::Ruby,
            Language::Rust,
            Language::Swift,
        ]
    }

    /// Name as written in `project.yaml`.
    pub fn name(self) -> &'static str {
        match self {
            Language::C => "c",
            Language::Cpp => "c++",
            Language::Go => "go",
            Language::JavaScript => "javascript",
            Language::Jvm => "jvm",
            Language::Python => "python",
            Language::Ruby => "ruby",
            Language::Rust => "rust",
            Language::Swift => "swift",
        }
    }

    /// File extension for harnesses written in this language.
    pub fn extension(self) -> &'static str {
        match self {
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::Go => "go",
            Language::JavaScript => "js",
            Language::Jvm => "java",
            Language::Python => "py",
            Language::Ruby => "rb",
            Language::Rust => "rs",
            Language::Swift => "swift",
        }
    }

    /// OSS-Fuzz base builder image for the project Dockerfile.
    pub fn base_image(self) -> &'static str {
        match self {
            Language::C | Language::Cpp => "base-builder",
            Language::Go => "base-builder-go",
            Language::JavaScript => "base-builder-javascript",
            Language::Jvm => "base-builder-jvm",
            Language::Python => "base-builder-python",
            Language::Ruby => "base-builder-ruby",
            Language::Rust => "base-builder-rust",
            Language::Swift => "base-builder-swift",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Language {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Language::all()
            .iter()
            .copied()
            .find(|l| l.name() == s)
            .ok_or_else(|| CoreError::UnsupportedLanguage {
                value: Some(s.to_string()),
            })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
