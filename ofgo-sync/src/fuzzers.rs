//! Discovery of compiled fuzz targets in an OSS-Fuzz build output tree.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use ofgo_core::types::parse_harness_stem;

use crate::error::{io_err, SyncError};

/// Whether `name` looks like a compiled fuzzer binary.
///
/// Binaries carry no extension; they are named `fuzz_*`, `*Fuzzer`, or after
/// a consolidated harness (`fuzz_harness-NN_MM`).
pub fn is_fuzzer_name(name: &str) -> bool {
    if name.contains('.') {
        return false;
    }
    name.starts_with("fuzz_") || name.ends_with("Fuzzer") || parse_harness_stem(name).is_some()
}

/// Walk `out_dir` recursively and return the sorted, deduplicated names of
/// fuzzer binaries. A missing directory yields an empty list.
pub fn discover_fuzzers(out_dir: &Path) -> Result<Vec<String>, SyncError> {
    let mut found = BTreeSet::new();
    if !out_dir.exists() {
        return Ok(vec![]);
    }
    let mut stack: Vec<PathBuf> = vec![out_dir.to_path_buf()];
    while let Some(dir) = stack.pop() {
        for entry in std::fs::read_dir(&dir).map_err(|e| io_err(&dir, e))? {
            let entry = entry.map_err(|e| io_err(&dir, e))?;
            let file_type = entry.file_type().map_err(|e| io_err(entry.path(), e))?;
            if file_type.is_dir() {
                stack.push(entry.path());
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if is_fuzzer_name(&name) {
                found.insert(name);
            }
        }
    }
    Ok(found.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::fs;
    use tempfile::TempDir;

    #[rstest]
    #[case("fuzz_parser", true)]
    #[case("JsonFuzzer", true)]
    #[case("fuzz_harness-01_02", true)]
    #[case("fuzz_parser.options", false)]
    #[case("fuzz_harness-01_02.py", false)]
    #[case("llvm-symbolizer", false)]
    #[case("afl-fuzz", false)]
    fn fuzzer_names(#[case] name: &str, #[case] expected: bool) {
        assert_eq!(is_fuzzer_name(name), expected, "{name}");
    }

    #[test]
    fn discovers_nested_binaries_once() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("out").join("proj");
        fs::create_dir_all(out.join("nested")).unwrap();
        fs::write(out.join("fuzz_a"), "").unwrap();
        fs::write(out.join("fuzz_a.dict"), "").unwrap();
        fs::write(out.join("nested").join("fuzz_a"), "").unwrap();
        fs::write(out.join("nested").join("fuzz_harness-01_01"), "").unwrap();

        let found = discover_fuzzers(&out).unwrap();
        assert_eq!(found, vec!["fuzz_a", "fuzz_harness-01_01"]);
    }

    #[test]
    fn missing_out_dir_is_empty() {
        let tmp = TempDir::new().unwrap();
        assert!(discover_fuzzers(&tmp.path().join("nope")).unwrap().is_empty());
    }
}
