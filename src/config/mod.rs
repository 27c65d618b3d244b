use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::dataset::{TestCase, TestSet};
use crate::error::Result;

#[cfg(windows)]
const DEFAULT_CODEC: &str = "bin/markovhuffman.exe";
#[cfg(not(windows))]
const DEFAULT_CODEC: &str = "bin/markovhuffman";

const DEFAULT_SCRATCH_DIR: &str = "test/.tmp";
const DEFAULT_INPUT_DIR: &str = "test/input";

/// Everything a run needs to know about its environment.
///
/// Loaded from JSON; any field left out takes its default.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct HarnessConfig {
    /// Codec executable under test.
    pub codec: PathBuf,
    /// Scratch directory; must not exist when the run starts.
    pub scratch_dir: PathBuf,
    /// Pre-build command; empty skips the step.
    pub build_command: Vec<String>,
    pub gzip: PathBuf,
    pub bzip2: PathBuf,
    pub tests: TestSet,
    /// Where to store the result rows as JSON, if anywhere.
    pub results_file: Option<PathBuf>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        let input = Path::new(DEFAULT_INPUT_DIR);
        let cases = vec![
            TestCase::new("ipsum", input.join("input_ipsum.txt")),
            TestCase::new("wiki_cpp", input.join("input_wiki_cpp.txt")),
            TestCase::new("wiki_cpp_html", input.join("input_wiki_cpp.html")),
            TestCase::new("exe", DEFAULT_CODEC),
        ];

        HarnessConfig {
            codec: PathBuf::from(DEFAULT_CODEC),
            scratch_dir: PathBuf::from(DEFAULT_SCRATCH_DIR),
            build_command: vec!["make".to_owned()],
            gzip: PathBuf::from("gzip"),
            bzip2: PathBuf::from("bzip2"),
            tests: TestSet::from_distinct(cases),
            results_file: None,
        }
    }
}

impl HarnessConfig {
    /// Loads a configuration from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: HarnessConfig = serde_json::from_str(&content)?;
        config.tests.check_collisions()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HarnessError;

    #[test]
    fn default_registers_the_four_standard_tests() {
        let config = HarnessConfig::default();
        let names: Vec<&str> = config.tests.cases().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["ipsum", "wiki_cpp", "wiki_cpp_html", "exe"]);
        assert_eq!(config.tests.cases()[3].input, config.codec);
        assert_eq!(config.build_command, ["make"]);
        assert_eq!(config.scratch_dir, PathBuf::from("test/.tmp"));
    }

    #[test]
    fn default_tests_have_distinct_artifacts() {
        let tests = HarnessConfig::default().tests;
        assert_eq!(tests.len(), 4);
        tests.check_collisions().unwrap();
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("harness.json");
        let json = r#"{
            "codec": "target/codec",
            "build_command": [],
            "tests": [{ "name": "a", "input": "data/a.txt" }]
        }"#;
        fs::write(&path, json).unwrap();

        let config = HarnessConfig::load(&path).unwrap();
        assert_eq!(config.codec, PathBuf::from("target/codec"));
        assert!(config.build_command.is_empty());
        assert_eq!(config.tests.len(), 1);
        assert_eq!(config.gzip, PathBuf::from("gzip"));
        assert_eq!(config.results_file, None);
    }

    #[test]
    fn colliding_tests_are_rejected_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("harness.json");
        let json = r#"{ "tests": [
            { "name": "a", "input": "x/in.txt" },
            { "name": "b", "input": "y/in.txt" }
        ] }"#;
        fs::write(&path, json).unwrap();
        assert!(matches!(
            HarnessConfig::load(&path),
            Err(HarnessError::ArtifactCollision { .. })
        ));
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("harness.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(HarnessConfig::load(&path), Err(HarnessError::Config(_))));
    }
}
