use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::compressor::reference::ReferenceAlgorithm;
use crate::compressor::CodingVariant;
use crate::error::{HarnessError, Result};
use crate::workspace::{artifact_name, ArtifactRole};

/// A named input file to benchmark.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    pub name: String,
    pub input: PathBuf,
}

impl TestCase {
    pub fn new<S: Into<String>, P: AsRef<Path>>(name: S, input: P) -> Self {
        TestCase {
            name: name.into(),
            input: input.as_ref().to_path_buf(),
        }
    }

    /// Name shown in the result table: the input's file name.
    pub fn display_name(&self) -> String {
        self.input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.name.clone())
    }

    /// Every scratch file name this test will create.
    fn artifact_names(&self) -> Vec<OsString> {
        let mut names = Vec::new();
        for variant in CodingVariant::ALL {
            names.push(artifact_name(&self.input, ArtifactRole::Encoded(variant)));
            names.push(artifact_name(&self.input, ArtifactRole::Table(variant)));
            names.push(artifact_name(&self.input, ArtifactRole::Decoded(variant)));
        }
        for algorithm in ReferenceAlgorithm::ALL {
            let reference =
                PathBuf::from(artifact_name(&self.input, ArtifactRole::Reference(algorithm)));
            names.push(artifact_name(&reference, ArtifactRole::Encoded(CodingVariant::Contextual)));
            names.push(artifact_name(&reference, ArtifactRole::Table(CodingVariant::Contextual)));
            names.push(reference.into_os_string());
        }
        names
    }
}

/// The ordered list of tests for one run. Order is execution order.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(transparent)]
pub struct TestSet {
    cases: Vec<TestCase>,
}

impl TestSet {
    /// Builds a test set, rejecting inputs whose scratch artifacts would collide.
    pub fn new(cases: Vec<TestCase>) -> Result<Self> {
        let set = TestSet { cases };
        set.check_collisions()?;
        Ok(set)
    }

    /// Builds a test set from cases already known to have distinct artifacts.
    pub(crate) fn from_distinct(cases: Vec<TestCase>) -> Self {
        TestSet { cases }
    }

    pub fn cases(&self) -> &[TestCase] {
        &self.cases
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    pub fn check_collisions(&self) -> Result<()> {
        let mut owners: HashMap<OsString, &str> = HashMap::new();
        for case in &self.cases {
            for name in case.artifact_names() {
                if let Some(previous) = owners.insert(name.clone(), &case.name) {
                    return Err(HarnessError::ArtifactCollision {
                        artifact: name.to_string_lossy().into_owned(),
                        first: previous.to_owned(),
                        second: case.name.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}
