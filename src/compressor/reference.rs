use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::invoker::{invoke_checked, Invocation, Invoker};
use crate::workspace::{ArtifactRole, Workspace};

/// General-purpose baselines the codec is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceAlgorithm {
    Gzip,
    Bzip2,
}

impl ReferenceAlgorithm {
    pub const ALL: [ReferenceAlgorithm; 2] = [ReferenceAlgorithm::Gzip, ReferenceAlgorithm::Bzip2];

    /// Write to stdout, keep the input, maximum level.
    pub fn flags(self) -> &'static str {
        match self {
            ReferenceAlgorithm::Gzip => "-ck9",
            ReferenceAlgorithm::Bzip2 => "-ckz9",
        }
    }

    pub fn suffix(self) -> &'static str {
        match self {
            ReferenceAlgorithm::Gzip => ".gz",
            ReferenceAlgorithm::Bzip2 => ".bz2",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ReferenceAlgorithm::Gzip => "gz",
            ReferenceAlgorithm::Bzip2 => "bz",
        }
    }
}

/// A baseline tool invoked as an external program.
#[derive(Debug, Clone)]
pub struct ReferenceCompressor {
    algorithm: ReferenceAlgorithm,
    program: PathBuf,
}

impl ReferenceCompressor {
    pub fn new<P: AsRef<Path>>(algorithm: ReferenceAlgorithm, program: P) -> Self {
        ReferenceCompressor {
            algorithm,
            program: program.as_ref().to_path_buf(),
        }
    }

    pub fn algorithm(&self) -> ReferenceAlgorithm {
        self.algorithm
    }

    pub fn invocation(&self, input: &Path, output: &Path) -> Invocation {
        Invocation::new(&self.program).arg(self.algorithm.flags()).arg(input).stdout_to(output)
    }

    /// Compresses `input` into the workspace, capturing the tool's stdout.
    pub fn compress<I: Invoker + ?Sized>(
        &self,
        invoker: &mut I,
        workspace: &Workspace,
        input: &Path,
    ) -> Result<PathBuf> {
        let output = workspace.artifact(input, ArtifactRole::Reference(self.algorithm));
        let invocation = self.invocation(input, &output);
        invoke_checked(invoker, &invocation, "compressing with reference tool")?;
        Ok(output)
    }
}
