use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort a harness run.
///
/// Every variant is fatal: once one is raised no further measurement is
/// trusted and no partial table is reported. A round-trip mismatch is not an
/// error; it is carried as the `correct` flag of a result row.
#[derive(Error, Debug)]
pub enum HarnessError {
    /// The scratch directory survived a previous run.
    #[error("scratch directory '{}' already exists", path.display())]
    WorkspaceExists { path: PathBuf },

    /// A registered test input is not on disk.
    #[error("test input '{}' does not exist", path.display())]
    MissingInput { path: PathBuf },

    /// A registered test input has no bytes, so no ratio can be formed.
    #[error("test input '{}' is empty", path.display())]
    EmptyInput { path: PathBuf },

    /// Two tests would write the same scratch artifact.
    #[error("tests '{first}' and '{second}' both produce artifact '{artifact}'")]
    ArtifactCollision {
        artifact: String,
        first: String,
        second: String,
    },

    /// The external program could not be started at all.
    #[error("failed to execute '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// An external program ran but reported failure.
    #[error(
        "error while {stage} ('{program}' exited with {}):\n{stderr}",
        describe_status(*status)
    )]
    InvocationFailed {
        stage: &'static str,
        program: String,
        status: Option<i32>,
        stderr: String,
    },

    /// The pre-build step for the codec failed.
    #[error("build failed (exited with {}):\n{stderr}", describe_status(*status))]
    BuildFailed {
        status: Option<i32>,
        stderr: String,
    },

    /// A relative improvement was requested over a zero baseline.
    #[error("cannot compute improvement of {metric} over a zero baseline")]
    ZeroBaseline { metric: &'static str },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

impl HarnessError {
    /// Process exit status reported for this error.
    pub fn exit_code(&self) -> i32 {
        1
    }
}

fn describe_status(status: Option<i32>) -> String {
    match status {
        Some(code) => format!("status {code}"),
        None => "no status (terminated by signal)".to_owned(),
    }
}

pub type Result<T> = std::result::Result<T, HarnessError>;
