use std::ffi::{OsStr, OsString};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::debug;

use crate::error::{HarnessError, Result};

/// One external-process call: program, arguments and where its stdout goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<OsString>,
    /// When set, the child's primary output stream is written to this file.
    pub stdout: Option<PathBuf>,
}

impl Invocation {
    pub fn new<P: AsRef<Path>>(program: P) -> Self {
        Invocation {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            stdout: None,
        }
    }

    pub fn arg<S: AsRef<OsStr>>(mut self, arg: S) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn stdout_to<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.stdout = Some(path.as_ref().to_path_buf());
        self
    }

    /// Program name as shown in diagnostics.
    pub fn program_name(&self) -> String {
        self.program.display().to_string()
    }
}

/// Exit status and diagnostic stream of a finished child.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InvocationOutput {
    /// `None` when the child was terminated by a signal.
    pub status: Option<i32>,
    pub stderr: Vec<u8>,
}

impl InvocationOutput {
    pub fn success() -> Self {
        InvocationOutput {
            status: Some(0),
            stderr: Vec::new(),
        }
    }

    pub fn failure<S: Into<Vec<u8>>>(status: i32, stderr: S) -> Self {
        InvocationOutput {
            status: Some(status),
            stderr: stderr.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == Some(0)
    }

    pub fn stderr_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stderr).trim_end().to_string()
    }
}

/// The single seam through which every codec, reference tool and build call passes.
pub trait Invoker {
    /// Runs the invocation to completion, blocking until the child exits.
    fn invoke(&mut self, invocation: &Invocation) -> Result<InvocationOutput>;
}

/// Runs invocations as real child processes.
#[derive(Debug, Default)]
pub struct SystemInvoker;

impl Invoker for SystemInvoker {
    fn invoke(&mut self, invocation: &Invocation) -> Result<InvocationOutput> {
        let mut command = Command::new(&invocation.program);
        command.args(&invocation.args).stdin(Stdio::null()).stderr(Stdio::piped());

        match &invocation.stdout {
            Some(path) => {
                command.stdout(Stdio::from(File::create(path)?));
            }
            None => {
                command.stdout(Stdio::null());
            }
        }

        let output = command.output().map_err(|source| HarnessError::Spawn {
            program: invocation.program_name(),
            source,
        })?;

        Ok(InvocationOutput {
            status: output.status.code(),
            stderr: output.stderr,
        })
    }
}

/// Runs the invocation and turns a non-zero exit into a fatal error for `stage`.
pub fn invoke_checked<I: Invoker + ?Sized>(
    invoker: &mut I,
    invocation: &Invocation,
    stage: &'static str,
) -> Result<()> {
    debug!(
        stage,
        program = %invocation.program.display(),
        args = ?invocation.args,
        stdout = ?invocation.stdout,
        "invoking"
    );
    let output = invoker.invoke(invocation)?;
    if output.is_success() {
        return Ok(());
    }
    Err(HarnessError::InvocationFailed {
        stage,
        program: invocation.program_name(),
        status: output.status,
        stderr: output.stderr_lossy(),
    })
}
