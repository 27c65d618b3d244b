use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::compressor::reference::ReferenceAlgorithm;
use crate::compressor::CodingVariant;
use crate::error::{HarnessError, Result};

/// What an artifact in the scratch directory holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactRole {
    Encoded(CodingVariant),
    Table(CodingVariant),
    Decoded(CodingVariant),
    Reference(ReferenceAlgorithm),
}

impl ArtifactRole {
    /// File name suffix appended to the input's base name.
    pub fn suffix(self) -> &'static str {
        match self {
            ArtifactRole::Encoded(CodingVariant::Simple) => ".ch",
            ArtifactRole::Encoded(CodingVariant::Contextual) => ".cm",
            ArtifactRole::Table(CodingVariant::Simple) => ".eh",
            ArtifactRole::Table(CodingVariant::Contextual) => ".e",
            ArtifactRole::Decoded(CodingVariant::Simple) => ".dh",
            ArtifactRole::Decoded(CodingVariant::Contextual) => ".dm",
            ArtifactRole::Reference(algorithm) => algorithm.suffix(),
        }
    }
}

/// File name of the artifact with `role` derived from `input`: `<base><suffix>`.
pub fn artifact_name(input: &Path, role: ArtifactRole) -> OsString {
    let mut name = input
        .file_name()
        .map(|base| base.to_os_string())
        .unwrap_or_else(|| OsString::from("input"));
    name.push(role.suffix());
    name
}

/// The scratch directory that owns every artifact of a run.
///
/// `open` refuses to reuse a directory left behind by an earlier run.
/// `close` must be called explicitly: a run aborted by a fatal error keeps
/// the directory for inspection, so there is no cleanup on drop.
#[derive(Debug)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    /// Fails if `root` already exists, without touching the filesystem otherwise.
    pub fn ensure_absent<P: AsRef<Path>>(root: P) -> Result<()> {
        let root = root.as_ref();
        if root.exists() {
            return Err(HarnessError::WorkspaceExists {
                path: root.to_path_buf(),
            });
        }
        Ok(())
    }

    /// Creates `root`; its parent must already exist.
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref();
        match fs::create_dir(root) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(HarnessError::WorkspaceExists {
                    path: root.to_path_buf(),
                });
            }
            Err(e) => return Err(e.into()),
        }
        info!(path = %root.display(), "scratch directory created");
        Ok(Workspace {
            root: root.to_path_buf(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the artifact with `role` derived from `input`.
    ///
    /// Two inputs sharing a base name map to the same artifacts; the test set
    /// rejects such duplicates before the run starts.
    pub fn artifact<P: AsRef<Path>>(&self, input: P, role: ArtifactRole) -> PathBuf {
        self.root.join(artifact_name(input.as_ref(), role))
    }

    /// Removes the directory and everything in it.
    pub fn close(self) -> Result<()> {
        fs::remove_dir_all(&self.root)?;
        debug!(path = %self.root.display(), "scratch directory removed");
        Ok(())
    }
}
