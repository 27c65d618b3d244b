use std::path::{Path, PathBuf};

use crate::compressor::CodingVariant;
use crate::error::Result;
use crate::invoker::{invoke_checked, Invocation, Invoker};
use crate::workspace::{ArtifactRole, Workspace};

/// Artifacts produced by one encode call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoded {
    pub stream: PathBuf,
    pub table: PathBuf,
}

/// The codec under test, driven through its command line.
#[derive(Debug, Clone)]
pub struct Codec {
    executable: PathBuf,
}

impl Codec {
    pub fn new<P: AsRef<Path>>(executable: P) -> Self {
        Codec {
            executable: executable.as_ref().to_path_buf(),
        }
    }

    /// `<codec> <input> -o <encoded> <variant flag> -d <table>`
    pub fn encode_invocation(
        &self,
        input: &Path,
        stream: &Path,
        table: &Path,
        variant: CodingVariant,
    ) -> Invocation {
        Invocation::new(&self.executable)
            .arg(input)
            .arg("-o")
            .arg(stream)
            .arg(variant.encode_flag())
            .arg("-d")
            .arg(table)
    }

    /// `<codec> <encoded> -o <decoded> <decode flag> -e <table>`
    pub fn decode_invocation(
        &self,
        encoded: &Path,
        decoded: &Path,
        table: &Path,
        variant: CodingVariant,
    ) -> Invocation {
        Invocation::new(&self.executable)
            .arg(encoded)
            .arg("-o")
            .arg(decoded)
            .arg(variant.decode_flag())
            .arg("-e")
            .arg(table)
    }

    /// Encodes `input` with `variant`; a non-zero exit aborts the run.
    pub fn encode<I: Invoker + ?Sized>(
        &self,
        invoker: &mut I,
        workspace: &Workspace,
        input: &Path,
        variant: CodingVariant,
    ) -> Result<Encoded> {
        let stream = workspace.artifact(input, ArtifactRole::Encoded(variant));
        let table = workspace.artifact(input, ArtifactRole::Table(variant));
        let invocation = self.encode_invocation(input, &stream, &table, variant);
        invoke_checked(invoker, &invocation, "encoding")?;
        Ok(Encoded { stream, table })
    }

    /// Decodes an encoded stream back next to it.
    ///
    /// `input` is the original the stream was made from; it names the
    /// decoded artifact.
    pub fn decode<I: Invoker + ?Sized>(
        &self,
        invoker: &mut I,
        workspace: &Workspace,
        input: &Path,
        encoded: &Encoded,
        variant: CodingVariant,
    ) -> Result<PathBuf> {
        let decoded = workspace.artifact(input, ArtifactRole::Decoded(variant));
        invoke_checked(
            invoker,
            &self.decode_invocation(&encoded.stream, &decoded, &encoded.table, variant),
            "decoding",
        )?;
        Ok(decoded)
    }
}
