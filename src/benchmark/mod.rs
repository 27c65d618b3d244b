use std::fs;
use std::path::Path;

use tracing::{debug, error, info, warn};

use crate::benchmark_utils::{ResultAggregator, ResultRow};
use crate::compressor::codec::{Codec, Encoded};
use crate::compressor::header;
use crate::compressor::reference::{ReferenceAlgorithm, ReferenceCompressor};
use crate::compressor::CodingVariant;
use crate::config::HarnessConfig;
use crate::dataset::{TestCase, TestSet};
use crate::error::{HarnessError, Result};
use crate::invoker::{Invocation, Invoker};
use crate::metrics::{ArtifactSizes, RowMetrics};
use crate::validator;
use crate::workspace::Workspace;

fn file_size(path: &Path) -> Result<u64> {
    Ok(fs::metadata(path)?.len())
}

/// Tools a test drives, bound to one scratch directory.
pub struct Bench<'a, I: Invoker + ?Sized> {
    pub invoker: &'a mut I,
    pub workspace: &'a Workspace,
    pub codec: &'a Codec,
    pub gzip: &'a ReferenceCompressor,
    pub bzip2: &'a ReferenceCompressor,
}

impl<'a, I: Invoker + ?Sized> Bench<'a, I> {
    fn reference(&self, algorithm: ReferenceAlgorithm) -> &'a ReferenceCompressor {
        match algorithm {
            ReferenceAlgorithm::Gzip => self.gzip,
            ReferenceAlgorithm::Bzip2 => self.bzip2,
        }
    }

    /// Encodes `input` with `variant` and checks the artifact headers.
    fn encode(&mut self, input: &Path, variant: CodingVariant) -> Result<(Encoded, usize)> {
        let encoded = self.codec.encode(self.invoker, self.workspace, input, variant)?;
        let inspection = header::inspect(&encoded.stream, &encoded.table)?;
        let mismatches = inspection.mismatches(variant);
        if mismatches > 0 {
            warn!(
                input = %input.display(),
                variant = variant.name(),
                stream = ?inspection.stream,
                table = ?inspection.table,
                "encoded artifacts do not carry the expected variant header"
            );
        }
        Ok((encoded, mismatches))
    }

    /// Runs the full pipeline for one test and produces its row.
    ///
    /// Every invocation of a stage finishes before the next stage starts.
    /// Any error returned here is fatal for the whole run.
    pub fn run_test(&mut self, case: &TestCase) -> Result<ResultRow> {
        let input = case.input.as_path();
        if !input.is_file() {
            return Err(HarnessError::MissingInput {
                path: input.to_path_buf(),
            });
        }
        let input_size = file_size(input)?;
        if input_size == 0 {
            return Err(HarnessError::EmptyInput {
                path: input.to_path_buf(),
            });
        }
        info!(test = %case.name, input = %input.display(), bytes = input_size, "checking");

        let mut encoded = Vec::with_capacity(CodingVariant::ALL.len());
        let mut header_warnings = 0;
        for variant in CodingVariant::ALL {
            let (artifacts, mismatches) = self.encode(input, variant)?;
            header_warnings += mismatches;
            encoded.push((variant, artifacts));
        }

        let mut decoded = Vec::with_capacity(encoded.len());
        for (variant, artifacts) in &encoded {
            let path = self.codec.decode(
                self.invoker,
                self.workspace,
                input,
                artifacts,
                *variant,
            )?;
            decoded.push((*variant, path));
        }

        let mut correct = true;
        for (variant, path) in &decoded {
            if !validator::verify(input, path)? {
                warn!(
                    input = %input.display(),
                    variant = variant.name(),
                    "decoded output differs from input"
                );
                correct = false;
            }
        }

        let mut references = Vec::with_capacity(ReferenceAlgorithm::ALL.len());
        for algorithm in ReferenceAlgorithm::ALL {
            let path = self
                .reference(algorithm)
                .compress(self.invoker, self.workspace, input)?;
            references.push(path);
        }

        let mut combined = Vec::with_capacity(references.len());
        for reference in &references {
            let artifacts = self.codec.encode(
                self.invoker,
                self.workspace,
                reference,
                CodingVariant::Contextual,
            )?;
            combined.push(artifacts.stream);
        }

        let sizes = ArtifactSizes {
            input: input_size,
            simple: file_size(&encoded[0].1.stream)?,
            contextual: file_size(&encoded[1].1.stream)?,
            gzip: file_size(&references[0])?,
            bzip2: file_size(&references[1])?,
            gzip_contextual: file_size(&combined[0])?,
            bzip2_contextual: file_size(&combined[1])?,
        };
        debug!(test = %case.name, ?sizes, "artifact sizes");

        Ok(ResultRow {
            test_name: case.name.clone(),
            file_name: case.display_name(),
            correct,
            metrics: RowMetrics::from_sizes(&sizes)?,
            header_warnings,
        })
    }

    /// Runs every test in order, stopping at the first fatal error.
    pub fn run_all(&mut self, tests: &TestSet, results: &mut ResultAggregator) -> Result<()> {
        for case in tests.cases() {
            let row = self.run_test(case)?;
            if !row.correct {
                error!(test = %case.name, "round trip FAILED");
            }
            results.push(row);
        }
        Ok(())
    }
}

/// Runs the pre-build step; a non-zero exit fails the run.
pub fn build<I: Invoker + ?Sized>(invoker: &mut I, command: &[String]) -> Result<()> {
    let Some((program, args)) = command.split_first() else {
        debug!("no build command configured");
        return Ok(());
    };
    info!(command = ?command, "compiling");
    let invocation = args.iter().fold(Invocation::new(program), |inv, arg| inv.arg(arg));
    let output = invoker.invoke(&invocation)?;
    if !output.is_success() {
        return Err(HarnessError::BuildFailed {
            status: output.status,
            stderr: output.stderr_lossy(),
        });
    }
    Ok(())
}

/// One full benchmark run: build, open scratch, run all tests, clean up.
///
/// A fatal error returns early and leaves the scratch directory in place.
pub fn run_benchmark<I: Invoker + ?Sized>(
    config: &HarnessConfig,
    invoker: &mut I,
) -> Result<ResultAggregator> {
    Workspace::ensure_absent(&config.scratch_dir)?;
    build(invoker, &config.build_command)?;

    info!(tests = config.tests.len(), "running");
    let codec = Codec::new(&config.codec);
    let gzip = ReferenceCompressor::new(ReferenceAlgorithm::Gzip, &config.gzip);
    let bzip2 = ReferenceCompressor::new(ReferenceAlgorithm::Bzip2, &config.bzip2);
    let workspace = Workspace::open(&config.scratch_dir)?;

    let mut results = ResultAggregator::new();
    Bench {
        invoker,
        workspace: &workspace,
        codec: &codec,
        gzip: &gzip,
        bzip2: &bzip2,
    }
    .run_all(&config.tests, &mut results)?;

    workspace.close()?;
    info!(tests = results.rows().len(), failed = results.failed(), "run complete");
    Ok(results)
}
