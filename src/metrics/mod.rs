use serde::{Deserialize, Serialize};

use crate::error::{HarnessError, Result};

/// Size of `artifact` relative to the input it was derived from.
pub fn ratio(artifact_bytes: u64, input_bytes: u64) -> Result<f64> {
    if input_bytes == 0 {
        return Err(HarnessError::ZeroBaseline {
            metric: "compression ratio",
        });
    }
    Ok(artifact_bytes as f64 / input_bytes as f64)
}

/// Percentage change of `value` over `baseline`: `100 * (value - baseline) / baseline`.
///
/// Negative means `value` is smaller, i.e. compresses better than the baseline.
pub fn relative_improvement(baseline: f64, value: f64, metric: &'static str) -> Result<f64> {
    if baseline == 0.0 || !baseline.is_finite() {
        return Err(HarnessError::ZeroBaseline { metric });
    }
    Ok(100.0 * (value - baseline) / baseline)
}

/// A ratio paired with its change over a baseline ratio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Compared {
    pub ratio: f64,
    pub improvement_pct: f64,
}

impl Compared {
    fn new(baseline: f64, ratio: f64, metric: &'static str) -> Result<Self> {
        Ok(Compared {
            ratio,
            improvement_pct: relative_improvement(baseline, ratio, metric)?,
        })
    }
}

/// Byte counts gathered by one test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ArtifactSizes {
    pub input: u64,
    pub simple: u64,
    pub contextual: u64,
    pub gzip: u64,
    pub bzip2: u64,
    pub gzip_contextual: u64,
    pub bzip2_contextual: u64,
}

/// Every ratio reported for one test, all relative to the original input size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RowMetrics {
    pub simple: f64,
    /// Compared against `simple`.
    pub contextual: Compared,
    pub gzip: f64,
    pub bzip2: f64,
    /// Contextual codec applied to the gzip output, compared against `gzip`.
    pub gzip_contextual: Compared,
    /// Contextual codec applied to the bzip2 output, compared against `bzip2`.
    pub bzip2_contextual: Compared,
}

impl RowMetrics {
    pub fn from_sizes(sizes: &ArtifactSizes) -> Result<Self> {
        let input = sizes.input;
        let simple = ratio(sizes.simple, input)?;
        let gzip = ratio(sizes.gzip, input)?;
        let bzip2 = ratio(sizes.bzip2, input)?;
        let contextual = ratio(sizes.contextual, input)?;
        let gzip_contextual = ratio(sizes.gzip_contextual, input)?;
        let bzip2_contextual = ratio(sizes.bzip2_contextual, input)?;
        Ok(RowMetrics {
            simple,
            contextual: Compared::new(simple, contextual, "contextual over simple")?,
            gzip,
            bzip2,
            gzip_contextual: Compared::new(gzip, gzip_contextual, "contextual over gzip")?,
            bzip2_contextual: Compared::new(bzip2, bzip2_contextual, "contextual over bzip2")?,
        })
    }
}
