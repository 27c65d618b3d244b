pub mod benchmark;
pub mod benchmark_utils;
pub mod compressor;
pub mod config;
pub mod dataset;
pub mod error;
pub mod invoker;
pub mod metrics;
pub mod validator;
pub mod workspace;

pub use benchmark::run_benchmark;
pub use error::{HarnessError, Result};
