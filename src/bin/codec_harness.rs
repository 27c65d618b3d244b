use codec_bench_harness::benchmark_utils::write_results;
use codec_bench_harness::config::HarnessConfig;
use codec_bench_harness::invoker::SystemInvoker;
use codec_bench_harness::run_benchmark;
use std::env;
use std::path::Path;
use std::process;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_logging();

    // Get the command-line arguments
    let args: Vec<String> = env::args().collect();
    if args.len() > 2 {
        eprintln!("Usage: {} [config.json]", args[0]);
        process::exit(1);
    }

    let config = match args.get(1) {
        Some(path) => match HarnessConfig::load(Path::new(path)) {
            Ok(config) => config,
            Err(err) => {
                error!(config = %path, "{err}");
                process::exit(err.exit_code());
            }
        },
        None => HarnessConfig::default(),
    };

    let results = match run_benchmark(&config, &mut SystemInvoker) {
        Ok(results) => results,
        Err(err) => {
            error!("{err}");
            process::exit(err.exit_code());
        }
    };

    if let Some(path) = &config.results_file {
        if let Err(err) = write_results(results.rows(), path) {
            error!(results_file = %path.display(), "{err}");
            process::exit(err.exit_code());
        }
        info!(results_file = %path.display(), "results written");
    }

    results.table().printstd();
    process::exit(results.exit_code());
}
