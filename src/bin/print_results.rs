use codec_bench_harness::benchmark_utils::{print_results, read_results};
use std::env;
use std::path::Path;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Error: Missing results file argument. Usage is: {} <results.json>", args[0]);
        std::process::exit(1);
    }

    let path = Path::new(&args[1]);
    if !path.is_file() {
        eprintln!("Error: {} is not a valid file.", path.display());
        std::process::exit(1);
    }

    match read_results(path) {
        Ok(rows) => {
            print_results(&rows);
            let failed = rows.iter().filter(|r| !r.correct).count();
            println!("{} tests, {} failed", rows.len(), failed);
        }
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(err.exit_code());
        }
    }
}
