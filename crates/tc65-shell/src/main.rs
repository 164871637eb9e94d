use std::process::ExitCode;

use clap::Parser;
use tc65_shell::{format_error, init_logging, run, Args};

fn main() -> ExitCode {
    let args = Args::parse();
    if let Err(e) = init_logging(args.verbosity()) {
        eprintln!("{}", e);
    }
    tracing::info!("tc65sh v{}", env!("CARGO_PKG_VERSION"));

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", format_error("tc65sh", &e));
            ExitCode::FAILURE
        }
    }
}
