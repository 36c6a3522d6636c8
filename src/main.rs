use anyhow::{Context, Result};
use clap::Parser;
use tracing::error;

use ipclassify::{utils, Args};

fn run(args: &Args) -> Result<()> {
    utils::validate_args(args)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(args.worker_threads())
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    runtime.block_on(ipclassify::run(args))
}

fn main() {
    let args = Args::parse();
    utils::setup_logging(args.verbose);

    if let Err(e) = run(&args) {
        error!(action = "exit", component = "main", error = %format!("{:#}", e), "Classification failed");
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
