//! CLI entry point for the flasher tool.

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use flasher_core::run_pipeline;
use tracing::{debug, error, info, warn};

mod cli;

use cli::Args;

/// Process outcome mapped to the exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProcessExit {
    Success,
    Failure,
}

impl From<ProcessExit> for ExitCode {
    fn from(exit: ProcessExit) -> Self {
        match exit {
            ProcessExit::Success => ExitCode::SUCCESS,
            ProcessExit::Failure => ExitCode::FAILURE,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(args.default_log_level()));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    debug!(?args, "CLI arguments parsed");

    let exit = match run(&args).await {
        Ok(()) => ProcessExit::Success,
        Err(err) => {
            error!("{err}");
            ProcessExit::Failure
        }
    };
    exit.into()
}

async fn run(args: &Args) -> Result<()> {
    let request = args.flash_request()?;
    if !request.credentials.is_empty() && request.credentials.basic_auth().is_none() {
        warn!("credentials have an empty username or password; sending request without authentication");
    }

    let config = args.pipeline_config();
    info!(serial = %request.serial, "Flasher starting");

    let report = run_pipeline(&request, &config).await?;

    info!(
        serial = %report.serial,
        format = %report.format,
        script = %report.script_path.display(),
        "Flash complete"
    );
    Ok(())
}
