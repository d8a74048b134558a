use std::process::ExitCode;

use clap::Parser;
use repack_core::config::RunConfig;
use repack_core::pipeline::run;
use repack_core::types::RepackError;

mod args;
mod logging;

use args::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.version {
        println!("Version: v{}", env!("CARGO_PKG_VERSION"));
        return ExitCode::SUCCESS;
    }

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("warning: {e:#}");
    }

    match execute(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(kind = err.kind().as_str(), "run failed");
            println!("{err}");
            ExitCode::from(err.exit_code())
        }
    }
}

fn execute(cli: &Cli) -> Result<(), RepackError> {
    let config = RunConfig::from_invocation(&cli.sources, &cli.run_options())?;
    let summary = run(&config)?;
    tracing::debug!(destination = %summary.destination.display(), "done");
    Ok(())
}
