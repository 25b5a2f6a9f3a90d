use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use ticketdesk::cli::Cli;
use ticketdesk::display::format_validation_errors;
use ticketdesk::error::DeskError;

/// Install the stderr log subscriber. `RUST_LOG` selects the level unless
/// `--verbose` forces debug.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command.run(cli.api_base.as_deref()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(DeskError::InvalidInput(errors)) => {
            eprintln!("{}", format_validation_errors(&errors));
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("Error: {e}");
            if let DeskError::Action {
                source: Some(cause),
                ..
            } = &e
            {
                eprintln!("  caused by: {cause}");
            }
            ExitCode::FAILURE
        }
    }
}
