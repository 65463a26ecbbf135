use wdl_core::logging;

mod cli;

use crate::cli::CliCommand;

#[tokio::main]
async fn main() {
    // Fall back to stderr when the state directory is not writable.
    if logging::init_logging().is_err() {
        logging::init_logging_stderr();
    }

    if let Err(err) = CliCommand::run_from_args().await {
        eprintln!("wdl error: {:#}", err);
        std::process::exit(1);
    }
}
