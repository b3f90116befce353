// cutonly-cli/src/main.rs
//
// Entry point for the CutOnly command-line tool.
//
// Responsibilities:
// - Parsing user-provided arguments (definitions live in `cli.rs`).
// - Setting up console or file logging.
// - Installing the Ctrl-C handler that stops the decoder.
// - Dispatching to the subcommand and mapping failures to exit codes.

use clap::Parser;
use cutonly_cli::cli::{Cli, Commands};
use cutonly_cli::commands::{detect, probe};
use cutonly_cli::logging::init_logging;
use cutonly_cli::output;
use cutonly_core::{CoreError, InterruptHandle};
use log::{info, warn};
use std::process;

fn main() {
    let cli = Cli::parse();

    let log_dir = match &cli.command {
        Commands::Detect(args) => args.log_dir.clone(),
        Commands::Probe(_) => None,
    };
    match init_logging(cli.verbose, log_dir.as_deref()) {
        Ok(Some(log_path)) => output::print_info("Log file", log_path.display()),
        Ok(None) => {}
        Err(e) => {
            output::print_error(&e.to_string());
            process::exit(1);
        }
    }

    let interrupt = InterruptHandle::new();
    let handler_flag = interrupt.clone();
    if let Err(e) = ctrlc::set_handler(move || handler_flag.interrupt()) {
        warn!("Could not install Ctrl-C handler: {e}");
    }

    let outcome = match cli.command {
        Commands::Detect(args) => detect::run_detect(args, interrupt).map(|_| ()),
        Commands::Probe(args) => probe::run_probe(args).map(|_| ()),
    };

    match outcome {
        Ok(()) => info!("Done"),
        Err(CoreError::Interrupted) => {
            output::print_error("Interrupted, no cuts were written");
            process::exit(1);
        }
        Err(e) => {
            output::print_error(&e.to_string());
            process::exit(1);
        }
    }
}
