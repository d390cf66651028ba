//! ccd2iso CLI
//!
//! Converts CloneCD `.img` raw disc images to ISO 9660 `.iso` files.

mod cli_types;
mod commands;
mod error;
mod logger;
mod progress;

use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::{CommandFactory, Parser};

pub(crate) use error::CliError;

use cli_types::Cli;

fn main() -> ExitCode {
    // No arguments: show the full help instead of a one-line usage error
    if std::env::args_os().len() <= 1 {
        let _ = Cli::command().print_help();
        println!();
        return ExitCode::SUCCESS;
    }

    let cli = Cli::parse();

    if let Err(e) = logger::init(cli.quiet, cli.verbose, cli.logfile.as_deref()) {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }

    if cli.settings_path {
        println!("{}", ccd2iso_lib::settings_path().display());
        return ExitCode::SUCCESS;
    }

    if cli.save_defaults {
        return match commands::defaults::run_save_defaults(&cli) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                log::error!("{e}");
                ExitCode::FAILURE
            }
        };
    }

    match commands::convert::run_convert(&cli, install_cancel_handler()) {
        Ok(outcome) => outcome.exit_code(),
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// Raise a shared flag on Ctrl-C. A second Ctrl-C exits immediately.
fn install_cancel_handler() -> Arc<AtomicBool> {
    let cancel = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&cancel);
    if let Err(e) = ctrlc::set_handler(move || {
        if flag.swap(true, Ordering::SeqCst) {
            std::process::exit(130);
        }
    }) {
        log::warn!("Could not install Ctrl-C handler: {e}");
    }
    cancel
}
