//! `--save-defaults`: persist the current flags to the settings file.

use ccd2iso_lib::Settings;
use ccd2iso_lib::settings::{resolve_flag, settings_path};

use crate::CliError;
use crate::cli_types::Cli;

/// Layer the command-line flags over `settings`.
///
/// Flags that were not given leave the stored value alone, except for the
/// plain switches `--force` and `--no-progress`, which are saved as given.
pub(crate) fn apply_flags(cli: &Cli, mut settings: Settings) -> Settings {
    settings.convert.overwrite = cli.force;
    settings.convert.keep_partial =
        resolve_flag(cli.partial_override(), settings.convert.keep_partial);
    settings.convert.progress = !cli.no_progress;
    settings
}

pub(crate) fn run_save_defaults(cli: &Cli) -> Result<(), CliError> {
    let settings = apply_flags(cli, Settings::load());
    settings.save()?;
    log::info!("Saved defaults to {}", settings_path().display());
    Ok(())
}
