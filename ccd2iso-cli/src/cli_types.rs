//! CLI type definitions: arguments and flags.

use std::path::PathBuf;

use clap::{ArgAction, Parser};

#[derive(Parser)]
#[command(name = "ccd2iso", version)]
#[command(about = "Convert CloneCD .img files to ISO 9660 .iso files", long_about = None)]
#[command(disable_help_flag = true, disable_version_flag = true)]
pub(crate) struct Cli {
    /// .img file to convert
    #[arg(required_unless_present_any = ["settings_path", "save_defaults"])]
    pub img: Option<PathBuf>,

    /// Filepath for the output .iso file (defaults to IMG with an .iso extension)
    pub iso: Option<PathBuf>,

    /// Overwrite the .iso file if it already exists
    #[arg(short, long)]
    pub force: bool,

    /// Keep the first session when the image contains a session marker
    #[arg(long, overrides_with = "discard_partial")]
    pub keep_partial: bool,

    /// Delete the output when the image contains a session marker
    #[arg(long, overrides_with = "keep_partial")]
    pub discard_partial: bool,

    /// Do not display a progress bar
    #[arg(long)]
    pub no_progress: bool,

    /// Only show warnings and errors (suppress normal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(long)]
    pub verbose: bool,

    /// Write log output to a file (ANSI codes stripped)
    #[arg(long)]
    pub logfile: Option<PathBuf>,

    /// Print the settings file path and exit
    #[arg(long)]
    pub settings_path: bool,

    /// Store the --force, --keep-partial/--discard-partial and --no-progress choices as defaults and exit
    #[arg(long)]
    pub save_defaults: bool,

    /// Show this help message and exit
    #[arg(short = 'h', long, visible_short_alias = '?', action = ArgAction::Help)]
    #[allow(dead_code)]
    help: Option<bool>,

    /// Show the version and exit
    #[arg(short = 'v', long, action = ArgAction::Version)]
    #[allow(dead_code)]
    version: Option<bool>,
}

impl Cli {
    /// The session-marker policy requested on the command line, if any.
    pub fn partial_override(&self) -> Option<bool> {
        if self.keep_partial {
            Some(true)
        } else if self.discard_partial {
            Some(false)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_positional_paths() {
        let cli = Cli::try_parse_from(["ccd2iso", "disc.img", "out.iso"]).unwrap();
        assert_eq!(cli.img, Some(PathBuf::from("disc.img")));
        assert_eq!(cli.iso, Some(PathBuf::from("out.iso")));
        assert!(!cli.force);
        assert_eq!(cli.partial_override(), None);
    }

    #[test]
    fn test_force_short_flag() {
        let cli = Cli::try_parse_from(["ccd2iso", "-f", "disc.img"]).unwrap();
        assert!(cli.force);
        assert_eq!(cli.iso, None);
    }

    #[test]
    fn test_partial_flags_last_one_wins() {
        let cli =
            Cli::try_parse_from(["ccd2iso", "--keep-partial", "--discard-partial", "a.img"])
                .unwrap();
        assert_eq!(cli.partial_override(), Some(false));
        let cli =
            Cli::try_parse_from(["ccd2iso", "--discard-partial", "--keep-partial", "a.img"])
                .unwrap();
        assert_eq!(cli.partial_override(), Some(true));
    }

    #[test]
    fn test_img_required() {
        assert!(Cli::try_parse_from(["ccd2iso", "--force"]).is_err());
    }

    #[test]
    fn test_settings_path_without_img() {
        let cli = Cli::try_parse_from(["ccd2iso", "--settings-path"]).unwrap();
        assert!(cli.settings_path);
        assert_eq!(cli.img, None);
    }

    #[test]
    fn test_save_defaults_without_img() {
        let cli = Cli::try_parse_from(["ccd2iso", "--save-defaults", "--discard-partial"]).unwrap();
        assert!(cli.save_defaults);
        assert_eq!(cli.img, None);
    }

    #[test]
    fn test_question_mark_shows_help() {
        let err = Cli::try_parse_from(["ccd2iso", "-?"]).err().unwrap();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_lowercase_v_shows_version() {
        let err = Cli::try_parse_from(["ccd2iso", "-v"]).err().unwrap();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }
}
