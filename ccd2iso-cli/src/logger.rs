//! Log output for the CLI.
//!
//! Info-level messages go to stdout and warnings/errors to stderr. With
//! `--verbose` every line gets a timestamp and debug messages are shown.
//! With `--logfile` each line is also appended to a file with ANSI colors
//! stripped.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use log::{Level, LevelFilter, Log, Metadata, Record};
use owo_colors::OwoColorize;
use owo_colors::Stream::{Stderr, Stdout};

use crate::CliError;

pub(crate) struct CliLogger {
    level: LevelFilter,
    timestamps: bool,
    logfile: Option<Mutex<File>>,
}

impl CliLogger {
    pub(crate) fn new(quiet: bool, verbose: bool, logfile: Option<File>) -> Self {
        Self {
            level: level_filter(quiet, verbose),
            timestamps: verbose,
            logfile: logfile.map(Mutex::new),
        }
    }

    fn format(&self, record: &Record) -> String {
        let stream = match record.level() {
            Level::Error | Level::Warn => Stderr,
            _ => Stdout,
        };
        let mut line = String::new();
        if self.timestamps {
            let now = chrono::Local::now().format("%H:%M:%S%.3f").to_string();
            line.push_str(&format!("{} ", now.if_supports_color(stream, |t| t.dimmed())));
        }
        match record.level() {
            Level::Error => line.push_str(&format!(
                "{} ",
                "error:".if_supports_color(stream, |t| t.red())
            )),
            Level::Warn => line.push_str(&format!(
                "{} ",
                "warning:".if_supports_color(stream, |t| t.yellow())
            )),
            Level::Debug | Level::Trace => line.push_str(&format!(
                "{} ",
                format!("[{}]", record.target()).if_supports_color(stream, |t| t.dimmed())
            )),
            Level::Info => {}
        }
        line.push_str(&record.args().to_string());
        line
    }
}

impl Log for CliLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = self.format(record);
        match record.level() {
            Level::Error | Level::Warn => eprintln!("{line}"),
            _ => println!("{line}"),
        }
        if let Some(file) = &self.logfile
            && let Ok(mut f) = file.lock()
        {
            let _ = writeln!(f, "{}", strip_ansi_escapes::strip_str(&line));
        }
    }

    fn flush(&self) {
        let _ = std::io::stdout().flush();
        if let Some(file) = &self.logfile
            && let Ok(mut f) = file.lock()
        {
            let _ = f.flush();
        }
    }
}

fn level_filter(quiet: bool, verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else if quiet {
        LevelFilter::Warn
    } else {
        LevelFilter::Info
    }
}

/// Install the CLI logger as the global `log` backend.
pub(crate) fn init(quiet: bool, verbose: bool, logfile: Option<&Path>) -> Result<(), CliError> {
    let file = match logfile {
        Some(path) => Some(
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| {
                    CliError::logging(format!("cannot open {}: {}", path.display(), e))
                })?,
        ),
        None => None,
    };
    let logger = CliLogger::new(quiet, verbose, file);
    let level = logger.level;
    log::set_boxed_logger(Box::new(logger)).map_err(|e| CliError::logging(e.to_string()))?;
    log::set_max_level(level);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn test_level_filter() {
        assert_eq!(level_filter(false, false), LevelFilter::Info);
        assert_eq!(level_filter(true, false), LevelFilter::Warn);
        assert_eq!(level_filter(false, true), LevelFilter::Debug);
        assert_eq!(level_filter(true, true), LevelFilter::Debug);
    }

    #[test]
    fn test_quiet_logger_drops_info() {
        let logger = CliLogger::new(true, false, None);
        let info = Metadata::builder().level(Level::Info).build();
        let warn = Metadata::builder().level(Level::Warn).build();
        assert!(!logger.enabled(&info));
        assert!(logger.enabled(&warn));
    }

    #[test]
    fn test_logfile_is_plain_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ccd2iso.log");
        let file = File::create(&path).unwrap();
        let logger = CliLogger::new(false, false, Some(file));

        logger.log(
            &Record::builder()
                .level(Level::Warn)
                .args(format_args!("sector {} looks odd", 3))
                .build(),
        );
        logger.flush();

        let mut contents = String::new();
        File::open(&path)
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();
        assert_eq!(contents, "warning: sector 3 looks odd\n");
    }
}
