use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use ccd2iso_lib::settings::resolve_flag;
use ccd2iso_lib::util::format_bytes;
use ccd2iso_lib::{ConversionError, ConvertError, ConvertReport, ConvertRequest, Settings};

use crate::CliError;
use crate::cli_types::Cli;
use crate::progress::SectorProgress;

/// Exit status used when only the first session of a multisession image was written.
const EXIT_FIRST_SESSION_ONLY: u8 = 255;

/// How a conversion ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outcome {
    /// Every sector was converted
    Complete,
    /// A session marker stopped the conversion and the first session was kept
    FirstSessionOnly,
    /// A session marker stopped the conversion and the output was discarded
    Discarded,
    /// Ctrl-C stopped the conversion and the output was discarded
    Cancelled,
}

impl Outcome {
    pub(crate) fn status(self) -> u8 {
        match self {
            Outcome::Complete => 0,
            Outcome::FirstSessionOnly => EXIT_FIRST_SESSION_ONLY,
            Outcome::Discarded | Outcome::Cancelled => 1,
        }
    }

    pub(crate) fn exit_code(self) -> ExitCode {
        ExitCode::from(self.status())
    }
}

/// Build the conversion request from CLI flags layered over stored settings.
pub(crate) fn build_request(cli: &Cli, settings: &Settings) -> Option<ConvertRequest> {
    let mut request = ConvertRequest::new(cli.img.clone()?)
        .overwrite(cli.force || settings.convert.overwrite)
        .keep_partial(resolve_flag(
            cli.partial_override(),
            settings.convert.keep_partial,
        ));
    if let Some(iso) = &cli.iso {
        request = request.destination(iso);
    }
    Some(request)
}

/// Run the convert command.
pub(crate) fn run_convert(cli: &Cli, cancel: Arc<AtomicBool>) -> Result<Outcome, CliError> {
    let settings = Settings::load();
    let Some(request) = build_request(cli, &settings) else {
        return Ok(Outcome::Complete);
    };
    let request = request.cancel_flag(cancel);

    log::debug!(
        "Converting {} -> {} (overwrite: {}, keep partial: {})",
        request.source.display(),
        request.resolved_destination().display(),
        request.overwrite,
        request.keep_partial,
    );

    let show_progress = !cli.no_progress && !cli.quiet && settings.convert.progress;
    convert_and_report(&request, show_progress)
}

/// Convert with an optional progress bar, then report how it ended.
pub(crate) fn convert_and_report(
    request: &ConvertRequest,
    show_progress: bool,
) -> Result<Outcome, CliError> {
    let progress = SectorProgress::new(!show_progress);
    let result = ccd2iso_lib::convert_image(request, &|done, total| {
        progress.update(done, total)
    });
    progress.finish();
    outcome_for(result)
}

/// Log the result of a conversion and decide the outcome.
///
/// Errors other than a session marker or cancellation are handed back to
/// the caller unchanged.
pub(crate) fn outcome_for(
    result: Result<ConvertReport, ConvertError>,
) -> Result<Outcome, CliError> {
    match result {
        Ok(report) if report.is_complete() => {
            print_report(&report);
            log::info!("Done.");
            Ok(Outcome::Complete)
        }
        Ok(report) => {
            warn_session_marker(report.session_marker);
            print_report(&report);
            Ok(Outcome::FirstSessionOnly)
        }
        Err(ConvertError::Cancelled) => {
            log::info!("Cancelled.");
            Ok(Outcome::Cancelled)
        }
        Err(ConvertError::Conversion(ConversionError::SessionMarkerEncountered { sector })) => {
            warn_session_marker(Some(sector));
            log::warn!(
                "Partial output discarded (pass --keep-partial to keep the first session)."
            );
            Ok(Outcome::Discarded)
        }
        Err(e) => Err(e.into()),
    }
}

fn warn_session_marker(sector: Option<u64>) {
    log::warn!("Found session marker, the image might contain multisession data.");
    log::warn!("Only the first session dumped.");
    if let Some(sector) = sector {
        log::debug!("Session marker at sector {}", sector);
    }
}

fn print_report(report: &ConvertReport) {
    log::info!(
        "{} Wrote {} sectors ({}) to {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        report.sectors,
        format_bytes(report.bytes_written),
        report
            .destination
            .display()
            .if_supports_color(Stdout, |t| t.cyan()),
    );
}
