//! Converting CloneCD image files on disk.
//!
//! Output is written to a `.part` staging file next to the destination and
//! only renamed into place once the conversion is accepted, so a failed or
//! cancelled run never leaves a half-written `.iso` behind.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use ccd2iso_core::{ConversionError, ConversionSummary, USER_DATA_SIZE, convert_with_progress};

use crate::error::ConvertError;

/// Extension given to converted images when no destination is specified.
pub const ISO_EXTENSION: &str = "iso";

/// Suffix appended to the destination file name while output is staged.
const STAGING_SUFFIX: &str = ".part";

/// What to convert and how to treat existing or partial output.
#[derive(Debug, Clone)]
pub struct ConvertRequest {
    /// The CloneCD `.img` file to read.
    pub source: PathBuf,

    /// Where to write the ISO. Defaults to the source with an `.iso` extension.
    pub destination: Option<PathBuf>,

    /// Replace the destination if it already exists.
    pub overwrite: bool,

    /// Keep the first session's data when a session marker stops the conversion.
    pub keep_partial: bool,

    /// Set from another thread (e.g. a Ctrl-C handler) to stop the conversion.
    pub cancel: Option<Arc<AtomicBool>>,
}

impl ConvertRequest {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            destination: None,
            overwrite: false,
            keep_partial: true,
            cancel: None,
        }
    }

    pub fn destination(mut self, path: impl Into<PathBuf>) -> Self {
        self.destination = Some(path.into());
        self
    }

    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn keep_partial(mut self, keep: bool) -> Self {
        self.keep_partial = keep;
        self
    }

    pub fn cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }

    /// The destination path, falling back to [`default_destination`].
    pub fn resolved_destination(&self) -> PathBuf {
        self.destination
            .clone()
            .unwrap_or_else(|| default_destination(&self.source))
    }
}

/// Outcome of a conversion whose output was kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertReport {
    /// Final location of the ISO
    pub destination: PathBuf,
    /// Sectors written to the ISO
    pub sectors: u64,
    /// Bytes written to the ISO
    pub bytes_written: u64,
    /// Sector index of the session marker, if the image was cut short by one
    pub session_marker: Option<u64>,
}

impl ConvertReport {
    /// True when every sector of the image was converted.
    pub fn is_complete(&self) -> bool {
        self.session_marker.is_none()
    }
}

/// Default ISO path for a source image: `game.img` → `game.iso`.
pub fn default_destination(source: &Path) -> PathBuf {
    source.with_extension(ISO_EXTENSION)
}

/// Staging path used while `destination` is being written: `game.iso` → `game.iso.part`.
pub fn staging_path(destination: &Path) -> PathBuf {
    let mut name = destination
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(STAGING_SUFFIX);
    destination.with_file_name(name)
}

/// Convert the image described by `request`.
///
/// The callback receives `(sectors_done, sectors_total)` once per sector.
pub fn convert_image(
    request: &ConvertRequest,
    progress: &dyn Fn(u64, Option<u64>),
) -> Result<ConvertReport, ConvertError> {
    let destination = request.resolved_destination();

    let source = match File::open(&request.source) {
        Ok(f) => f,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(ConvertError::SourceNotFound(request.source.clone()));
        }
        Err(e) => return Err(e.into()),
    };

    if destination.exists() {
        if same_file(&request.source, &destination)? {
            return Err(ConvertError::SameFile(destination));
        }
        if !request.overwrite {
            return Err(ConvertError::DestinationExists(destination));
        }
    }

    let total_bytes = source.metadata()?.len();
    let staging = staging_path(&destination);
    log::debug!(
        "Converting {} ({} bytes) via {}",
        request.source.display(),
        total_bytes,
        staging.display(),
    );

    let source = Cancellable {
        inner: BufReader::new(source),
        cancel: request.cancel.clone(),
    };
    let result = stage(source, &staging, total_bytes, progress);
    if request.is_cancelled() {
        log::debug!("Cancelled; removing {}", staging.display());
        discard(&staging);
        return Err(ConvertError::Cancelled);
    }

    let report = match result {
        Ok(summary) => ConvertReport {
            destination: destination.clone(),
            sectors: summary.sectors,
            bytes_written: summary.bytes_written,
            session_marker: None,
        },
        Err(ConversionError::SessionMarkerEncountered { sector }) if request.keep_partial => {
            log::debug!("Keeping first session ({} sectors)", sector);
            ConvertReport {
                destination: destination.clone(),
                sectors: sector,
                bytes_written: sector * USER_DATA_SIZE as u64,
                session_marker: Some(sector),
            }
        }
        Err(e) => {
            if let Some(sector) = e.sector() {
                log::debug!(
                    "Conversion stopped at sector {}; removing {}",
                    sector,
                    staging.display(),
                );
            }
            discard(&staging);
            return Err(e.into());
        }
    };

    if !request.overwrite && destination.exists() {
        discard(&staging);
        return Err(ConvertError::DestinationExists(destination));
    }
    if let Err(e) = fs::rename(&staging, &destination) {
        discard(&staging);
        return Err(rename_error(e, destination));
    }

    Ok(report)
}

/// Map a failure to move the staged output into place.
fn rename_error(e: io::Error, destination: PathBuf) -> ConvertError {
    if e.kind() == io::ErrorKind::PermissionDenied {
        ConvertError::DestinationLocked(destination)
    } else {
        e.into()
    }
}

/// Reader that fails every read once the cancel flag is raised.
struct Cancellable<R> {
    inner: R,
    cancel: Option<Arc<AtomicBool>>,
}

impl<R: Read> Read for Cancellable<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if let Some(flag) = &self.cancel
            && flag.load(Ordering::SeqCst)
        {
            return Err(io::Error::other("conversion cancelled"));
        }
        self.inner.read(buf)
    }
}

/// Run the sector conversion from `source` into a fresh staging file.
///
/// Buffered output is flushed even when the conversion fails, so a kept
/// partial image holds every sector converted before the failure.
fn stage<R: Read>(
    mut reader: R,
    staging: &Path,
    total_bytes: u64,
    progress: &dyn Fn(u64, Option<u64>),
) -> Result<ConversionSummary, ConversionError> {
    let mut writer = BufWriter::new(File::create(staging)?);

    let result = convert_with_progress(&mut reader, &mut writer, Some(total_bytes), progress);
    writer.flush()?;
    writer.get_ref().sync_all()?;
    result
}

/// Remove a staging file, logging rather than failing if that is not possible.
fn discard(staging: &Path) {
    if let Err(e) = fs::remove_file(staging)
        && e.kind() != io::ErrorKind::NotFound
    {
        log::warn!(
            "Failed to remove partial output {}: {}",
            staging.display(),
            e
        );
    }
}

fn same_file(a: &Path, b: &Path) -> io::Result<bool> {
    Ok(fs::canonicalize(a)? == fs::canonicalize(b)?)
}

#[cfg(test)]
#[path = "tests/image_tests.rs"]
mod tests;
