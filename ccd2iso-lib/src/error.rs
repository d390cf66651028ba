use std::path::PathBuf;

use ccd2iso_core::ConversionError;
use thiserror::Error;

/// Errors that can occur while converting an image file on disk.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The source image does not exist
    #[error("Couldn't find the file {}", .0.display())]
    SourceNotFound(PathBuf),

    /// The destination exists and overwriting was not requested
    #[error("{} already exists, pass --force if you want to overwrite it.", .0.display())]
    DestinationExists(PathBuf),

    /// Source and destination resolve to the same path
    #[error("Refusing to write output over the source image {}", .0.display())]
    SameFile(PathBuf),

    /// The destination could not be replaced (mounted, read-only, in use)
    #[error(
        "Couldn't overwrite {}. The .iso file might be mounted or marked read-only.",
        .0.display()
    )]
    DestinationLocked(PathBuf),

    /// The conversion was cancelled before it finished
    #[error("Cancelled.")]
    Cancelled,

    /// The sector stream could not be converted
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    /// I/O error outside the sector loop (opening, renaming, metadata)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConvertError {
    /// True when the image held more than one session and only the first was converted.
    pub fn is_session_marker(&self) -> bool {
        matches!(self, Self::Conversion(e) if e.is_session_marker())
    }
}
