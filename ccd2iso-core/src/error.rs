use thiserror::Error;

/// Errors that terminate a sector stream conversion.
///
/// Every variant except [`Io`](ConversionError::Io) carries the zero-based
/// index of the offending sector. Output written before the failure is left
/// in the sink; deciding what to do with it is up to the caller.
#[derive(Debug, Error)]
pub enum ConversionError {
    /// The stream ended partway through a sector record
    #[error(
        "Incomplete sector {sector}: sector size must be {expected} bytes, but only {received} were read"
    )]
    IncompleteSector {
        sector: u64,
        received: usize,
        expected: usize,
    },

    /// A session boundary was reached; only the first session was converted
    #[error("Found session marker at sector {sector}: only the first session was converted")]
    SessionMarkerEncountered { sector: u64 },

    /// The mode byte matches no supported sector layout
    #[error("Unrecognized sector mode (0x{mode:02x}) at sector {sector}")]
    UnrecognizedSectorMode { sector: u64, mode: u8 },

    /// Reading the source or writing the sink failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConversionError {
    /// Index of the sector that caused the failure, if the failure is tied to one.
    pub fn sector(&self) -> Option<u64> {
        match self {
            Self::IncompleteSector { sector, .. }
            | Self::SessionMarkerEncountered { sector }
            | Self::UnrecognizedSectorMode { sector, .. } => Some(*sector),
            Self::Io(_) => None,
        }
    }

    /// True when the output holds a complete first session of a multisession image.
    pub fn is_session_marker(&self) -> bool {
        matches!(self, Self::SessionMarkerEncountered { .. })
    }
}
