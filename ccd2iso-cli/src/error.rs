use ccd2iso_lib::ConvertError;
use thiserror::Error;

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// Conversion failed
    #[error("{0}")]
    Convert(#[from] ConvertError),

    /// Settings could not be written
    #[error("Couldn't save settings: {0}")]
    Settings(#[from] std::io::Error),

    /// Logger setup failed
    #[error("Logging error: {0}")]
    Logging(String),
}

impl CliError {
    pub(crate) fn logging(msg: impl Into<String>) -> Self {
        Self::Logging(msg.into())
    }
}
