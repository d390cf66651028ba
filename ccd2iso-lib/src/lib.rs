//! File-level conversion of CloneCD images.
//!
//! Wraps the sector converter from `ccd2iso-core` with everything needed to
//! run it against files on disk: destination resolution, overwrite checks,
//! staged output and persisted settings.

pub mod error;
pub mod image;
pub mod settings;

pub use ccd2iso_core::{
    ConversionError, ConversionSummary, RAW_SECTOR_SIZE, USER_DATA_SIZE, expected_sector_count,
    util,
};
pub use error::ConvertError;
pub use image::{ConvertReport, ConvertRequest, convert_image, default_destination, staging_path};
pub use settings::{ConvertSettings, Settings, settings_path};
