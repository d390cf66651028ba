//! CloneCD raw image to ISO 9660 sector conversion.
//!
//! The crate walks a stream of 2352-byte CloneCD sectors, classifies each one
//! by its mode byte and forwards the 2048-byte user data payload to a sink.
//! It never opens or closes files itself; see `ccd2iso-lib` for that.

pub mod convert;
pub mod error;
pub mod sector;
pub mod util;

pub use convert::{ConversionSummary, convert, convert_with_progress, expected_sector_count};
pub use error::ConversionError;
pub use sector::{
    Msf, RAW_SECTOR_SIZE, SESSION_MARKER, Sector, SectorHeader, SectorMode, USER_DATA_SIZE,
};
