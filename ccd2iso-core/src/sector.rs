//! CloneCD raw sector layout.
//!
//! A CloneCD `.img` is a plain dump of 2352-byte CD sectors. Each sector starts
//! with a 12-byte sync pattern and a 4-byte header (MSF address + mode byte),
//! followed by a 2336-byte content region whose layout depends on the mode.
//! Only the 2048 bytes of user data are ever extracted; the offsets of that
//! region are kept in a flat table keyed by mode.

use std::fmt;
use std::ops::Range;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Size of the sync pattern at the start of every raw sector.
pub const SYNC_SIZE: usize = 12;

/// Size of the sector header (minute, second, fraction, mode).
pub const HEADER_SIZE: usize = 4;

/// Size of the content region following sync and header.
pub const CONTENT_SIZE: usize = 2336;

/// Total size of a raw sector record.
pub const RAW_SECTOR_SIZE: usize = SYNC_SIZE + HEADER_SIZE + CONTENT_SIZE;

/// Size of the user data payload (one ISO 9660 logical sector).
pub const USER_DATA_SIZE: usize = 2048;

/// Size of the Mode 2 sub-header preceding the user data.
pub const MODE2_SUBHEADER_SIZE: usize = 8;

/// Offset of the mode byte within a raw sector.
pub const MODE_OFFSET: usize = SYNC_SIZE + HEADER_SIZE - 1;

/// Mode byte CloneCD writes where a new session begins.
pub const SESSION_MARKER: u8 = 0xE2;

/// Sync pattern written at the start of every data sector.
pub const SYNC_PATTERN: [u8; SYNC_SIZE] = [
    0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x00,
];

/// Frames per second of CD audio time, used by MSF addressing.
const FRAMES_PER_SECOND: u32 = 75;

/// MSF address of LBA 0 (the two-second pregap).
const LBA_OFFSET: u32 = 2 * FRAMES_PER_SECOND;

// ---------------------------------------------------------------------------
// Sector mode
// ---------------------------------------------------------------------------

/// Classification of a raw sector by its mode byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectorMode {
    /// Mode 1: 2048 data + 4 EDC + 8 reserved + 276 ECC.
    Mode1,
    /// Mode 2 Form 1: 8 sub-header + 2048 data + 4 EDC + 276 ECC.
    Mode2Form1,
    /// Session boundary of a multisession image.
    SessionMarker,
    /// Any other mode byte.
    Unknown(u8),
}

impl SectorMode {
    /// Classify a mode byte.
    pub fn from_byte(mode: u8) -> Self {
        match mode {
            1 => Self::Mode1,
            2 => Self::Mode2Form1,
            SESSION_MARKER => Self::SessionMarker,
            other => Self::Unknown(other),
        }
    }

    /// The raw mode byte for this classification.
    pub fn byte(&self) -> u8 {
        match self {
            Self::Mode1 => 1,
            Self::Mode2Form1 => 2,
            Self::SessionMarker => SESSION_MARKER,
            Self::Unknown(b) => *b,
        }
    }

    /// Byte range of the user data within a raw sector record.
    ///
    /// Returns `None` for modes that carry no extractable payload.
    pub fn data_range(&self) -> Option<Range<usize>> {
        let start = match self {
            Self::Mode1 => SYNC_SIZE + HEADER_SIZE,
            Self::Mode2Form1 => SYNC_SIZE + HEADER_SIZE + MODE2_SUBHEADER_SIZE,
            Self::SessionMarker | Self::Unknown(_) => return None,
        };
        Some(start..start + USER_DATA_SIZE)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Mode1 => "Mode 1",
            Self::Mode2Form1 => "Mode 2 Form 1",
            Self::SessionMarker => "Session marker",
            Self::Unknown(_) => "Unknown",
        }
    }
}

impl fmt::Display for SectorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown(b) => write!(f, "Unknown (0x{:02x})", b),
            other => f.write_str(other.name()),
        }
    }
}

// ---------------------------------------------------------------------------
// Header
// ---------------------------------------------------------------------------

/// Minute/second/frame address stored BCD-encoded in the sector header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Msf {
    pub minute: u8,
    pub second: u8,
    pub frame: u8,
}

impl Msf {
    /// Decode the three BCD address bytes of a header.
    pub fn from_bcd(bytes: [u8; 3]) -> Self {
        Self {
            minute: bcd_to_binary(bytes[0]),
            second: bcd_to_binary(bytes[1]),
            frame: bcd_to_binary(bytes[2]),
        }
    }

    /// Logical block address, or `None` if the address lies inside the pregap.
    pub fn to_lba(&self) -> Option<u32> {
        let absolute = (self.minute as u32 * 60 + self.second as u32) * FRAMES_PER_SECOND
            + self.frame as u32;
        absolute.checked_sub(LBA_OFFSET)
    }
}

impl fmt::Display for Msf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.minute, self.second, self.frame)
    }
}

fn bcd_to_binary(b: u8) -> u8 {
    (b >> 4) * 10 + (b & 0x0F)
}

/// The 16 bytes preceding the content region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectorHeader {
    pub address: Msf,
    pub mode: SectorMode,
    /// Whether the leading 12 bytes match the standard sync pattern.
    pub has_sync: bool,
}

impl fmt::Display for SectorHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MSF {}", self.address)?;
        match self.address.to_lba() {
            Some(lba) => write!(f, ", LBA {}", lba)?,
            None => f.write_str(", in pregap")?,
        }
        if !self.has_sync {
            f.write_str(", no sync pattern")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Sector view
// ---------------------------------------------------------------------------

/// Borrowed view over one complete raw sector record.
#[derive(Debug, Clone, Copy)]
pub struct Sector<'a> {
    raw: &'a [u8; RAW_SECTOR_SIZE],
}

impl<'a> Sector<'a> {
    pub fn new(raw: &'a [u8; RAW_SECTOR_SIZE]) -> Self {
        Self { raw }
    }

    pub fn mode(&self) -> SectorMode {
        SectorMode::from_byte(self.raw[MODE_OFFSET])
    }

    pub fn header(&self) -> SectorHeader {
        SectorHeader {
            address: Msf::from_bcd([
                self.raw[SYNC_SIZE],
                self.raw[SYNC_SIZE + 1],
                self.raw[SYNC_SIZE + 2],
            ]),
            mode: self.mode(),
            has_sync: self.raw[..SYNC_SIZE] == SYNC_PATTERN,
        }
    }

    /// The 2048-byte user data payload, if the mode carries one.
    pub fn user_data(&self) -> Option<&'a [u8]> {
        let raw: &'a [u8] = self.raw;
        self.mode().data_range().map(|range| &raw[range])
    }
}

#[cfg(test)]
#[path = "tests/sector_tests.rs"]
mod tests;
