//! Sector stream conversion: raw CloneCD sectors in, ISO 9660 user data out.

use std::io::{self, Read, Write};

use crate::error::ConversionError;
use crate::sector::{RAW_SECTOR_SIZE, Sector, SectorMode};

/// Totals for a conversion that ran to a clean end-of-stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversionSummary {
    /// Sectors read and converted
    pub sectors: u64,
    /// Payload bytes written to the sink
    pub bytes_written: u64,
}

/// Number of whole sectors in an image of `total_bytes`.
pub fn expected_sector_count(total_bytes: u64) -> u64 {
    total_bytes / RAW_SECTOR_SIZE as u64
}

/// Convert every sector from `source` into `sink`.
///
/// See [`convert_with_progress`] for the full contract.
pub fn convert<R, W>(source: &mut R, sink: &mut W) -> Result<ConversionSummary, ConversionError>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    convert_with_progress(source, sink, None, &|_, _| {})
}

/// Convert every sector from `source` into `sink`, reporting progress.
///
/// `total_size_hint` is the byte length of `source` when known; it is only used
/// to compute the expected sector count handed to `progress`. The callback
/// receives `(sectors_done, sectors_total)` once per converted sector, starting
/// at 1, and is never called for a sector that fails.
///
/// The sink is flushed on a clean end-of-stream. On error, nothing is written
/// for the failing sector and output from earlier sectors stays in the sink.
pub fn convert_with_progress<R, W>(
    source: &mut R,
    sink: &mut W,
    total_size_hint: Option<u64>,
    progress: &dyn Fn(u64, Option<u64>),
) -> Result<ConversionSummary, ConversionError>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let total = total_size_hint.map(expected_sector_count);
    let mut summary = ConversionSummary::default();
    let mut buf = [0u8; RAW_SECTOR_SIZE];

    loop {
        let sector_index = summary.sectors;
        let n = read_record(source, &mut buf)?;
        if n == 0 {
            break;
        }
        if n < RAW_SECTOR_SIZE {
            return Err(ConversionError::IncompleteSector {
                sector: sector_index,
                received: n,
                expected: RAW_SECTOR_SIZE,
            });
        }

        let sector = Sector::new(&buf);
        let data = match (sector.mode(), sector.user_data()) {
            (SectorMode::Mode1 | SectorMode::Mode2Form1, Some(data)) => data,
            (SectorMode::SessionMarker, _) => {
                log::debug!(
                    "Session marker at sector {} ({})",
                    sector_index,
                    sector.header(),
                );
                return Err(ConversionError::SessionMarkerEncountered {
                    sector: sector_index,
                });
            }
            (other, _) => {
                log::debug!(
                    "Unrecognized mode 0x{:02x} at sector {} ({})",
                    other.byte(),
                    sector_index,
                    sector.header(),
                );
                return Err(ConversionError::UnrecognizedSectorMode {
                    sector: sector_index,
                    mode: other.byte(),
                });
            }
        };

        sink.write_all(data)?;

        summary.sectors += 1;
        summary.bytes_written += data.len() as u64;
        progress(summary.sectors, total);
    }

    sink.flush()?;
    log::debug!(
        "Converted {} sectors ({} bytes)",
        summary.sectors,
        summary.bytes_written,
    );
    Ok(summary)
}

/// Fill `buf` from `source`, stopping early only at end-of-stream.
///
/// Returns the number of bytes read; anything short of `buf.len()` means the
/// stream ended.
fn read_record<R: Read + ?Sized>(source: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match source.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

#[cfg(test)]
#[path = "tests/convert_tests.rs"]
mod tests;
