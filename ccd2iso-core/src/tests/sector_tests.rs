use super::*;

fn raw_sector(mode: u8, fill: u8) -> [u8; RAW_SECTOR_SIZE] {
    let mut raw = [fill; RAW_SECTOR_SIZE];
    raw[..SYNC_SIZE].copy_from_slice(&SYNC_PATTERN);
    // 00:02:00 is LBA 0
    raw[SYNC_SIZE..SYNC_SIZE + 3].copy_from_slice(&[0x00, 0x02, 0x00]);
    raw[MODE_OFFSET] = mode;
    raw
}

#[test]
fn layout_constants_add_up() {
    assert_eq!(RAW_SECTOR_SIZE, 2352);
    assert_eq!(MODE_OFFSET, 15);
    assert_eq!(2048 + 4 + 8 + 276, CONTENT_SIZE);
    assert_eq!(MODE2_SUBHEADER_SIZE + 2048 + 4 + 276, CONTENT_SIZE);
}

#[test]
fn mode_from_byte_classifies_known_modes() {
    assert_eq!(SectorMode::from_byte(1), SectorMode::Mode1);
    assert_eq!(SectorMode::from_byte(2), SectorMode::Mode2Form1);
    assert_eq!(SectorMode::from_byte(0xE2), SectorMode::SessionMarker);
    assert_eq!(SectorMode::from_byte(0), SectorMode::Unknown(0));
    assert_eq!(SectorMode::from_byte(3), SectorMode::Unknown(3));
}

#[test]
fn mode_byte_roundtrips_for_every_value() {
    for b in 0..=u8::MAX {
        assert_eq!(SectorMode::from_byte(b).byte(), b);
    }
}

#[test]
fn data_range_per_mode() {
    assert_eq!(SectorMode::Mode1.data_range(), Some(16..2064));
    assert_eq!(SectorMode::Mode2Form1.data_range(), Some(24..2072));
    assert_eq!(SectorMode::SessionMarker.data_range(), None);
    assert_eq!(SectorMode::Unknown(7).data_range(), None);
}

#[test]
fn mode_display() {
    assert_eq!(SectorMode::Mode1.to_string(), "Mode 1");
    assert_eq!(SectorMode::Unknown(0x0a).to_string(), "Unknown (0x0a)");
}

#[test]
fn msf_decodes_bcd() {
    let msf = Msf::from_bcd([0x12, 0x34, 0x56]);
    assert_eq!(
        msf,
        Msf {
            minute: 12,
            second: 34,
            frame: 56
        }
    );
    assert_eq!(msf.to_string(), "12:34:56");
}

#[test]
fn msf_to_lba_accounts_for_pregap() {
    assert_eq!(Msf::from_bcd([0x00, 0x02, 0x00]).to_lba(), Some(0));
    assert_eq!(Msf::from_bcd([0x00, 0x02, 0x16]).to_lba(), Some(16));
    assert_eq!(Msf::from_bcd([0x01, 0x00, 0x00]).to_lba(), Some(60 * 75 - 150));
    assert_eq!(Msf::from_bcd([0x00, 0x01, 0x74]).to_lba(), None);
}

#[test]
fn sector_header_fields() {
    let raw = raw_sector(2, 0);
    let header = Sector::new(&raw).header();
    assert_eq!(header.mode, SectorMode::Mode2Form1);
    assert_eq!(header.address.to_lba(), Some(0));
    assert!(header.has_sync);
}

#[test]
fn sector_header_without_sync() {
    let raw = [0u8; RAW_SECTOR_SIZE];
    let header = Sector::new(&raw).header();
    assert!(!header.has_sync);
    assert_eq!(header.mode, SectorMode::Unknown(0));
}

#[test]
fn mode1_user_data_starts_after_header() {
    let mut raw = raw_sector(1, 0xEE);
    raw[16..16 + USER_DATA_SIZE].fill(0x41);
    let data = Sector::new(&raw).user_data().unwrap();
    assert_eq!(data.len(), USER_DATA_SIZE);
    assert!(data.iter().all(|&b| b == 0x41));
}

#[test]
fn mode2_user_data_skips_subheader() {
    let mut raw = raw_sector(2, 0xEE);
    raw[24..24 + USER_DATA_SIZE].fill(0x42);
    let data = Sector::new(&raw).user_data().unwrap();
    assert_eq!(data.len(), USER_DATA_SIZE);
    assert!(data.iter().all(|&b| b == 0x42));
}

#[test]
fn session_marker_has_no_user_data() {
    let raw = raw_sector(SESSION_MARKER, 0);
    assert_eq!(Sector::new(&raw).user_data(), None);
}

#[test]
fn header_display_includes_lba_and_sync() {
    let raw = raw_sector(1, 0);
    assert_eq!(Sector::new(&raw).header().to_string(), "MSF 00:02:00, LBA 0");

    let mut raw = [0u8; RAW_SECTOR_SIZE];
    raw[MODE_OFFSET] = 1;
    assert_eq!(
        Sector::new(&raw).header().to_string(),
        "MSF 00:00:00, in pregap, no sync pattern"
    );
}
