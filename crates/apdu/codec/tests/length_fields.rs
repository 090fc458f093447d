//! Length-field selection across the short/extended boundaries

use apdu_codec::command::{HEADER_LEN, MAX_LC, MAX_LE};
use apdu_codec::{CommandApdu, LengthEncoding};
use proptest::prelude::*;

fn build(lc: u32, le: u32) -> CommandApdu {
    CommandApdu::with_lengths(0x00, 0x01, 0x02, 0x03, lc, le).unwrap()
}

#[test]
fn test_short_form_table() {
    for lc in [0u32, 1, 255] {
        for le in [0u32, 1, 255, 256] {
            let cmd = build(lc, le);
            let expected = 4 + (if lc > 0 { 1 + lc as usize } else { 0 }) + usize::from(le > 0);

            assert_eq!(cmd.encoding(), LengthEncoding::Short, "lc={lc} le={le}");
            assert_eq!(cmd.len(), expected, "lc={lc} le={le}");
            if lc > 0 {
                assert_eq!(cmd[HEADER_LEN], lc as u8, "lc={lc} le={le}");
            }
            if le > 0 {
                assert_eq!(cmd[cmd.len() - 1], (le % 256) as u8, "lc={lc} le={le}");
            }
        }
    }
}

#[test]
fn test_extended_form_table() {
    let cases: &[(u32, u32, &[u8])] = &[
        (256, 0, &[0x00, 0x01, 0x00]),
        (0, 257, &[0x00, 0x01, 0x01]),
        (0, 65_535, &[0x00, 0xFF, 0xFF]),
        (0, 65_536, &[0x00, 0x00, 0x00]),
        (1, 257, &[0x00, 0x00, 0x01]),
        (65_535, 1, &[0x00, 0xFF, 0xFF]),
    ];

    for &(lc, le, prefix) in cases {
        let cmd = build(lc, le);
        assert!(cmd.is_extended(), "lc={lc} le={le}");
        assert_eq!(&cmd[HEADER_LEN..HEADER_LEN + 3], prefix, "lc={lc} le={le}");
    }
}

#[test]
fn test_le_sentinels() {
    assert_eq!(build(0, 256).as_bytes(), &[0x00, 0x01, 0x02, 0x03, 0x00]);
    assert_eq!(
        build(0, 65_536).as_bytes(),
        &[0x00, 0x01, 0x02, 0x03, 0x00, 0x00, 0x00]
    );
}

proptest! {
    #[test]
    fn prop_size_matches_fields(lc in 0..=MAX_LC, le in 0..=MAX_LE) {
        let cmd = build(lc, le);
        let extended = lc > 255 || le > 256;
        let width = if extended { 2 } else { 1 };
        let marker = usize::from(extended && (lc > 0 || le > 0));
        let lc_field = if lc > 0 { width + lc as usize } else { 0 };
        let le_field = if le > 0 { width } else { 0 };

        prop_assert_eq!(cmd.is_extended(), extended);
        prop_assert_eq!(cmd.len(), HEADER_LEN + marker + lc_field + le_field);
        prop_assert_eq!(cmd.data_len(), lc as usize);
        prop_assert!(cmd.data().iter().all(|b| *b == 0));
    }

    #[test]
    fn prop_single_marker_after_header(lc in 256..=4_096u32, le in 257..=MAX_LE) {
        let cmd = build(lc, le);
        prop_assert_eq!(cmd[HEADER_LEN], 0x00);
        prop_assert_eq!(u16::from_be_bytes([cmd[5], cmd[6]]), lc as u16);

        let tail = &cmd[cmd.len() - 2..];
        prop_assert_eq!(u32::from(u16::from_be_bytes([tail[0], tail[1]])), le % 65_536);
    }

    #[test]
    fn prop_decode_reproduces_command(
        data in proptest::collection::vec(any::<u8>(), 0..600),
        le in 0..=MAX_LE,
    ) {
        let cmd = CommandApdu::with_data(0x00, 0xDA, 0x01, 0x02, &data, le).unwrap();
        let decoded = CommandApdu::from_bytes(&cmd).unwrap();

        prop_assert_eq!(decoded.data(), data.as_slice());
        prop_assert_eq!(decoded.le(), le);
        prop_assert_eq!(decoded.as_bytes(), cmd.as_bytes());
    }

    #[test]
    fn prop_out_of_range_rejected(lc in (MAX_LC + 1)..=u32::MAX, le in (MAX_LE + 1)..=u32::MAX) {
        prop_assert!(CommandApdu::with_lengths(0, 0, 0, 0, lc, 0).is_err());
        prop_assert!(CommandApdu::with_lengths(0, 0, 0, 0, 0, le).is_err());
    }
}
