//! Command/response exchanges as a higher layer would drive them

use apdu_codec::prelude::*;

const AID: [u8; 5] = [0xA0, 0x00, 0x00, 0x01, 0x51];

#[test]
fn test_select_with_short_le_256() {
    let mut select = CommandApdu::with_lengths(0x00, 0xA4, 0x04, 0x00, 5, 256).unwrap();
    assert_eq!(select.data_len(), 5);
    assert_eq!(select.encoding(), LengthEncoding::Short);

    select.data_mut().copy_from_slice(&AID);

    assert_eq!(
        select.as_bytes(),
        &[0x00, 0xA4, 0x04, 0x00, 0x05, 0xA0, 0x00, 0x00, 0x01, 0x51, 0x00]
    );
    assert_eq!(select.len(), 11);
}

#[test]
fn test_written_data_lands_between_length_fields() {
    let payload: Vec<u8> = (0..=255).map(|i: u16| (i % 251) as u8).collect();
    let le = 4_096;

    let mut cmd =
        CommandApdu::with_lengths(0x80, 0xE8, 0x00, 0x00, payload.len() as u32, le).unwrap();
    cmd.data_mut().copy_from_slice(&payload);
    let wire = cmd.into_bytes();

    let mut expected = vec![0x80, 0xE8, 0x00, 0x00, 0x00, 0x01, 0x00];
    expected.extend_from_slice(&payload);
    expected.extend_from_slice(&[0x10, 0x00]);
    assert_eq!(wire.as_ref(), expected.as_slice());
}

#[test]
fn test_get_response_continuation() {
    // First response: 4 data bytes, 0x10 more still on the card
    let first = hex::decode("010203046110").unwrap();
    let first = ResponseApdu::new(&first);
    assert!(first.is_ok());
    assert!(!first.is_error());
    let remaining = first.remaining_bytes().unwrap();
    assert_eq!(remaining, 0x10);

    let get_response =
        CommandApdu::with_lengths(0x00, 0xC0, 0x00, 0x00, 0, remaining.into()).unwrap();
    assert_eq!(get_response.as_bytes(), &[0x00, 0xC0, 0x00, 0x00, 0x10]);

    let second: Vec<u8> = [vec![0xEE; 0x10], vec![0x90, 0x00]].concat();
    let second = ResponseApdu::from(second.as_slice());
    assert!(second.is_success());
    assert_eq!(second.check().unwrap().len(), 0x10);
}

#[test]
fn test_error_response_is_data_not_failure() {
    let raw = Bytes::from_static(&[0x6A, 0x82]);
    let resp = ResponseApdu::from(&raw);

    assert!(resp.is_ok());
    assert!(resp.is_checking_error());
    assert_eq!(resp.status_word(), Some(status::FILE_NOT_FOUND));

    let err = resp.check().unwrap_err();
    assert_eq!(err.to_string(), "Status error 6A 82: File not found");
}

#[test]
fn test_decode_after_transport_roundtrip() {
    let sent = CommandApdu::with_data(0x00, 0x2A, 0x9E, 0x9A, &[0x5A; 300], 256).unwrap();
    let wire: Bytes = sent.clone().into();

    let decoded = CommandApdu::from_bytes(&wire).unwrap();
    assert_eq!(decoded, sent);
    assert!(decoded.is_extended());
    assert_eq!(decoded.le(), 256);
}
