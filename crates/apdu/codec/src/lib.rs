//! ISO/IEC 7816-4 APDU framing
//!
//! This crate builds command APDUs and parses response APDUs exchanged with
//! smart cards and secure elements. It is a pure byte-buffer codec: it does
//! no I/O, keeps no state beyond the APDU being built or inspected, and
//! knows nothing about what individual INS/P1/P2 values mean.
//!
//! ## Overview
//!
//! - [`CommandApdu`] selects short or extended length fields from Lc and Le
//!   together, writes a single wire buffer and exposes the data field as a
//!   mutable window to be filled in before transmission.
//! - [`ResponseApdu`] borrows the bytes received from the card and exposes
//!   the payload, the trailing status word and its classification.
//! - [`StatusWord`] is the status vocabulary shared by both.
//!
//! ```
//! use apdu_codec::{CommandApdu, ResponseApdu};
//!
//! let mut select = CommandApdu::with_lengths(0x00, 0xA4, 0x04, 0x00, 5, 256).unwrap();
//! select.data_mut().copy_from_slice(&[0xA0, 0x00, 0x00, 0x01, 0x51]);
//! assert_eq!(select.len(), 11);
//!
//! let response = ResponseApdu::new(&[0x6F, 0x00, 0x90, 0x00]);
//! assert!(response.is_success());
//! assert_eq!(response.data(), &[0x6F, 0x00]);
//! ```
//!
//! Without the default `std` feature the crate is `no_std` and only needs `alloc`.
#![cfg_attr(not(any(feature = "std", test)), no_std)]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![forbid(unsafe_code)]
#![warn(missing_docs, rustdoc::missing_crate_level_docs)]

// Re-export bytes for convenience
pub use bytes::{Bytes, BytesMut};

pub mod command;
pub mod response;

pub use command::{CommandApdu, CommandError, LengthEncoding};
pub use response::status::{StatusCategory, StatusWord};
pub use response::{ResponseApdu, ResponseError, StatusError, utils};

/// Prelude module containing commonly used traits and types
pub mod prelude {
    pub use crate::{
        Bytes, BytesMut, CommandApdu, CommandError, LengthEncoding, ResponseApdu, ResponseError,
        StatusCategory, StatusError, StatusWord,
        response::status::common as status,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    // Test the basic types are re-exported correctly
    #[test]
    fn test_reexports() {
        let cmd = CommandApdu::new(0x00, 0xA4, 0x04, 0x00);
        assert_eq!(cmd.cla(), 0x00);
        assert_eq!(cmd.ins(), 0xA4);
        assert_eq!(cmd.p1(), 0x04);
        assert_eq!(cmd.p2(), 0x00);

        let raw = [0x01, 0x02, 0x03, 0x90, 0x00];
        let resp = ResponseApdu::new(&raw);
        assert!(resp.is_success());
        assert_eq!(resp.data(), &[0x01, 0x02, 0x03]);
        assert_eq!(resp.status_word(), Some(prelude::status::SUCCESS));
    }
}
