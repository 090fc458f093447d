//! APDU response definitions
//!
//! This module provides a borrowing view over response APDUs according to
//! ISO/IEC 7816-4. The view never copies the bytes it wraps; a response
//! shorter than two bytes is a valid view that reports `is_ok() == false`.

pub mod error;
pub mod status;
pub mod utils;

use core::fmt;

use bytes::Bytes;
use derive_more::Deref;
use tracing::trace;

pub use error::{ResponseError, StatusError};
pub use status::{StatusCategory, StatusWord};

/// Length of the trailing SW1-SW2 status word
pub const STATUS_WORD_LEN: usize = 2;

/// Response APDU borrowed from a transport buffer
///
/// Dereferences to the complete raw response, status word included.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Deref)]
pub struct ResponseApdu<'a> {
    #[deref(forward)]
    bytes: &'a [u8],
}

impl<'a> ResponseApdu<'a> {
    /// Wrap raw response bytes as received from the card
    pub fn new(bytes: &'a [u8]) -> Self {
        let response = Self { bytes };

        match response.status_word() {
            Some(status) => trace!(
                sw1 = format_args!("{:#04x}", status.sw1),
                sw2 = format_args!("{:#04x}", status.sw2),
                payload_len = response.data_len(),
                "Parsed APDU response"
            ),
            None => trace!(len = bytes.len(), "Response APDU without status word"),
        }

        response
    }

    /// Whether the response is long enough to carry a status word
    pub const fn is_ok(&self) -> bool {
        self.bytes.len() >= STATUS_WORD_LEN
    }

    /// Status word, if present
    pub const fn status_word(&self) -> Option<StatusWord> {
        match self.bytes {
            [.., sw1, sw2] => Some(StatusWord::new(*sw1, *sw2)),
            _ => None,
        }
    }

    /// First status byte (SW1)
    pub const fn sw1(&self) -> Option<u8> {
        match self.status_word() {
            Some(status) => Some(status.sw1),
            None => None,
        }
    }

    /// Second status byte (SW2)
    pub const fn sw2(&self) -> Option<u8> {
        match self.status_word() {
            Some(status) => Some(status.sw2),
            None => None,
        }
    }

    /// Status word as `SW1 * 256 + SW2`
    pub const fn status(&self) -> Option<u16> {
        match self.status_word() {
            Some(status) => Some(status.to_u16()),
            None => None,
        }
    }

    /// Response data without the status word
    ///
    /// Empty when the response has no status word.
    pub const fn data(&self) -> &'a [u8] {
        match self.bytes {
            [data @ .., _, _] => data,
            _ => &[],
        }
    }

    /// Length of the response data
    pub const fn data_len(&self) -> usize {
        self.data().len()
    }

    /// Number of response bytes still available on the card (61 XX)
    ///
    /// The caller fetches them with GET RESPONSE.
    pub const fn remaining_bytes(&self) -> Option<u8> {
        match self.status_word() {
            Some(status) => status.remaining_bytes(),
            None => None,
        }
    }

    /// Check if the response indicates success (90 00)
    pub const fn is_success(&self) -> bool {
        matches!(self.status_word(), Some(status) if status.is_success())
    }

    /// Check if more response bytes are available (61 XX)
    pub const fn is_more_data_available(&self) -> bool {
        matches!(self.status_word(), Some(status) if status.is_more_data_available())
    }

    /// Check if the response carries a warning (62 XX, 63 XX)
    pub const fn is_warning(&self) -> bool {
        matches!(self.status_word(), Some(status) if status.is_warning())
    }

    /// Check if the response carries an execution error (64 XX to 66 XX)
    pub const fn is_execution_error(&self) -> bool {
        matches!(self.status_word(), Some(status) if status.is_execution_error())
    }

    /// Check if the response carries a checking error (67 XX to 6F XX)
    pub const fn is_checking_error(&self) -> bool {
        matches!(self.status_word(), Some(status) if status.is_checking_error())
    }

    /// Check if the response carries an execution or checking error
    pub const fn is_error(&self) -> bool {
        matches!(self.status_word(), Some(status) if status.is_error())
    }

    /// Category of the status word, if present
    pub const fn category(&self) -> Option<StatusCategory> {
        match self.status_word() {
            Some(status) => Some(status.category()),
            None => None,
        }
    }

    /// Complete raw response, status word included
    pub const fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Return the response data unless the response is incomplete or an error
    ///
    /// Warnings and 61 XX are returned as `Ok`; the caller inspects the
    /// status word to act on them.
    ///
    /// # Errors
    /// Returns [`ResponseError::Incomplete`] for responses shorter than two
    /// bytes and [`ResponseError::Status`] for execution and checking errors.
    pub fn check(&self) -> Result<&'a [u8], ResponseError> {
        let (status, payload) = utils::split_response(self.bytes)?;
        if status.is_error() {
            return Err(StatusError::new(status.sw1, status.sw2).into());
        }
        Ok(payload)
    }
}

impl<'a> From<&'a [u8]> for ResponseApdu<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Self::new(bytes)
    }
}

impl<'a> From<&'a Bytes> for ResponseApdu<'a> {
    fn from(bytes: &'a Bytes) -> Self {
        Self::new(bytes)
    }
}

impl AsRef<[u8]> for ResponseApdu<'_> {
    fn as_ref(&self) -> &[u8] {
        self.bytes
    }
}

impl fmt::Debug for ResponseApdu<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("ResponseApdu");
        s.field("data", &hex::encode(self.data()));
        match self.status_word() {
            Some(status) => s.field("status", &format_args!("{status}")),
            None => s.field("raw", &hex::encode(self.bytes)),
        };
        s.finish()
    }
}
