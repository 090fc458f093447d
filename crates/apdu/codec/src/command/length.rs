//! Short and extended length-field selection for command APDUs
//!
//! ISO/IEC 7816-4 allows Lc and Le to be written either as single bytes
//! (short form) or as two big-endian bytes following one `0x00` marker
//! (extended form). A command never mixes the two: the form is decided once
//! from both lengths and then used for every length field of that command.

use bytes::BufMut;
use derive_more::Display;

/// Length of the CLA, INS, P1, P2 header
pub const HEADER_LEN: usize = 4;

/// Largest Lc that fits the short form
pub const SHORT_MAX_LC: u32 = 255;

/// Largest Le that fits the short form (256 is written as `0x00`)
pub const SHORT_MAX_LE: u32 = 256;

/// Largest Lc a command APDU can carry
pub const MAX_LC: u32 = 65_535;

/// Largest Le a command APDU can request (65536 is written as `0x00 0x00`)
pub const MAX_LE: u32 = 65_536;

/// Byte signalling extended length fields, written once after the header
pub const EXTENDED_MARKER: u8 = 0x00;

/// Width of the Lc/Le fields of a command APDU
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum LengthEncoding {
    /// One byte per length field
    #[display("short")]
    Short,
    /// Marker byte followed by two bytes per length field
    #[display("extended")]
    Extended,
}

impl LengthEncoding {
    /// Select the encoding for the given logical Lc and Le
    ///
    /// A length of zero means the field is absent.
    pub const fn select(lc: u32, le: u32) -> Self {
        if lc > SHORT_MAX_LC || le > SHORT_MAX_LE {
            Self::Extended
        } else {
            Self::Short
        }
    }

    /// Whether this is the extended form
    pub const fn is_extended(self) -> bool {
        matches!(self, Self::Extended)
    }

    /// Number of bytes used by each present length field
    pub const fn field_width(self) -> usize {
        match self {
            Self::Short => 1,
            Self::Extended => 2,
        }
    }

    /// Whether a command with these lengths carries the extended marker
    pub const fn has_marker(self, lc: u32, le: u32) -> bool {
        self.is_extended() && (lc > 0 || le > 0)
    }

    /// Total wire length of a command with the given Lc and Le
    pub const fn encoded_len(self, lc: u32, le: u32) -> usize {
        let mut len = HEADER_LEN;
        if self.has_marker(lc, le) {
            len += 1;
        }
        if lc > 0 {
            len += self.field_width() + lc as usize;
        }
        if le > 0 {
            len += self.field_width();
        }
        len
    }

    /// Write the Lc field, or nothing when `lc` is zero
    ///
    /// The extended marker is not part of this field.
    pub(crate) fn put_lc<B: BufMut>(self, buf: &mut B, lc: u32) {
        match (lc, self) {
            (0, _) => {}
            (lc, Self::Short) => buf.put_u8(lc as u8),
            (lc, Self::Extended) => buf.put_u16(lc as u16),
        }
    }

    /// Write the Le field, or nothing when `le` is zero
    ///
    /// The maximum of each form wraps to all-zero bytes: 256 becomes `0x00`
    /// and 65536 becomes `0x00 0x00`.
    pub(crate) fn put_le<B: BufMut>(self, buf: &mut B, le: u32) {
        match (le, self) {
            (0, _) => {}
            (le, Self::Short) => buf.put_u8((le & 0xFF) as u8),
            (le, Self::Extended) => buf.put_u16((le & 0xFFFF) as u16),
        }
    }
}
