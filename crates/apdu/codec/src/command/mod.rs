//! APDU command construction and decoding
//!
//! This module builds command APDUs according to ISO/IEC 7816-4. A
//! [`CommandApdu`] owns exactly one wire buffer; the data field is a window
//! into that buffer which is zeroed at construction and filled in by the
//! caller before the command is handed to a transport.

pub mod error;
pub mod length;

use core::fmt;
use core::ops::Range;

use bytes::{BufMut, Bytes, BytesMut};
use derive_more::Deref;
use tracing::{debug, trace};

pub use error::CommandError;
pub use length::{
    EXTENDED_MARKER, HEADER_LEN, LengthEncoding, MAX_LC, MAX_LE, SHORT_MAX_LC, SHORT_MAX_LE,
};

/// Command APDU ready for transmission
///
/// Dereferences to the complete wire bytes. Only the data window returned
/// by [`CommandApdu::data_mut`] can change after construction.
#[derive(Clone, PartialEq, Eq, Deref)]
pub struct CommandApdu {
    #[deref(forward)]
    buf: BytesMut,
    /// Start of the data field within `buf`
    data_offset: usize,
    /// Lc
    data_len: usize,
    /// Logical Le, 0 when absent
    le: u32,
}

impl CommandApdu {
    /// Create a case 1 command: header only, no data and no response expected
    pub fn new(cla: u8, ins: u8, p1: u8, p2: u8) -> Self {
        let mut buf = BytesMut::with_capacity(HEADER_LEN);
        buf.put_slice(&[cla, ins, p1, p2]);

        trace!(
            cla = format_args!("{:#04x}", cla),
            ins = format_args!("{:#04x}", ins),
            "Built header-only command APDU"
        );

        Self {
            buf,
            data_offset: HEADER_LEN,
            data_len: 0,
            le: 0,
        }
    }

    /// Create a command with `lc` zeroed data bytes and an expected response length `le`
    ///
    /// Either length may be zero, meaning the field is absent. Short or
    /// extended length fields are chosen from both values together. Le 256
    /// and 65536 are written with all-zero bytes.
    ///
    /// # Errors
    /// Returns an error if `lc` exceeds [`MAX_LC`] or `le` exceeds [`MAX_LE`].
    pub fn with_lengths(
        cla: u8,
        ins: u8,
        p1: u8,
        p2: u8,
        lc: u32,
        le: u32,
    ) -> Result<Self, CommandError> {
        if lc > MAX_LC {
            return Err(CommandError::lc_out_of_range(lc));
        }
        if le > MAX_LE {
            return Err(CommandError::le_out_of_range(le));
        }

        let encoding = LengthEncoding::select(lc, le);
        let mut buf = BytesMut::with_capacity(encoding.encoded_len(lc, le));

        buf.put_slice(&[cla, ins, p1, p2]);
        if encoding.has_marker(lc, le) {
            buf.put_u8(EXTENDED_MARKER);
        }
        encoding.put_lc(&mut buf, lc);

        let data_offset = buf.len();
        let data_len = lc as usize;
        buf.put_bytes(0, data_len);

        encoding.put_le(&mut buf, le);

        trace!(
            cla = format_args!("{:#04x}", cla),
            ins = format_args!("{:#04x}", ins),
            lc,
            le,
            extended = encoding.is_extended(),
            len = buf.len(),
            "Built command APDU"
        );

        Ok(Self {
            buf,
            data_offset,
            data_len,
            le,
        })
    }

    /// Create a command carrying a copy of `data` and expecting `le` response bytes
    ///
    /// # Errors
    /// Returns an error if `data` is longer than [`MAX_LC`] or `le` exceeds [`MAX_LE`].
    pub fn with_data(
        cla: u8,
        ins: u8,
        p1: u8,
        p2: u8,
        data: &[u8],
        le: u32,
    ) -> Result<Self, CommandError> {
        if data.len() > MAX_LC as usize {
            return Err(CommandError::data_too_long(data.len()));
        }

        let mut command = Self::with_lengths(cla, ins, p1, p2, data.len() as u32, le)?;
        command.data_mut().copy_from_slice(data);
        Ok(command)
    }

    /// Parse a command from raw bytes
    ///
    /// Accepts cases 1, 2, 3 and 4 in short and extended form. The result
    /// is re-encoded from the decoded lengths, so an extended input whose
    /// lengths fit the short form comes back in short form.
    ///
    /// # Errors
    /// Returns an error if the length fields are inconsistent with the
    /// number of bytes supplied.
    pub fn from_bytes(raw: &[u8]) -> Result<Self, CommandError> {
        let result = match raw {
            [cla, ins, p1, p2, body @ ..] => decode_body(body)
                .and_then(|(data, le)| Self::with_data(*cla, *ins, *p1, *p2, data, le)),
            _ => Err(CommandError::InvalidLength(raw.len())),
        };

        if let Err(e) = &result {
            debug!(error = %e, command = %hex::encode(raw), "Failed to decode command APDU");
        }
        result
    }

    /// Class byte (CLA)
    pub fn cla(&self) -> u8 {
        self.buf[0]
    }

    /// Instruction byte (INS)
    pub fn ins(&self) -> u8 {
        self.buf[1]
    }

    /// First parameter (P1)
    pub fn p1(&self) -> u8 {
        self.buf[2]
    }

    /// Second parameter (P2)
    pub fn p2(&self) -> u8 {
        self.buf[3]
    }

    /// Length of the data field (Lc)
    pub const fn data_len(&self) -> usize {
        self.data_len
    }

    /// Expected response length (Le), 0 when absent
    pub const fn le(&self) -> u32 {
        self.le
    }

    /// Length field encoding used by this command
    pub const fn encoding(&self) -> LengthEncoding {
        LengthEncoding::select(self.data_len as u32, self.le)
    }

    /// Whether this command uses extended length fields
    pub const fn is_extended(&self) -> bool {
        self.encoding().is_extended()
    }

    /// Data field
    pub fn data(&self) -> &[u8] {
        &self.buf[self.data_range()]
    }

    /// Mutable data field, to be filled in before transmission
    pub fn data_mut(&mut self) -> &mut [u8] {
        let range = self.data_range();
        &mut self.buf[range]
    }

    /// Complete wire bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Convert into the wire bytes without copying
    pub fn into_bytes(self) -> Bytes {
        self.buf.freeze()
    }

    const fn data_range(&self) -> Range<usize> {
        self.data_offset..self.data_offset + self.data_len
    }
}

/// Split everything after the header into the data field and logical Le
fn decode_body(body: &[u8]) -> Result<(&[u8], u32), CommandError> {
    let invalid = || CommandError::InvalidLength(HEADER_LEN + body.len());

    match body {
        // Case 1
        [] => Ok((&[], 0)),
        // Case 2S
        [le] => Ok((&[], short_le(*le))),
        // Extended marker followed by at least one 2-byte field
        [EXTENDED_MARKER, hi, lo, rest @ ..] => {
            let value = u16::from_be_bytes([*hi, *lo]);
            if rest.is_empty() {
                // Case 2E
                return Ok((&[], extended_le(value)));
            }

            let lc = usize::from(value);
            if lc == 0 {
                return Err(CommandError::Malformed("extended Lc of zero"));
            }
            match rest.len().checked_sub(lc) {
                // Case 3E
                Some(0) => Ok((rest, 0)),
                // Case 4E
                Some(2) => Ok((
                    &rest[..lc],
                    extended_le(u16::from_be_bytes([rest[lc], rest[lc + 1]])),
                )),
                _ => Err(invalid()),
            }
        }
        [lc, rest @ ..] => {
            let lc = usize::from(*lc);
            if lc == 0 {
                return Err(invalid());
            }
            match rest.len().checked_sub(lc) {
                // Case 3S
                Some(0) => Ok((rest, 0)),
                // Case 4S
                Some(1) => Ok((&rest[..lc], short_le(rest[lc]))),
                _ => Err(invalid()),
            }
        }
    }
}

const fn short_le(byte: u8) -> u32 {
    if byte == 0 { SHORT_MAX_LE } else { byte as u32 }
}

const fn extended_le(value: u16) -> u32 {
    if value == 0 { MAX_LE } else { value as u32 }
}

impl AsRef<[u8]> for CommandApdu {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl From<CommandApdu> for Bytes {
    fn from(command: CommandApdu) -> Self {
        command.into_bytes()
    }
}

impl fmt::Debug for CommandApdu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandApdu")
            .field("cla", &format_args!("{:#04x}", self.cla()))
            .field("ins", &format_args!("{:#04x}", self.ins()))
            .field("p1", &format_args!("{:#04x}", self.p1()))
            .field("p2", &format_args!("{:#04x}", self.p2()))
            .field("lc", &self.data_len)
            .field("le", &self.le)
            .field("encoding", &self.encoding())
            .field("bytes", &hex::encode(self.as_bytes()))
            .finish()
    }
}

impl fmt::Display for CommandApdu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode_upper(self.as_bytes()))
    }
}
