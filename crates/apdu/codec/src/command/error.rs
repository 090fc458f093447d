//! Error types specific to APDU commands

use super::length::{MAX_LC, MAX_LE};

/// Error for APDU command construction and decoding
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    /// Lc is larger than any command can carry
    #[error("Lc out of range: {lc} (max {max})")]
    LcOutOfRange {
        /// Requested Lc
        lc: u32,
        /// Largest accepted Lc
        max: u32,
    },

    /// Le is larger than any command can request
    #[error("Le out of range: {le} (max {max})")]
    LeOutOfRange {
        /// Requested Le
        le: u32,
        /// Largest accepted Le
        max: u32,
    },

    /// Data too long for a single command
    #[error("Data too long: {0} bytes (max {1})")]
    DataTooLong(usize, usize),

    /// Raw command length does not match its length fields
    #[error("Invalid command length: {0}")]
    InvalidLength(usize),

    /// Raw command is structurally invalid
    #[error("Malformed command: {0}")]
    Malformed(&'static str),
}

impl CommandError {
    /// Create an Lc out of range error
    pub const fn lc_out_of_range(lc: u32) -> Self {
        Self::LcOutOfRange { lc, max: MAX_LC }
    }

    /// Create an Le out of range error
    pub const fn le_out_of_range(le: u32) -> Self {
        Self::LeOutOfRange { le, max: MAX_LE }
    }

    /// Create a data too long error
    pub const fn data_too_long(actual: usize) -> Self {
        Self::DataTooLong(actual, MAX_LC as usize)
    }
}
