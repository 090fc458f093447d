//! Error types specific to APDU responses

use super::status::StatusWord;

/// Error for a status word reporting an execution or checking error
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Status error {status}: {}", .status.description())]
pub struct StatusError {
    /// Status word that caused the error
    pub status: StatusWord,
}

impl StatusError {
    /// Create a new status error
    pub const fn new(sw1: u8, sw2: u8) -> Self {
        Self {
            status: StatusWord::new(sw1, sw2),
        }
    }

    /// Get the status word
    pub const fn status_word(&self) -> StatusWord {
        self.status
    }
}

/// Error for APDU response processing
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ResponseError {
    /// Incomplete response (less than 2 bytes)
    #[error("Incomplete response: {0} bytes")]
    Incomplete(usize),

    /// Status error
    #[error(transparent)]
    Status(#[from] StatusError),
}

impl ResponseError {
    /// Create a new status error
    pub const fn status(sw1: u8, sw2: u8) -> Self {
        Self::Status(StatusError::new(sw1, sw2))
    }

    /// Check if this error has the given status word
    pub const fn has_status(&self, sw: u16) -> bool {
        if let Self::Status(status_error) = self {
            status_error.status_word().to_u16() == sw
        } else {
            false
        }
    }
}
