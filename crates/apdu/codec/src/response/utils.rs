//! Utility functions for APDU response handling

use tracing::debug;

use crate::response::error::ResponseError;
use crate::response::status::StatusWord;

/// Split raw APDU response data into its status word and payload
///
/// # Errors
/// Returns an error if the data is too short to contain a status word.
pub fn split_response(data: &[u8]) -> Result<(StatusWord, &[u8]), ResponseError> {
    match data {
        [payload @ .., sw1, sw2] => Ok((StatusWord::new(*sw1, *sw2), payload)),
        _ => {
            debug!("Response too short: {} bytes", data.len());
            Err(ResponseError::Incomplete(data.len()))
        }
    }
}
