//! Error types for the effect coordinator

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure value carried by every rejected persistence request.
///
/// Codes are service-defined; a handful of them get special treatment
/// (see `messages::NO_CHANGES_CODE` and `messages::UNKNOWN_ERROR_CODE`).
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{code}: {message}")]
pub struct RequestError {
    pub code: String,
    pub message: String,
}

impl RequestError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("no document loaded; dispatch Setup first")]
    NoDocument,
}
