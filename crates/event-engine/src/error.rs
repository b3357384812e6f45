//! Error types for event-engine operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("No date or time found in text")]
    NoMatch,

    #[error("Ambiguous dates could not be resolved")]
    AmbiguousUnresolved,

    #[error("Two dates found but no range marker between them")]
    MissingRangeMarker,

    #[error("Recognizer error: {0}")]
    Recognizer(String),

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid datetime: {0}")]
    InvalidDatetime(String),
}

impl ExtractError {
    /// Whether this error is an ordinary "nothing to extract" outcome rather
    /// than a fault in the engine or its collaborators.
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            ExtractError::NoMatch
                | ExtractError::AmbiguousUnresolved
                | ExtractError::MissingRangeMarker
        )
    }
}

pub type Result<T> = std::result::Result<T, ExtractError>;
