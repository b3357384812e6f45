//! Request and response records for callers that speak JSON.
//!
//! A request carries `{text, timezone}`. The timezone is validated here, at
//! the boundary, before the text reaches the extraction pipeline. Responses
//! use RFC 3339 strings for instants.

use chrono::DateTime;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Config;
use crate::error::{ExtractError, Result};
use crate::extract::Extractor;
use crate::interval::EventInterval;
use crate::recognizer::Recognizer;

/// Incoming `{text, timezone}` payload. Both fields may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ParseRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub timezone: Option<String>,
}

impl ParseRequest {
    pub fn new(text: impl Into<String>, timezone: Option<String>) -> Self {
        Self {
            text: text.into(),
            timezone,
        }
    }

    /// The requested timezone, or the configured default when it is
    /// missing or empty.
    ///
    /// # Errors
    ///
    /// [`ExtractError::InvalidTimezone`] if the name is not an IANA timezone.
    pub fn timezone(&self, config: &Config) -> Result<Tz> {
        match self.timezone.as_deref().map(str::trim) {
            None | Some("") => Ok(config.default_timezone),
            Some(name) => parse_timezone(name),
        }
    }
}

/// Parse an IANA timezone name.
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse::<Tz>()
        .map_err(|_| ExtractError::InvalidTimezone(name.to_string()))
}

/// A successfully extracted event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventResponse {
    pub event_name: String,
    pub event_start: String,
    pub event_end: Option<String>,
}

impl From<&EventInterval> for EventResponse {
    fn from(event: &EventInterval) -> Self {
        Self {
            event_name: event.name.clone(),
            event_start: event.start.to_rfc3339(),
            event_end: event.end.map(|end| end.to_rfc3339()),
        }
    }
}

/// Reply to an event request: the event, or `{}` when nothing was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum EventReply {
    Found(EventResponse),
    Empty {},
}

/// Reply to a bare-date request; `date` is `null` when nothing was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateResponse {
    pub date: Option<String>,
}

impl From<Option<DateTime<Tz>>> for DateResponse {
    fn from(date: Option<DateTime<Tz>>) -> Self {
        Self {
            date: date.map(|dt| dt.to_rfc3339()),
        }
    }
}

/// Error body for requests rejected at the boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{error_description}")]
pub struct ErrorResponse {
    pub error: String,
    pub error_description: String,
}

impl ErrorResponse {
    pub fn invalid_timezone(name: &str) -> Self {
        Self {
            error: "invalid_timezone".to_string(),
            error_description: format!("invalid timezone '{name}'"),
        }
    }
}

fn request_timezone(
    request: &ParseRequest,
    config: &Config,
) -> std::result::Result<Tz, ErrorResponse> {
    request.timezone(config).map_err(|err| match err {
        ExtractError::InvalidTimezone(name) => ErrorResponse::invalid_timezone(&name),
        other => ErrorResponse {
            error: "invalid_request".to_string(),
            error_description: other.to_string(),
        },
    })
}

/// Validate an event request and run the event pipeline.
pub fn handle_event<R: Recognizer>(
    extractor: &Extractor<R>,
    config: &Config,
    request: &ParseRequest,
) -> std::result::Result<EventReply, ErrorResponse> {
    let tz = request_timezone(request, config)?;
    Ok(match extractor.extract_event(&request.text, tz) {
        Some(event) => EventReply::Found(EventResponse::from(&event)),
        None => EventReply::Empty {},
    })
}

/// Validate a date request and run the bare-date pipeline.
pub fn handle_date<R: Recognizer>(
    extractor: &Extractor<R>,
    config: &Config,
    request: &ParseRequest,
) -> std::result::Result<DateResponse, ErrorResponse> {
    let tz = request_timezone(request, config)?;
    Ok(DateResponse::from(extractor.extract_instant(&request.text, tz)))
}
