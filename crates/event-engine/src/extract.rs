//! The two public entry points: event extraction and bare-date extraction.
//!
//! [`Extractor::try_extract_event`] and [`Extractor::try_extract_instant`]
//! report why nothing was extracted. [`Extractor::extract_event`] and
//! [`Extractor::extract_instant`] never fail: every error becomes `None`
//! and is logged, so a caller answering a request always has a body to send.

use std::sync::Arc;

use chrono::DateTime;
use chrono_tz::Tz;
use tracing::{debug, error};

use crate::error::{ExtractError, Result};
use crate::interval::{attach_timezone, build_interval, build_point, EventInterval};
use crate::lexicon::Lexicon;
use crate::midday::normalize_midday;
use crate::normalize::normalize;
use crate::recognizer::Recognizer;
use crate::resolve::{resolve, Resolution};

/// Extraction pipeline bound to a lexicon and a recognizer.
///
/// Holds no mutable state; one instance can serve any number of requests,
/// from any number of threads when the recognizer allows it.
#[derive(Debug, Clone)]
pub struct Extractor<R> {
    lexicon: Arc<Lexicon>,
    recognizer: R,
}

impl<R: Recognizer> Extractor<R> {
    /// An extractor over the process-wide built-in lexicon.
    pub fn new(recognizer: R) -> Self {
        Self::with_lexicon(Lexicon::shared_arc(), recognizer)
    }

    pub fn with_lexicon(lexicon: Arc<Lexicon>, recognizer: R) -> Self {
        Self {
            lexicon,
            recognizer,
        }
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn recognizer(&self) -> &R {
        &self.recognizer
    }

    /// Extract an event name and its start (and end, for ranges) from `text`.
    ///
    /// # Errors
    ///
    /// [`ExtractError::NoMatch`], [`ExtractError::AmbiguousUnresolved`] and
    /// [`ExtractError::MissingRangeMarker`] describe texts that hold no
    /// usable event. Recognizer faults and timezone gaps are passed through.
    pub fn try_extract_event(&self, text: &str, tz: Tz) -> Result<EventInterval> {
        let lexicon = self.lexicon();
        let normalized = normalize(lexicon, &self.recognizer, text, tz);
        debug!(text = %normalized, "normalized event text");

        let resolved = resolve(lexicon, &self.recognizer, &normalized, tz)?;
        match &resolved.resolution {
            Resolution::Point(span) => {
                build_point(lexicon, &self.recognizer, &resolved.text, span, tz)
            }
            Resolution::Interval(first, second) => build_interval(
                lexicon,
                &self.recognizer,
                &resolved.text,
                first,
                second,
                tz,
            ),
        }
    }

    /// Extract a single instant from `text`, with no event name.
    ///
    /// # Errors
    ///
    /// [`ExtractError::NoMatch`] when the text does not resolve to an instant.
    pub fn try_extract_instant(&self, text: &str, tz: Tz) -> Result<DateTime<Tz>> {
        let lexicon = self.lexicon();
        let text = normalize(lexicon, &self.recognizer, text, tz);
        let text = lexicon.canonicalize_date_prepositions(&text);
        let text = normalize_midday(lexicon, &text);
        debug!(text = %text, "normalized date text");

        let instant = self
            .recognizer
            .parse_one(&text, tz)?
            .ok_or(ExtractError::NoMatch)?;
        attach_timezone(instant, tz)
    }

    /// Like [`Extractor::try_extract_event`], with every failure mapped to `None`.
    pub fn extract_event(&self, text: &str, tz: Tz) -> Option<EventInterval> {
        settle(self.try_extract_event(text, tz), "event")
    }

    /// Like [`Extractor::try_extract_instant`], with every failure mapped to `None`.
    pub fn extract_instant(&self, text: &str, tz: Tz) -> Option<DateTime<Tz>> {
        settle(self.try_extract_instant(text, tz), "date")
    }
}

fn settle<T>(result: Result<T>, entry: &str) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) if err.is_expected() => {
            debug!(entry, reason = %err, "nothing extracted");
            None
        }
        Err(err) => {
            error!(entry, error = %err, "extraction failed");
            None
        }
    }
}
