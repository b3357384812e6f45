//! Building the final event from resolved spans.
//!
//! The point path turns one span into a start instant. The interval path
//! combines two spans that may carry their own dates and times into one
//! `(start, end)` pair on a single calendar day, reported chronologically.

use chrono::{DateTime, NaiveDateTime, Offset, TimeDelta, TimeZone};
use chrono_tz::Tz;
use serde::Serialize;
use tracing::debug;

use crate::error::{ExtractError, Result};
use crate::lexicon::Lexicon;
use crate::name::event_name;
use crate::recognizer::{RecognizedSpan, Recognizer};

/// An extracted event. `end` is `None` for a point event; otherwise
/// `start <= end` always holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventInterval {
    pub name: String,
    pub start: DateTime<Tz>,
    pub end: Option<DateTime<Tz>>,
}

/// Build a point event from the only recognized span.
pub fn build_point<R: Recognizer + ?Sized>(
    lexicon: &Lexicon,
    recognizer: &R,
    text: &str,
    span: &RecognizedSpan,
    tz: Tz,
) -> Result<EventInterval> {
    let anchored = lexicon.canonicalize_range_prepositions(&span.matched_text);
    let start = recognizer
        .find_all(&anchored, tz)?
        .into_iter()
        .next()
        .ok_or(ExtractError::NoMatch)?
        .instant;

    Ok(EventInterval {
        name: event_name(lexicon, text, &span.matched_text),
        start: attach_timezone(start, tz)?,
        end: None,
    })
}

/// Build an interval event from two recognized spans.
///
/// # Errors
///
/// [`ExtractError::MissingRangeMarker`] when nothing between the spans says
/// "until"; [`ExtractError::NoMatch`] when the refined date text no longer
/// yields two instants.
pub fn build_interval<R: Recognizer + ?Sized>(
    lexicon: &Lexicon,
    recognizer: &R,
    text: &str,
    first: &RecognizedSpan,
    second: &RecognizedSpan,
    tz: Tz,
) -> Result<EventInterval> {
    let region = date_region(text, first, second)?;
    let name = event_name(lexicon, text, region);

    let refined = lexicon.canonicalize_start_prepositions(region);
    let spans = recognizer.find_all(&refined, tz)?;
    let (first, second) = match spans.as_slice() {
        [first, second, ..] => (first, second),
        _ => return Err(ExtractError::NoMatch),
    };

    if !lexicon.has_end_preposition(&refined) {
        debug!(region = %refined, "two dates without a range marker");
        return Err(ExtractError::MissingRangeMarker);
    }

    let date = if lexicon.contains_day_word(&refined) {
        first.instant.date().max(second.instant.date())
    } else {
        first.instant.date()
    };

    let (start, end) = chronological(
        date.and_time(first.instant.time()),
        date.and_time(second.instant.time()),
    );

    Ok(EventInterval {
        name,
        start: attach_timezone(start, tz)?,
        end: Some(attach_timezone(end, tz)?),
    })
}

/// The text from the start of `first` through the end of `second`,
/// including whatever lies between them.
pub fn date_region<'t>(
    text: &'t str,
    first: &RecognizedSpan,
    second: &RecognizedSpan,
) -> Result<&'t str> {
    let not_found = |span: &RecognizedSpan| {
        ExtractError::Recognizer(format!("span '{}' is not part of the text", span.matched_text))
    };

    let start = text.find(&first.matched_text).ok_or_else(|| not_found(first))?;
    let after_first = start + first.matched_text.len();
    let second_start = text[after_first..]
        .find(&second.matched_text)
        .map(|offset| after_first + offset)
        .ok_or_else(|| not_found(second))?;

    Ok(&text[start..second_start + second.matched_text.len()])
}

/// Order two instants so the earlier one comes first.
pub fn chronological(a: NaiveDateTime, b: NaiveDateTime) -> (NaiveDateTime, NaiveDateTime) {
    if b < a {
        (b, a)
    } else {
        (a, b)
    }
}

/// Attach `tz` to a wall-clock value without shifting it. Ambiguous local
/// times take the earlier offset.
///
/// A wall-clock value skipped by a DST transition is read with the offset in
/// effect before the transition, which lands it just past the gap
/// (02:30 in New York on a spring-forward day becomes 03:30 EDT).
pub fn attach_timezone(naive: NaiveDateTime, tz: Tz) -> Result<DateTime<Tz>> {
    if let Some(dt) = tz.from_local_datetime(&naive).earliest() {
        return Ok(dt);
    }

    let invalid =
        || ExtractError::InvalidDatetime(format!("'{naive}' does not exist in {}", tz.name()));
    let before_gap = naive.checked_sub_signed(TimeDelta::days(1)).ok_or_else(invalid)?;
    let offset = tz.offset_from_utc_datetime(&before_gap).fix();
    let utc = naive
        .checked_sub_signed(TimeDelta::seconds(i64::from(offset.local_minus_utc())))
        .ok_or_else(invalid)?;
    debug!(local = %naive, timezone = tz.name(), "local time falls in a DST gap");
    Ok(tz.from_utc_datetime(&utc))
}
