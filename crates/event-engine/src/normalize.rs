//! Lexical clean-up applied before the recognizer sees the text.
//!
//! The normalizer removes preposition variance in front of clock times
//! ("с 10:00", "начиная с 10:00", "на 10:00" all become "в 10:00") and
//! copies a relative day word next to every clock time, so that
//! "завтра с 14:00 до 20:00" cannot attach "завтра" to only one clause.

use chrono_tz::Tz;
use regex::Captures;
use tracing::debug;

use crate::lexicon::{Lexicon, AT};
use crate::recognizer::Recognizer;

/// Run the full normalization: whitespace, time prepositions, relative days.
pub fn normalize<R: Recognizer + ?Sized>(
    lexicon: &Lexicon,
    recognizer: &R,
    text: &str,
    tz: Tz,
) -> String {
    let text = lexicon.collapse_spaces(text);
    let text = canonicalize_time_prepositions(lexicon, &text);
    let text = expand_relative_day(lexicon, recognizer, &text, tz);
    lexicon.collapse_spaces(&text)
}

/// Rewrite "<preposition> HH:MM" into "в HH:MM".
pub fn canonicalize_time_prepositions(lexicon: &Lexicon, text: &str) -> String {
    lexicon
        .time_preposition()
        .replace_all(text, format!("${{1}} {AT} ${{3}}").as_str())
        .into_owned()
}

/// Move a relative day word in front of every "в HH:MM".
///
/// Only fires when the text has both a clock time behind a preposition and
/// a day word the recognizer can resolve; otherwise the text is returned
/// as is.
pub fn expand_relative_day<R: Recognizer + ?Sized>(
    lexicon: &Lexicon,
    recognizer: &R,
    text: &str,
    tz: Tz,
) -> String {
    if !lexicon.time_preposition().is_match(text) {
        return text.to_string();
    }
    let Some(day_word) = lexicon.find_day_word(text) else {
        return text.to_string();
    };

    match recognizer.parse_one(day_word, tz) {
        Ok(Some(_)) => {}
        Ok(None) => {
            debug!(day_word = day_word.trim(), "relative day word did not resolve");
            return text.to_string();
        }
        Err(err) => {
            debug!(day_word = day_word.trim(), error = %err, "relative day word lookup failed");
            return text.to_string();
        }
    }

    let without_day = lexicon.day_word().replace_all(text, " ");
    lexicon
        .time_preposition()
        .replace_all(&without_day, |caps: &Captures<'_>| {
            format!("{} {} {}{}", &caps[1], day_word, &caps[2], &caps[3])
        })
        .into_owned()
}
