//! Span resolution: decide what the recognizer's matches describe.
//!
//! One span is a point event, two spans are a candidate interval, and more
//! than two usually means one "<day> <month>" was split between a start and
//! an end clause ("с 22 марта 14:00 по 22 марта 20:00"). That last case gets
//! a single structural repair attempt before giving up.

use chrono_tz::Tz;
use tracing::debug;

use crate::error::{ExtractError, Result};
use crate::lexicon::Lexicon;
use crate::recognizer::{RecognizedSpan, Recognizer};

/// What the recognized spans describe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A single date/time: an event without an end.
    Point(RecognizedSpan),
    /// Two dates/times that may form a range.
    Interval(RecognizedSpan, RecognizedSpan),
}

/// The resolution together with the text it refers to, which differs from
/// the input when the shared-month repair fired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub text: String,
    pub resolution: Resolution,
}

/// Run the recognizer over `text` and classify the result.
///
/// # Errors
///
/// [`ExtractError::NoMatch`] when nothing is recognized (also after a
/// repair), [`ExtractError::AmbiguousUnresolved`] when more than two spans
/// remain and the repair does not apply or does not help.
pub fn resolve<R: Recognizer + ?Sized>(
    lexicon: &Lexicon,
    recognizer: &R,
    text: &str,
    tz: Tz,
) -> Result<Resolved> {
    let mut text = text.to_string();
    let mut spans = recognizer.find_all(&text, tz)?;
    debug!(spans = spans.len(), "recognized date spans");

    if spans.len() > 2 {
        let month = spans[0].matched_text.clone();
        let repaired = repair_shared_month(lexicon, &text, &month)?
            .ok_or(ExtractError::AmbiguousUnresolved)?;
        debug!(month = %month, repaired = %repaired, "repaired shared month");

        spans = recognizer.find_all(&repaired, tz)?;
        text = repaired;
        if spans.len() > 2 {
            return Err(ExtractError::AmbiguousUnresolved);
        }
    }

    let mut spans = spans.into_iter();
    let resolution = match (spans.next(), spans.next()) {
        (None, _) => return Err(ExtractError::NoMatch),
        (Some(only), None) => Resolution::Point(only),
        (Some(first), Some(second)) => Resolution::Interval(first, second),
    };
    Ok(Resolved { text, resolution })
}

/// Drop the preposition glued to a shared "<day> <month>" so the recognizer
/// stops splitting it.
///
/// Two shapes are looked for in `text`, both before any change is made:
/// a preposition followed by "<day> <month>" (the preposition is dropped),
/// and "<day> <month>" followed by a preposition (the trailing preposition
/// is dropped). Each replacement happens once. Returns `None` when neither
/// shape is present.
pub fn repair_shared_month(lexicon: &Lexicon, text: &str, month: &str) -> Result<Option<String>> {
    let (before, after) = lexicon.shared_month_patterns(month)?;
    let leading = before.find(text).map(|m| m.as_str().to_string());
    let trailing = after.find(text).map(|m| m.as_str().to_string());

    if leading.is_none() && trailing.is_none() {
        return Ok(None);
    }

    let mut repaired = text.to_string();
    if let Some(found) = leading {
        let words: Vec<&str> = found.split_whitespace().collect();
        if let Some((_, kept)) = words.split_first() {
            repaired = repaired.replacen(&found, &format!(" {} ", kept.join(" ")), 1);
        }
    }
    if let Some(found) = trailing {
        let words: Vec<&str> = found.split_whitespace().collect();
        if let Some((_, kept)) = words.split_last() {
            repaired = repaired.replacen(&found, &format!(" {} ", kept.join(" ")), 1);
        }
    }

    Ok(Some(lexicon.collapse_spaces(&repaired)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use std::collections::HashMap;

    /// Answers `find_all` from a fixed table keyed by the exact input text.
    #[derive(Default)]
    struct Scripted {
        answers: HashMap<String, Vec<RecognizedSpan>>,
    }

    impl Scripted {
        fn answer(mut self, text: &str, spans: &[(&str, NaiveDateTime)]) -> Self {
            let spans = spans
                .iter()
                .map(|(matched, instant)| RecognizedSpan::new(*matched, *instant))
                .collect();
            self.answers.insert(text.to_string(), spans);
            self
        }
    }

    impl Recognizer for Scripted {
        fn find_all(&self, text: &str, _tz: Tz) -> Result<Vec<RecognizedSpan>> {
            Ok(self.answers.get(text).cloned().unwrap_or_default())
        }

        fn parse_one(&self, _text: &str, _tz: Tz) -> Result<Option<NaiveDateTime>> {
            Ok(None)
        }
    }

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 22)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    const SPLIT: &str = "сходить до вечера полить огород с 22 марта 14:00 по 22 марта 20:00";
    const REPAIRED: &str = "сходить до вечера полить огород 22 марта 14:00 по 22 марта 20:00";

    #[test]
    fn test_repair_leading_preposition() {
        let repaired = repair_shared_month(Lexicon::shared(), SPLIT, "марта").unwrap();
        assert_eq!(repaired.as_deref(), Some(REPAIRED));
    }

    #[test]
    fn test_repair_trailing_preposition() {
        let repaired = repair_shared_month(
            Lexicon::shared(),
            "полить огород 22 марта с 14:00 по 20:00",
            "марта",
        )
        .unwrap();
        assert_eq!(repaired.as_deref(), Some("полить огород 22 марта 14:00 по 20:00"));
    }

    #[test]
    fn test_repair_not_applicable() {
        let repaired =
            repair_shared_month(Lexicon::shared(), "обед 22 марта 14:00", "марта").unwrap();
        assert_eq!(repaired, None);
    }

    #[test]
    fn test_resolve_no_spans() {
        let result = resolve(Lexicon::shared(), &Scripted::default(), "ничего", Tz::UTC);
        assert!(matches!(result, Err(ExtractError::NoMatch)));
    }

    #[test]
    fn test_resolve_point_and_interval() {
        let recognizer = Scripted::default()
            .answer("a 10:00", &[("10:00", at(10, 0))])
            .answer("b 10:00 до 12:00", &[("10:00", at(10, 0)), ("12:00", at(12, 0))]);

        let point = resolve(Lexicon::shared(), &recognizer, "a 10:00", Tz::UTC).unwrap();
        assert!(matches!(point.resolution, Resolution::Point(_)));

        let interval =
            resolve(Lexicon::shared(), &recognizer, "b 10:00 до 12:00", Tz::UTC).unwrap();
        assert!(matches!(interval.resolution, Resolution::Interval(_, _)));
        assert_eq!(interval.text, "b 10:00 до 12:00");
    }

    #[test]
    fn test_resolve_repairs_shared_month() {
        let recognizer = Scripted::default()
            .answer(
                SPLIT,
                &[
                    ("марта", at(0, 0)),
                    ("14:00", at(14, 0)),
                    ("22 марта 20:00", at(20, 0)),
                ],
            )
            .answer(
                REPAIRED,
                &[("22 марта 14:00", at(14, 0)), ("22 марта 20:00", at(20, 0))],
            );

        let resolved = resolve(Lexicon::shared(), &recognizer, SPLIT, Tz::UTC).unwrap();
        assert_eq!(resolved.text, REPAIRED);
        match resolved.resolution {
            Resolution::Interval(first, second) => {
                assert_eq!(first.matched_text, "22 марта 14:00");
                assert_eq!(second.matched_text, "22 марта 20:00");
            }
            other => panic!("expected interval, got {other:?}"),
        }
    }

    #[test]
    fn test_resolve_unrepairable() {
        let recognizer = Scripted::default().answer(
            "10:00 12:00 14:00",
            &[("10:00", at(10, 0)), ("12:00", at(12, 0)), ("14:00", at(14, 0))],
        );
        let result = resolve(Lexicon::shared(), &recognizer, "10:00 12:00 14:00", Tz::UTC);
        assert!(matches!(result, Err(ExtractError::AmbiguousUnresolved)));
    }

    #[test]
    fn test_resolve_still_ambiguous_after_repair() {
        let recognizer = Scripted::default()
            .answer(
                SPLIT,
                &[
                    ("марта", at(0, 0)),
                    ("14:00", at(14, 0)),
                    ("22 марта 20:00", at(20, 0)),
                ],
            )
            .answer(
                REPAIRED,
                &[
                    ("22 марта", at(0, 0)),
                    ("14:00", at(14, 0)),
                    ("22 марта 20:00", at(20, 0)),
                ],
            );
        let result = resolve(Lexicon::shared(), &recognizer, SPLIT, Tz::UTC);
        assert!(matches!(result, Err(ExtractError::AmbiguousUnresolved)));
    }

    #[test]
    fn test_resolve_repair_yields_nothing() {
        let recognizer = Scripted::default().answer(
            SPLIT,
            &[("марта", at(0, 0)), ("14:00", at(14, 0)), ("20:00", at(20, 0))],
        );
        let result = resolve(Lexicon::shared(), &recognizer, SPLIT, Tz::UTC);
        assert!(matches!(result, Err(ExtractError::NoMatch)));
    }
}
