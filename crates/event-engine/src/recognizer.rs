//! The date/time recognizer the engine delegates to.
//!
//! The engine only needs two capabilities: find every date-bearing substring
//! in a text, and resolve a whole text to one instant. Both are expressed by
//! the [`Recognizer`] trait so any implementation can be plugged in.
//!
//! [`RussianRecognizer`] is the built-in implementation. It is deliberately
//! small: it understands relative day words, `HH:MM` clock times and
//! `<day> <month> [<year>]` calendar dates, joined by the connective "в".
//! Like the rest of the crate it never reads the clock on its own; the
//! caller provides the "now" anchor.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use crate::error::Result;
use crate::lexicon::{self, AT};

/// A substring the recognizer judged to denote a date/time, with the
/// wall-clock instant it resolves to in the requested timezone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecognizedSpan {
    pub matched_text: String,
    pub instant: NaiveDateTime,
}

impl RecognizedSpan {
    pub fn new(matched_text: impl Into<String>, instant: NaiveDateTime) -> Self {
        Self {
            matched_text: matched_text.into(),
            instant,
        }
    }
}

/// Natural-language date/time recognition.
pub trait Recognizer {
    /// Every date/time-bearing substring of `text`, left to right and
    /// non-overlapping. An empty vector means nothing was found.
    fn find_all(&self, text: &str, tz: Tz) -> Result<Vec<RecognizedSpan>>;

    /// The single best instant for the whole of `text`, if it denotes one.
    fn parse_one(&self, text: &str, tz: Tz) -> Result<Option<NaiveDateTime>>;
}

impl<R: Recognizer + ?Sized> Recognizer for &R {
    fn find_all(&self, text: &str, tz: Tz) -> Result<Vec<RecognizedSpan>> {
        (**self).find_all(text, tz)
    }

    fn parse_one(&self, text: &str, tz: Tz) -> Result<Option<NaiveDateTime>> {
        (**self).parse_one(text, tz)
    }
}

// ── RussianRecognizer ───────────────────────────────────────────────────────

/// Built-in recognizer for the Russian lexicon vocabulary.
///
/// Day words resolve to the start of the local day, calendar dates without
/// a year fall in the anchor's local year, and a bare clock time lands on
/// the anchor's local day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RussianRecognizer {
    anchor: DateTime<Utc>,
}

impl RussianRecognizer {
    /// A recognizer that resolves relative expressions against `anchor`.
    pub fn new(anchor: DateTime<Utc>) -> Self {
        Self { anchor }
    }

    /// A recognizer anchored at the current system time.
    pub fn now() -> Self {
        Self::new(Utc::now())
    }

    pub fn anchor(&self) -> DateTime<Utc> {
        self.anchor
    }

    fn today(&self, tz: Tz) -> NaiveDate {
        self.anchor.with_timezone(&tz).date_naive()
    }

    fn scan(&self, text: &str, tz: Tz) -> Scan {
        let today = self.today(tz);
        let elements = classify(&tokenize(text), today);
        group(&elements, today)
    }
}

impl Recognizer for RussianRecognizer {
    fn find_all(&self, text: &str, tz: Tz) -> Result<Vec<RecognizedSpan>> {
        let scan = self.scan(text, tz);
        Ok(scan
            .spans
            .into_iter()
            .map(|span| RecognizedSpan::new(&text[span.start..span.end], span.instant))
            .collect())
    }

    fn parse_one(&self, text: &str, tz: Tz) -> Result<Option<NaiveDateTime>> {
        let scan = self.scan(text.trim(), tz);
        if scan.has_other_words || scan.spans.len() != 1 {
            return Ok(None);
        }
        Ok(scan.spans.first().map(|span| span.instant))
    }
}

// ── Scanning ────────────────────────────────────────────────────────────────

/// A whitespace-delimited word with its byte range in the source text.
#[derive(Debug, Clone, Copy)]
struct Token<'t> {
    word: &'t str,
    start: usize,
    end: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Part {
    Date(NaiveDate),
    Time(NaiveTime),
}

#[derive(Debug, Clone, Copy)]
enum Element {
    Part { part: Part, start: usize, end: usize },
    Connective,
    Other,
}

#[derive(Debug, Clone, Copy)]
struct Span {
    start: usize,
    end: usize,
    instant: NaiveDateTime,
}

#[derive(Debug, Default)]
struct Scan {
    spans: Vec<Span>,
    has_other_words: bool,
}

/// Split on whitespace, dropping trailing punctuation from each word.
fn tokenize(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut start = None;
    for (idx, ch) in text.char_indices().chain(std::iter::once((text.len(), ' '))) {
        match (ch.is_whitespace(), start) {
            (true, Some(s)) => {
                let word = text[s..idx].trim_end_matches(lexicon::TRAILING_PUNCTUATION);
                if !word.is_empty() {
                    tokens.push(Token {
                        word,
                        start: s,
                        end: s + word.len(),
                    });
                }
                start = None;
            }
            (false, None) => start = Some(idx),
            _ => {}
        }
    }
    tokens
}

fn classify(tokens: &[Token<'_>], today: NaiveDate) -> Vec<Element> {
    let mut elements = Vec::with_capacity(tokens.len());
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i];
        let word = token.word.to_lowercase();

        if let Some(offset) = lexicon::day_offset(&word) {
            elements.push(Element::Part {
                part: Part::Date(today + Duration::days(offset)),
                start: token.start,
                end: token.end,
            });
            i += 1;
        } else if let Some(time) = parse_clock(&word) {
            elements.push(Element::Part {
                part: Part::Time(time),
                start: token.start,
                end: token.end,
            });
            i += 1;
        } else if let Some((date, consumed)) = parse_calendar_date(&tokens[i..], today.year()) {
            elements.push(Element::Part {
                part: Part::Date(date),
                start: token.start,
                end: tokens[i + consumed - 1].end,
            });
            i += consumed;
        } else if word == AT {
            elements.push(Element::Connective);
            i += 1;
        } else {
            elements.push(Element::Other);
            i += 1;
        }
    }
    elements
}

/// Join adjacent parts into spans. A span holds at most one date and one
/// time; a repeated kind, or any unrelated word, starts a new span.
fn group(elements: &[Element], today: NaiveDate) -> Scan {
    #[derive(Clone, Copy)]
    struct Open {
        start: usize,
        end: usize,
        date: Option<NaiveDate>,
        time: Option<NaiveTime>,
    }

    fn close(open: Open, today: NaiveDate) -> Span {
        let date = open.date.unwrap_or(today);
        let time = open.time.unwrap_or(NaiveTime::MIN);
        Span {
            start: open.start,
            end: open.end,
            instant: date.and_time(time),
        }
    }

    let mut scan = Scan::default();
    let mut open: Option<Open> = None;

    for element in elements {
        match *element {
            Element::Part { part, start, end } => {
                let joined = open.as_mut().is_some_and(|span| match part {
                    Part::Date(d) if span.date.is_none() => {
                        span.date = Some(d);
                        span.end = end;
                        true
                    }
                    Part::Time(t) if span.time.is_none() => {
                        span.time = Some(t);
                        span.end = end;
                        true
                    }
                    _ => false,
                });
                if !joined {
                    if let Some(done) = open.take() {
                        scan.spans.push(close(done, today));
                    }
                    let (date, time) = match part {
                        Part::Date(d) => (Some(d), None),
                        Part::Time(t) => (None, Some(t)),
                    };
                    open = Some(Open {
                        start,
                        end,
                        date,
                        time,
                    });
                }
            }
            Element::Connective => {}
            Element::Other => {
                scan.has_other_words = true;
                if let Some(done) = open.take() {
                    scan.spans.push(close(done, today));
                }
            }
        }
    }
    if let Some(done) = open {
        scan.spans.push(close(done, today));
    }
    scan
}

/// Parse `H:MM` / `HH:MM` (one or two digits on each side).
fn parse_clock(word: &str) -> Option<NaiveTime> {
    let (hours, minutes) = word.split_once(':')?;
    if !is_short_number(hours) || !is_short_number(minutes) {
        return None;
    }
    NaiveTime::from_hms_opt(hours.parse().ok()?, minutes.parse().ok()?, 0)
}

fn is_short_number(s: &str) -> bool {
    (1..=2).contains(&s.len()) && s.bytes().all(|b| b.is_ascii_digit())
}

/// Parse `<day> <month> [<year> [года|г.]]` at the start of `tokens`,
/// returning the date and the number of tokens consumed.
fn parse_calendar_date(tokens: &[Token<'_>], default_year: i32) -> Option<(NaiveDate, usize)> {
    let day_word = tokens.first()?.word;
    if !is_short_number(day_word) {
        return None;
    }
    let day: u32 = day_word.parse().ok()?;
    let month = lexicon::month_number(tokens.get(1)?.word)?;

    let mut consumed = 2;
    let mut year = default_year;
    if let Some(next) = tokens.get(2) {
        if next.word.len() == 4 && next.word.bytes().all(|b| b.is_ascii_digit()) {
            year = next.word.parse().ok()?;
            consumed = 3;
            if let Some(suffix) = tokens.get(3) {
                if matches!(suffix.word.to_lowercase().as_str(), "года" | "г") {
                    consumed = 4;
                }
            }
        }
    }

    NaiveDate::from_ymd_opt(year, month, day).map(|date| (date, consumed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn anchor() -> DateTime<Utc> {
        // Wednesday, February 18, 2026, 14:30:00 UTC
        Utc.with_ymd_and_hms(2026, 2, 18, 14, 30, 0).unwrap()
    }

    fn recognizer() -> RussianRecognizer {
        RussianRecognizer::new(anchor())
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_find_all_day_word_with_time() {
        let spans = recognizer()
            .find_all("встреча завтра в 17:00 до 16:00", Tz::UTC)
            .unwrap();
        assert_eq!(
            spans,
            vec![
                RecognizedSpan::new("завтра в 17:00", at(2026, 2, 19, 17, 0)),
                RecognizedSpan::new("16:00", at(2026, 2, 18, 16, 0)),
            ]
        );
    }

    #[test]
    fn test_find_all_calendar_dates() {
        let spans = recognizer()
            .find_all("огород с 22 марта 14:00 по 22 марта 20:00", Tz::UTC)
            .unwrap();
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].matched_text, "22 марта 14:00");
        assert_eq!(spans[0].instant, at(2026, 3, 22, 14, 0));
        assert_eq!(spans[1].matched_text, "22 марта 20:00");
        assert_eq!(spans[1].instant, at(2026, 3, 22, 20, 0));
    }

    #[test]
    fn test_find_all_explicit_year() {
        let spans = recognizer()
            .find_all("отпуск 1 июня 2027 года", Tz::UTC)
            .unwrap();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].matched_text, "1 июня 2027 года");
        assert_eq!(spans[0].instant, at(2027, 6, 1, 0, 0));
    }

    #[test]
    fn test_find_all_ignores_trailing_punctuation() {
        let spans = recognizer().find_all("созвон в 10:00, не забыть", Tz::UTC).unwrap();
        assert_eq!(spans, vec![RecognizedSpan::new("10:00", at(2026, 2, 18, 10, 0))]);
    }

    #[test]
    fn test_find_all_nothing() {
        let spans = recognizer().find_all("просто текст без дат", Tz::UTC).unwrap();
        assert!(spans.is_empty());
    }

    #[test]
    fn test_find_all_rejects_invalid_values() {
        let spans = recognizer()
            .find_all("в 25:00 или 31 февраля", Tz::UTC)
            .unwrap();
        assert!(spans.is_empty());
    }

    #[test]
    fn test_today_follows_timezone() {
        // 14:30 UTC on Feb 18 is already Feb 19 in Auckland (UTC+13).
        let tz: Tz = "Pacific/Auckland".parse().unwrap();
        let instant = recognizer().parse_one("сегодня", tz).unwrap();
        assert_eq!(instant, Some(at(2026, 2, 19, 0, 0)));
    }

    #[test]
    fn test_parse_one_whole_text() {
        let r = recognizer();
        assert_eq!(
            r.parse_one("завтра в 12:00", Tz::UTC).unwrap(),
            Some(at(2026, 2, 19, 12, 0))
        );
        assert_eq!(
            r.parse_one(" послезавтра ", Tz::UTC).unwrap(),
            Some(at(2026, 2, 20, 0, 0))
        );
        assert_eq!(r.parse_one("завтра обед", Tz::UTC).unwrap(), None);
        assert_eq!(r.parse_one("10:00 до 12:00", Tz::UTC).unwrap(), None);
        assert_eq!(r.parse_one("", Tz::UTC).unwrap(), None);
    }

    #[test]
    fn test_repeated_kind_starts_new_span() {
        let spans = recognizer().find_all("10:00 12:00", Tz::UTC).unwrap();
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[1].matched_text, "12:00");
    }

    #[test]
    fn test_parse_clock() {
        assert_eq!(parse_clock("9:05"), NaiveTime::from_hms_opt(9, 5, 0));
        assert_eq!(parse_clock("23:59"), NaiveTime::from_hms_opt(23, 59, 0));
        assert_eq!(parse_clock("24:00"), None);
        assert_eq!(parse_clock("123:00"), None);
        assert_eq!(parse_clock("12:"), None);
    }
}
