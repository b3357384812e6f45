//! The fixed Russian vocabulary the engine is built around.
//!
//! Every regular expression used by the pipeline lives here and is compiled
//! once. A [`Lexicon`] is immutable after construction and is shared by
//! reference across requests ([`Lexicon::shared`] hands out the process-wide
//! instance).

use std::sync::{Arc, OnceLock};

use regex::Regex;

use crate::error::Result;

/// The canonical "at" preposition every start/range preposition is rewritten to.
pub const AT: &str = "в";

/// Punctuation that may trail a word without being part of it.
pub const TRAILING_PUNCTUATION: &[char] = &[',', '.', '!', '?', ';'];

/// Relative day words and their offset in days from today.
pub const DAY_WORDS: &[(&str, i64)] = &[
    ("позавчера", -2),
    ("вчера", -1),
    ("сегодня", 0),
    ("завтра", 1),
    ("послезавтра", 2),
];

/// Month names (genitive first, then nominative) with their month number.
pub const MONTHS: &[(&str, u32)] = &[
    ("января", 1),
    ("февраля", 2),
    ("марта", 3),
    ("апреля", 4),
    ("мая", 5),
    ("июня", 6),
    ("июля", 7),
    ("августа", 8),
    ("сентября", 9),
    ("октября", 10),
    ("ноября", 11),
    ("декабря", 12),
    ("январь", 1),
    ("февраль", 2),
    ("март", 3),
    ("апрель", 4),
    ("май", 5),
    ("июнь", 6),
    ("июль", 7),
    ("август", 8),
    ("сентябрь", 9),
    ("октябрь", 10),
    ("ноябрь", 11),
    ("декабрь", 12),
];

const SPACES: &str = r"\s+";
const END_PREPOSITION: &str = r"(?i)\s+(до|по)\s+";
const START_PREPOSITION: &str = r"(?i)\s+(начиная с|начиная в|начиная|с|в)\s+";
const RANGE_PREPOSITION: &str = r"(?i)\s+(начиная с|начиная|с|в|до|по)\s+";
const TRAILING_PREPOSITION: &str = r"(?i)(?:^|\s+)(начиная с|начиная|с|в|на|до|по)$";
const DAY_WORD: &str = r"(?i)(?:^|\s)(позавчера|вчера|сегодня|завтра|послезавтра)(?:\s|$)";
const TIME_PREPOSITION: &str = r"(?i)(^|\s)(начиная с|начиная|с|в|на)(\s+\d{1,2}:\d{1,2})";
const DATE_PREPOSITION: &str = r"(?i)(^|\s)+(начиная с|начиная|с|в|до|по)\s+";
const MIDDAY_MIDNIGHT: &str =
    r"(?i)(^|\s)+пол(удня|удню|день|дня|дню|уночь|уночи|ночью|ночь|ночи|)($|\s)+";

/// Prepositions that may sit next to a "<day> <month>" date in a range.
const MONTH_PREPOSITIONS: &str = "до|по|на|с|в";

/// Compiled patterns for every lexical rule of the pipeline.
#[derive(Debug, Clone)]
pub struct Lexicon {
    spaces: Regex,
    end_preposition: Regex,
    start_preposition: Regex,
    range_preposition: Regex,
    trailing_preposition: Regex,
    day_word: Regex,
    time_preposition: Regex,
    date_preposition: Regex,
    midday_midnight: Regex,
}

impl Lexicon {
    /// Compile the lexicon.
    pub fn new() -> Result<Self> {
        Ok(Self {
            spaces: Regex::new(SPACES)?,
            end_preposition: Regex::new(END_PREPOSITION)?,
            start_preposition: Regex::new(START_PREPOSITION)?,
            range_preposition: Regex::new(RANGE_PREPOSITION)?,
            trailing_preposition: Regex::new(TRAILING_PREPOSITION)?,
            day_word: Regex::new(DAY_WORD)?,
            time_preposition: Regex::new(TIME_PREPOSITION)?,
            date_preposition: Regex::new(DATE_PREPOSITION)?,
            midday_midnight: Regex::new(MIDDAY_MIDNIGHT)?,
        })
    }

    /// The process-wide lexicon, compiled on first use.
    pub fn shared() -> &'static Lexicon {
        shared_handle()
    }

    /// A handle to the process-wide lexicon.
    pub fn shared_arc() -> Arc<Lexicon> {
        Arc::clone(shared_handle())
    }

    /// Collapse every whitespace run to one space and trim both ends.
    pub fn collapse_spaces(&self, text: &str) -> String {
        self.spaces.replace_all(text, " ").trim().to_string()
    }

    /// Whether `text` contains an end-of-range preposition ("до", "по").
    pub fn has_end_preposition(&self, text: &str) -> bool {
        self.end_preposition.is_match(text)
    }

    /// Rewrite every start preposition ("с", "начиная с", ...) to the canonical "в".
    pub fn canonicalize_start_prepositions(&self, text: &str) -> String {
        self.start_preposition
            .replace_all(text, format!(" {AT} ").as_str())
            .into_owned()
    }

    /// Rewrite every range or start preposition, including "до"/"по", to "в".
    pub fn canonicalize_range_prepositions(&self, text: &str) -> String {
        self.range_preposition
            .replace_all(text, format!(" {AT} ").as_str())
            .into_owned()
    }

    /// Rewrite every preposition the bare-date entry point accepts to "в".
    pub fn canonicalize_date_prepositions(&self, text: &str) -> String {
        self.date_preposition
            .replace_all(text, format!(" {AT} ").as_str())
            .into_owned()
    }

    /// Drop the prepositions left dangling at the very end of `text`,
    /// together with any trailing punctuation around them.
    pub fn strip_trailing_preposition(&self, text: &str) -> String {
        let mut name = trim_trailing_punctuation(text).to_string();
        while let Some(found) = self.trailing_preposition.find(&name) {
            name.truncate(found.start());
            name.truncate(trim_trailing_punctuation(&name).len());
        }
        name
    }

    /// The first relative day word in `text`, including the whitespace it
    /// was delimited by.
    pub fn find_day_word<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.day_word.find(text).map(|m| m.as_str())
    }

    pub fn contains_day_word(&self, text: &str) -> bool {
        self.day_word.is_match(text)
    }

    pub(crate) fn day_word(&self) -> &Regex {
        &self.day_word
    }

    pub(crate) fn time_preposition(&self) -> &Regex {
        &self.time_preposition
    }

    pub(crate) fn midday_midnight(&self) -> &Regex {
        &self.midday_midnight
    }

    /// Patterns locating a shared "<day> <month>" with a preposition before
    /// it and after it, respectively.
    pub fn shared_month_patterns(&self, month: &str) -> Result<(Regex, Regex)> {
        let month = regex::escape(month);
        let before = Regex::new(&format!(
            r"(?i)(^|\s)+({MONTH_PREPOSITIONS})\s+\d+\s+{month}($|\s)+"
        ))?;
        let after = Regex::new(&format!(
            r"(?i)(^|\s)+\d+\s+{month}\s+({MONTH_PREPOSITIONS})($|\s)+"
        ))?;
        Ok((before, after))
    }
}

fn shared_handle() -> &'static Arc<Lexicon> {
    static LEXICON: OnceLock<Arc<Lexicon>> = OnceLock::new();
    LEXICON.get_or_init(|| Arc::new(Lexicon::new().expect("built-in lexicon patterns compile")))
}

/// Trim trailing whitespace and [`TRAILING_PUNCTUATION`].
pub fn trim_trailing_punctuation(text: &str) -> &str {
    text.trim_end_matches(|c: char| c.is_whitespace() || TRAILING_PUNCTUATION.contains(&c))
}

/// Day offset for a relative day word, ignoring case and surrounding whitespace.
pub fn day_offset(word: &str) -> Option<i64> {
    let word = word.trim().to_lowercase();
    DAY_WORDS
        .iter()
        .find(|(w, _)| *w == word)
        .map(|(_, offset)| *offset)
}

/// Month number for a Russian month name, ignoring case.
pub fn month_number(word: &str) -> Option<u32> {
    let word = word.to_lowercase();
    MONTHS.iter().find(|(m, _)| *m == word).map(|(_, n)| *n)
}
