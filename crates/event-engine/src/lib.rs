//! # event-engine
//!
//! Extract a named event and its time interval from one colloquial Russian
//! sentence, such as "встреча с васенькой завтра в 17:00 до 16:00".
//!
//! The engine does not recognize dates by itself. It normalizes the text,
//! asks a [`Recognizer`] for the date-bearing substrings, and turns those raw
//! matches into a single point or interval event plus a cleaned name. The
//! built-in [`RussianRecognizer`] covers the lexicon vocabulary; any other
//! recognizer can be plugged in.
//!
//! ## Modules
//!
//! - [`lexicon`] — Prepositions, day words and months, compiled once
//! - [`normalize`] — Whitespace and preposition clean-up, relative day expansion
//! - [`recognizer`] — The recognizer interface and the built-in Russian recognizer
//! - [`resolve`] — Classify recognized spans, repair a shared month reference
//! - [`interval`] — Build point and interval events on the right calendar day
//! - [`name`] — Event name extraction
//! - [`midday`] — "полдень"/"полночь" to clock times
//! - [`extract`] — The event and bare-date entry points
//! - [`api`] — Request/response records and timezone validation
//! - [`config`] — Defaults with environment overrides
//! - [`error`] — Error types

pub mod api;
pub mod config;
pub mod error;
pub mod extract;
pub mod interval;
pub mod lexicon;
pub mod midday;
pub mod name;
pub mod normalize;
pub mod recognizer;
pub mod resolve;

pub use api::{
    handle_date, handle_event, parse_timezone, DateResponse, ErrorResponse, EventReply,
    EventResponse, ParseRequest,
};
pub use config::Config;
pub use error::ExtractError;
pub use extract::Extractor;
pub use interval::EventInterval;
pub use lexicon::Lexicon;
pub use midday::normalize_midday;
pub use normalize::normalize;
pub use recognizer::{RecognizedSpan, Recognizer, RussianRecognizer};
pub use resolve::{resolve, Resolution, Resolved};
