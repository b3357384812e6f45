//! "полдень" / "полночь" to literal clock times.

use crate::lexicon::Lexicon;

const MIDDAY: &str = " 12:00 ";
const MIDNIGHT: &str = " 00:00 ";

/// Replace the first midday or midnight phrase with `12:00` or `00:00`.
///
/// Text without such a phrase is returned unchanged. When a phrase is found
/// the result is trimmed.
pub fn normalize_midday(lexicon: &Lexicon, text: &str) -> String {
    let Some(found) = lexicon.midday_midnight().find(text) else {
        return text.to_string();
    };

    let word = found.as_str().trim().to_lowercase();
    let replacement = if word.contains("дн") || word.contains("ден") {
        MIDDAY
    } else if word.contains("ноч") {
        MIDNIGHT
    } else {
        return text.trim().to_string();
    };

    let mut result = String::with_capacity(text.len());
    result.push_str(&text[..found.start()]);
    result.push_str(replacement);
    result.push_str(&text[found.end()..]);
    result.trim().to_string()
}
