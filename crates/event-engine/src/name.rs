//! Event name extraction: what is left once the date text is gone.

use crate::lexicon::Lexicon;

/// Remove every occurrence of `date_text` from `text` and clean up the rest:
/// whitespace is collapsed, and dangling trailing prepositions are dropped
/// along with sentence punctuation left behind by the date.
pub fn event_name(lexicon: &Lexicon, text: &str, date_text: &str) -> String {
    let name = if date_text.is_empty() {
        text.to_string()
    } else {
        text.replace(date_text, "")
    };
    lexicon.strip_trailing_preposition(&lexicon.collapse_spaces(&name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(text: &str, date_text: &str) -> String {
        event_name(Lexicon::shared(), text, date_text)
    }

    #[test]
    fn test_trailing_date() {
        assert_eq!(run("созвон в 10:00", "10:00"), "созвон");
    }

    #[test]
    fn test_date_in_the_middle() {
        assert_eq!(run("созвон 10:00 с командой", "10:00"), "созвон с командой");
    }

    #[test]
    fn test_keeps_inner_prepositions() {
        assert_eq!(
            run(
                "сходить до вечера полить огород с 22 марта 14:00 по 22 марта 20:00",
                "22 марта 14:00 по 22 марта 20:00"
            ),
            "сходить до вечера полить огород"
        );
    }

    #[test]
    fn test_sentence_punctuation_is_dropped_with_the_preposition() {
        assert_eq!(run("созвон в 10:00.", "10:00"), "созвон");
        assert_eq!(run("встреча в 10:00 до 12:00!", "10:00 до 12:00"), "встреча");
        assert_eq!(run("обед завтра в 13:00,", "завтра в 13:00"), "обед");
    }

    #[test]
    fn test_only_date() {
        assert_eq!(run("в 10:00", "10:00"), "");
    }
}
