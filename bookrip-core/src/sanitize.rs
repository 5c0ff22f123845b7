//! Filesystem-safe names from arbitrary tag text.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

static UNDERSCORE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new("_+").expect("valid regex"));

/// Maps a string onto `[a-zA-Z0-9._/-]`.
///
/// The text is NFKD-decomposed so accented letters keep their base letter,
/// anything still outside ASCII is dropped, quotes are removed, every other
/// disallowed character becomes `_`, and runs of `_` collapse to one.
/// `/` is kept so a whole relative path can be sanitized in one call.
pub fn sanitize(s: &str) -> String {
    let mapped: String = s
        .nfkd()
        .filter(char::is_ascii)
        .filter(|c| *c != '\'' && *c != '"')
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '/' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    UNDERSCORE_RUNS.replace_all(&mapped, "_").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_clean(s: &str) -> bool {
        s.chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '/' | '-'))
    }

    #[test]
    fn test_clean_input_is_unchanged() {
        assert_eq!(sanitize("TheHobbit1937"), "TheHobbit1937");
        assert_eq!(sanitize("Audiobooks/Tolkien/The_Hobbit"), "Audiobooks/Tolkien/The_Hobbit");
    }

    #[test]
    fn test_spaces_and_punctuation() {
        assert_eq!(sanitize("J. R. R. Tolkien"), "J._R._R._Tolkien");
        assert_eq!(sanitize("Book: Part 1 (of 2)"), "Book_Part_1_of_2_");
        assert_eq!(sanitize("a   b"), "a_b");
    }

    #[test]
    fn test_quotes_are_removed() {
        assert_eq!(sanitize("Ender's Game"), "Enders_Game");
        assert_eq!(sanitize("\"Quoted\" Title"), "Quoted_Title");
    }

    #[test]
    fn test_accents_decompose() {
        assert_eq!(sanitize("Les Misérables"), "Les_Miserables");
        assert_eq!(sanitize("Gödel, Escher, Bach"), "Godel_Escher_Bach");
        // NFKD also unpacks compatibility ligatures
        assert_eq!(sanitize("ﬁne"), "fine");
    }

    #[test]
    fn test_non_latin_is_dropped() {
        assert_eq!(sanitize("三体 The Three-Body Problem"), "_The_Three-Body_Problem");
        assert_eq!(sanitize("日本"), "");
    }

    #[test]
    fn test_output_charset_and_idempotence() {
        let samples = [
            "",
            "plain",
            "Ünïcödé & friends!",
            "tab\tnew\nline",
            "__leading__and__trailing__",
            "emoji 🎧 audio",
            "path/with spaces/and'quotes\"",
            "Ωmega—dash…",
        ];
        for sample in samples {
            let once = sanitize(sample);
            assert!(is_clean(&once), "{:?} produced {:?}", sample, once);
            assert!(!once.contains("__"), "{:?} produced {:?}", sample, once);
            assert_eq!(sanitize(&once), once, "not idempotent for {:?}", sample);
        }
    }
}
