// ============================================================
// Layer 4 — Text Normalizer
// ============================================================
// Cleans tweet text before tokenisation.
//
// Cleaning steps (applied in this order):
//   1. Lowercase
//   2. Remove URL tokens      http followed by non-whitespace
//   3. Remove @-mentions      @ followed by word characters
//   4. Remove everything that is not an ASCII letter or whitespace
//   5. Collapse whitespace runs into a single space
//
// URLs and mentions go first: once step 4 has run, "http://x.co"
// is just "httpxco" glued to its neighbours and "@user" is "user".
//
// No trimming happens. "Check http://x.co now" becomes "check now"
// plus whatever spaces the removed tokens leave behind.
//
// Character classes are ASCII: \s is [ \t\n\x0B\x0C\r] and \w is
// [A-Za-z0-9_]. A non-breaking space counts as punctuation.
//
// Reference: regex crate documentation
//            Rust Book §8 (Strings in Rust)

use once_cell::sync::Lazy;
use regex::Regex;

static URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"http[^\t\n\x0B\x0C\r ]+").expect("URL pattern compiles"));

static MENTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"@[A-Za-z0-9_]+").expect("mention pattern compiles"));

static NON_ALPHA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-zA-Z\t\n\x0B\x0C\r ]").expect("alpha pattern compiles"));

static WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\t\n\x0B\x0C\r ]+").expect("whitespace pattern compiles"));

pub struct TextNormalizer;

impl TextNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Apply the five cleaning steps. Pure: same input, same output.
    pub fn clean(&self, text: &str) -> String {
        let lowered   = text.to_lowercase();
        let no_urls   = URL.replace_all(&lowered, "");
        let no_users  = MENTION.replace_all(&no_urls, "");
        let letters   = NON_ALPHA.replace_all(&no_users, "");
        WHITESPACE.replace_all(&letters, " ").into_owned()
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_reference_example() {
        let n = TextNormalizer::new();
        assert_eq!(n.clean("Check http://x.co now @user!!"), "check now ");
    }

    #[test]
    fn test_lowercases() {
        assert_eq!(TextNormalizer::new().clean("LOVE This"), "love this");
    }

    #[test]
    fn test_strips_digits_and_punctuation() {
        assert_eq!(TextNormalizer::new().clean("gg 10/10, best!"), "gg best");
    }

    #[test]
    fn test_mention_before_alpha_filter() {
        // "@user_1" must vanish completely, not leave "user"
        assert_eq!(TextNormalizer::new().clean("hi @user_1 there"), "hi there");
    }

    #[test]
    fn test_https_and_trailing_path() {
        assert_eq!(
            TextNormalizer::new().clean("see https://t.co/abc?x=1 ok"),
            "see ok"
        );
    }

    #[test]
    fn test_collapses_tabs_and_newlines() {
        assert_eq!(TextNormalizer::new().clean("a\t\tb\n\nc"), "a b c");
    }

    #[test]
    fn test_non_ascii_is_removed() {
        assert_eq!(TextNormalizer::new().clean("café ☕ time"), "caf time");
    }

    #[test]
    fn test_may_become_empty() {
        assert_eq!(TextNormalizer::new().clean("!!! 123"), " ");
        assert_eq!(TextNormalizer::new().clean(""), "");
    }

    #[test]
    fn test_second_pass_is_noop_on_examples() {
        let n = TextNormalizer::new();
        for s in ["Check http://x.co now @user!!", "  Hello,   WORLD  ", "I <3 @xbox"] {
            let once = n.clean(s);
            assert_eq!(n.clean(&once), once);
        }
    }

    proptest! {
        #[test]
        fn prop_second_pass_is_noop(s in "[a-zA-Z \t.,!?@#0-9]{0,64}") {
            let n = TextNormalizer::new();
            let once = n.clean(&s);
            // a cleaned string can only re-trigger the URL rule through a
            // literal "http" prefix, which the generator may produce
            prop_assume!(!once.contains("http"));
            prop_assert_eq!(n.clean(&once), once);
        }
    }
}
