//! Source text cleanup: channel mentions out, whitespace normalized.

use regex::Regex;
use std::sync::LazyLock;

static CHANNEL_MENTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@\w+").expect("static mention pattern"));

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("static whitespace pattern"));

/// Removes `@name` mentions, collapses whitespace runs (newlines included) into one space, trims.
///
/// Total and idempotent: a removed mention always ends at a non-word character, so removal
/// never glues a new mention together.
pub fn sanitize(text: &str) -> String {
    let without_mentions = CHANNEL_MENTION.replace_all(text, "");
    WHITESPACE_RUN
        .replace_all(&without_mentions, " ")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_mention_and_extra_spaces() {
        assert_eq!(
            sanitize("Цены выросли @somechannel   на 5%"),
            "Цены выросли на 5%"
        );
    }

    #[test]
    fn empty_stays_empty() {
        assert_eq!(sanitize(""), "");
        assert_eq!(sanitize("   \n\t "), "");
        assert_eq!(sanitize("@only_mention"), "");
    }

    #[test]
    fn newlines_become_single_spaces() {
        assert_eq!(sanitize("first line\n\nsecond\r\nthird"), "first line second third");
    }

    #[test]
    fn bare_at_sign_is_kept() {
        assert_eq!(sanitize("mail me @ home"), "mail me @ home");
    }
}
