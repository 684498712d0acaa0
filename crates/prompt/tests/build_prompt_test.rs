//! Tests for `prompt::sanitize`, `prompt::build_prompt` and `prompt::attach_source`.
//!
//! Properties are checked over a fixed corpus of awkward inputs (mentions glued to punctuation,
//! mixed scripts, nested `@`, every kind of whitespace).
//! External interactions: none (pure function tests).

use prompt::{attach_source, build_prompt, sanitize, SECTION_STYLE, SECTION_TEXT};

const CORPUS: &[&str] = &[
    "",
    " ",
    "plain text",
    "Цены выросли @somechannel   на 5%",
    "@lead mention at start",
    "trailing mention @tail",
    "@@double at",
    "a@b@c@d",
    "email user@example.com inside",
    "punctuation @chan, and @chan2.",
    "tabs\tand\nnewlines\r\n\r\nmixed",
    "  @a  @b  @c  ",
    "@ spaced at",
    "emoji 🚀 @канал_новостей тест",
    "no-break\u{00A0}space and\u{2003}em space",
];

fn has_mention(s: &str) -> bool {
    let chars: Vec<char> = s.chars().collect();
    chars
        .windows(2)
        .any(|w| w[0] == '@' && (w[1].is_alphanumeric() || w[1] == '_'))
}

/// **Test: Sanitized output never contains `@` directly followed by a word character.**
#[test]
fn sanitize_removes_every_mention() {
    for input in CORPUS {
        let out = sanitize(input);
        assert!(!has_mention(&out), "mention left in {out:?} (from {input:?})");
    }
}

/// **Test: Sanitized output has no whitespace runs and no leading/trailing whitespace.**
#[test]
fn sanitize_normalizes_whitespace() {
    for input in CORPUS {
        let out = sanitize(input);
        let chars: Vec<char> = out.chars().collect();
        assert!(
            !chars.windows(2).any(|w| w[0].is_whitespace() && w[1].is_whitespace()),
            "whitespace run in {out:?}"
        );
        assert!(chars.iter().all(|c| !c.is_whitespace() || *c == ' '), "non-space whitespace in {out:?}");
        assert_eq!(out.trim(), out);
    }
}

/// **Test: sanitize(sanitize(x)) == sanitize(x).**
#[test]
fn sanitize_is_idempotent() {
    for input in CORPUS {
        let once = sanitize(input);
        assert_eq!(sanitize(&once), once, "not idempotent for {input:?}");
    }
}

/// **Test: The prompt contains the sanitized text verbatim, right after the text section title.**
#[test]
fn prompt_contains_text_verbatim() {
    for input in CORPUS {
        let text = sanitize(input);
        let prompt = build_prompt(&text, None);
        assert!(prompt.contains(&format!("{SECTION_TEXT}\n{text}")));
        let styled = build_prompt(&text, Some("короче"));
        assert!(styled.contains(&format!("{SECTION_TEXT}\n{text}")));
    }
}

/// **Test: Style block is present iff a non-empty style override is supplied.**
#[test]
fn prompt_style_block_only_for_non_empty_style() {
    let text = "Цены выросли на 5%";
    assert!(!build_prompt(text, None).contains(SECTION_STYLE));
    assert!(!build_prompt(text, Some("")).contains(SECTION_STYLE));
    assert!(!build_prompt(text, Some("  \n ")).contains(SECTION_STYLE));

    let styled = build_prompt(text, Some("короче"));
    assert!(styled.ends_with(&format!("{text}\n\n{SECTION_STYLE}\nкороче")));
}

/// **Test: Source is appended to the result with the fixed label; absent or blank source leaves it unchanged.**
#[test]
fn attach_source_appends_label() {
    assert_eq!(
        attach_source("Цены на товары подскочили на 5%.".to_string(), Some("Реальное время")),
        "Цены на товары подскочили на 5%.\n\nТекст из: Реальное время"
    );
    assert_eq!(attach_source("body".to_string(), None), "body");
    assert_eq!(attach_source("body".to_string(), Some(" ")), "body");
}
