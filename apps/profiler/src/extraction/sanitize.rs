//! Repairs applied to model output before it is parsed or written into a profile.

use std::sync::LazyLock;

use regex::Regex;

use crate::schema::OPEN;

/// Values the model uses to say "not present". Compared case-insensitively.
const NEGATIVE_TOKENS: &[&str] = &[
    "n/a",
    "na",
    "not mentioned",
    "not specified",
    "not available",
    "not provided",
    "none",
    "unknown",
    "open",
];

static BARE_NA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":\s*N/A\b").expect("valid N/A pattern"));
static LINE_BREAKS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\r\n]+").expect("valid line break pattern"));
static TRAILING_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",(\s*[}\]])").expect("valid trailing comma pattern"));

static LEADING_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^OPEN\b").expect("valid OPEN pattern"));
static WRAPPER_PHRASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^[^:\n]*\b(extract|extracted|job description|here is|here are|based on|the following)\b[^:\n]*:\s*",
    )
    .expect("valid wrapper pattern")
});
static ECHOED_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(the\s+)?(job\s+)?(title|summary|skills?)(\s+is)?\s*:\s*")
        .expect("valid label pattern")
});
static PARENTHETICAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\([^()]*\)").expect("valid parenthetical pattern"));
static LEADING_BULLET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-•*]\s*").expect("valid bullet pattern"));
static TRAILING_PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*[.!?]+$").expect("valid punctuation pattern"));
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

/// Normalizes common structural defects in model-produced JSON text.
///
/// - `"N/A"`, `'N/A'` and a bare `N/A` after a colon become `null`
/// - embedded line breaks become single spaces
/// - trailing commas before `}` or `]` are removed
///
/// Pure and idempotent on inputs that have already been sanitized.
pub fn sanitize_json(text: &str) -> String {
    let text = text.replace("\"N/A\"", "null").replace("'N/A'", "null");
    let text = BARE_NA.replace_all(&text, ": null");
    let mut text = LINE_BREAKS.replace_all(&text, " ").into_owned();

    while TRAILING_COMMA.is_match(&text) {
        text = TRAILING_COMMA.replace_all(&text, "$1").into_owned();
    }
    text
}

/// Cleans a free-text field value before it is coerced into the schema.
///
/// Lossy on purpose: explanatory wrappers, asides and quotes are dropped and any
/// "not present" phrasing collapses to `OPEN`.
pub fn clean_field_value(raw: &str) -> String {
    let value = raw.trim();
    if value.is_empty() || LEADING_OPEN.is_match(value) {
        return OPEN.to_string();
    }

    let value = WRAPPER_PHRASE.replace(value, "");
    let value = ECHOED_LABEL.replace(value.trim_start(), "");
    let value = PARENTHETICAL.replace_all(&value, "");
    let value = value.replace('"', "");
    let value = value.trim().trim_matches('\'');
    let value = LEADING_BULLET.replace(value.trim(), "");
    let value = WHITESPACE.replace_all(&value, " ");
    let value = TRAILING_PUNCTUATION.replace(value.trim(), "");
    let value = value.trim();

    if value.is_empty() || is_negative(value) {
        return OPEN.to_string();
    }
    value.to_string()
}

fn is_negative(value: &str) -> bool {
    NEGATIVE_TOKENS
        .iter()
        .any(|token| value.eq_ignore_ascii_case(token))
}
