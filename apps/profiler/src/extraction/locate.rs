//! Locating structured content inside noisy model replies.
//!
//! Two reply shapes are supported: a JSON object (possibly fenced, possibly
//! surrounded by prose) and a `KEY: value` field block.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::schema::OPEN;

const JSON_FENCE: &str = "```json";
const FENCE: &str = "```";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("no balanced JSON object found ({scanned} bytes scanned)")]
    NotFound { scanned: usize },
}

/// Echoed label prefixes on a field name, e.g. `Field: JOB_TITLE` or `FIELD_NAME - TITLE`.
static FIELD_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(FIELD_NAME|Field|Key)(\s*[-:]\s*|\s+)").expect("valid field prefix pattern")
});

/// Isolates a single JSON object from a model reply.
///
/// Priority:
/// 1. a ```` ```json ```` fenced block (text strictly between the fences)
/// 2. a reply that starts with `{`
/// 3. the first `{` anywhere in the reply
///
/// Cases 2 and 3 use a balanced-brace scan, so trailing commentary that
/// contains further braces does not leak into the result.
pub fn extract_json(raw: &str) -> Result<&str, ExtractError> {
    if let Some(fenced) = fenced_json(raw) {
        return Ok(fenced);
    }

    let trimmed = raw.trim_start();
    if trimmed.starts_with('{') {
        if let Some(object) = balanced_object(trimmed) {
            return Ok(object);
        }
    }

    raw.find('{')
        .and_then(|start| balanced_object(&raw[start..]))
        .ok_or(ExtractError::NotFound { scanned: raw.len() })
}

/// Returns the trimmed content of the first ```` ```json ```` block, if it is
/// terminated and non-blank.
fn fenced_json(raw: &str) -> Option<&str> {
    let lower = raw.to_ascii_lowercase();
    let open = lower.find(JSON_FENCE)?;
    let body_start = open + JSON_FENCE.len();
    let body_len = raw[body_start..].find(FENCE)?;
    let body = raw[body_start..body_start + body_len].trim();
    (!body.is_empty()).then_some(body)
}

/// Scans from the leading `{` of `text` and returns the slice ending at the
/// brace that closes it. Braces inside double-quoted strings are ignored.
fn balanced_object(text: &str) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (idx, ch) in text.char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' if depth > 0 => in_string = true,
            '{' => depth += 1,
            '}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[..=idx]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Parses a `KEY: value` block, one field per line.
///
/// Each line is split once on its first colon. Empty values and the literal
/// `open` (any case) become the `OPEN` sentinel. Lines without a colon or
/// without a name are ignored.
pub fn extract_field_block(raw: &str) -> BTreeMap<String, String> {
    let mut fields = BTreeMap::new();

    for line in raw.lines() {
        let Some((name, value)) = line.trim().split_once(':') else {
            continue;
        };

        let name = clean_field_name(name);
        if name.is_empty() {
            continue;
        }

        let value = value.trim();
        let value = if value.is_empty() || value.eq_ignore_ascii_case("open") {
            OPEN.to_string()
        } else {
            value.to_string()
        };
        fields.insert(name, value);
    }

    fields
}

fn clean_field_name(name: &str) -> String {
    let name = name.trim().trim_matches(|c: char| matches!(c, '*' | '-' | '#' | '`' | '•'));
    let name = FIELD_PREFIX.replace(name.trim(), "");
    name.trim().to_string()
}
