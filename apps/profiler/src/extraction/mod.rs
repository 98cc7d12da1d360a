// Response extraction: turns free-form model replies into structured data.
// Shared by the job pipeline and the evaluation pipeline.

pub mod locate;
pub mod sanitize;

pub use locate::{extract_field_block, extract_json};
pub use sanitize::{clean_field_value, sanitize_json};

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::errors::AppError;

/// Locates, repairs and parses the JSON object in a model reply.
///
/// A missing object is an `Extraction` failure; text that still does not parse
/// after sanitizing is a `Parse` failure carrying an excerpt of the raw reply.
/// No partial object is ever returned.
pub fn parse_json_reply<T: DeserializeOwned>(raw: &str) -> Result<T, AppError> {
    let candidate = extract_json(raw).map_err(|e| AppError::Extraction(e.to_string()))?;
    let repaired = sanitize_json(candidate);

    let value: Value =
        serde_json::from_str(&repaired).map_err(|e| AppError::parse(e.to_string(), raw))?;
    if !value.is_object() {
        return Err(AppError::parse("reply is not a JSON object", raw));
    }

    debug!("Parsed JSON reply ({} chars)", repaired.len());
    serde_json::from_value(value).map_err(|e| AppError::parse(e.to_string(), raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reply_with_prose_and_defects() {
        let raw = "Here you go:\n{\"rating\": \"N/A\", \"items\": [\"a\", \"b\",],\n\"note\": \"two\nlines\"}\nThanks!";
        let value: Value = parse_json_reply(raw).unwrap();
        assert!(value["rating"].is_null());
        assert_eq!(value["items"].as_array().unwrap().len(), 2);
        assert_eq!(value["note"], "two lines");
    }

    #[test]
    fn test_parse_reply_without_object_is_extraction_failure() {
        let err = parse_json_reply::<Value>("I cannot help with that.").unwrap_err();
        assert!(matches!(err, AppError::Extraction(_)));
    }

    #[test]
    fn test_parse_reply_with_broken_object_is_parse_failure() {
        let err = parse_json_reply::<Value>("{\"a\": 1 \"b\": 2}").unwrap_err();
        match err {
            AppError::Parse { excerpt, .. } => assert!(excerpt.contains("\"b\": 2")),
            other => panic!("unexpected {other:?}"),
        }
    }
}
