//! Turns cleaned model text into typed JSON values.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{json, Value};

use crate::schema::fields::{Coercion, SalaryBound};
use crate::schema::OPEN;

pub const MIN_SALARY: i64 = 1_000;
pub const MAX_SALARY: i64 = 10_000_000;

static DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("valid digits pattern"));
static RANGE_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s*(?:-|–|—|\bto\b)\s*").expect("valid range pattern"));
static AMOUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(k\b)?").expect("valid amount pattern")
});
static CURRENCY_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(USD|EUR|GBP|CAD|AUD|INR|JPY|CHF|SGD|NZD)\b").expect("valid code pattern"));

/// Coerces a cleaned value. `None` for caller-supplied fields.
pub fn coerce(coercion: Coercion, raw: &str) -> Option<Value> {
    let raw = raw.trim();
    let value = match coercion {
        Coercion::Identifier => return None,
        Coercion::Text if raw.is_empty() => json!(OPEN),
        Coercion::Text => json!(raw),
        Coercion::Integer => json!(integer(raw)),
        Coercion::Boolean => json!(boolean(raw)),
        Coercion::Salary(bound) => {
            let range = salary_range(raw);
            match bound {
                SalaryBound::Min => json!(range.min),
                SalaryBound::Max => json!(range.max),
            }
        }
        Coercion::CurrencyCode => json!(currency_code(raw).unwrap_or(OPEN)),
        Coercion::TextList => json!(text_list(raw)),
        Coercion::ObjectiveList => Value::Array(objective_list(raw)),
    };
    Some(value)
}

/// First run of ASCII digits, else 0.
pub fn integer(raw: &str) -> i64 {
    DIGITS
        .find(raw)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

pub fn boolean(raw: &str) -> bool {
    let lower = raw.to_lowercase();
    ["true", "yes", "equivalent"]
        .iter()
        .any(|word| lower.contains(word))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SalaryRange {
    /// 0 when absent or outside the accepted range.
    pub min: i64,
    pub max: i64,
    pub currency: Option<&'static str>,
}

/// Parses salary text like `$120k - $160k`, `$120-160k`, `£45,000 to £55,000`
/// or `90000`.
///
/// A single amount serves as both bounds. A `k` on one bound of a range also
/// scales the other bound when that one is written without it and would
/// otherwise be below `MIN_SALARY`. Amounts outside
/// `[MIN_SALARY, MAX_SALARY]` are rejected and come back as 0.
pub fn salary_range(raw: &str) -> SalaryRange {
    let text = raw.replace(',', "");
    let amounts: Vec<Amount> = RANGE_SEPARATOR
        .split(&text)
        .filter_map(parse_amount)
        .collect();

    let (min, max) = match amounts.as_slice() {
        [] => (0.0, 0.0),
        [single] => (single.value(), single.value()),
        [first, second, ..] => {
            let shared_k = first.thousands != second.thousands;
            (
                first.value_with_shared_k(shared_k),
                second.value_with_shared_k(shared_k),
            )
        }
    };

    SalaryRange {
        min: in_salary_range(min),
        max: in_salary_range(max),
        currency: detect_currency(raw),
    }
}

#[derive(Debug, Clone, Copy)]
struct Amount {
    number: f64,
    /// Written with a `k` suffix.
    thousands: bool,
}

impl Amount {
    fn value(self) -> f64 {
        if self.thousands {
            self.number * 1_000.0
        } else {
            self.number
        }
    }

    fn value_with_shared_k(self, shared_k: bool) -> f64 {
        let value = self.value();
        if shared_k && !self.thousands && value < MIN_SALARY as f64 {
            value * 1_000.0
        } else {
            value
        }
    }
}

fn parse_amount(part: &str) -> Option<Amount> {
    let caps = AMOUNT.captures(part)?;
    Some(Amount {
        number: caps.get(1)?.as_str().parse().ok()?,
        thousands: caps.get(2).is_some(),
    })
}

fn in_salary_range(amount: f64) -> i64 {
    let rounded = amount.round() as i64;
    if (MIN_SALARY..=MAX_SALARY).contains(&rounded) {
        rounded
    } else {
        0
    }
}

/// Currency named or implied by symbol anywhere in the text.
pub fn detect_currency(raw: &str) -> Option<&'static str> {
    if let Some(code) = CURRENCY_CODE.find(&raw.to_uppercase()) {
        return known_code(code.as_str());
    }
    if raw.contains('€') {
        Some("EUR")
    } else if raw.contains('£') {
        Some("GBP")
    } else if raw.contains('$') {
        Some("USD")
    } else {
        None
    }
}

/// Currency for a dedicated currency field: a three-letter code, a symbol,
/// or a spelled-out name.
pub fn currency_code(raw: &str) -> Option<&'static str> {
    if raw.is_empty() || raw == OPEN {
        return None;
    }
    if let Some(code) = detect_currency(raw) {
        return Some(code);
    }
    let lower = raw.to_lowercase();
    if lower.contains("euro") {
        Some("EUR")
    } else if lower.contains("pound") || lower.contains("sterling") {
        Some("GBP")
    } else if lower.contains("dollar") {
        Some("USD")
    } else {
        None
    }
}

fn known_code(code: &str) -> Option<&'static str> {
    const CODES: &[&str] = &[
        "USD", "EUR", "GBP", "CAD", "AUD", "INR", "JPY", "CHF", "SGD", "NZD",
    ];
    CODES.iter().copied().find(|known| *known == code)
}

/// `|`-separated items, trimmed and unquoted; empties and `OPEN` dropped.
pub fn text_list(raw: &str) -> Vec<String> {
    raw.split('|')
        .map(|item| item.trim().trim_matches(|c: char| c == '"' || c == '\'').trim())
        .filter(|item| !item.is_empty() && !item.eq_ignore_ascii_case(OPEN))
        .map(str::to_string)
        .collect()
}

pub fn objective_list(raw: &str) -> Vec<Value> {
    text_list(raw)
        .into_iter()
        .map(|objective| {
            json!({
                "objective": objective,
                "timeframe": OPEN,
                "metric": OPEN,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_takes_first_digit_run() {
        assert_eq!(integer("5+ years"), 5);
        assert_eq!(integer("3-5 years of experience"), 3);
        assert_eq!(integer("several years"), 0);
    }

    #[test]
    fn test_boolean_keywords() {
        assert!(boolean("Yes, equivalent experience accepted"));
        assert!(boolean("TRUE"));
        assert!(!boolean("false"));
        assert!(!boolean("Degree required"));
    }

    #[test]
    fn test_salary_k_range_with_dollar_sign() {
        let range = salary_range("$120k - $160k");
        assert_eq!(
            range,
            SalaryRange {
                min: 120_000,
                max: 160_000,
                currency: Some("USD"),
            }
        );
    }

    #[test]
    fn test_salary_k_suffix_shared_across_range() {
        let range = salary_range("$120-160k");
        assert_eq!((range.min, range.max), (120_000, 160_000));
        assert_eq!(range.currency, Some("USD"));

        let range = salary_range("$120 - $160K per year");
        assert_eq!((range.min, range.max), (120_000, 160_000));
    }

    #[test]
    fn test_salary_full_lower_bound_is_not_scaled_by_upper_k() {
        let range = salary_range("$90000 - 120k");
        assert_eq!((range.min, range.max), (90_000, 120_000));
    }

    #[test]
    fn test_salary_thousands_separators_and_to() {
        let range = salary_range("£45,000 to £55,000 per year");
        assert_eq!((range.min, range.max), (45_000, 55_000));
        assert_eq!(range.currency, Some("GBP"));
    }

    #[test]
    fn test_salary_en_dash_and_code() {
        let range = salary_range("90000–110000 EUR");
        assert_eq!((range.min, range.max), (90_000, 110_000));
        assert_eq!(range.currency, Some("EUR"));
    }

    #[test]
    fn test_single_salary_serves_both_bounds() {
        let range = salary_range("95000");
        assert_eq!((range.min, range.max), (95_000, 95_000));
        assert_eq!(range.currency, None);
    }

    #[test]
    fn test_salary_outside_bounds_rejected() {
        assert_eq!(salary_range("$15 - $20 per hour").min, 0);
        assert_eq!(salary_range("$15 - $20 per hour").max, 0);
        assert_eq!(salary_range("50000000").max, 0);
        assert_eq!(salary_range("OPEN").min, 0);
    }

    #[test]
    fn test_currency_code_variants() {
        assert_eq!(currency_code("usd"), Some("USD"));
        assert_eq!(currency_code("€"), Some("EUR"));
        assert_eq!(currency_code("British pounds"), Some("GBP"));
        assert_eq!(currency_code("OPEN"), None);
        assert_eq!(currency_code("competitive"), None);
    }

    #[test]
    fn test_text_list_drops_empty_and_open_items() {
        assert_eq!(
            text_list("Python | \"SQL\" || OPEN | 'Airflow'"),
            vec!["Python", "SQL", "Airflow"]
        );
        assert!(text_list("OPEN").is_empty());
    }

    #[test]
    fn test_objective_list_builds_objects() {
        let objectives = objective_list("Ship v2 | Hire two engineers");
        assert_eq!(objectives.len(), 2);
        assert_eq!(
            objectives[1],
            json!({"objective": "Hire two engineers", "timeframe": "OPEN", "metric": "OPEN"})
        );
    }

    #[test]
    fn test_coerce_identifier_is_never_coerced() {
        assert_eq!(coerce(Coercion::Identifier, "abc"), None);
        assert_eq!(coerce(Coercion::Text, "  "), Some(json!("OPEN")));
        assert_eq!(
            coerce(Coercion::Salary(SalaryBound::Max), "$120k - $160k"),
            Some(json!(160_000))
        );
    }
}
