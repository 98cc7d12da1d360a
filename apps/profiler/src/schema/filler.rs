//! Maps an extracted field map onto a copy of the template.
//!
//! # Passes
//! 1. structural completion: blank text leaves become `OPEN`, everything else
//!    keeps its template value
//! 2. field overlay: coerced values replace leaves where they differ from the
//!    field default
//! 3. reserved fields: section tags, notes, interview flow and custom meta
//!    fields are reset
//!
//! Only leaves that already exist in the template are written, so the filled
//! profile always has exactly the template's leaf paths.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::schema::coerce::{coerce, detect_currency};
use crate::schema::fields::{Coercion, FieldSpec, ReservedRule, RESERVED_FIELDS};
use crate::schema::template::{get, get_mut, leaf_paths, LeafKind, Template};
use crate::schema::OPEN;

/// Canonical field key → raw model text. `OPEN` means unknown.
pub type ExtractedFieldMap = BTreeMap<String, String>;

/// A template copy with its leaves filled.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FilledProfile(Value);

impl FilledProfile {
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    pub fn leaf_paths(&self) -> Vec<String> {
        leaf_paths(&self.0)
    }

    /// Overwrites an existing leaf. Returns `false` when the path is not a leaf
    /// of this profile, leaving the profile untouched.
    pub fn set_leaf(&mut self, path: &str, value: Value) -> bool {
        match get_mut(&mut self.0, path) {
            Some(slot) if !slot.is_object() => {
                *slot = value;
                true
            }
            _ => false,
        }
    }
}

pub fn fill(
    template: &Template,
    extracted: &ExtractedFieldMap,
    specs: &[FieldSpec],
) -> FilledProfile {
    let mut profile = FilledProfile(template.root().clone());

    complete_structure(template, &mut profile);
    overlay_fields(template, extracted, specs, &mut profile);
    apply_reserved(template, &mut profile);

    profile
}

// ────────────────────────────────────────────────────────────────────────────
// Pass 1: structural completion
// ────────────────────────────────────────────────────────────────────────────

fn complete_structure(template: &Template, profile: &mut FilledProfile) {
    for leaf in template.leaves() {
        match leaf.kind {
            LeafKind::Text => {
                let blank = get(profile.as_value(), &leaf.path)
                    .and_then(Value::as_str)
                    .is_some_and(|s| s.trim().is_empty());
                if blank {
                    profile.set_leaf(&leaf.path, Value::String(OPEN.to_string()));
                }
            }
            // Zero is meaningful for salary bounds, durations and required years.
            LeafKind::Integer | LeafKind::Float => {}
            LeafKind::Boolean | LeafKind::List | LeafKind::Null => {}
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Pass 2: field overlay
// ────────────────────────────────────────────────────────────────────────────

fn overlay_fields(
    template: &Template,
    extracted: &ExtractedFieldMap,
    specs: &[FieldSpec],
    profile: &mut FilledProfile,
) {
    let mut salary_written = false;
    let mut salary_currency = None;

    for spec in specs {
        let raw = extracted.get(spec.key).map(String::as_str).unwrap_or(OPEN);
        let Some(value) = coerce(spec.coercion, raw) else {
            continue;
        };

        if let Coercion::Salary(_) = spec.coercion {
            salary_currency = salary_currency.or_else(|| detect_currency(raw));
        }

        if value == spec.default.value() {
            continue;
        }
        if !template.has_leaf(spec.path) {
            debug!("Skipping {}: path not in template", spec.path);
            continue;
        }

        profile.set_leaf(spec.path, value);
        if let Coercion::Salary(_) = spec.coercion {
            salary_written = true;
        }
    }

    if !salary_written {
        return;
    }

    let Some(currency_spec) = specs.iter().find(|s| s.coercion == Coercion::CurrencyCode) else {
        return;
    };
    let unresolved = get(profile.as_value(), currency_spec.path)
        .and_then(Value::as_str)
        .is_some_and(|s| s == OPEN || s.trim().is_empty());
    if unresolved {
        let currency = salary_currency.unwrap_or("USD");
        profile.set_leaf(currency_spec.path, Value::String(currency.to_string()));
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Pass 3: reserved fields
// ────────────────────────────────────────────────────────────────────────────

fn apply_reserved(template: &Template, profile: &mut FilledProfile) {
    for reserved in RESERVED_FIELDS {
        if !template.has_leaf(reserved.path) {
            continue;
        }
        match reserved.rule {
            ReservedRule::EmptyList => {
                profile.set_leaf(reserved.path, Value::Array(Vec::new()));
            }
            ReservedRule::Open => {
                profile.set_leaf(reserved.path, Value::String(OPEN.to_string()));
            }
            ReservedRule::ResetStages => {
                if let Some(stages) = get_mut(&mut profile.0, reserved.path) {
                    reset_to_defaults(stages);
                }
            }
        }
    }
}

/// Resets every leaf under `value` to its type default, descending into
/// objects and into arrays of objects.
fn reset_to_defaults(value: &mut Value) {
    match value {
        Value::Object(map) => map.values_mut().for_each(reset_to_defaults),
        Value::Array(items) if !items.is_empty() && items.iter().all(Value::is_object) => {
            items.iter_mut().for_each(reset_to_defaults)
        }
        Value::Array(items) => items.clear(),
        Value::String(s) => *s = OPEN.to_string(),
        Value::Number(n) => *n = serde_json::Number::from(0u64),
        Value::Bool(b) => *b = false,
        Value::Null => {}
    }
}
