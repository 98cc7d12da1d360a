//! The job profile template and its schema description.
//!
//! A template is an arbitrarily deep JSON object. Every non-object value is a
//! *leaf*; arrays are leaves too, their contents never become separate paths.
//! Paths are dotted key chains such as `jobProfile.coreDetails.title`.

use std::path::Path;

use serde_json::Value;
use tracing::info;

use crate::errors::AppError;

/// Shape of a template leaf, derived once when the template is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeafKind {
    Text,
    Integer,
    Float,
    Boolean,
    List,
    Null,
}

impl LeafKind {
    /// `None` for objects, which are never leaves.
    pub fn of(value: &Value) -> Option<LeafKind> {
        match value {
            Value::String(_) => Some(LeafKind::Text),
            Value::Number(n) if n.is_f64() => Some(LeafKind::Float),
            Value::Number(_) => Some(LeafKind::Integer),
            Value::Bool(_) => Some(LeafKind::Boolean),
            Value::Array(_) => Some(LeafKind::List),
            Value::Null => Some(LeafKind::Null),
            Value::Object(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafSpec {
    pub path: String,
    pub kind: LeafKind,
}

/// Immutable template plus its schema description.
#[derive(Debug, Clone)]
pub struct Template {
    root: Value,
    leaves: Vec<LeafSpec>,
}

impl Template {
    pub fn from_value(root: Value) -> Result<Self, AppError> {
        if !root.is_object() {
            return Err(AppError::Config(
                "Template root must be a JSON object".to_string(),
            ));
        }
        let leaves = describe(&root);
        Ok(Self { root, leaves })
    }

    pub fn from_json(text: &str) -> Result<Self, AppError> {
        let root: Value = serde_json::from_str(text)
            .map_err(|e| AppError::Config(format!("Template is not valid JSON: {e}")))?;
        Self::from_value(root)
    }

    /// Reads the template file. Any failure here is a configuration error.
    pub async fn load(path: &Path) -> Result<Self, AppError> {
        let text = tokio::fs::read_to_string(path).await.map_err(|e| {
            AppError::Config(format!("Cannot read template {}: {e}", path.display()))
        })?;
        let template = Self::from_json(&text)
            .map_err(|e| AppError::Config(format!("{} ({})", e, path.display())))?;

        info!(
            "Loaded template {} ({} leaf fields)",
            path.display(),
            template.leaves.len()
        );
        Ok(template)
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    pub fn leaves(&self) -> &[LeafSpec] {
        &self.leaves
    }

    pub fn leaf_kind(&self, path: &str) -> Option<LeafKind> {
        self.leaves
            .iter()
            .find(|leaf| leaf.path == path)
            .map(|leaf| leaf.kind)
    }

    pub fn has_leaf(&self, path: &str) -> bool {
        self.leaf_kind(path).is_some()
    }
}

/// Every leaf path of `value`, depth first in key order.
pub fn leaf_paths(value: &Value) -> Vec<String> {
    describe(value).into_iter().map(|leaf| leaf.path).collect()
}

fn describe(root: &Value) -> Vec<LeafSpec> {
    let mut leaves = Vec::new();
    if let Value::Object(map) = root {
        for (key, child) in map {
            walk(child, key.clone(), &mut leaves);
        }
    }
    leaves
}

fn walk(value: &Value, path: String, out: &mut Vec<LeafSpec>) {
    match (value, LeafKind::of(value)) {
        (Value::Object(map), _) => {
            for (key, child) in map {
                walk(child, format!("{path}.{key}"), out);
            }
        }
        (_, Some(kind)) => out.push(LeafSpec { path, kind }),
        (_, None) => {}
    }
}

/// Converts a dotted path to a JSON pointer.
pub fn pointer(path: &str) -> String {
    path.split('.')
        .map(|segment| segment.replace('~', "~0").replace('/', "~1"))
        .fold(String::new(), |mut acc, segment| {
            acc.push('/');
            acc.push_str(&segment);
            acc
        })
}

pub fn get<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    value.pointer(&pointer(path))
}

pub fn get_mut<'a>(value: &'a mut Value, path: &str) -> Option<&'a mut Value> {
    value.pointer_mut(&pointer(path))
}
