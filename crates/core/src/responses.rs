//! In-memory answers of the active run.
//!
//! The [`ResponseStore`] maps option-set ids to the user's current value and
//! carries the per-field validation errors shown next to each input. It is
//! never persisted on its own; the save flow flushes it to the backend.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::run::OptionSetResponse;
use crate::types::EntityId;

/// Key of the envelope object the backend stores answers in.
pub const ENVELOPE_KEY: &str = "value";

/// Per-field error messages keyed by option-set id.
pub type FieldErrors = HashMap<EntityId, String>;

// ---------------------------------------------------------------------------
// Response value
// ---------------------------------------------------------------------------

/// An answer. Its shape follows the option set's selection type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseValue {
    /// Single select, text, date/time, color, rich text.
    Text(String),
    /// Multiple select.
    Multi(Vec<String>),
    /// Number, rating, slider.
    Number(f64),
}

impl ResponseValue {
    /// Whether this answer counts as "not answered".
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(s) => s.is_empty(),
            Self::Multi(v) => v.is_empty(),
            Self::Number(n) => !n.is_finite(),
        }
    }

    /// Wrap the value in the `{ "value": ... }` envelope.
    pub fn to_envelope(&self) -> Value {
        let mut obj = serde_json::Map::with_capacity(1);
        obj.insert(
            ENVELOPE_KEY.to_string(),
            serde_json::to_value(self).unwrap_or(Value::Null),
        );
        Value::Object(obj)
    }

    /// Unwrap an envelope. `None` for a missing, null, or unrecognised value.
    pub fn from_envelope(envelope: &Value) -> Option<Self> {
        match envelope.get(ENVELOPE_KEY)? {
            Value::Null => None,
            inner => serde_json::from_value(inner.clone()).ok(),
        }
    }
}

impl From<&str> for ResponseValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for ResponseValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<Vec<String>> for ResponseValue {
    fn from(v: Vec<String>) -> Self {
        Self::Multi(v)
    }
}

impl From<f64> for ResponseValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct ResponseStore {
    values: HashMap<EntityId, ResponseValue>,
    errors: FieldErrors,
}

impl ResponseStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Populate a store from stored option-set response rows.
    ///
    /// Rows whose envelope holds no usable value are treated as absent.
    pub fn from_envelopes<'a, I>(rows: I) -> Self
    where
        I: IntoIterator<Item = &'a OptionSetResponse>,
    {
        let values = rows
            .into_iter()
            .filter_map(|row| {
                ResponseValue::from_envelope(&row.response_value).map(|v| (row.option_set_id, v))
            })
            .collect();
        Self {
            values,
            errors: FieldErrors::new(),
        }
    }

    /// Record an answer. Clears any error shown for that field.
    pub fn set_response(&mut self, option_set_id: EntityId, value: impl Into<ResponseValue>) {
        self.values.insert(option_set_id, value.into());
        self.errors.remove(&option_set_id);
    }

    pub fn get(&self, option_set_id: EntityId) -> Option<&ResponseValue> {
        self.values.get(&option_set_id)
    }

    pub fn remove(&mut self, option_set_id: EntityId) -> Option<ResponseValue> {
        self.values.remove(&option_set_id)
    }

    /// Whether the option set has a non-empty answer.
    pub fn is_answered(&self, option_set_id: EntityId) -> bool {
        self.get(option_set_id).is_some_and(|v| !v.is_empty())
    }

    /// Number of non-empty answers.
    pub fn answered_count(&self) -> usize {
        self.values.values().filter(|v| !v.is_empty()).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&EntityId, &ResponseValue)> {
        self.values.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn error_for(&self, option_set_id: EntityId) -> Option<&str> {
        self.errors.get(&option_set_id).map(String::as_str)
    }

    pub fn set_errors(&mut self, errors: FieldErrors) {
        self.errors = errors;
    }

    pub fn clear_errors(&mut self) {
        self.errors.clear();
    }
}
