//! The modified-dates frontmatter field.
//!
//! Classifies whatever currently sits under the configured key and merges
//! today's date into it. Dates are plain `YYYY-MM-DD` strings appended in
//! first-occurrence order; history is never sorted or pruned.

use serde_yaml::Value;

/// Field name used when the configured one is unset or blank.
pub const DEFAULT_FIELD_NAME: &str = "Modified";

/// The prior shape of the date field.
///
/// Notes written by other tools may hold anything under the key, so the
/// read is an explicit classification rather than assuming a sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Key missing or explicitly null
    Absent,
    /// A single non-sequence value, kept as its string form
    Scalar(String),
    /// An ordered list of date strings
    Sequence(Vec<String>),
}

impl FieldValue {
    /// Classify the current YAML value of the field.
    pub fn read(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => FieldValue::Absent,
            Some(Value::Sequence(seq)) => FieldValue::Sequence(seq.iter().map(stringify).collect()),
            Some(other) => FieldValue::Scalar(stringify(other)),
        }
    }
}

/// String form of a YAML value. Scalars map to their literal text; anything
/// structured is kept as serialized YAML so prior data is never discarded.
fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Null => "null".to_string(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

/// Merge `today` into the field's current value.
///
/// Returns the sequence to store, or `None` when the field is already a
/// sequence recording today: the caller must then leave the frontmatter
/// untouched so no write (and no echo event) happens.
///
/// A scalar equal to today still yields `Some`, because coercing it to a
/// one-element sequence is an observable change that must persist.
pub fn merge_today(current: FieldValue, today: &str) -> Option<Vec<String>> {
    match current {
        FieldValue::Absent => Some(vec![today.to_string()]),
        FieldValue::Scalar(v) => {
            if v == today {
                Some(vec![v])
            } else {
                Some(vec![v, today.to_string()])
            }
        }
        FieldValue::Sequence(mut dates) => {
            if dates.iter().any(|d| d == today) {
                return None;
            }
            dates.push(today.to_string());
            Some(dates)
        }
    }
}
