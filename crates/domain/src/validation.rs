use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Current answers of a form, keyed by field name.
pub type Answers = Map<String, Value>;

/// Field-level validation failure, rendered inline next to the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldErrorCode {
    /// Mandatory field left empty.
    Required,
    /// Input could not be read as a number.
    InvalidNumber,
    /// Number outside the configured bounds.
    OutOfRange,
    /// Value is not one of the field options.
    InvalidOption,
    /// Input is not a `YYYY-MM-DD` date.
    InvalidDate,
    /// Text exceeds the configured maximum length.
    TooLong,
    /// Value shape does not fit the field type.
    InvalidValue,
}

impl FieldErrorCode {
    /// Returns the stable message key.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::InvalidNumber => "invalid_number",
            Self::OutOfRange => "out_of_range",
            Self::InvalidOption => "invalid_option",
            Self::InvalidDate => "invalid_date",
            Self::TooLong => "too_long",
            Self::InvalidValue => "invalid_value",
        }
    }
}

impl std::fmt::Display for FieldErrorCode {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Outcome of validating a set of answers against a schema.
///
/// Absence of a field name in `errors` means the field is valid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    errors: BTreeMap<String, FieldErrorCode>,
    values: Answers,
}

impl ValidationReport {
    pub(crate) fn record_error(&mut self, field_name: &str, code: FieldErrorCode) {
        self.errors.insert(field_name.to_owned(), code);
    }

    pub(crate) fn record_value(&mut self, field_name: &str, value: Value) {
        self.values.insert(field_name.to_owned(), value);
    }

    /// Returns whether every visible field is valid.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns errors keyed by field name.
    #[must_use]
    pub fn errors(&self) -> &BTreeMap<String, FieldErrorCode> {
        &self.errors
    }

    /// Returns the error for one field, if any.
    #[must_use]
    pub fn error_for(&self, field_name: &str) -> Option<FieldErrorCode> {
        self.errors.get(field_name).copied()
    }

    /// Returns coerced values of valid fields.
    #[must_use]
    pub fn values(&self) -> &Answers {
        &self.values
    }

    /// Consumes the report and returns the coerced values.
    #[must_use]
    pub fn into_values(self) -> Answers {
        self.values
    }
}

/// Returns whether an answer counts as "not filled in".
#[must_use]
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Returns whether the answer selects `option_value`.
///
/// Single answers compare directly, multiple answers by membership. Numbers
/// and booleans compare by their textual form.
#[must_use]
pub fn answer_includes(answer: &Value, option_value: &str) -> bool {
    match answer {
        Value::Array(items) => items
            .iter()
            .any(|item| scalar_matches(item, option_value)),
        other => scalar_matches(other, option_value),
    }
}

fn scalar_matches(value: &Value, option_value: &str) -> bool {
    match value {
        Value::String(text) => text == option_value,
        Value::Number(number) => number.to_string() == option_value,
        Value::Bool(flag) => flag.to_string() == option_value,
        _ => false,
    }
}
