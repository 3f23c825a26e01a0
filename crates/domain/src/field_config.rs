use std::collections::HashSet;

use chrono::NaiveDate;
use csrd_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::field_type::FieldType;
use crate::identifier::string_identifier;
use crate::registry::FieldDefaults;
use crate::validation::{FieldErrorCode, is_empty_value};

string_identifier!(
    /// Stable identifier of a field inside a schema. Never reused.
    FieldId
);

/// Selectable option of a choice field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOption {
    value: NonEmptyString,
    label: String,
}

impl FieldOption {
    /// Creates a validated option.
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> AppResult<Self> {
        Ok(Self {
            value: NonEmptyString::new(value)?,
            label: label.into(),
        })
    }

    /// Returns the submitted value of the option.
    #[must_use]
    pub fn value(&self) -> &str {
        self.value.as_str()
    }

    /// Returns the displayed label.
    #[must_use]
    pub fn label(&self) -> &str {
        self.label.as_str()
    }
}

/// Type-specific shape of a field configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum FieldKind {
    /// Free text.
    Text {
        /// Hint shown in the empty input.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        placeholder: Option<String>,
        /// Maximum number of characters.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_length: Option<usize>,
        /// Pre-filled text.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        default_value: Option<String>,
    },
    /// Numeric input.
    Number {
        /// Unit shown next to the input.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        unit: Option<String>,
        /// Inclusive lower bound.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        /// Inclusive upper bound.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
        /// Pre-filled value.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        default_value: Option<f64>,
    },
    /// Drop-down list.
    Select {
        /// Available options.
        #[serde(default)]
        options: Vec<FieldOption>,
        /// Whether several options can be selected.
        #[serde(default)]
        multiple: bool,
        /// Default option position for single selection.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        default_index: Option<usize>,
        /// Default option positions for multiple selection.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        default_indices: Vec<usize>,
    },
    /// Radio group.
    Radio {
        /// Available options.
        #[serde(default)]
        options: Vec<FieldOption>,
        /// Default option position.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        default_index: Option<usize>,
    },
    /// Checkbox group.
    Checkbox {
        /// Available options.
        #[serde(default)]
        options: Vec<FieldOption>,
        /// Default option positions.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        default_indices: Vec<usize>,
    },
    /// Boolean toggle.
    Switch {
        /// Value used when nothing was submitted.
        #[serde(default)]
        default_value: bool,
    },
    /// Calendar date.
    Date {
        /// Pre-filled date.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        default_value: Option<NaiveDate>,
    },
    /// File import.
    Import {
        /// Accepted file extensions, such as `.csv`.
        #[serde(default)]
        accept: Vec<String>,
    },
}

impl FieldKind {
    /// Returns the field type tag for this shape.
    #[must_use]
    pub fn field_type(&self) -> FieldType {
        match self {
            Self::Text { .. } => FieldType::Text,
            Self::Number { .. } => FieldType::Number,
            Self::Select { .. } => FieldType::Select,
            Self::Radio { .. } => FieldType::Radio,
            Self::Checkbox { .. } => FieldType::Checkbox,
            Self::Switch { .. } => FieldType::Switch,
            Self::Date { .. } => FieldType::Date,
            Self::Import { .. } => FieldType::Import,
        }
    }

    fn options(&self) -> &[FieldOption] {
        match self {
            Self::Select { options, .. }
            | Self::Radio { options, .. }
            | Self::Checkbox { options, .. } => options,
            _ => &[],
        }
    }

    fn options_mut(&mut self) -> Option<&mut Vec<FieldOption>> {
        match self {
            Self::Select { options, .. }
            | Self::Radio { options, .. }
            | Self::Checkbox { options, .. } => Some(options),
            _ => None,
        }
    }

    fn validate(&self) -> AppResult<()> {
        let options = self.options();
        let mut seen = HashSet::new();
        for option in options {
            if !seen.insert(option.value()) {
                return Err(AppError::Validation(format!(
                    "duplicate option value '{}'",
                    option.value()
                )));
            }
        }

        let in_range = |index: &usize| *index < options.len();
        match self {
            Self::Select {
                multiple,
                default_index,
                default_indices,
                ..
            } => {
                if *multiple && default_index.is_some() {
                    return Err(AppError::Validation(
                        "multiple select fields use defaultIndices, not defaultIndex".to_owned(),
                    ));
                }
                if !*multiple && !default_indices.is_empty() {
                    return Err(AppError::Validation(
                        "single select fields use defaultIndex, not defaultIndices".to_owned(),
                    ));
                }
                if !default_index.iter().all(in_range) || !default_indices.iter().all(in_range) {
                    return Err(AppError::Validation(
                        "default index does not reference an existing option".to_owned(),
                    ));
                }
            }
            Self::Radio { default_index, .. } => {
                if !default_index.iter().all(in_range) {
                    return Err(AppError::Validation(
                        "default index does not reference an existing option".to_owned(),
                    ));
                }
            }
            Self::Checkbox {
                default_indices, ..
            } => {
                if !default_indices.iter().all(in_range) {
                    return Err(AppError::Validation(
                        "default index does not reference an existing option".to_owned(),
                    ));
                }
            }
            Self::Number {
                min: Some(min),
                max: Some(max),
                ..
            } if min > max => {
                return Err(AppError::Validation(
                    "number field min must not exceed max".to_owned(),
                ));
            }
            _ => {}
        }

        Ok(())
    }

    fn normalize(&mut self) {
        if let Self::Select {
            default_indices, ..
        }
        | Self::Checkbox {
            default_indices, ..
        } = self
        {
            default_indices.sort_unstable();
            default_indices.dedup();
        }
    }

    /// Rewrites default positions after `options` were replaced by a new list.
    ///
    /// Defaults follow their option by value; defaults whose option vanished
    /// are cleared.
    fn remap_defaults(&mut self, previous: &[FieldOption]) {
        let current: Vec<String> = self
            .options()
            .iter()
            .map(|option| option.value().to_owned())
            .collect();
        let remap = |index: usize| -> Option<usize> {
            let value = previous.get(index)?.value();
            current.iter().position(|candidate| candidate == value)
        };

        match self {
            Self::Select {
                default_index,
                default_indices,
                ..
            } => {
                *default_index = default_index.and_then(remap);
                *default_indices = default_indices.iter().copied().filter_map(remap).collect();
            }
            Self::Radio { default_index, .. } => {
                *default_index = default_index.and_then(remap);
            }
            Self::Checkbox {
                default_indices, ..
            } => {
                *default_indices = default_indices.iter().copied().filter_map(remap).collect();
            }
            _ => {}
        }

        self.normalize();
    }
}

/// Declarative description of one input of a dynamic form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "FieldConfigRecord")]
pub struct FieldConfig {
    id: FieldId,
    name: NonEmptyString,
    label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    required: bool,
    #[serde(flatten)]
    kind: FieldKind,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FieldConfigRecord {
    id: FieldId,
    name: NonEmptyString,
    #[serde(default)]
    label: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    required: bool,
    #[serde(flatten)]
    kind: FieldKind,
}

impl TryFrom<FieldConfigRecord> for FieldConfig {
    type Error = AppError;

    fn try_from(record: FieldConfigRecord) -> Result<Self, Self::Error> {
        let mut field = Self::new(record.id, record.name.as_str(), record.label, record.kind)?;
        field.set_description(record.description);
        field.set_required(record.required);
        Ok(field)
    }
}

impl FieldConfig {
    /// Creates a validated field configuration.
    pub fn new(
        id: FieldId,
        name: impl Into<String>,
        label: impl Into<String>,
        mut kind: FieldKind,
    ) -> AppResult<Self> {
        kind.validate()?;
        kind.normalize();

        Ok(Self {
            id,
            name: NonEmptyString::new(name.into().trim())?,
            label: label.into(),
            description: None,
            required: false,
            kind,
        })
    }

    /// Instantiates a new field of `field_type` from a registry defaults fragment.
    pub fn from_defaults(
        id: FieldId,
        name: impl Into<String>,
        field_type: FieldType,
        defaults: FieldDefaults,
    ) -> AppResult<Self> {
        let mut options: Vec<FieldOption> = Vec::with_capacity(defaults.options.len());
        for option in defaults.options {
            if !options.iter().any(|known| known.value() == option.value()) {
                options.push(option);
            }
        }

        let position_of = |value: &Value| {
            value
                .as_str()
                .and_then(|text| options.iter().position(|option| option.value() == text))
        };
        let default_value = defaults.default_value.as_ref();
        let single_default = default_value.and_then(position_of);
        let multiple_defaults: Vec<usize> = match default_value {
            Some(Value::Array(items)) => items.iter().filter_map(position_of).collect(),
            Some(other) => position_of(other).into_iter().collect(),
            None => Vec::new(),
        };

        let kind = match field_type {
            FieldType::Text => FieldKind::Text {
                placeholder: defaults.placeholder,
                max_length: None,
                default_value: default_value.and_then(Value::as_str).map(str::to_owned),
            },
            FieldType::Number => FieldKind::Number {
                unit: defaults.unit,
                min: None,
                max: None,
                default_value: default_value.and_then(Value::as_f64),
            },
            FieldType::Select => FieldKind::Select {
                multiple: defaults.multiple,
                default_index: (!defaults.multiple).then_some(single_default).flatten(),
                default_indices: if defaults.multiple {
                    multiple_defaults
                } else {
                    Vec::new()
                },
                options,
            },
            FieldType::Radio => FieldKind::Radio {
                options,
                default_index: single_default,
            },
            FieldType::Checkbox => FieldKind::Checkbox {
                options,
                default_indices: multiple_defaults,
            },
            FieldType::Switch => FieldKind::Switch {
                default_value: default_value.and_then(Value::as_bool).unwrap_or(false),
            },
            FieldType::Date => FieldKind::Date {
                default_value: default_value
                    .and_then(Value::as_str)
                    .and_then(|text| NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()),
            },
            FieldType::Import => FieldKind::Import {
                accept: defaults.accept,
            },
        };

        Self::new(id, name, defaults.label.unwrap_or_default(), kind)
    }

    /// Returns the stable field identifier.
    #[must_use]
    pub fn id(&self) -> &FieldId {
        &self.id
    }

    /// Returns the data-binding key.
    #[must_use]
    pub fn name(&self) -> &NonEmptyString {
        &self.name
    }

    /// Returns the displayed label.
    #[must_use]
    pub fn label(&self) -> &str {
        self.label.as_str()
    }

    /// Returns optional help text.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns whether an answer is mandatory.
    #[must_use]
    pub fn required(&self) -> bool {
        self.required
    }

    /// Returns the type-specific shape.
    #[must_use]
    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// Returns the field type tag.
    #[must_use]
    pub fn field_type(&self) -> FieldType {
        self.kind.field_type()
    }

    /// Returns options of a choice field, empty for other types.
    #[must_use]
    pub fn options(&self) -> &[FieldOption] {
        self.kind.options()
    }

    /// Returns whether the field accepts several selected options.
    #[must_use]
    pub fn accepts_multiple(&self) -> bool {
        match &self.kind {
            FieldKind::Checkbox { .. } => true,
            FieldKind::Select { multiple, .. } => *multiple,
            _ => false,
        }
    }

    /// Renames the data-binding key.
    pub fn rename(&mut self, name: impl Into<String>) -> AppResult<()> {
        self.name = NonEmptyString::new(name.into().trim())?;
        Ok(())
    }

    /// Updates the displayed label.
    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    /// Updates the help text; blank text clears it.
    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description.and_then(|value| {
            let trimmed = value.trim().to_owned();
            (!trimmed.is_empty()).then_some(trimmed)
        });
    }

    /// Marks the field as mandatory or optional.
    pub fn set_required(&mut self, required: bool) {
        self.required = required;
    }

    /// Replaces the type-specific shape, keeping identity and label.
    pub fn set_kind(&mut self, mut kind: FieldKind) -> AppResult<()> {
        kind.validate()?;
        kind.normalize();
        self.kind = kind;
        Ok(())
    }

    /// Replaces the options list, repairing default positions.
    pub fn set_options(&mut self, options: Vec<FieldOption>) -> AppResult<()> {
        let mut kind = self.kind.clone();
        let Some(slot) = kind.options_mut() else {
            return Err(AppError::Validation(format!(
                "field '{}' of type '{}' has no options",
                self.name,
                self.field_type().as_str()
            )));
        };
        let previous = std::mem::replace(slot, options);
        kind.remap_defaults(&previous);
        kind.validate()?;
        self.kind = kind;
        Ok(())
    }

    /// Replaces one option in place. Defaults keep pointing at the same position.
    pub fn replace_option(&mut self, index: usize, option: FieldOption) -> AppResult<()> {
        let mut kind = self.kind.clone();
        let slot = kind
            .options_mut()
            .and_then(|options| options.get_mut(index))
            .ok_or_else(|| {
                AppError::Validation(format!(
                    "field '{}' has no option at position {index}",
                    self.name
                ))
            })?;
        *slot = option;
        kind.validate()?;
        self.kind = kind;
        Ok(())
    }

    /// Appends an option.
    pub fn push_option(&mut self, option: FieldOption) -> AppResult<()> {
        let mut options = self.options().to_vec();
        options.push(option);
        self.set_options(options)
    }

    /// Removes the option at `index`.
    pub fn remove_option(&mut self, index: usize) -> AppResult<FieldOption> {
        let mut options = self.options().to_vec();
        if index >= options.len() {
            return Err(AppError::Validation(format!(
                "field '{}' has no option at position {index}",
                self.name
            )));
        }
        let removed = options.remove(index);
        self.set_options(options)?;
        Ok(removed)
    }

    /// Moves the option at `from` to position `to`.
    pub fn move_option(&mut self, from: usize, to: usize) -> AppResult<()> {
        let mut options = self.options().to_vec();
        if from >= options.len() || to >= options.len() {
            return Err(AppError::Validation(format!(
                "option move {from} -> {to} is out of range for field '{}'",
                self.name
            )));
        }
        let moved = options.remove(from);
        options.insert(to, moved);
        self.set_options(options)
    }

    /// Keeps only the first `len` options.
    pub fn truncate_options(&mut self, len: usize) -> AppResult<()> {
        let mut options = self.options().to_vec();
        options.truncate(len);
        self.set_options(options)
    }

    /// Returns the default option position for single-choice fields.
    #[must_use]
    pub fn default_index(&self) -> Option<usize> {
        match &self.kind {
            FieldKind::Select { default_index, .. } | FieldKind::Radio { default_index, .. } => {
                *default_index
            }
            _ => None,
        }
    }

    /// Returns the default option positions for multiple-choice fields.
    #[must_use]
    pub fn default_indices(&self) -> &[usize] {
        match &self.kind {
            FieldKind::Select {
                default_indices, ..
            }
            | FieldKind::Checkbox {
                default_indices, ..
            } => default_indices,
            _ => &[],
        }
    }

    /// Derives the initial answer from the configured defaults.
    #[must_use]
    pub fn default_answer(&self) -> Option<Value> {
        let options = self.options();
        let value_at = |index: &usize| {
            options
                .get(*index)
                .map(|option| Value::String(option.value().to_owned()))
        };

        match &self.kind {
            FieldKind::Text { default_value, .. } => default_value.clone().map(Value::String),
            FieldKind::Number { default_value, .. } => default_value
                .and_then(serde_json::Number::from_f64)
                .map(Value::Number),
            FieldKind::Select { multiple: true, .. } | FieldKind::Checkbox { .. } => {
                let values: Vec<Value> = self.default_indices().iter().filter_map(value_at).collect();
                (!values.is_empty()).then_some(Value::Array(values))
            }
            FieldKind::Select { default_index, .. } | FieldKind::Radio { default_index, .. } => {
                default_index.as_ref().and_then(value_at)
            }
            FieldKind::Switch { default_value } => Some(Value::Bool(*default_value)),
            FieldKind::Date { default_value } => default_value
                .map(|date| Value::String(date.format("%Y-%m-%d").to_string())),
            FieldKind::Import { .. } => None,
        }
    }

    /// Validates and coerces a submitted answer.
    ///
    /// Returns the value to store, `None` when nothing is stored, or the
    /// error code to display next to the field. The required check runs
    /// before any type check.
    pub fn check_value(&self, value: Option<&Value>) -> Result<Option<Value>, FieldErrorCode> {
        let handler = self.field_type().handler();
        let is_empty = value.is_none_or(is_empty_value);

        if is_empty {
            if let Some(substitute) = handler.substitute_empty(self) {
                return Ok(Some(substitute));
            }
            if self.required {
                return Err(FieldErrorCode::Required);
            }
            return Ok(handler.coerce_empty(self));
        }

        match value {
            Some(value) => handler.check(self, value).map(Some),
            None => Ok(None),
        }
    }
}
