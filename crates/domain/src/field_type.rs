use std::str::FromStr;

use csrd_core::AppError;
use serde::{Deserialize, Serialize};

use crate::registry::{self, FieldTypeHandler};

/// Supported dynamic form field types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// Free text input.
    Text,
    /// Numeric input with optional unit and bounds.
    Number,
    /// Drop-down list, single or multiple.
    Select,
    /// Radio buttons, single choice.
    Radio,
    /// Checkbox group, multiple choice.
    Checkbox,
    /// Boolean toggle.
    Switch,
    /// Calendar date.
    Date,
    /// File import.
    Import,
}

impl FieldType {
    /// Returns the stable wire tag for the field type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Select => "select",
            Self::Radio => "radio",
            Self::Checkbox => "checkbox",
            Self::Switch => "switch",
            Self::Date => "date",
            Self::Import => "import",
        }
    }

    /// Returns every supported field type.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[FieldType] = &[
            FieldType::Text,
            FieldType::Number,
            FieldType::Select,
            FieldType::Radio,
            FieldType::Checkbox,
            FieldType::Switch,
            FieldType::Date,
            FieldType::Import,
        ];

        ALL
    }

    /// Returns whether fields of this type carry an options list and may branch.
    #[must_use]
    pub fn is_choice(&self) -> bool {
        matches!(self, Self::Select | Self::Radio | Self::Checkbox)
    }

    /// Returns the static handler implementing this type's behaviour.
    #[must_use]
    pub fn handler(self) -> &'static dyn FieldTypeHandler {
        registry::handler_for(self)
    }
}

impl FromStr for FieldType {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "text" => Ok(Self::Text),
            "number" => Ok(Self::Number),
            "select" => Ok(Self::Select),
            "radio" => Ok(Self::Radio),
            "checkbox" => Ok(Self::Checkbox),
            "switch" => Ok(Self::Switch),
            "date" => Ok(Self::Date),
            "import" => Ok(Self::Import),
            _ => Err(AppError::Validation(format!(
                "unknown field type '{value}'"
            ))),
        }
    }
}
