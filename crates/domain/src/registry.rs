//! Field type registry.
//!
//! Each [`FieldType`] maps to a static [`FieldTypeHandler`] that knows the
//! type's default configuration, how to validate and coerce an answer, and
//! how to describe itself in the builder palette. The set of handlers is
//! closed: unknown type tags never reach this module because parsing a
//! [`FieldType`] rejects them.
//!
//! [`FieldTypeRegistry`] layers overridable default configurations on top of
//! the handlers. Looking up a type that was never registered yields an empty
//! [`FieldDefaults`] instead of an error.

use std::collections::HashMap;
use std::sync::LazyLock;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value, json};

use crate::field_config::{FieldConfig, FieldKind, FieldOption};
use crate::field_type::FieldType;
use crate::validation::FieldErrorCode;

/// Default configuration fragment applied when a new field is instantiated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefaults {
    /// Initial label.
    #[serde(default)]
    pub label: Option<String>,
    /// Initial placeholder for text inputs.
    #[serde(default)]
    pub placeholder: Option<String>,
    /// Initial options for choice fields.
    #[serde(default)]
    pub options: Vec<FieldOption>,
    /// Whether select fields start in multiple mode.
    #[serde(default)]
    pub multiple: bool,
    /// Initial default answer.
    #[serde(default)]
    pub default_value: Option<Value>,
    /// Initial unit for number fields.
    #[serde(default)]
    pub unit: Option<String>,
    /// Initial accepted extensions for import fields.
    #[serde(default)]
    pub accept: Vec<String>,
}

/// Behaviour attached to one field type.
pub trait FieldTypeHandler: Send + Sync {
    /// Returns the handled field type.
    fn field_type(&self) -> FieldType;

    /// Returns the built-in default configuration.
    fn default_config(&self) -> FieldDefaults;

    /// Returns a short human-readable description for the builder palette.
    fn describe(&self) -> &'static str;

    /// Validates and coerces a non-empty answer.
    fn check(&self, field: &FieldConfig, value: &Value) -> Result<Value, FieldErrorCode>;

    /// Value used for an empty answer before the required check runs.
    fn substitute_empty(&self, _field: &FieldConfig) -> Option<Value> {
        None
    }

    /// Value stored for an empty answer on an optional field.
    fn coerce_empty(&self, _field: &FieldConfig) -> Option<Value> {
        None
    }
}

fn default_options() -> Vec<FieldOption> {
    [("option_1", "Option 1"), ("option_2", "Option 2")]
        .into_iter()
        .filter_map(|(value, label)| FieldOption::new(value, label).ok())
        .collect()
}

struct TextHandler;

impl FieldTypeHandler for TextHandler {
    fn field_type(&self) -> FieldType {
        FieldType::Text
    }

    fn default_config(&self) -> FieldDefaults {
        FieldDefaults {
            label: Some("Nouveau champ texte".to_owned()),
            placeholder: Some(String::new()),
            ..FieldDefaults::default()
        }
    }

    fn describe(&self) -> &'static str {
        "Champ de saisie libre"
    }

    fn check(&self, field: &FieldConfig, value: &Value) -> Result<Value, FieldErrorCode> {
        let text = match value {
            Value::String(text) => text.clone(),
            Value::Number(number) => number.to_string(),
            Value::Bool(flag) => flag.to_string(),
            _ => return Err(FieldErrorCode::InvalidValue),
        };

        if let FieldKind::Text {
            max_length: Some(max_length),
            ..
        } = field.kind()
            && text.chars().count() > *max_length
        {
            return Err(FieldErrorCode::TooLong);
        }

        Ok(Value::String(text))
    }
}

struct NumberHandler;

impl NumberHandler {
    fn parse(value: &Value) -> Option<f64> {
        let parsed = match value {
            Value::Number(number) => number.as_f64(),
            Value::String(text) => text.trim().replace(',', ".").parse::<f64>().ok(),
            _ => None,
        };

        parsed.filter(|number| number.is_finite())
    }

    fn to_value(number: f64) -> Value {
        if number.fract() == 0.0 && number.abs() < 9.0e15 {
            Value::from(number as i64)
        } else {
            Number::from_f64(number).map_or(Value::Null, Value::Number)
        }
    }
}

impl FieldTypeHandler for NumberHandler {
    fn field_type(&self) -> FieldType {
        FieldType::Number
    }

    fn default_config(&self) -> FieldDefaults {
        FieldDefaults {
            label: Some("Nouvelle valeur numérique".to_owned()),
            unit: Some(String::new()),
            ..FieldDefaults::default()
        }
    }

    fn describe(&self) -> &'static str {
        "Valeur numérique avec unité"
    }

    fn check(&self, field: &FieldConfig, value: &Value) -> Result<Value, FieldErrorCode> {
        let number = Self::parse(value).ok_or(FieldErrorCode::InvalidNumber)?;

        if let FieldKind::Number { min, max, .. } = field.kind() {
            let below = min.is_some_and(|min| number < min);
            let above = max.is_some_and(|max| number > max);
            if below || above {
                return Err(FieldErrorCode::OutOfRange);
            }
        }

        Ok(Self::to_value(number))
    }

    fn coerce_empty(&self, _field: &FieldConfig) -> Option<Value> {
        Some(json!(0))
    }
}

struct ChoiceHandler(FieldType);

impl ChoiceHandler {
    fn option_value(field: &FieldConfig, value: &Value) -> Result<String, FieldErrorCode> {
        let candidate = match value {
            Value::String(text) => text.clone(),
            Value::Number(number) => number.to_string(),
            _ => return Err(FieldErrorCode::InvalidOption),
        };

        field
            .options()
            .iter()
            .any(|option| option.value() == candidate)
            .then_some(candidate)
            .ok_or(FieldErrorCode::InvalidOption)
    }
}

impl FieldTypeHandler for ChoiceHandler {
    fn field_type(&self) -> FieldType {
        self.0
    }

    fn default_config(&self) -> FieldDefaults {
        let label = match self.0 {
            FieldType::Radio => "Nouveau choix unique",
            FieldType::Checkbox => "Nouvelles cases à cocher",
            _ => "Nouvelle liste déroulante",
        };

        FieldDefaults {
            label: Some(label.to_owned()),
            options: default_options(),
            ..FieldDefaults::default()
        }
    }

    fn describe(&self) -> &'static str {
        match self.0 {
            FieldType::Radio => "Choix unique parmi des boutons radio",
            FieldType::Checkbox => "Choix multiple parmi des cases à cocher",
            _ => "Liste déroulante",
        }
    }

    fn check(&self, field: &FieldConfig, value: &Value) -> Result<Value, FieldErrorCode> {
        if field.accepts_multiple() {
            let selected = match value {
                Value::Array(items) => items
                    .iter()
                    .map(|item| Self::option_value(field, item))
                    .collect::<Result<Vec<_>, _>>()?,
                single => vec![Self::option_value(field, single)?],
            };
            // Stored once per option, in option order.
            return Ok(Value::Array(
                field
                    .options()
                    .iter()
                    .filter(|option| selected.iter().any(|value| value == option.value()))
                    .map(|option| Value::String(option.value().to_owned()))
                    .collect(),
            ));
        }

        Self::option_value(field, value).map(Value::String)
    }
}

struct SwitchHandler;

impl FieldTypeHandler for SwitchHandler {
    fn field_type(&self) -> FieldType {
        FieldType::Switch
    }

    fn default_config(&self) -> FieldDefaults {
        FieldDefaults {
            label: Some("Nouvel interrupteur".to_owned()),
            default_value: Some(Value::Bool(false)),
            ..FieldDefaults::default()
        }
    }

    fn describe(&self) -> &'static str {
        "Interrupteur oui/non"
    }

    fn check(&self, _field: &FieldConfig, value: &Value) -> Result<Value, FieldErrorCode> {
        let flag = match value {
            Value::Bool(flag) => *flag,
            Value::Number(number) => number.as_f64().is_some_and(|number| number != 0.0),
            Value::String(text) => match text.trim().to_lowercase().as_str() {
                "true" | "on" | "1" | "oui" => true,
                "false" | "off" | "0" | "non" => false,
                _ => return Err(FieldErrorCode::InvalidValue),
            },
            _ => return Err(FieldErrorCode::InvalidValue),
        };

        Ok(Value::Bool(flag))
    }

    fn substitute_empty(&self, field: &FieldConfig) -> Option<Value> {
        match field.kind() {
            FieldKind::Switch { default_value } => Some(Value::Bool(*default_value)),
            _ => None,
        }
    }
}

struct DateHandler;

impl FieldTypeHandler for DateHandler {
    fn field_type(&self) -> FieldType {
        FieldType::Date
    }

    fn default_config(&self) -> FieldDefaults {
        FieldDefaults {
            label: Some("Nouvelle date".to_owned()),
            ..FieldDefaults::default()
        }
    }

    fn describe(&self) -> &'static str {
        "Date au format AAAA-MM-JJ"
    }

    fn check(&self, _field: &FieldConfig, value: &Value) -> Result<Value, FieldErrorCode> {
        let text = value.as_str().ok_or(FieldErrorCode::InvalidDate)?.trim();
        NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .map(|date| Value::String(date.format("%Y-%m-%d").to_string()))
            .map_err(|_| FieldErrorCode::InvalidDate)
    }
}

struct ImportHandler;

impl FieldTypeHandler for ImportHandler {
    fn field_type(&self) -> FieldType {
        FieldType::Import
    }

    fn default_config(&self) -> FieldDefaults {
        FieldDefaults {
            label: Some("Nouvel import de fichier".to_owned()),
            accept: vec![".csv".to_owned(), ".xlsx".to_owned()],
            ..FieldDefaults::default()
        }
    }

    fn describe(&self) -> &'static str {
        "Import d'un fichier de données"
    }

    fn check(&self, _field: &FieldConfig, value: &Value) -> Result<Value, FieldErrorCode> {
        Ok(value.clone())
    }
}

static TEXT: TextHandler = TextHandler;
static NUMBER: NumberHandler = NumberHandler;
static SELECT: ChoiceHandler = ChoiceHandler(FieldType::Select);
static RADIO: ChoiceHandler = ChoiceHandler(FieldType::Radio);
static CHECKBOX: ChoiceHandler = ChoiceHandler(FieldType::Checkbox);
static SWITCH: SwitchHandler = SwitchHandler;
static DATE: DateHandler = DateHandler;
static IMPORT: ImportHandler = ImportHandler;

pub(crate) fn handler_for(field_type: FieldType) -> &'static dyn FieldTypeHandler {
    match field_type {
        FieldType::Text => &TEXT,
        FieldType::Number => &NUMBER,
        FieldType::Select => &SELECT,
        FieldType::Radio => &RADIO,
        FieldType::Checkbox => &CHECKBOX,
        FieldType::Switch => &SWITCH,
        FieldType::Date => &DATE,
        FieldType::Import => &IMPORT,
    }
}

static STANDARD_REGISTRY: LazyLock<FieldTypeRegistry> = LazyLock::new(FieldTypeRegistry::standard);

/// Default configurations keyed by field type.
#[derive(Debug, Clone, Default)]
pub struct FieldTypeRegistry {
    defaults: HashMap<FieldType, FieldDefaults>,
}

impl FieldTypeRegistry {
    /// Creates a registry with no registered types.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with every supported type registered with its
    /// built-in defaults.
    #[must_use]
    pub fn standard() -> Self {
        let mut registry = Self::new();
        for field_type in FieldType::all() {
            registry.register(*field_type, field_type.handler().default_config());
        }
        registry
    }

    /// Returns the shared start-up registry.
    #[must_use]
    pub fn shared() -> &'static Self {
        &STANDARD_REGISTRY
    }

    /// Associates default configuration with a type. The last registration wins.
    pub fn register(&mut self, field_type: FieldType, defaults: FieldDefaults) {
        self.defaults.insert(field_type, defaults);
    }

    /// Returns an owned copy of the registered defaults, or empty defaults
    /// when the type was never registered.
    #[must_use]
    pub fn default_config(&self, field_type: FieldType) -> FieldDefaults {
        self.defaults.get(&field_type).cloned().unwrap_or_default()
    }

    /// Returns whether defaults were registered for the type.
    #[must_use]
    pub fn is_registered(&self, field_type: FieldType) -> bool {
        self.defaults.contains_key(&field_type)
    }

    /// Returns the registered types, in palette order.
    #[must_use]
    pub fn registered_types(&self) -> Vec<FieldType> {
        let mut types: Vec<FieldType> = self.defaults.keys().copied().collect();
        types.sort();
        types
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{FieldDefaults, FieldTypeRegistry};
    use crate::field_config::{FieldConfig, FieldId};
    use crate::field_type::FieldType;
    use crate::validation::FieldErrorCode;

    fn field(field_type: FieldType) -> FieldConfig {
        FieldConfig::from_defaults(
            FieldId::generate(),
            "value",
            field_type,
            FieldTypeRegistry::shared().default_config(field_type),
        )
        .unwrap_or_else(|_| unreachable!())
    }

    #[test]
    fn standard_registry_covers_every_type() {
        let registry = FieldTypeRegistry::standard();
        assert_eq!(registry.registered_types(), FieldType::all().to_vec());
    }

    #[test]
    fn unregistered_type_yields_empty_defaults() {
        let registry = FieldTypeRegistry::new();
        assert_eq!(
            registry.default_config(FieldType::Select),
            FieldDefaults::default()
        );
    }

    #[test]
    fn default_config_is_an_owned_copy() {
        let registry = FieldTypeRegistry::standard();
        let mut copy = registry.default_config(FieldType::Radio);
        copy.options.clear();
        assert_eq!(registry.default_config(FieldType::Radio).options.len(), 2);
    }

    #[test]
    fn last_registration_wins() {
        let mut registry = FieldTypeRegistry::standard();
        registry.register(
            FieldType::Text,
            FieldDefaults {
                label: Some("Commentaire".to_owned()),
                ..FieldDefaults::default()
            },
        );
        assert_eq!(
            registry.default_config(FieldType::Text).label.as_deref(),
            Some("Commentaire")
        );
    }

    #[test]
    fn number_accepts_numeric_strings() {
        let number = field(FieldType::Number);
        assert_eq!(number.check_value(Some(&json!("12,5"))), Ok(Some(json!(12.5))));
        assert_eq!(number.check_value(Some(&json!("40"))), Ok(Some(json!(40))));
        assert_eq!(
            number.check_value(Some(&json!(true))),
            Err(FieldErrorCode::InvalidNumber)
        );
    }

    #[test]
    fn choice_rejects_unknown_option() {
        let select = field(FieldType::Select);
        assert_eq!(
            select.check_value(Some(&json!("option_1"))),
            Ok(Some(json!("option_1")))
        );
        assert_eq!(
            select.check_value(Some(&json!("option_9"))),
            Err(FieldErrorCode::InvalidOption)
        );
    }

    #[test]
    fn checkbox_normalizes_single_value_into_list() {
        let checkbox = field(FieldType::Checkbox);
        assert_eq!(
            checkbox.check_value(Some(&json!("option_2"))),
            Ok(Some(json!(["option_2"])))
        );
        assert_eq!(
            checkbox.check_value(Some(&json!(["option_1", "nope"]))),
            Err(FieldErrorCode::InvalidOption)
        );
    }

    #[test]
    fn checkbox_drops_repeated_values_and_follows_option_order() {
        let checkbox = field(FieldType::Checkbox);
        assert_eq!(
            checkbox.check_value(Some(&json!(["option_2", "option_1", "option_2"]))),
            Ok(Some(json!(["option_1", "option_2"])))
        );
        assert_eq!(
            checkbox.check_value(Some(&json!(["option_1", "option_1"]))),
            Ok(Some(json!(["option_1"])))
        );
    }

    #[test]
    fn switch_falls_back_to_default_when_absent() {
        let mut switch = field(FieldType::Switch);
        switch.set_required(true);
        assert_eq!(switch.check_value(None), Ok(Some(json!(false))));
        assert_eq!(switch.check_value(Some(&json!("oui"))), Ok(Some(json!(true))));
    }

    #[test]
    fn date_requires_iso_format() {
        let date = field(FieldType::Date);
        assert_eq!(
            date.check_value(Some(&json!("2024-12-31"))),
            Ok(Some(json!("2024-12-31")))
        );
        assert_eq!(
            date.check_value(Some(&json!("31/12/2024"))),
            Err(FieldErrorCode::InvalidDate)
        );
    }

    #[test]
    fn every_type_has_a_description() {
        for field_type in FieldType::all() {
            assert!(!field_type.handler().describe().is_empty());
            assert_eq!(field_type.handler().field_type(), *field_type);
        }
    }
}
