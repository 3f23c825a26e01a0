use std::collections::{BTreeMap, HashSet};

use csrd_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::branching::{BranchMarker, BranchingGraph};
use crate::field_config::{FieldConfig, FieldId, FieldOption};
use crate::validation::{Answers, ValidationReport};
use crate::visibility::VisibleFields;


/// Ordered field configurations plus the branching graph between them.
///
/// Every mutation keeps ids and names unique and the branching graph valid;
/// a rejected mutation leaves the schema untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "FormSchemaRecord")]
pub struct FormSchema {
    fields: Vec<FieldConfig>,
    #[serde(default, skip_serializing_if = "BranchingGraph::is_empty")]
    branching: BranchingGraph,
}

/// Accepted persisted shapes: a bare field list or fields with branching.
#[derive(Deserialize)]
#[serde(untagged)]
enum FormSchemaRecord {
    Fields(Vec<FieldConfig>),
    Full {
        fields: Vec<FieldConfig>,
        #[serde(default)]
        branching: BranchingGraph,
    },
}

impl TryFrom<FormSchemaRecord> for FormSchema {
    type Error = AppError;

    fn try_from(record: FormSchemaRecord) -> Result<Self, Self::Error> {
        match record {
            FormSchemaRecord::Fields(fields) => Self::from_parts(fields, BranchingGraph::default()),
            FormSchemaRecord::Full { fields, branching } => Self::from_parts(fields, branching),
        }
    }
}

impl FormSchema {
    /// Creates an empty schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a schema from persisted parts, checking every invariant.
    pub fn from_parts(fields: Vec<FieldConfig>, branching: BranchingGraph) -> AppResult<Self> {
        let mut ids = HashSet::new();
        let mut names = HashSet::new();
        for field in &fields {
            if !ids.insert(field.id()) {
                return Err(AppError::Validation(format!(
                    "duplicate field id '{}' in schema",
                    field.id()
                )));
            }
            if !names.insert(field.name().as_str()) {
                return Err(AppError::Validation(format!(
                    "duplicate field name '{}' in schema",
                    field.name()
                )));
            }
        }

        branching.validate(&fields)?;

        Ok(Self { fields, branching })
    }

    /// Returns the fields in document order.
    #[must_use]
    pub fn fields(&self) -> &[FieldConfig] {
        &self.fields
    }

    /// Returns the branching graph.
    #[must_use]
    pub fn branching(&self) -> &BranchingGraph {
        &self.branching
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns whether the schema has no field.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Finds a field by id.
    #[must_use]
    pub fn field(&self, field_id: &FieldId) -> Option<&FieldConfig> {
        self.fields.iter().find(|field| field.id() == field_id)
    }

    /// Finds a field by data-binding name.
    #[must_use]
    pub fn field_by_name(&self, name: &str) -> Option<&FieldConfig> {
        self.fields.iter().find(|field| field.name().as_str() == name)
    }

    /// Returns the document position of a field.
    #[must_use]
    pub fn position(&self, field_id: &FieldId) -> Option<usize> {
        self.fields.iter().position(|field| field.id() == field_id)
    }

    /// Appends a field at the end of the schema.
    pub fn add_field(&mut self, field: FieldConfig) -> AppResult<()> {
        self.insert_field(self.fields.len(), field)
    }

    /// Inserts a field at `index`.
    pub fn insert_field(&mut self, index: usize, field: FieldConfig) -> AppResult<()> {
        if index > self.fields.len() {
            return Err(AppError::Validation(format!(
                "insert position {index} is out of range"
            )));
        }
        if self.field(field.id()).is_some() {
            return Err(AppError::Conflict(format!(
                "field id '{}' already exists in schema",
                field.id()
            )));
        }
        self.ensure_name_available(field.name().as_str(), None)?;

        self.fields.insert(index, field);
        Ok(())
    }

    /// Replaces the configuration of an existing field.
    ///
    /// Branches keyed by options that no longer exist are dropped, and all
    /// branches are dropped if the field stops being a choice field.
    pub fn replace_field(&mut self, field: FieldConfig) -> AppResult<()> {
        let index = self.require_position(field.id())?;
        self.ensure_name_available(field.name().as_str(), Some(field.id()))?;

        let branching = if field.field_type().is_choice() {
            let values: Vec<&str> = field.options().iter().map(FieldOption::value).collect();
            self.branching.retaining_options(field.id(), &values)
        } else {
            self.branching.without_branches_of(field.id())
        };

        let mut fields = self.fields.clone();
        fields[index] = field;
        self.adopt(fields, branching)
    }

    /// Applies an edit to one field through [`FormSchema::replace_field`].
    pub fn update_field<F>(&mut self, field_id: &FieldId, edit: F) -> AppResult<()>
    where
        F: FnOnce(&mut FieldConfig) -> AppResult<()>,
    {
        let mut field = self
            .field(field_id)
            .cloned()
            .ok_or_else(|| Self::missing_field(field_id))?;
        edit(&mut field)?;
        self.replace_field(field)
    }

    /// Replaces the options of a choice field.
    pub fn set_field_options(
        &mut self,
        field_id: &FieldId,
        options: Vec<FieldOption>,
    ) -> AppResult<()> {
        self.update_field(field_id, |field| field.set_options(options))
    }

    /// Replaces one option of a choice field, re-keying its branch when the
    /// option value changes.
    pub fn replace_field_option(
        &mut self,
        field_id: &FieldId,
        index: usize,
        option: FieldOption,
    ) -> AppResult<()> {
        let mut field = self
            .field(field_id)
            .cloned()
            .ok_or_else(|| Self::missing_field(field_id))?;
        let previous_value = field
            .options()
            .get(index)
            .map(|previous| previous.value().to_owned());
        let new_value = option.value().to_owned();
        field.replace_option(index, option)?;

        let branching = match previous_value {
            Some(previous_value) => {
                self.branching
                    .with_renamed_option(field_id, previous_value.as_str(), new_value.as_str())
            }
            None => self.branching.clone(),
        };
        let position = self.require_position(field_id)?;
        let mut fields = self.fields.clone();
        fields[position] = field;
        self.adopt(fields, branching)
    }

    /// Removes a field and every branching reference to it.
    pub fn remove_field(&mut self, field_id: &FieldId) -> AppResult<FieldConfig> {
        let index = self.require_position(field_id)?;
        let branching = self.branching.without_field(field_id);
        let mut fields = self.fields.clone();
        let removed = fields.remove(index);
        self.adopt(fields, branching)?;
        Ok(removed)
    }

    /// Moves the field at `from` to position `to`. Branches are keyed by id
    /// and are unaffected.
    pub fn move_field(&mut self, from: usize, to: usize) -> AppResult<()> {
        if from >= self.fields.len() || to >= self.fields.len() {
            return Err(AppError::Validation(format!(
                "field move {from} -> {to} is out of range"
            )));
        }

        let moved = self.fields.remove(from);
        self.fields.insert(to, moved);
        Ok(())
    }

    /// Replaces the children revealed by `option_value` on `field_id`.
    ///
    /// An empty list removes the branch. Violations of the branching
    /// invariants are rejected with [`AppError::ConfigIntegrity`].
    pub fn set_linked_fields(
        &mut self,
        field_id: &FieldId,
        option_value: &str,
        children: Vec<FieldId>,
    ) -> AppResult<()> {
        self.require_position(field_id)?;
        let mut seen = HashSet::new();
        if let Some(duplicate) = children.iter().find(|child| !seen.insert(*child)) {
            return Err(AppError::ConfigIntegrity(format!(
                "field '{duplicate}' is listed twice in the same branch"
            )));
        }

        let branching = self.branching.with_link(field_id, option_value, children);
        branching.validate(&self.fields)?;
        self.branching = branching;
        Ok(())
    }

    /// Returns the derived branch marker of every branch child.
    #[must_use]
    pub fn branch_markers(&self) -> BTreeMap<FieldId, BranchMarker> {
        self.branching.markers(&self.fields)
    }

    /// Returns the fields to render for the current answers.
    #[must_use]
    pub fn visible_fields<'a>(&'a self, answers: &'a Answers) -> VisibleFields<'a> {
        VisibleFields::new(self, answers)
    }

    /// Derives initial answers from every field's defaults.
    #[must_use]
    pub fn initial_answers(&self) -> Answers {
        self.fields
            .iter()
            .filter_map(|field| {
                field
                    .default_answer()
                    .map(|value| (field.name().as_str().to_owned(), value))
            })
            .collect()
    }

    /// Validates the answers of every visible field.
    ///
    /// Hidden branch fields are neither validated nor kept in the coerced values.
    #[must_use]
    pub fn validate(&self, answers: &Answers) -> ValidationReport {
        let mut report = ValidationReport::default();
        for field in self.visible_fields(answers) {
            let name = field.name().as_str();
            match field.check_value(answers.get(name)) {
                Ok(Some(value)) => report.record_value(name, value),
                Ok(None) => {}
                Err(code) => report.record_error(name, code),
            }
        }
        report
    }

    /// Keeps only answers bound to a field of this schema.
    #[must_use]
    pub fn retain_known_answers(&self, answers: &Answers) -> Answers {
        answers
            .iter()
            .filter(|(name, _)| self.field_by_name(name).is_some())
            .map(|(name, value): (&String, &Value)| (name.clone(), value.clone()))
            .collect()
    }

    fn adopt(&mut self, fields: Vec<FieldConfig>, branching: BranchingGraph) -> AppResult<()> {
        branching.validate(&fields)?;
        self.fields = fields;
        self.branching = branching;
        Ok(())
    }

    fn require_position(&self, field_id: &FieldId) -> AppResult<usize> {
        self.position(field_id)
            .ok_or_else(|| Self::missing_field(field_id))
    }

    fn ensure_name_available(&self, name: &str, except: Option<&FieldId>) -> AppResult<()> {
        let taken = self
            .fields
            .iter()
            .any(|field| field.name().as_str() == name && Some(field.id()) != except);
        if taken {
            return Err(AppError::Conflict(format!(
                "field name '{name}' is already used in schema"
            )));
        }
        Ok(())
    }

    fn missing_field(field_id: &FieldId) -> AppError {
        AppError::NotFound(format!("field '{field_id}' does not exist in schema"))
    }
}
