//! Editor context behind the admin form builder.

use csrd_core::{AppError, AppResult, NonEmptyString};
use csrd_domain::{
    Answers, BranchMarker, CategoryCode, FieldConfig, FieldId, FieldOption, FieldType,
    FieldTypeRegistry, FormSchema, FormTemplate, FormTemplateInput, TemplateId, ValidationReport,
};


/// A field as rendered for a given set of answers.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewField {
    /// Field configuration.
    pub field: FieldConfig,
    /// Branch marker when the field is revealed by an option.
    pub marker: Option<BranchMarker>,
}

/// Rendered fields plus the validation outcome of the answers.
#[derive(Debug, Clone, PartialEq)]
pub struct FormPreview {
    /// Visible fields in render order.
    pub fields: Vec<PreviewField>,
    /// Inline validation outcome.
    pub report: ValidationReport,
}

impl FormPreview {
    /// Renders `schema` against `answers`.
    #[must_use]
    pub fn render(schema: &FormSchema, answers: &Answers) -> Self {
        let markers = schema.branch_markers();
        let fields = schema
            .visible_fields(answers)
            .map(|field| PreviewField {
                marker: markers.get(field.id()).copied(),
                field: field.clone(),
            })
            .collect();

        Self {
            fields,
            report: schema.validate(answers),
        }
    }
}

/// In-progress template edited in the builder.
///
/// Not persisted until [`FormBuilder::to_input`] is handed to the template
/// service.
#[derive(Debug, Clone)]
pub struct FormBuilder {
    registry: FieldTypeRegistry,
    template_id: Option<TemplateId>,
    name: String,
    description: String,
    category_code: CategoryCode,
    schema: FormSchema,
}

impl Default for FormBuilder {
    fn default() -> Self {
        Self::new(FieldTypeRegistry::shared().clone())
    }
}

impl FormBuilder {
    /// Creates an empty builder using `registry` for new field defaults.
    #[must_use]
    pub fn new(registry: FieldTypeRegistry) -> Self {
        Self {
            registry,
            template_id: None,
            name: String::new(),
            description: String::new(),
            category_code: CategoryCode::default(),
            schema: FormSchema::new(),
        }
    }

    /// Loads a saved template, or resets to a blank form when `None`.
    pub fn initialize_from_form(&mut self, template: Option<&FormTemplate>) {
        match template {
            Some(template) => {
                self.template_id = Some(template.id().clone());
                self.name = template.name().as_str().to_owned();
                self.description = template.description().to_owned();
                self.category_code = template.category_code().clone();
                self.schema = template.schema().clone();
            }
            None => {
                self.template_id = None;
                self.name.clear();
                self.description.clear();
                self.category_code = CategoryCode::default();
                self.schema = FormSchema::new();
            }
        }
    }

    /// Returns the template being edited, `None` for a new one.
    #[must_use]
    pub fn template_id(&self) -> Option<&TemplateId> {
        self.template_id.as_ref()
    }

    /// Returns the template name as typed.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Returns the category.
    #[must_use]
    pub fn category_code(&self) -> &CategoryCode {
        &self.category_code
    }

    /// Returns the schema under construction.
    #[must_use]
    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    /// Sets the template name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Sets the description.
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Sets the category.
    pub fn set_category_code(&mut self, category_code: CategoryCode) {
        self.category_code = category_code;
    }

    /// Appends a field of `field_type` with the registry defaults, a fresh
    /// id and a name unique within the schema.
    pub fn add_field(&mut self, field_type: FieldType) -> AppResult<FieldId> {
        let field_id = FieldId::generate();
        let name = self.unique_name(field_type);
        let field = FieldConfig::from_defaults(
            field_id.clone(),
            name,
            field_type,
            self.registry.default_config(field_type),
        )?;

        self.schema.add_field(field)?;
        Ok(field_id)
    }

    /// Applies an edit to one field.
    pub fn update_field<F>(&mut self, field_id: &FieldId, edit: F) -> AppResult<()>
    where
        F: FnOnce(&mut FieldConfig) -> AppResult<()>,
    {
        self.schema.update_field(field_id, edit)
    }

    /// Removes a field and every branching reference to it.
    pub fn remove_field(&mut self, field_id: &FieldId) -> AppResult<FieldConfig> {
        self.schema.remove_field(field_id)
    }

    /// Moves a field to another position.
    pub fn move_field(&mut self, from: usize, to: usize) -> AppResult<()> {
        self.schema.move_field(from, to)
    }

    /// Replaces the options of a choice field.
    pub fn set_options(&mut self, field_id: &FieldId, options: Vec<FieldOption>) -> AppResult<()> {
        self.schema.set_field_options(field_id, options)
    }

    /// Replaces the children revealed by one option.
    pub fn set_linked_fields(
        &mut self,
        field_id: &FieldId,
        option_value: &str,
        children: Vec<FieldId>,
    ) -> AppResult<()> {
        self.schema
            .set_linked_fields(field_id, option_value, children)
    }

    /// Renders the form as a declarant would see it.
    #[must_use]
    pub fn preview(&self, answers: &Answers) -> FormPreview {
        FormPreview::render(&self.schema, answers)
    }

    /// Validates preview answers.
    #[must_use]
    pub fn validate_preview(&self, answers: &Answers) -> ValidationReport {
        self.schema.validate(answers)
    }

    /// Returns the content to save.
    pub fn to_input(&self) -> AppResult<FormTemplateInput> {
        let name = NonEmptyString::new(self.name.trim())
            .map_err(|_| AppError::Validation("form name must not be empty".to_owned()))?;

        Ok(FormTemplateInput {
            name,
            description: self.description.clone(),
            category_code: self.category_code.clone(),
            schema: self.schema.clone(),
        })
    }

    fn unique_name(&self, field_type: FieldType) -> String {
        (1_usize..)
            .map(|index| format!("{}_{index}", field_type.as_str()))
            .find(|name| self.schema.field_by_name(name).is_none())
            .unwrap_or_else(|| format!("{}_{}", field_type.as_str(), FieldId::generate()))
    }
}
