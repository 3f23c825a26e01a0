use std::sync::Arc;

use csrd_core::{AppError, AppResult};
use csrd_domain::{
    Answers, CategoryCode, FormTemplate, FormTemplateInput, TemplateId, TemplateLineage,
    TemplateRevision,
};

use crate::form_builder::FormPreview;
use crate::ports::FormTemplateRepository;


/// Application service for form template lifecycle operations.
#[derive(Clone)]
pub struct FormTemplateService {
    repository: Arc<dyn FormTemplateRepository>,
}

impl FormTemplateService {
    /// Creates a new form template service.
    #[must_use]
    pub fn new(repository: Arc<dyn FormTemplateRepository>) -> Self {
        Self { repository }
    }

    /// Lists every template.
    pub async fn list(&self) -> AppResult<Vec<FormTemplate>> {
        self.repository.list().await
    }

    /// Lists templates offered for new declarations.
    pub async fn list_active(&self) -> AppResult<Vec<FormTemplate>> {
        Ok(self
            .repository
            .list()
            .await?
            .into_iter()
            .filter(FormTemplate::is_active)
            .collect())
    }

    /// Returns one template.
    pub async fn get(&self, template_id: &TemplateId) -> AppResult<FormTemplate> {
        self.repository
            .find(template_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("form '{template_id}' does not exist")))
    }

    /// Saves builder content as a new first-version draft.
    pub async fn create(&self, input: FormTemplateInput) -> AppResult<FormTemplate> {
        self.repository.create(FormTemplate::new_draft(input)).await
    }

    /// Saves builder content onto an existing template.
    ///
    /// Drafts are overwritten in place. A published template is left
    /// untouched: its pending derived draft is updated, or a draft with the
    /// next version of its lineage is created.
    pub async fn save(
        &self,
        template_id: &TemplateId,
        input: FormTemplateInput,
    ) -> AppResult<FormTemplate> {
        let current = self.get(template_id).await?;
        let templates = self.repository.list().await?;
        let lineage = TemplateLineage::of(&current, &templates);

        match current.revise(input, &lineage)? {
            TemplateRevision::Updated(template) => self.repository.update(template).await,
            TemplateRevision::Derived(template) => self.repository.create(template).await,
        }
    }

    /// Publishes a draft.
    pub async fn publish(&self, template_id: &TemplateId) -> AppResult<FormTemplate> {
        let mut template = self.get(template_id).await?;
        template.publish()?;
        self.repository.update(template).await
    }

    /// Offers or withdraws a template for new declarations.
    pub async fn set_active(
        &self,
        template_id: &TemplateId,
        is_active: bool,
    ) -> AppResult<FormTemplate> {
        let mut template = self.get(template_id).await?;
        template.set_active(is_active);
        self.repository.update(template).await
    }

    /// Deletes a template. Declarations referencing it are kept.
    pub async fn delete(&self, template_id: &TemplateId) -> AppResult<()> {
        self.get(template_id).await?;
        self.repository.delete(template_id).await
    }

    /// Renders a stored template against preview answers.
    pub async fn preview(
        &self,
        template_id: &TemplateId,
        answers: &Answers,
    ) -> AppResult<FormPreview> {
        let template = self.get(template_id).await?;
        Ok(FormPreview::render(template.schema(), answers))
    }

    /// Returns the distinct categories in use plus the default, sorted.
    pub async fn categories(&self) -> AppResult<Vec<CategoryCode>> {
        let templates = self.repository.list().await?;
        Ok(CategoryCode::catalog(
            templates.iter().map(FormTemplate::category_code),
        ))
    }
}
