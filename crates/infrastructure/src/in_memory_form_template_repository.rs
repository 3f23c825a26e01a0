use async_trait::async_trait;
use csrd_application::FormTemplateRepository;
use csrd_core::{AppError, AppResult};
use csrd_domain::{FormTemplate, TemplateId};
use tokio::sync::RwLock;


/// In-memory form template store, listed in insertion order like a json-server collection.
#[derive(Debug, Default)]
pub struct InMemoryFormTemplateRepository {
    templates: RwLock<Vec<FormTemplate>>,
}

impl InMemoryFormTemplateRepository {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with `templates`.
    #[must_use]
    pub fn with_templates(templates: impl IntoIterator<Item = FormTemplate>) -> Self {
        Self {
            templates: RwLock::new(templates.into_iter().collect()),
        }
    }
}

#[async_trait]
impl FormTemplateRepository for InMemoryFormTemplateRepository {
    async fn list(&self) -> AppResult<Vec<FormTemplate>> {
        Ok(self.templates.read().await.clone())
    }

    async fn find(&self, template_id: &TemplateId) -> AppResult<Option<FormTemplate>> {
        let templates = self.templates.read().await;
        Ok(templates.iter().find(|stored| stored.id() == template_id).cloned())
    }

    async fn create(&self, template: FormTemplate) -> AppResult<FormTemplate> {
        let mut templates = self.templates.write().await;
        if templates.iter().any(|stored| stored.id() == template.id()) {
            return Err(AppError::Conflict(format!(
                "form '{}' already exists",
                template.id()
            )));
        }

        templates.push(template.clone());
        Ok(template)
    }

    async fn update(&self, template: FormTemplate) -> AppResult<FormTemplate> {
        let mut templates = self.templates.write().await;
        let stored = templates
            .iter_mut()
            .find(|stored| stored.id() == template.id())
            .ok_or_else(|| {
                AppError::NotFound(format!("form '{}' does not exist", template.id()))
            })?;

        *stored = template.clone();
        Ok(template)
    }

    async fn delete(&self, template_id: &TemplateId) -> AppResult<()> {
        let mut templates = self.templates.write().await;
        let before = templates.len();
        templates.retain(|stored| stored.id() != template_id);
        if templates.len() == before {
            return Err(AppError::NotFound(format!(
                "form '{template_id}' does not exist"
            )));
        }

        Ok(())
    }
}
