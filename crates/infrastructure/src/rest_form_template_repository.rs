use async_trait::async_trait;
use csrd_application::FormTemplateRepository;
use csrd_core::AppResult;
use csrd_domain::{FormTemplate, TemplateId};
use reqwest::Method;

use crate::json_server_client::JsonServerClient;


const FORMS: &str = "forms";

/// Form template store backed by the `/forms` REST collection.
#[derive(Debug, Clone)]
pub struct RestFormTemplateRepository {
    client: JsonServerClient,
}

impl RestFormTemplateRepository {
    /// Creates a repository over `client`.
    #[must_use]
    pub fn new(client: JsonServerClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl FormTemplateRepository for RestFormTemplateRepository {
    async fn list(&self) -> AppResult<Vec<FormTemplate>> {
        let url = self.client.endpoint(&[FORMS])?;
        self.client.get(url).await
    }

    async fn find(&self, template_id: &TemplateId) -> AppResult<Option<FormTemplate>> {
        let url = self.client.endpoint(&[FORMS, template_id.as_str()])?;
        self.client.find(url).await
    }

    async fn create(&self, template: FormTemplate) -> AppResult<FormTemplate> {
        let url = self.client.endpoint(&[FORMS])?;
        let stored: FormTemplate = self.client.send(Method::POST, url, &template).await?;
        tracing::info!(
            template_id = %stored.id(),
            version = stored.version(),
            "form template created"
        );
        Ok(stored)
    }

    async fn update(&self, template: FormTemplate) -> AppResult<FormTemplate> {
        let url = self.client.endpoint(&[FORMS, template.id().as_str()])?;
        self.client.send(Method::PUT, url, &template).await
    }

    async fn delete(&self, template_id: &TemplateId) -> AppResult<()> {
        let url = self.client.endpoint(&[FORMS, template_id.as_str()])?;
        self.client.delete(url).await?;
        tracing::info!(template_id = %template_id, "form template deleted");
        Ok(())
    }
}
