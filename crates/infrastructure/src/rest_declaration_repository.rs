use async_trait::async_trait;
use csrd_application::DeclarationRepository;
use csrd_core::AppResult;
use csrd_domain::{Declaration, DeclarationId};
use reqwest::Method;

use crate::json_server_client::JsonServerClient;


const DECLARATIONS: &str = "declarations";

/// Declaration store backed by the `/declarations` REST collection.
#[derive(Debug, Clone)]
pub struct RestDeclarationRepository {
    client: JsonServerClient,
}

impl RestDeclarationRepository {
    /// Creates a repository over `client`.
    #[must_use]
    pub fn new(client: JsonServerClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DeclarationRepository for RestDeclarationRepository {
    async fn list(&self) -> AppResult<Vec<Declaration>> {
        let url = self.client.endpoint(&[DECLARATIONS])?;
        self.client.get(url).await
    }

    async fn find(&self, declaration_id: &DeclarationId) -> AppResult<Option<Declaration>> {
        let url = self.client.endpoint(&[DECLARATIONS, declaration_id.as_str()])?;
        self.client.find(url).await
    }

    async fn create(&self, declaration: Declaration) -> AppResult<Declaration> {
        let url = self.client.endpoint(&[DECLARATIONS])?;
        let stored: Declaration = self.client.send(Method::POST, url, &declaration).await?;
        tracing::info!(
            declaration_id = %stored.id(),
            template_id = %stored.form_template_id(),
            "declaration created"
        );
        Ok(stored)
    }

    async fn update(&self, declaration: Declaration) -> AppResult<Declaration> {
        let url = self.client.endpoint(&[DECLARATIONS, declaration.id().as_str()])?;
        self.client.send(Method::PUT, url, &declaration).await
    }

    async fn delete(&self, declaration_id: &DeclarationId) -> AppResult<()> {
        let url = self.client.endpoint(&[DECLARATIONS, declaration_id.as_str()])?;
        self.client.delete(url).await?;
        tracing::info!(declaration_id = %declaration_id, "declaration deleted");
        Ok(())
    }
}
