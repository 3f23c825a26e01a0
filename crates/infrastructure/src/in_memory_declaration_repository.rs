use async_trait::async_trait;
use csrd_application::DeclarationRepository;
use csrd_core::{AppError, AppResult};
use csrd_domain::{Declaration, DeclarationId};
use tokio::sync::RwLock;


/// In-memory declaration store, listed in insertion order like a json-server collection.
#[derive(Debug, Default)]
pub struct InMemoryDeclarationRepository {
    declarations: RwLock<Vec<Declaration>>,
}

impl InMemoryDeclarationRepository {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with `declarations`.
    #[must_use]
    pub fn with_declarations(declarations: impl IntoIterator<Item = Declaration>) -> Self {
        Self {
            declarations: RwLock::new(declarations.into_iter().collect()),
        }
    }
}

#[async_trait]
impl DeclarationRepository for InMemoryDeclarationRepository {
    async fn list(&self) -> AppResult<Vec<Declaration>> {
        Ok(self.declarations.read().await.clone())
    }

    async fn find(&self, declaration_id: &DeclarationId) -> AppResult<Option<Declaration>> {
        let declarations = self.declarations.read().await;
        Ok(declarations.iter().find(|stored| stored.id() == declaration_id).cloned())
    }

    async fn create(&self, declaration: Declaration) -> AppResult<Declaration> {
        let mut declarations = self.declarations.write().await;
        if declarations.iter().any(|stored| stored.id() == declaration.id()) {
            return Err(AppError::Conflict(format!(
                "declaration '{}' already exists",
                declaration.id()
            )));
        }

        declarations.push(declaration.clone());
        Ok(declaration)
    }

    async fn update(&self, declaration: Declaration) -> AppResult<Declaration> {
        let mut declarations = self.declarations.write().await;
        let stored = declarations
            .iter_mut()
            .find(|stored| stored.id() == declaration.id())
            .ok_or_else(|| {
                AppError::NotFound(format!("declaration '{}' does not exist", declaration.id()))
            })?;

        *stored = declaration.clone();
        Ok(declaration)
    }

    async fn delete(&self, declaration_id: &DeclarationId) -> AppResult<()> {
        let mut declarations = self.declarations.write().await;
        let before = declarations.len();
        declarations.retain(|stored| stored.id() != declaration_id);
        if declarations.len() == before {
            return Err(AppError::NotFound(format!(
                "declaration '{declaration_id}' does not exist"
            )));
        }

        Ok(())
    }
}
