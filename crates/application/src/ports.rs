use async_trait::async_trait;
use csrd_core::AppResult;
use csrd_domain::{
    Declaration, DeclarationId, FormTemplate, LoginIdentifier, OrgUnit, OrgUnitId, OrgUnitLevel,
    TemplateId, User, UserId,
};

/// User directory entry as stored, including the password.
///
/// Never leaves the application layer; services hand out [`User`] only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    /// Public part of the entry.
    pub user: User,
    /// Stored password.
    pub password: String,
}

/// Repository port for the user directory.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Looks up entries by NNI or email. Backends may return partial matches.
    async fn find_by_identifier(&self, identifier: &LoginIdentifier)
    -> AppResult<Vec<UserRecord>>;

    /// Finds a user by identifier.
    async fn find_by_id(&self, user_id: &UserId) -> AppResult<Option<User>>;

    /// Stores a new entry and returns its public part.
    async fn create(&self, record: UserRecord) -> AppResult<User>;

    /// Assigns a team and returns the updated user.
    async fn update_team(&self, user_id: &UserId, team_id: &OrgUnitId) -> AppResult<User>;
}

/// Repository port for form templates.
#[async_trait]
pub trait FormTemplateRepository: Send + Sync {
    /// Lists every template.
    async fn list(&self) -> AppResult<Vec<FormTemplate>>;

    /// Finds one template.
    async fn find(&self, template_id: &TemplateId) -> AppResult<Option<FormTemplate>>;

    /// Stores a new template.
    async fn create(&self, template: FormTemplate) -> AppResult<FormTemplate>;

    /// Replaces an existing template. Last write wins.
    async fn update(&self, template: FormTemplate) -> AppResult<FormTemplate>;

    /// Deletes a template.
    async fn delete(&self, template_id: &TemplateId) -> AppResult<()>;
}

/// Repository port for declarations.
#[async_trait]
pub trait DeclarationRepository: Send + Sync {
    /// Lists every declaration.
    async fn list(&self) -> AppResult<Vec<Declaration>>;

    /// Finds one declaration.
    async fn find(&self, declaration_id: &DeclarationId) -> AppResult<Option<Declaration>>;

    /// Stores a new declaration.
    async fn create(&self, declaration: Declaration) -> AppResult<Declaration>;

    /// Replaces an existing declaration.
    async fn update(&self, declaration: Declaration) -> AppResult<Declaration>;

    /// Deletes a declaration.
    async fn delete(&self, declaration_id: &DeclarationId) -> AppResult<()>;
}

/// Repository port for the organizational hierarchy.
#[async_trait]
pub trait OrgUnitRepository: Send + Sync {
    /// Lists the units of `level`, filtered by their parent when given.
    async fn list(&self, level: OrgUnitLevel, parent_id: Option<&OrgUnitId>)
    -> AppResult<Vec<OrgUnit>>;
}
