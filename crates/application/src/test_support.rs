use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use csrd_core::{AppError, AppResult, NonEmptyString};
use csrd_domain::{
    Declaration, DeclarationId, EmailAddress, FormTemplate, LoginIdentifier, OrgUnit, OrgUnitId,
    OrgUnitLevel, TemplateId, User, UserId, UserProfile, UserRole, UserStatus,
};
use tokio::sync::Mutex;

use crate::ports::{
    DeclarationRepository, FormTemplateRepository, OrgUnitRepository, UserRecord, UserRepository,
};

pub(crate) fn user(id: &str, nni: &str, email: &str, role: UserRole) -> User {
    let profile = UserProfile {
        nni: NonEmptyString::new(nni).unwrap_or_else(|_| unreachable!()),
        email: EmailAddress::new(email).unwrap_or_else(|_| unreachable!()),
        last_name: NonEmptyString::new("Martin").unwrap_or_else(|_| unreachable!()),
        first_name: NonEmptyString::new("Jeanne").unwrap_or_else(|_| unreachable!()),
    };
    User::new(
        UserId::new(id).unwrap_or_else(|_| unreachable!()),
        profile,
        role,
        UserStatus::Active,
    )
}

/// Directory returning prefix matches, like a `_like` query would.
#[derive(Default)]
pub(crate) struct FakeUserRepository {
    records: Mutex<Vec<UserRecord>>,
}

impl FakeUserRepository {
    pub(crate) fn with_records(records: Vec<UserRecord>) -> Arc<Self> {
        Arc::new(Self {
            records: Mutex::new(records),
        })
    }

    pub(crate) async fn stored(&self) -> Vec<UserRecord> {
        self.records.lock().await.clone()
    }
}

#[async_trait]
impl UserRepository for FakeUserRepository {
    async fn find_by_identifier(
        &self,
        identifier: &LoginIdentifier,
    ) -> AppResult<Vec<UserRecord>> {
        let query = identifier.as_str();
        Ok(self
            .records
            .lock()
            .await
            .iter()
            .filter(|record| match identifier {
                LoginIdentifier::Email(_) => record.user.email().as_str().starts_with(query),
                LoginIdentifier::Nni(_) => record.user.nni().as_str().starts_with(query),
            })
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AppResult<Option<User>> {
        Ok(self
            .records
            .lock()
            .await
            .iter()
            .find(|record| record.user.id() == user_id)
            .map(|record| record.user.clone()))
    }

    async fn create(&self, record: UserRecord) -> AppResult<User> {
        let user = record.user.clone();
        self.records.lock().await.push(record);
        Ok(user)
    }

    async fn update_team(&self, user_id: &UserId, team_id: &OrgUnitId) -> AppResult<User> {
        let mut records = self.records.lock().await;
        let record = records
            .iter_mut()
            .find(|record| record.user.id() == user_id)
            .ok_or_else(|| AppError::NotFound(format!("user '{user_id}' does not exist")))?;
        record.user.assign_team(team_id.clone());
        Ok(record.user.clone())
    }
}

#[derive(Default)]
pub(crate) struct FakeTemplateRepository {
    templates: Mutex<Vec<FormTemplate>>,
    list_calls: AtomicUsize,
}

impl FakeTemplateRepository {
    pub(crate) fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub(crate) async fn stored(&self) -> Vec<FormTemplate> {
        self.templates.lock().await.clone()
    }
}

#[async_trait]
impl FormTemplateRepository for FakeTemplateRepository {
    async fn list(&self) -> AppResult<Vec<FormTemplate>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.templates.lock().await.clone())
    }

    async fn find(&self, template_id: &TemplateId) -> AppResult<Option<FormTemplate>> {
        Ok(self
            .templates
            .lock()
            .await
            .iter()
            .find(|template| template.id() == template_id)
            .cloned())
    }

    async fn create(&self, template: FormTemplate) -> AppResult<FormTemplate> {
        self.templates.lock().await.push(template.clone());
        Ok(template)
    }

    async fn update(&self, template: FormTemplate) -> AppResult<FormTemplate> {
        let mut templates = self.templates.lock().await;
        let slot = templates
            .iter_mut()
            .find(|stored| stored.id() == template.id())
            .ok_or(AppError::Http(404))?;
        *slot = template.clone();
        Ok(template)
    }

    async fn delete(&self, template_id: &TemplateId) -> AppResult<()> {
        self.templates
            .lock()
            .await
            .retain(|template| template.id() != template_id);
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct FakeDeclarationRepository {
    declarations: Mutex<Vec<Declaration>>,
}

impl FakeDeclarationRepository {
    pub(crate) async fn stored(&self) -> Vec<Declaration> {
        self.declarations.lock().await.clone()
    }
}

#[async_trait]
impl DeclarationRepository for FakeDeclarationRepository {
    async fn list(&self) -> AppResult<Vec<Declaration>> {
        Ok(self.declarations.lock().await.clone())
    }

    async fn find(&self, declaration_id: &DeclarationId) -> AppResult<Option<Declaration>> {
        Ok(self
            .declarations
            .lock()
            .await
            .iter()
            .find(|declaration| declaration.id() == declaration_id)
            .cloned())
    }

    async fn create(&self, declaration: Declaration) -> AppResult<Declaration> {
        self.declarations.lock().await.push(declaration.clone());
        Ok(declaration)
    }

    async fn update(&self, declaration: Declaration) -> AppResult<Declaration> {
        let mut declarations = self.declarations.lock().await;
        let slot = declarations
            .iter_mut()
            .find(|stored| stored.id() == declaration.id())
            .ok_or(AppError::Http(404))?;
        *slot = declaration.clone();
        Ok(declaration)
    }

    async fn delete(&self, declaration_id: &DeclarationId) -> AppResult<()> {
        self.declarations
            .lock()
            .await
            .retain(|declaration| declaration.id() != declaration_id);
        Ok(())
    }
}

/// Hierarchy keyed by `(level, parent)`.
#[derive(Default)]
pub(crate) struct FakeOrgUnitRepository {
    units: Vec<(OrgUnitLevel, Option<OrgUnitId>, OrgUnit)>,
}

impl FakeOrgUnitRepository {
    pub(crate) fn with_units(
        units: Vec<(OrgUnitLevel, Option<&str>, &str, &str)>,
    ) -> Arc<Self> {
        let org_unit_id = |value: &str| OrgUnitId::new(value).unwrap_or_else(|_| unreachable!());
        Arc::new(Self {
            units: units
                .into_iter()
                .map(|(level, parent, id, name)| {
                    (
                        level,
                        parent.map(org_unit_id),
                        OrgUnit::new(org_unit_id(id), name),
                    )
                })
                .collect(),
        })
    }
}

#[async_trait]
impl OrgUnitRepository for FakeOrgUnitRepository {
    async fn list(
        &self,
        level: OrgUnitLevel,
        parent_id: Option<&OrgUnitId>,
    ) -> AppResult<Vec<OrgUnit>> {
        Ok(self
            .units
            .iter()
            .filter(|(stored_level, stored_parent, _)| {
                *stored_level == level && (parent_id.is_none() || stored_parent.as_ref() == parent_id)
            })
            .map(|(_, _, unit)| unit.clone())
            .collect())
    }
}
