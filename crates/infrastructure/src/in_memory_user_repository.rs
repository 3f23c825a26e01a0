use std::collections::HashMap;

use async_trait::async_trait;
use csrd_application::{UserRecord, UserRepository};
use csrd_core::{AppError, AppResult};
use csrd_domain::{LoginIdentifier, OrgUnitId, User, UserId};
use tokio::sync::RwLock;

#[cfg(test)]
mod tests;

/// In-memory user directory.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    records: RwLock<HashMap<UserId, UserRecord>>,
}

impl InMemoryUserRepository {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a directory seeded with `records`.
    #[must_use]
    pub fn with_records(records: impl IntoIterator<Item = UserRecord>) -> Self {
        Self {
            records: RwLock::new(
                records
                    .into_iter()
                    .map(|record| (record.user.id().clone(), record))
                    .collect(),
            ),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_identifier(
        &self,
        identifier: &LoginIdentifier,
    ) -> AppResult<Vec<UserRecord>> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .filter(|record| record.user.matches(identifier))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AppResult<Option<User>> {
        let records = self.records.read().await;
        Ok(records.get(user_id).map(|record| record.user.clone()))
    }

    async fn create(&self, record: UserRecord) -> AppResult<User> {
        let mut records = self.records.write().await;
        let user_id = record.user.id().clone();
        if records.contains_key(&user_id) {
            return Err(AppError::Conflict(format!(
                "user '{user_id}' already exists"
            )));
        }

        let user = record.user.clone();
        records.insert(user_id, record);
        Ok(user)
    }

    async fn update_team(&self, user_id: &UserId, team_id: &OrgUnitId) -> AppResult<User> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(user_id)
            .ok_or_else(|| AppError::NotFound(format!("user '{user_id}' does not exist")))?;

        record.user.assign_team(team_id.clone());
        Ok(record.user.clone())
    }
}
