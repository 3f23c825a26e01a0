use async_trait::async_trait;
use csrd_application::{UserRecord, UserRepository};
use csrd_core::AppResult;
use csrd_domain::{LoginIdentifier, OrgUnitId, User, UserId};
use reqwest::Method;
use serde_json::json;

use crate::json_server_client::JsonServerClient;
use crate::stored_user::StoredUser;


const USERS: &str = "users";

/// User directory backed by the `/users` REST collection.
#[derive(Debug, Clone)]
pub struct RestUserRepository {
    client: JsonServerClient,
}

impl RestUserRepository {
    /// Creates a repository over `client`.
    #[must_use]
    pub fn new(client: JsonServerClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl UserRepository for RestUserRepository {
    async fn find_by_identifier(
        &self,
        identifier: &LoginIdentifier,
    ) -> AppResult<Vec<UserRecord>> {
        let key = match identifier {
            LoginIdentifier::Email(_) => "email",
            LoginIdentifier::Nni(_) => "nni",
        };
        let mut url = self.client.endpoint(&[USERS])?;
        url.query_pairs_mut().append_pair(key, identifier.as_str());

        let users: Vec<StoredUser> = self.client.get(url).await?;
        Ok(users.into_iter().map(UserRecord::from).collect())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AppResult<Option<User>> {
        let url = self.client.endpoint(&[USERS, user_id.as_str()])?;
        self.client.find(url).await
    }

    async fn create(&self, record: UserRecord) -> AppResult<User> {
        let url = self.client.endpoint(&[USERS])?;
        let stored: StoredUser = self
            .client
            .send(Method::POST, url, &StoredUser::from(record))
            .await?;
        let user = UserRecord::from(stored).user;
        tracing::info!(user_id = %user.id(), "user registered");
        Ok(user)
    }

    async fn update_team(&self, user_id: &UserId, team_id: &OrgUnitId) -> AppResult<User> {
        let url = self.client.endpoint(&[USERS, user_id.as_str()])?;
        self.client
            .send(Method::PATCH, url, &json!({ "team": team_id }))
            .await
    }
}
