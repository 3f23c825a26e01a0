//! Login, registration and directory lookups.

use std::sync::Arc;

use csrd_core::{AppError, AppResult, NonEmptyString};
use csrd_domain::{
    EmailAddress, LoginIdentifier, OrgUnitId, User, UserId, UserProfile, UserRole, UserStatus,
};

use crate::ports::{UserRecord, UserRepository};


/// Message shown when no directory entry matches the identifier.
pub const UNKNOWN_IDENTIFIER_MESSAGE: &str = "Identifiant incorrect";

/// Message shown when the password does not match.
pub const WRONG_PASSWORD_MESSAGE: &str = "Mot de passe incorrect";

/// Parameters for self-registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterParams {
    /// Employee identifier.
    pub nni: String,
    /// Contact email.
    pub email: String,
    /// Last name.
    pub last_name: String,
    /// First name.
    pub first_name: String,
    /// Chosen password.
    pub password: String,
}

/// Application service for authentication and user directory access.
#[derive(Clone)]
pub struct AuthService {
    user_repository: Arc<dyn UserRepository>,
}

impl AuthService {
    /// Creates a new auth service.
    #[must_use]
    pub fn new(user_repository: Arc<dyn UserRepository>) -> Self {
        Self { user_repository }
    }

    /// Authenticates with an NNI or email and a password.
    ///
    /// Unknown identifiers fail with [`UNKNOWN_IDENTIFIER_MESSAGE`], wrong
    /// passwords with [`WRONG_PASSWORD_MESSAGE`].
    pub async fn login(&self, identifier: &str, password: &str) -> AppResult<User> {
        let identifier = LoginIdentifier::parse(identifier)
            .map_err(|_| AppError::NotFound(UNKNOWN_IDENTIFIER_MESSAGE.to_owned()))?;

        let record = self
            .user_repository
            .find_by_identifier(&identifier)
            .await?
            .into_iter()
            .find(|record| record.user.matches(&identifier))
            .ok_or_else(|| AppError::NotFound(UNKNOWN_IDENTIFIER_MESSAGE.to_owned()))?;

        if record.password != password {
            return Err(AppError::Unauthorized(WRONG_PASSWORD_MESSAGE.to_owned()));
        }

        Ok(record.user)
    }

    /// Registers a new member awaiting team assignment.
    pub async fn register(&self, params: RegisterParams) -> AppResult<User> {
        let profile = UserProfile {
            nni: NonEmptyString::new(params.nni.trim())?,
            email: EmailAddress::new(params.email)?,
            last_name: NonEmptyString::new(params.last_name.trim())?,
            first_name: NonEmptyString::new(params.first_name.trim())?,
        };
        if params.password.is_empty() {
            return Err(AppError::Validation("password must not be empty".to_owned()));
        }

        self.ensure_available(LoginIdentifier::Nni(profile.nni.clone()), "NNI")
            .await?;
        self.ensure_available(LoginIdentifier::Email(profile.email.clone()), "email")
            .await?;

        let user = User::new(
            UserId::generate(),
            profile,
            UserRole::Member,
            UserStatus::Pending,
        );
        self.user_repository
            .create(UserRecord {
                user,
                password: params.password,
            })
            .await
    }

    /// Assigns a user to a team.
    pub async fn assign_team(&self, user_id: &UserId, team_id: &OrgUnitId) -> AppResult<User> {
        self.find_user(user_id).await?;
        self.user_repository.update_team(user_id, team_id).await
    }

    /// Returns a user by identifier.
    pub async fn find_user(&self, user_id: &UserId) -> AppResult<User> {
        self.user_repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user '{user_id}' does not exist")))
    }

    async fn ensure_available(&self, identifier: LoginIdentifier, label: &str) -> AppResult<()> {
        let taken = self
            .user_repository
            .find_by_identifier(&identifier)
            .await?
            .iter()
            .any(|record| record.user.matches(&identifier));

        if taken {
            return Err(AppError::Conflict(format!(
                "{label} '{}' is already registered",
                identifier.as_str()
            )));
        }
        Ok(())
    }
}
