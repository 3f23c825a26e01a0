//! User directory types.
//!
//! Passwords never appear here; they stay on the repository record.

use std::str::FromStr;

use csrd_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

use crate::identifier::string_identifier;
use crate::org_unit::OrgUnitId;

string_identifier!(
    /// Unique identifier for a user record.
    UserId
);

/// Validated email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Creates a validated email address.
    ///
    /// Performs basic structural validation: non-empty, contains exactly one `@`,
    /// local part and domain are non-empty, domain contains at least one `.`.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let trimmed = value.trim().to_lowercase();

        if trimmed.is_empty() {
            return Err(AppError::Validation(
                "email address must not be empty".to_owned(),
            ));
        }

        let Some((local, domain)) = trimmed.split_once('@') else {
            return Err(AppError::Validation(
                "email address must contain exactly one '@'".to_owned(),
            ));
        };

        if domain.contains('@') {
            return Err(AppError::Validation(
                "email address must contain exactly one '@'".to_owned(),
            ));
        }

        if local.is_empty() {
            return Err(AppError::Validation(
                "email local part must not be empty".to_owned(),
            ));
        }

        if domain.is_empty() || !domain.contains('.') {
            return Err(AppError::Validation(
                "email domain must contain at least one '.'".to_owned(),
            ));
        }

        if trimmed.len() > 254 {
            return Err(AppError::Validation(
                "email address must not exceed 254 characters".to_owned(),
            ));
        }

        Ok(Self(trimmed))
    }

    /// Returns the validated email string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

/// Access level of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Declares on behalf of a team.
    #[default]
    Member,
    /// Manages templates and validates declarations.
    Admin,
}

impl UserRole {
    /// Returns stable storage value.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Admin => "admin",
        }
    }
}

impl FromStr for UserRole {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "member" => Ok(Self::Member),
            "admin" => Ok(Self::Admin),
            _ => Err(AppError::Validation(format!("unknown user role '{value}'"))),
        }
    }
}

/// Account activation status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    /// Registered, awaiting team assignment.
    #[default]
    Pending,
    /// Fully onboarded.
    Active,
}

impl UserStatus {
    /// Returns stable storage value.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
        }
    }
}

impl FromStr for UserStatus {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "active" => Ok(Self::Active),
            _ => Err(AppError::Validation(format!(
                "unknown user status '{value}'"
            ))),
        }
    }
}

/// Directory entry of an authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    id: UserId,
    nni: NonEmptyString,
    email: EmailAddress,
    last_name: String,
    first_name: String,
    #[serde(default)]
    role: UserRole,
    #[serde(default)]
    status: UserStatus,
    #[serde(default)]
    team: Option<OrgUnitId>,
}

impl User {
    /// Creates a user entry.
    #[must_use]
    pub fn new(id: UserId, profile: UserProfile, role: UserRole, status: UserStatus) -> Self {
        Self {
            id,
            nni: profile.nni,
            email: profile.email,
            last_name: profile.last_name.into(),
            first_name: profile.first_name.into(),
            role,
            status,
            team: None,
        }
    }

    /// Returns the user identifier.
    #[must_use]
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Returns the employee identifier.
    #[must_use]
    pub fn nni(&self) -> &NonEmptyString {
        &self.nni
    }

    /// Returns the email address.
    #[must_use]
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Returns the last name.
    #[must_use]
    pub fn last_name(&self) -> &str {
        self.last_name.as_str()
    }

    /// Returns the first name.
    #[must_use]
    pub fn first_name(&self) -> &str {
        self.first_name.as_str()
    }

    /// Returns `First Last`, used as the actor name in histories.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_owned()
    }

    /// Returns the access level.
    #[must_use]
    pub fn role(&self) -> UserRole {
        self.role
    }

    /// Returns whether the user manages templates.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Returns the activation status.
    #[must_use]
    pub fn status(&self) -> UserStatus {
        self.status
    }

    /// Returns the assigned team.
    #[must_use]
    pub fn team(&self) -> Option<&OrgUnitId> {
        self.team.as_ref()
    }

    /// Assigns the user to a team.
    pub fn assign_team(&mut self, team: OrgUnitId) {
        self.team = Some(team);
    }

    /// Returns whether `identifier` designates this user.
    #[must_use]
    pub fn matches(&self, identifier: &LoginIdentifier) -> bool {
        match identifier {
            LoginIdentifier::Email(email) => &self.email == email,
            LoginIdentifier::Nni(nni) => self.nni.as_str() == nni.as_str(),
        }
    }
}

/// Identity fields supplied at registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Employee identifier.
    pub nni: NonEmptyString,
    /// Contact email.
    pub email: EmailAddress,
    /// Last name.
    pub last_name: NonEmptyString,
    /// First name.
    pub first_name: NonEmptyString,
}

/// What a user typed in the login identifier box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginIdentifier {
    /// Identifier containing `@`.
    Email(EmailAddress),
    /// Any other identifier.
    Nni(NonEmptyString),
}

impl LoginIdentifier {
    /// Classifies a raw identifier: anything containing `@` is an email.
    pub fn parse(value: &str) -> AppResult<Self> {
        let trimmed = value.trim();
        if trimmed.contains('@') {
            return EmailAddress::new(trimmed).map(Self::Email);
        }

        NonEmptyString::new(trimmed).map(Self::Nni)
    }

    /// Returns the lookup value sent to the directory.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Email(email) => email.as_str(),
            Self::Nni(nni) => nni.as_str(),
        }
    }
}
