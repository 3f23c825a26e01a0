//! Shared primitives for all Rust crates in the CSRD declarations workspace.

#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type used across CSRD crates.
pub type AppResult<T> = Result<T, AppError>;

/// A validated non-empty UTF-8 string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Creates a validated non-empty string.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(AppError::Validation(
                "value must not be empty or whitespace".to_owned(),
            ));
        }

        Ok(Self(value))
    }

    /// Returns the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for NonEmptyString {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

impl std::fmt::Display for NonEmptyString {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

/// Common application error categories.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    /// Invalid input or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// Requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Write operation conflicts with existing state.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Credentials were rejected.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Operation is not allowed in the current state.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Remote HTTP collaborator answered with a non-success status.
    #[error("Erreur HTTP: {0}")]
    Http(u16),

    /// Branching graph invariant violation. Indicates an editor defect.
    #[error("configuration integrity error: {0}")]
    ConfigIntegrity(String),

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the text displayed inline next to the control that failed.
    ///
    /// Unlike [`std::fmt::Display`], the category prefix is omitted so that
    /// messages such as `"Mot de passe incorrect"` surface verbatim.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(message)
            | Self::NotFound(message)
            | Self::Conflict(message)
            | Self::Unauthorized(message)
            | Self::Forbidden(message)
            | Self::ConfigIntegrity(message)
            | Self::Internal(message) => message.clone(),
            Self::Http(_) => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AppError, NonEmptyString};

    #[test]
    fn non_empty_string_rejects_whitespace() {
        let result = NonEmptyString::new("   ");
        assert!(result.is_err());
    }

    #[test]
    fn non_empty_string_rejects_empty_json() {
        let result = serde_json::from_str::<NonEmptyString>("\"\"");
        assert!(result.is_err());
    }

    #[test]
    fn http_error_embeds_status_code() {
        assert_eq!(AppError::Http(404).user_message(), "Erreur HTTP: 404");
    }

    #[test]
    fn user_message_omits_category_prefix() {
        let error = AppError::Unauthorized("Mot de passe incorrect".to_owned());
        assert_eq!(error.user_message(), "Mot de passe incorrect");
        assert_eq!(error.to_string(), "unauthorized: Mot de passe incorrect");
    }
}
