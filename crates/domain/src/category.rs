use std::collections::BTreeSet;

use csrd_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Category assigned to templates created without an explicit one.
pub const DEFAULT_CATEGORY_CODE: &str = "E2-4";

/// ESRS disclosure code a template belongs to, for example `E2-4`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CategoryCode(String);

impl CategoryCode {
    /// Creates a validated category code.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(AppError::Validation(
                "category code must not be empty".to_owned(),
            ));
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the category code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Collects the distinct codes of `codes` plus the default, sorted.
    #[must_use]
    pub fn catalog<'a>(codes: impl IntoIterator<Item = &'a CategoryCode>) -> Vec<CategoryCode> {
        let mut distinct: BTreeSet<CategoryCode> = codes.into_iter().cloned().collect();
        distinct.insert(Self::default());
        distinct.into_iter().collect()
    }
}

impl Default for CategoryCode {
    fn default() -> Self {
        Self(DEFAULT_CATEGORY_CODE.to_owned())
    }
}

impl TryFrom<String> for CategoryCode {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CategoryCode> for String {
    fn from(value: CategoryCode) -> Self {
        value.0
    }
}

impl std::fmt::Display for CategoryCode {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}
