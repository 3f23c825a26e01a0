use std::str::FromStr;

use chrono::{DateTime, Utc};
use csrd_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

use crate::form_template::TemplateId;
use crate::identifier::string_identifier;
use crate::org_unit::OrgUnitId;
use crate::user::UserId;
use crate::validation::Answers;

string_identifier!(
    /// Identifier of a declaration.
    DeclarationId
);

/// History action recorded when a declaration is created.
pub const ACTION_CREATED: &str = "Création";
/// History action recorded when a declaration is submitted.
pub const ACTION_SUBMITTED: &str = "Soumission";
/// History action recorded when a declaration is validated.
pub const ACTION_VALIDATED: &str = "Validation";
/// History action recorded when form data changes.
pub const ACTION_MODIFIED: &str = "Modification";

/// Review status of a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclarationStatus {
    /// Being filled in by its author.
    Draft,
    /// Submitted and awaiting validation.
    Pending,
    /// Accepted by a reviewer.
    Validated,
    /// Edited after validation; awaiting validation again.
    Modified,
}

impl DeclarationStatus {
    /// Returns stable storage value.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Pending => "pending",
            Self::Validated => "validated",
            Self::Modified => "modified",
        }
    }
}

impl FromStr for DeclarationStatus {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "draft" => Ok(Self::Draft),
            "pending" => Ok(Self::Pending),
            "validated" => Ok(Self::Validated),
            "modified" => Ok(Self::Modified),
            _ => Err(AppError::Validation(format!(
                "unknown declaration status '{value}'"
            ))),
        }
    }
}

/// One entry of the append-only declaration history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModificationEntry {
    id: String,
    user_name: String,
    timestamp: DateTime<Utc>,
    action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl ModificationEntry {
    fn record(user_name: &str, action: &str, details: Option<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_name: user_name.to_owned(),
            timestamp: Utc::now(),
            action: action.to_owned(),
            details,
        }
    }

    /// Returns the entry identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    /// Returns the display name of the acting user.
    #[must_use]
    pub fn user_name(&self) -> &str {
        self.user_name.as_str()
    }

    /// Returns when the action happened.
    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Returns the action label.
    #[must_use]
    pub fn action(&self) -> &str {
        self.action.as_str()
    }

    /// Returns optional details.
    #[must_use]
    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }
}

/// Data submitted against a form template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Declaration {
    id: DeclarationId,
    form_template_id: TemplateId,
    author_id: UserId,
    #[serde(default)]
    team_id: Option<OrgUnitId>,
    #[serde(default)]
    form_data: Answers,
    status: DeclarationStatus,
    #[serde(default)]
    history: Vec<ModificationEntry>,
    #[serde(default = "Utc::now")]
    created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    updated_at: DateTime<Utc>,
}

impl Declaration {
    /// Creates a draft declaration and records its creation.
    #[must_use]
    pub fn create(
        form_template_id: TemplateId,
        author_id: UserId,
        team_id: Option<OrgUnitId>,
        form_data: Answers,
        actor: &str,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: DeclarationId::generate(),
            form_template_id,
            author_id,
            team_id,
            form_data,
            status: DeclarationStatus::Draft,
            history: vec![ModificationEntry::record(actor, ACTION_CREATED, None)],
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns the declaration identifier.
    #[must_use]
    pub fn id(&self) -> &DeclarationId {
        &self.id
    }

    /// Returns the referenced template.
    #[must_use]
    pub fn form_template_id(&self) -> &TemplateId {
        &self.form_template_id
    }

    /// Returns the author.
    #[must_use]
    pub fn author_id(&self) -> &UserId {
        &self.author_id
    }

    /// Returns the declaring team.
    #[must_use]
    pub fn team_id(&self) -> Option<&OrgUnitId> {
        self.team_id.as_ref()
    }

    /// Returns the answers keyed by field name.
    #[must_use]
    pub fn form_data(&self) -> &Answers {
        &self.form_data
    }

    /// Returns the review status.
    #[must_use]
    pub fn status(&self) -> DeclarationStatus {
        self.status
    }

    /// Returns the history, oldest entry first.
    #[must_use]
    pub fn history(&self) -> &[ModificationEntry] {
        &self.history
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last update timestamp.
    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Moves a draft to review with its checked and coerced answers.
    pub fn submit(&mut self, form_data: Answers, actor: &str) -> AppResult<()> {
        if self.status != DeclarationStatus::Draft {
            return Err(self.invalid_transition("submitted"));
        }

        self.form_data = form_data;
        self.transition(DeclarationStatus::Pending, actor, ACTION_SUBMITTED, None);
        Ok(())
    }

    /// Accepts a pending or modified declaration.
    pub fn validate(&mut self, actor: &str) -> AppResult<()> {
        if !matches!(
            self.status,
            DeclarationStatus::Pending | DeclarationStatus::Modified
        ) {
            return Err(self.invalid_transition("validated"));
        }

        self.transition(DeclarationStatus::Validated, actor, ACTION_VALIDATED, None);
        Ok(())
    }

    /// Replaces the answers. A validated declaration becomes modified.
    pub fn update_form_data(&mut self, form_data: Answers, actor: &str, details: Option<String>) {
        self.form_data = form_data;
        let status = match self.status {
            DeclarationStatus::Validated => DeclarationStatus::Modified,
            other => other,
        };
        self.transition(status, actor, ACTION_MODIFIED, details);
    }

    fn transition(
        &mut self,
        status: DeclarationStatus,
        actor: &str,
        action: &str,
        details: Option<String>,
    ) {
        self.status = status;
        self.history
            .push(ModificationEntry::record(actor, action, details));
        self.updated_at = Utc::now();
    }

    fn invalid_transition(&self, target: &str) -> AppError {
        AppError::Conflict(format!(
            "declaration '{}' in status '{}' cannot be {target}",
            self.id,
            self.status.as_str()
        ))
    }
}

#[cfg(test)]
mod tests {
    use csrd_core::AppError;
    use serde_json::{Map, json};

    use super::{
        ACTION_CREATED, ACTION_MODIFIED, ACTION_SUBMITTED, ACTION_VALIDATED, Declaration,
        DeclarationStatus,
    };
    use crate::form_template::TemplateId;
    use crate::user::UserId;

    fn draft() -> Declaration {
        Declaration::create(
            TemplateId::new("form-1").unwrap_or_else(|_| unreachable!()),
            UserId::new("user-1").unwrap_or_else(|_| unreachable!()),
            None,
            Map::new(),
            "Jeanne Martin",
        )
    }

    #[test]
    fn lifecycle_appends_history_in_order() {
        let mut declaration = draft();
        assert!(declaration.submit(Map::new(), "Jeanne Martin").is_ok());
        assert!(declaration.validate("Paul Admin").is_ok());
        declaration.update_form_data(Map::new(), "Jeanne Martin", None);

        assert_eq!(declaration.status(), DeclarationStatus::Modified);
        let actions: Vec<&str> = declaration
            .history()
            .iter()
            .map(|entry| entry.action())
            .collect();
        assert_eq!(
            actions,
            vec![ACTION_CREATED, ACTION_SUBMITTED, ACTION_VALIDATED, ACTION_MODIFIED]
        );
        assert_eq!(declaration.history()[2].user_name(), "Paul Admin");
    }

    #[test]
    fn history_is_never_rewritten() {
        let mut declaration = draft();
        let first = declaration.history()[0].clone();
        assert!(declaration.submit(Map::new(), "Jeanne Martin").is_ok());
        declaration.update_form_data(Map::new(), "Jeanne Martin", Some("volume".to_owned()));

        assert_eq!(declaration.history()[0], first);
        assert_eq!(declaration.history().len(), 3);
        assert_eq!(declaration.status(), DeclarationStatus::Pending);
    }

    #[test]
    fn draft_cannot_be_validated() {
        let mut declaration = draft();
        assert!(matches!(
            declaration.validate("Paul Admin"),
            Err(AppError::Conflict(_))
        ));
        assert_eq!(declaration.history().len(), 1);
    }

    #[test]
    fn submitting_twice_conflicts() {
        let mut declaration = draft();
        assert!(declaration.submit(Map::new(), "Jeanne Martin").is_ok());
        assert!(matches!(
            declaration.submit(Map::new(), "Jeanne Martin"),
            Err(AppError::Conflict(_))
        ));
    }

    #[test]
    fn deserializes_fixture_with_numeric_ids() {
        let declaration: Declaration = serde_json::from_value(json!({
            "id": 12,
            "formTemplateId": 3,
            "authorId": 7,
            "teamId": 4,
            "formData": {"volume": 12.5},
            "status": "validated"
        }))
        .unwrap_or_else(|_| unreachable!());

        assert_eq!(declaration.id().as_str(), "12");
        assert_eq!(declaration.status(), DeclarationStatus::Validated);
        assert!(declaration.history().is_empty());
    }

    #[test]
    fn status_parsing_rejects_unknown_values() {
        assert_eq!(
            "modified".parse::<DeclarationStatus>(),
            Ok(DeclarationStatus::Modified)
        );
        assert!("archived".parse::<DeclarationStatus>().is_err());
    }
}
