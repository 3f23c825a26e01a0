use std::sync::Arc;

use csrd_core::{AppError, AppResult};
use csrd_domain::{
    Answers, Declaration, DeclarationId, DeclarationStats, DeclarationStatus, FormTemplate,
    OrgUnitId, TemplateId, User, UserId, ValidationReport,
};

use crate::ports::{DeclarationRepository, FormTemplateRepository};


/// Optional filters for declaration listings, combined with logical AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeclarationQuery {
    /// Keep declarations written by this user.
    pub author_id: Option<UserId>,
    /// Keep declarations of this team.
    pub team_id: Option<OrgUnitId>,
    /// Keep declarations against this template.
    pub form_template_id: Option<TemplateId>,
    /// Keep declarations in this status.
    pub status: Option<DeclarationStatus>,
}

impl DeclarationQuery {
    pub(crate) fn matches(&self, declaration: &Declaration) -> bool {
        self.author_id
            .as_ref()
            .is_none_or(|author_id| declaration.author_id() == author_id)
            && self
                .team_id
                .as_ref()
                .is_none_or(|team_id| declaration.team_id() == Some(team_id))
            && self
                .form_template_id
                .as_ref()
                .is_none_or(|template_id| declaration.form_template_id() == template_id)
            && self
                .status
                .is_none_or(|status| declaration.status() == status)
    }
}

/// Result of a write that checks answers against the template schema.
#[derive(Debug, Clone, PartialEq)]
pub enum DeclarationOutcome {
    /// Answers were valid and the declaration was stored.
    Saved(Declaration),
    /// Answers were invalid; nothing was stored.
    Rejected(ValidationReport),
}

/// Application service for declarations and dashboard statistics.
#[derive(Clone)]
pub struct DeclarationService {
    declarations: Arc<dyn DeclarationRepository>,
    templates: Arc<dyn FormTemplateRepository>,
}

impl DeclarationService {
    /// Creates a new declaration service.
    #[must_use]
    pub fn new(
        declarations: Arc<dyn DeclarationRepository>,
        templates: Arc<dyn FormTemplateRepository>,
    ) -> Self {
        Self {
            declarations,
            templates,
        }
    }

    /// Lists declarations matching `query`.
    pub async fn list(&self, query: &DeclarationQuery) -> AppResult<Vec<Declaration>> {
        Ok(self
            .declarations
            .list()
            .await?
            .into_iter()
            .filter(|declaration| query.matches(declaration))
            .collect())
    }

    /// Returns one declaration.
    pub async fn get(&self, declaration_id: &DeclarationId) -> AppResult<Declaration> {
        self.declarations
            .find(declaration_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("declaration '{declaration_id}' does not exist"))
            })
    }

    /// Computes dashboard counters over the declarations matching `query`.
    pub async fn stats(&self, query: &DeclarationQuery) -> AppResult<DeclarationStats> {
        let declarations = self.list(query).await?;
        Ok(DeclarationStats::from_declarations(&declarations))
    }

    /// Starts a draft declaration for the actor's team.
    ///
    /// Drafts may be incomplete; answers unknown to the schema are dropped.
    pub async fn create(
        &self,
        actor: &User,
        template_id: &TemplateId,
        form_data: Answers,
    ) -> AppResult<Declaration> {
        let template = self.template(template_id).await?;
        if !template.is_active() {
            return Err(AppError::Conflict(format!(
                "form '{template_id}' is not offered for new declarations"
            )));
        }

        let declaration = Declaration::create(
            template_id.clone(),
            actor.id().clone(),
            actor.team().cloned(),
            template.schema().retain_known_answers(&form_data),
            &actor.display_name(),
        );
        self.declarations.create(declaration).await
    }

    /// Replaces the answers of a declaration.
    ///
    /// Drafts accept incomplete answers. Once submitted, answers must pass
    /// schema validation and editing a validated declaration marks it as
    /// modified.
    pub async fn update(
        &self,
        actor: &User,
        declaration_id: &DeclarationId,
        form_data: Answers,
    ) -> AppResult<DeclarationOutcome> {
        let mut declaration = self.get(declaration_id).await?;
        Self::require_author_or_admin(actor, &declaration)?;
        let template = self.template(declaration.form_template_id()).await?;

        let stored = if declaration.status() == DeclarationStatus::Draft {
            template.schema().retain_known_answers(&form_data)
        } else {
            let report = template.schema().validate(&form_data);
            if !report.is_valid() {
                return Ok(DeclarationOutcome::Rejected(report));
            }
            report.into_values()
        };

        let details = Self::changed_fields(declaration.form_data(), &stored);
        declaration.update_form_data(stored, &actor.display_name(), details);
        self.declarations
            .update(declaration)
            .await
            .map(DeclarationOutcome::Saved)
    }

    /// Submits a draft for validation after checking its answers.
    pub async fn submit(
        &self,
        actor: &User,
        declaration_id: &DeclarationId,
    ) -> AppResult<DeclarationOutcome> {
        let mut declaration = self.get(declaration_id).await?;
        Self::require_author_or_admin(actor, &declaration)?;
        let template = self.template(declaration.form_template_id()).await?;

        let report = template.schema().validate(declaration.form_data());
        if !report.is_valid() {
            return Ok(DeclarationOutcome::Rejected(report));
        }

        declaration.submit(report.into_values(), &actor.display_name())?;
        self.declarations
            .update(declaration)
            .await
            .map(DeclarationOutcome::Saved)
    }

    /// Accepts a pending or modified declaration. Admins only.
    pub async fn validate(
        &self,
        actor: &User,
        declaration_id: &DeclarationId,
    ) -> AppResult<Declaration> {
        if !actor.is_admin() {
            return Err(AppError::Forbidden(
                "only administrators can validate declarations".to_owned(),
            ));
        }

        let mut declaration = self.get(declaration_id).await?;
        declaration.validate(&actor.display_name())?;
        self.declarations.update(declaration).await
    }

    /// Deletes a declaration.
    pub async fn delete(&self, actor: &User, declaration_id: &DeclarationId) -> AppResult<()> {
        let declaration = self.get(declaration_id).await?;
        Self::require_author_or_admin(actor, &declaration)?;
        self.declarations.delete(declaration_id).await
    }

    async fn template(&self, template_id: &TemplateId) -> AppResult<FormTemplate> {
        self.templates
            .find(template_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("form '{template_id}' does not exist")))
    }

    fn require_author_or_admin(actor: &User, declaration: &Declaration) -> AppResult<()> {
        if actor.is_admin() || declaration.author_id() == actor.id() {
            return Ok(());
        }

        Err(AppError::Forbidden(format!(
            "declaration '{}' belongs to another user",
            declaration.id()
        )))
    }

    fn changed_fields(previous: &Answers, next: &Answers) -> Option<String> {
        let mut changed: Vec<&str> = next
            .iter()
            .filter(|(name, value)| previous.get(name.as_str()) != Some(*value))
            .map(|(name, _)| name.as_str())
            .chain(
                previous
                    .keys()
                    .filter(|name| !next.contains_key(name.as_str()))
                    .map(String::as_str),
            )
            .collect();
        changed.sort_unstable();

        (!changed.is_empty()).then(|| changed.join(", "))
    }
}
