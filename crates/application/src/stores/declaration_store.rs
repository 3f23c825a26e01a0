use csrd_domain::{
    Answers, Declaration, DeclarationId, DeclarationStats, TemplateId, User, ValidationReport,
};

use crate::declaration_service::{DeclarationOutcome, DeclarationQuery, DeclarationService};
use crate::stores::ResourceState;

/// Declaration list, dashboard counters and the last rejected answers.
#[derive(Clone)]
pub struct DeclarationStore {
    service: DeclarationService,
    state: ResourceState<Vec<Declaration>>,
    query: DeclarationQuery,
    rejection: Option<ValidationReport>,
}

impl DeclarationStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new(service: DeclarationService) -> Self {
        Self {
            service,
            state: ResourceState::default(),
            query: DeclarationQuery::default(),
            rejection: None,
        }
    }

    /// Returns the request state, holding the listed declarations.
    #[must_use]
    pub fn state(&self) -> &ResourceState<Vec<Declaration>> {
        &self.state
    }

    /// Returns counters over the listed declarations.
    #[must_use]
    pub fn stats(&self) -> DeclarationStats {
        DeclarationStats::from_declarations(self.state.data())
    }

    /// Returns the validation report of the last rejected write.
    #[must_use]
    pub fn rejection(&self) -> Option<&ValidationReport> {
        self.rejection.as_ref()
    }

    /// Loads the declarations matching `query`.
    pub async fn fetch(&mut self, query: DeclarationQuery) {
        self.state.begin();
        let result = self.service.list(&query).await;
        if let Some(declarations) = self.state.finish(result) {
            *self.state.data_mut() = declarations;
            self.query = query;
        }
    }

    /// Starts a draft.
    pub async fn create(
        &mut self,
        actor: &User,
        template_id: &TemplateId,
        form_data: Answers,
    ) -> Option<Declaration> {
        self.state.begin();
        let result = self.service.create(actor, template_id, form_data).await;
        let created = self.state.finish(result)?;
        self.upsert(created.clone());
        Some(created)
    }

    /// Replaces the answers of a declaration.
    pub async fn update(
        &mut self,
        actor: &User,
        declaration_id: &DeclarationId,
        form_data: Answers,
    ) -> Option<Declaration> {
        self.state.begin();
        let result = self.service.update(actor, declaration_id, form_data).await;
        self.apply_outcome(result)
    }

    /// Submits a draft.
    pub async fn submit(
        &mut self,
        actor: &User,
        declaration_id: &DeclarationId,
    ) -> Option<Declaration> {
        self.state.begin();
        let result = self.service.submit(actor, declaration_id).await;
        self.apply_outcome(result)
    }

    /// Validates a declaration.
    pub async fn validate(
        &mut self,
        actor: &User,
        declaration_id: &DeclarationId,
    ) -> Option<Declaration> {
        self.state.begin();
        let result = self.service.validate(actor, declaration_id).await;
        let validated = self.state.finish(result)?;
        self.upsert(validated.clone());
        Some(validated)
    }

    /// Deletes a declaration.
    pub async fn delete(&mut self, actor: &User, declaration_id: &DeclarationId) -> bool {
        self.state.begin();
        let result = self.service.delete(actor, declaration_id).await;
        if self.state.finish(result).is_none() {
            return false;
        }

        self.state
            .data_mut()
            .retain(|declaration| declaration.id() != declaration_id);
        true
    }

    /// Clears the list and the last rejection.
    pub fn reset(&mut self) {
        self.state.reset();
        self.query = DeclarationQuery::default();
        self.rejection = None;
    }

    fn apply_outcome(
        &mut self,
        result: csrd_core::AppResult<DeclarationOutcome>,
    ) -> Option<Declaration> {
        match self.state.finish(result)? {
            DeclarationOutcome::Saved(declaration) => {
                self.rejection = None;
                self.upsert(declaration.clone());
                Some(declaration)
            }
            DeclarationOutcome::Rejected(report) => {
                self.rejection = Some(report);
                None
            }
        }
    }

    /// Applies a stored declaration to the listing, dropping it when it no
    /// longer matches the current filters.
    fn upsert(&mut self, declaration: Declaration) {
        let keep = self.query.matches(&declaration);
        let declarations = self.state.data_mut();
        let position = declarations
            .iter()
            .position(|stored| stored.id() == declaration.id());

        match (position, keep) {
            (Some(index), true) => declarations[index] = declaration,
            (Some(index), false) => {
                declarations.remove(index);
            }
            (None, true) => declarations.push(declaration),
            (None, false) => {}
        }
    }
}
