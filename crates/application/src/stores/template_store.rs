use csrd_domain::{FormTemplate, FormTemplateInput, TemplateId};

use crate::form_template_service::FormTemplateService;
use crate::stores::ResourceState;

/// Template list and the template opened in the builder.
#[derive(Clone)]
pub struct TemplateStore {
    service: FormTemplateService,
    state: ResourceState<Vec<FormTemplate>>,
    current: Option<FormTemplate>,
}

impl TemplateStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new(service: FormTemplateService) -> Self {
        Self {
            service,
            state: ResourceState::default(),
            current: None,
        }
    }

    /// Returns the request state, holding the template list.
    #[must_use]
    pub fn state(&self) -> &ResourceState<Vec<FormTemplate>> {
        &self.state
    }

    /// Returns the template currently opened.
    #[must_use]
    pub fn current(&self) -> Option<&FormTemplate> {
        self.current.as_ref()
    }

    /// Loads every template.
    pub async fn fetch_all(&mut self) {
        self.state.begin();
        let result = self.service.list().await;
        if let Some(templates) = self.state.finish(result) {
            *self.state.data_mut() = templates;
        }
    }

    /// Opens one template.
    pub async fn fetch_one(&mut self, template_id: &TemplateId) -> Option<&FormTemplate> {
        self.state.begin();
        let result = self.service.get(template_id).await;
        self.current = self.state.finish(result);
        self.current.as_ref()
    }

    /// Saves builder content, creating a template when `template_id` is `None`.
    pub async fn save(
        &mut self,
        template_id: Option<&TemplateId>,
        input: FormTemplateInput,
    ) -> Option<&FormTemplate> {
        self.state.begin();
        let result = match template_id {
            Some(template_id) => self.service.save(template_id, input).await,
            None => self.service.create(input).await,
        };
        let saved = self.state.finish(result)?;
        self.upsert(saved.clone());
        self.current = Some(saved);
        self.current.as_ref()
    }

    /// Publishes a draft.
    pub async fn publish(&mut self, template_id: &TemplateId) -> bool {
        self.state.begin();
        let result = self.service.publish(template_id).await;
        match self.state.finish(result) {
            Some(published) => {
                if self
                    .current
                    .as_ref()
                    .is_some_and(|current| current.id() == published.id())
                {
                    self.current = Some(published.clone());
                }
                self.upsert(published);
                true
            }
            None => false,
        }
    }

    /// Deletes a template.
    pub async fn delete(&mut self, template_id: &TemplateId) -> bool {
        self.state.begin();
        let result = self.service.delete(template_id).await;
        if self.state.finish(result).is_none() {
            return false;
        }

        self.state
            .data_mut()
            .retain(|template| template.id() != template_id);
        if self
            .current
            .as_ref()
            .is_some_and(|current| current.id() == template_id)
        {
            self.current = None;
        }
        true
    }

    /// Clears the list and the opened template.
    pub fn reset(&mut self) {
        self.state.reset();
        self.current = None;
    }

    fn upsert(&mut self, template: FormTemplate) {
        let templates = self.state.data_mut();
        match templates
            .iter_mut()
            .find(|stored| stored.id() == template.id())
        {
            Some(slot) => *slot = template,
            None => templates.push(template),
        }
    }
}
