use csrd_domain::CategoryCode;

use crate::form_template_service::FormTemplateService;
use crate::stores::ResourceState;

/// Category list shared by the builder and the declaration filters.
#[derive(Clone)]
pub struct CategoryStore {
    service: FormTemplateService,
    state: ResourceState<Vec<CategoryCode>>,
    loaded: bool,
}

impl CategoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new(service: FormTemplateService) -> Self {
        Self {
            service,
            state: ResourceState::default(),
            loaded: false,
        }
    }

    /// Returns the request state, holding the categories.
    #[must_use]
    pub fn state(&self) -> &ResourceState<Vec<CategoryCode>> {
        &self.state
    }

    /// Loads the categories unless they were already loaded.
    pub async fn ensure_loaded(&mut self) -> &[CategoryCode] {
        if !self.loaded {
            self.refresh().await;
        }
        self.state.data()
    }

    /// Reloads the categories.
    pub async fn refresh(&mut self) {
        self.state.begin();
        let result = self.service.categories().await;
        if let Some(categories) = self.state.finish(result) {
            *self.state.data_mut() = categories;
            self.loaded = true;
        }
    }

    /// Forgets the loaded categories.
    pub fn reset(&mut self) {
        self.state.reset();
        self.loaded = false;
    }
}
