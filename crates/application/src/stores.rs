//! Client-side state holders for each resource.
//!
//! Every store wraps one service, exposes its data with a `loading` flag and
//! the inline message of the last failure, and can be `reset()` on logout.
//! Store methods take `&mut self`, so calls apply in the order they are made.

use csrd_core::AppResult;

mod auth_store;
mod category_store;
mod declaration_store;
mod org_unit_store;
mod template_store;

#[cfg(test)]
mod tests;

pub use auth_store::AuthStore;
pub use category_store::CategoryStore;
pub use declaration_store::DeclarationStore;
pub use org_unit_store::OrgUnitStore;
pub use template_store::TemplateStore;

/// Data of one resource plus its request state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceState<T> {
    data: T,
    loading: bool,
    error: Option<String>,
}

impl<T: Default> ResourceState<T> {
    /// Returns the current data.
    #[must_use]
    pub fn data(&self) -> &T {
        &self.data
    }

    /// Returns whether a request is in flight.
    #[must_use]
    pub fn loading(&self) -> bool {
        self.loading
    }

    /// Returns the message of the last failed request.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Clears data and request state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub(crate) fn data_mut(&mut self) -> &mut T {
        &mut self.data
    }

    pub(crate) fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// Ends the request, keeping the failure message on error.
    pub(crate) fn finish<R>(&mut self, result: AppResult<R>) -> Option<R> {
        self.loading = false;
        match result {
            Ok(value) => Some(value),
            Err(error) => {
                self.error = Some(error.user_message());
                None
            }
        }
    }
}
