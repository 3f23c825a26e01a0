use csrd_domain::{OrgUnitId, User};

use crate::auth_service::{AuthService, RegisterParams};
use crate::stores::ResourceState;

/// Session state of the signed-in user.
#[derive(Clone)]
pub struct AuthStore {
    service: AuthService,
    state: ResourceState<Option<User>>,
}

impl AuthStore {
    /// Creates a signed-out store.
    #[must_use]
    pub fn new(service: AuthService) -> Self {
        Self {
            service,
            state: ResourceState::default(),
        }
    }

    /// Returns the request state, holding the signed-in user.
    #[must_use]
    pub fn state(&self) -> &ResourceState<Option<User>> {
        &self.state
    }

    /// Returns the signed-in user.
    #[must_use]
    pub fn current_user(&self) -> Option<&User> {
        self.state.data().as_ref()
    }

    /// Returns whether someone is signed in.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.current_user().is_some()
    }

    /// Signs in. On failure the inline message is kept in the state.
    pub async fn login(&mut self, identifier: &str, password: &str) -> bool {
        self.state.begin();
        let result = self.service.login(identifier, password).await;
        self.apply(result)
    }

    /// Registers and signs in the new account.
    pub async fn register(&mut self, params: RegisterParams) -> bool {
        self.state.begin();
        let result = self.service.register(params).await;
        self.apply(result)
    }

    /// Assigns the signed-in user to a team.
    pub async fn assign_team(&mut self, team_id: &OrgUnitId) -> bool {
        let Some(user_id) = self.current_user().map(|user| user.id().clone()) else {
            return false;
        };

        self.state.begin();
        let result = self.service.assign_team(&user_id, team_id).await;
        self.apply(result)
    }

    /// Signs out.
    pub fn logout(&mut self) {
        self.reset();
    }

    /// Clears the session.
    pub fn reset(&mut self) {
        self.state.reset();
    }

    fn apply(&mut self, result: csrd_core::AppResult<User>) -> bool {
        match self.state.finish(result) {
            Some(user) => {
                *self.state.data_mut() = Some(user);
                true
            }
            None => false,
        }
    }
}
