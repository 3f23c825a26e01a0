pub mod auth;
pub mod declarations;
pub mod forms;
pub mod health;
pub mod org_units;
pub mod users;

use csrd_core::{AppError, AppResult};
use csrd_domain::User;

fn require_admin(user: &User) -> AppResult<()> {
    if user.is_admin() {
        return Ok(());
    }

    Err(AppError::Forbidden(
        "administrator role is required".to_owned(),
    ))
}
