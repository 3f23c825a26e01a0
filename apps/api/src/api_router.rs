use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, patch, post};
use csrd_core::AppError;
use tower_http::trace::TraceLayer;
use tower_sessions::{MemoryStore, SessionManagerLayer};

use crate::state::AppState;
use crate::{handlers, middleware};

mod cors;

#[cfg(test)]
mod tests;

pub fn build_router(
    app_state: AppState,
    frontend_url: &str,
    session_layer: SessionManagerLayer<MemoryStore>,
) -> Result<Router, AppError> {
    let protected_routes = Router::new()
        .route("/api/auth/me", get(handlers::auth::me_handler))
        .route("/api/users/{user_id}", get(handlers::users::get_user_handler))
        .route(
            "/api/users/{user_id}/team",
            patch(handlers::users::assign_team_handler),
        )
        .route(
            "/api/forms",
            get(handlers::forms::list_forms_handler).post(handlers::forms::create_form_handler),
        )
        .route(
            "/api/forms/{template_id}",
            get(handlers::forms::get_form_handler)
                .put(handlers::forms::save_form_handler)
                .patch(handlers::forms::set_form_active_handler)
                .delete(handlers::forms::delete_form_handler),
        )
        .route(
            "/api/forms/{template_id}/publish",
            post(handlers::forms::publish_form_handler),
        )
        .route(
            "/api/forms/{template_id}/preview",
            post(handlers::forms::preview_form_handler),
        )
        .route(
            "/api/categories",
            get(handlers::forms::list_categories_handler),
        )
        .route(
            "/api/declarations",
            get(handlers::declarations::list_declarations_handler)
                .post(handlers::declarations::create_declaration_handler),
        )
        .route(
            "/api/declarations/stats",
            get(handlers::declarations::declaration_stats_handler),
        )
        .route(
            "/api/declarations/{declaration_id}",
            get(handlers::declarations::get_declaration_handler)
                .put(handlers::declarations::update_declaration_handler)
                .delete(handlers::declarations::delete_declaration_handler),
        )
        .route(
            "/api/declarations/{declaration_id}/submit",
            post(handlers::declarations::submit_declaration_handler),
        )
        .route(
            "/api/declarations/{declaration_id}/validate",
            post(handlers::declarations::validate_declaration_handler),
        )
        .route(
            "/api/org-units/{level}",
            get(handlers::org_units::list_org_units_handler),
        )
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_user,
        ));

    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route("/api/auth/login", post(handlers::auth::login_handler))
        .route("/api/auth/register", post(handlers::auth::register_handler))
        .route("/api/auth/logout", post(handlers::auth::logout_handler));

    Ok(Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
        .layer(cors::build_cors_layer(frontend_url)?)
        .with_state(app_state))
}
