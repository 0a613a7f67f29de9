pub mod context;
pub mod cookie_helper;
pub mod dto;
pub mod handlers;
pub mod openapi;
pub mod state;

use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use chrono::Utc;
use dto::HealthResp;
use identity_core_core::domains::common::EventSink;
use shared_error::AppError;
use shared_rate_limit::RateLimitExt;
use state::AppState;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// An [`EventSink`] for call sites that read data without triggering any
/// job (spec §5: only state-changing operations enqueue work).
struct NoopEventSink;

impl EventSink for NoopEventSink {
    fn enqueue(&self, _job_name: &str, _payload: serde_json::Value) -> Result<(), AppError> {
        Ok(())
    }
}

pub fn noop_sink() -> Arc<dyn EventSink> {
    Arc::new(NoopEventSink)
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    operation_id = "health_check",
    responses((status = 200, description = "Service is up", body = HealthResp))
)]
pub async fn health_check() -> Json<HealthResp> {
    Json(HealthResp { status: "ok".to_string(), version: env!("CARGO_PKG_VERSION").to_string(), timestamp: Utc::now() })
}

/// Assembles the full HTTP surface (spec §4) against a constructed
/// [`AppState`], applying the token-bucket limiter to the password-based
/// routes and mounting Swagger UI the way the teacher does.
pub fn build_router(state: AppState) -> Router {
    let rate_limit = state.rate_limit.clone();

    let auth_routes = Router::new()
        .route("/auth/me", get(handlers::account::me))
        .route("/auth/refresh-tokens", post(handlers::account::refresh_tokens))
        .route("/auth/logout", post(handlers::account::logout))
        .route("/auth/impersonate-stop-session", post(handlers::account::impersonate_stop_session))
        .route("/auth/list-users", post(handlers::account::list_users))
        .route("/auth/user/{id}", get(handlers::account::get_user))
        .route("/auth/user/{id}/update", put(handlers::account::update_user))
        .route("/auth/user/{id}/set-active", post(handlers::account::set_active))
        .route("/auth/password-based/login", post(handlers::password::login))
        .route("/auth/password-based/verify-otp", post(handlers::password::verify_otp))
        .route("/auth/password-based/verify-email", post(handlers::password::verify_email))
        .route("/auth/password-based/forgot-password", post(handlers::password::forgot_password))
        .route("/auth/password-based/reset-password", post(handlers::password::reset_password))
        .route("/auth/password-based/list-emails", post(handlers::password::list_emails))
        .route("/auth/password-based/update-email", post(handlers::password::update_email))
        .route("/auth/password-based/update-password", post(handlers::password::update_password))
        .route("/auth/anonymous-based/login", post(handlers::anonymous::login))
        .route("/auth/digid-based/metadata", post(handlers::digid::metadata))
        .route("/auth/digid-based/redirect", post(handlers::digid::redirect))
        .route("/auth/digid-based/login", post(handlers::digid::login))
        .route("/auth/keycloak-based/redirect", post(handlers::keycloak::redirect))
        .route("/auth/keycloak-based/login", post(handlers::keycloak::login))
        .route("/auth/keycloak-based/user/{id}/update", put(handlers::keycloak::user_update))
        .route("/auth/keycloak-based/create", post(handlers::keycloak::create))
        .route("/auth/totp-provider/info", get(handlers::totp::info))
        .route("/auth/totp-provider/setup", post(handlers::totp::setup))
        .route("/auth/totp-provider/setup/verify", post(handlers::totp::setup_verify))
        .route("/auth/totp-provider/verify", post(handlers::totp::verify))
        .route("/auth/totp-provider/remove", delete(handlers::totp::remove))
        .route("/auth/totp-provider/user/{id}/remove", delete(handlers::totp::remove_for_user))
        .route("/auth/permission/summary", get(handlers::permission::summary))
        .route("/auth/permission/permission/list", get(handlers::permission::list_permissions))
        .route("/auth/permission/role/list", get(handlers::permission::list_roles))
        .route("/auth/permission/role", post(handlers::permission::create_role))
        .route("/auth/permission/role/{id}", delete(handlers::permission::delete_role))
        .route("/auth/permission/role/{id}/add-permissions", post(handlers::permission::add_permissions))
        .route("/auth/permission/role/{id}/remove-permissions", post(handlers::permission::remove_permissions))
        .route("/auth/permission/user/{id}/assign-role", post(handlers::permission::assign_role))
        .route("/auth/permission/user/{id}/remove-role", post(handlers::permission::remove_role))
        .route("/auth/permission/user/{id}/sync-roles", post(handlers::permission::sync_roles))
        .route("/auth/permission/user/{id}/summary", get(handlers::permission::user_summary));

    let session_routes = Router::new()
        .route("/session/list", get(handlers::session::list))
        .route("/session/logout", post(handlers::session::logout))
        .route("/session/set-notification-token", post(handlers::session::set_notification_token));

    let tenant_routes = Router::new()
        .route("/multitenant/current", get(handlers::tenant::current))
        .route("/feature-flag/current", get(handlers::feature_flag::current))
        .route("/feature-flag/{name}", get(handlers::feature_flag::get_dynamic).post(handlers::feature_flag::set_dynamic));

    let management_routes =
        Router::new().route("/_lightbase/management/request-magic-link", post(handlers::management::request_magic_link));

    Router::new()
        .route("/health", get(health_check))
        .merge(auth_routes)
        .merge(session_routes)
        .merge(tenant_routes)
        .merge(management_routes)
        .merge(Router::from(SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi::ApiDoc::openapi())))
        .rate_limit(rate_limit)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
