use axum::{http::StatusCode, response::{IntoResponse, Response}, Json};
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Crate-wide error type.
///
/// Every non-server variant carries a stable, dotted `key` string matching
/// the eventKey-prefixed identifiers documented throughout the component
/// design (e.g. `authPasswordBased.login.unknownEmail`,
/// `multitenant.require.invalidTenant`). The wire format is always
/// `{key, status, info, cause?}`.
#[derive(Debug)]
pub enum AppError {
    /// 400 — malformed input or business-rule violation.
    Validation { key: String, info: Option<Value> },
    /// 401 — any session-related failure after normalization, or an
    /// authentication failure that must stay ambiguous.
    Unauthorized { key: String },
    /// 403 — IP or permission check rejection.
    Forbidden { key: String },
    /// 404 — unknown entity on a non-admin path.
    NotFound { key: String },
    /// 429 — rate limit exhausted.
    RateLimited { key: String },
    /// 500 — programmer error, invariant violation, or upstream failure.
    Server { key: String, cause: Option<String> },
    /// Database errors are always 500s; the cause is logged, never echoed.
    Database(sqlx::Error),
}

impl AppError {
    pub fn validation(key: impl Into<String>) -> Self {
        AppError::Validation { key: key.into(), info: None }
    }

    pub fn validation_with(key: impl Into<String>, info: Value) -> Self {
        AppError::Validation { key: key.into(), info: Some(info) }
    }

    pub fn unauthorized(key: impl Into<String>) -> Self {
        AppError::Unauthorized { key: key.into() }
    }

    pub fn forbidden(key: impl Into<String>) -> Self {
        AppError::Forbidden { key: key.into() }
    }

    pub fn not_found(key: impl Into<String>) -> Self {
        AppError::NotFound { key: key.into() }
    }

    pub fn rate_limited(key: impl Into<String>) -> Self {
        AppError::RateLimited { key: key.into() }
    }

    pub fn server(key: impl Into<String>, cause: impl fmt::Display) -> Self {
        AppError::Server { key: key.into(), cause: Some(cause.to_string()) }
    }

    pub fn server_key(key: impl Into<String>) -> Self {
        AppError::Server { key: key.into(), cause: None }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            AppError::Forbidden { .. } => StatusCode::FORBIDDEN,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::Server { .. } | AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn key(&self) -> &str {
        match self {
            AppError::Validation { key, .. }
            | AppError::Unauthorized { key }
            | AppError::Forbidden { key }
            | AppError::NotFound { key }
            | AppError::RateLimited { key }
            | AppError::Server { key, .. } => key,
            AppError::Database(_) => "server.internal.database",
        }
    }

    /// Session-layer boundary rule (spec §4.3, §7): every non-500 session
    /// error surfaces as 401 regardless of its original key/kind.
    pub fn normalize_session_error(self) -> Self {
        match self {
            AppError::Server { .. } | AppError::Database(_) => self,
            other => AppError::Unauthorized { key: other.key().to_string() },
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation { key, .. } => write!(f, "validation error: {key}"),
            AppError::Unauthorized { key } => write!(f, "unauthorized: {key}"),
            AppError::Forbidden { key } => write!(f, "forbidden: {key}"),
            AppError::NotFound { key } => write!(f, "not found: {key}"),
            AppError::RateLimited { key } => write!(f, "rate limited: {key}"),
            AppError::Server { key, cause } => {
                write!(f, "server error: {key}")?;
                if let Some(c) = cause {
                    write!(f, " ({c})")?;
                }
                Ok(())
            },
            AppError::Database(e) => write!(f, "database error: {e}"),
        }
    }
}

impl std::error::Error for AppError {}

#[derive(Serialize)]
struct ErrorBody<'a> {
    key: &'a str,
    status: u16,
    info: Option<&'a Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cause: Option<&'a str>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            AppError::Database(e) => tracing::error!(error = ?e, "database error"),
            AppError::Server { key, cause } => {
                tracing::error!(key = %key, cause = ?cause, "server error")
            },
            _ => {},
        }

        let info = match &self {
            AppError::Validation { info, .. } => info.as_ref(),
            _ => None,
        };

        let body = ErrorBody { key: self.key(), status: status.as_u16(), info, cause: None };
        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(err)
    }
}

impl From<std::env::VarError> for AppError {
    fn from(err: std::env::VarError) -> Self {
        AppError::Server { key: "server.internal.config".into(), cause: Some(err.to_string()) }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Server { key: "server.internal.config".into(), cause: Some(err.to_string()) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_errors_normalize_to_unauthorized() {
        let err = AppError::validation("authPasswordBased.login.unknownEmail");
        let normalized = err.normalize_session_error();
        assert!(matches!(normalized, AppError::Unauthorized { .. }));
        assert_eq!(normalized.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn server_errors_pass_through_normalization() {
        let err = AppError::server_key("server.internal.transactionMissing");
        let normalized = err.normalize_session_error();
        assert_eq!(normalized.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
