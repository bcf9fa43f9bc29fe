// HTTP API error types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::db::positions::ReorderError;
use crate::db::DbError;
use crate::services::billing::BillingError;
use crate::services::storage::StorageError;

/// HTTP API error with appropriate status codes and client-friendly messages.
///
/// The taxonomy is deliberately small: validation-failed (400),
/// authentication-missing (401), authorization-denied (403), not-found (404),
/// downstream-failure (500). 503 is reserved for the health endpoint.
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),

    // 401 Unauthorized
    Unauthorized(String),

    // 403 Forbidden
    Forbidden(String),

    // 404 Not Found
    NotFound(String),

    // 500 Internal Server Error (downstream platform failures included)
    InternalServerError(String),

    // 503 Service Unavailable
    ServiceUnavailable(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::BadRequest(_) => 400,
            ApiError::Unauthorized(_) => 401,
            ApiError::Forbidden(_) => 403,
            ApiError::NotFound(_) => 404,
            ApiError::InternalServerError(_) => 500,
            ApiError::ServiceUnavailable(_) => 503,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::Unauthorized(msg) => msg,
            ApiError::Forbidden(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::InternalServerError(msg) => msg,
            ApiError::ServiceUnavailable(msg) => msg,
        }
    }

    /// Get error code for client handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
            ApiError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        json!({
            "error": true,
            "message": self.message(),
            "code": self.error_code()
        })
    }
}

// Static constructor methods
impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        ApiError::ServiceUnavailable(message.into())
    }
}

// Convert module-level errors to ApiError. Downstream failures are logged
// locally with their real cause; the client sees the platform message only
// when it is safe to attach (errors raised by our own remote procedures).
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::ConfigMissing(var) => {
                tracing::error!("database configuration missing: {}", var);
                ApiError::internal_server_error("Database is not configured")
            }
            DbError::InvalidDatabaseUrl => {
                tracing::error!("DATABASE_URL is not a valid postgres URL");
                ApiError::internal_server_error("Database is not configured")
            }
            DbError::Rpc(msg) => {
                tracing::error!("remote procedure failed: {}", msg);
                ApiError::internal_server_error(format!(
                    "Data platform rejected the request: {}",
                    msg
                ))
            }
            DbError::Sqlx(sqlx_err) => {
                // Log the real error but return a generic message
                tracing::error!("sqlx error: {}", sqlx_err);
                ApiError::internal_server_error("An error occurred while processing your request")
            }
        }
    }
}

impl From<ReorderError> for ApiError {
    fn from(err: ReorderError) -> Self {
        match err {
            ReorderError::Duplicate(id) => {
                ApiError::bad_request(format!("duplicate identifier in reorder input: {}", id))
            }
            ReorderError::Incomplete { failed, total } => ApiError::internal_server_error(format!(
                "Reorder incomplete: {} of {} position updates failed; \
                 completed updates were not rolled back",
                failed, total
            )),
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        tracing::error!("storage signing error: {}", err);
        ApiError::internal_server_error("Failed to issue storage URL")
    }
}

impl From<BillingError> for ApiError {
    fn from(err: BillingError) -> Self {
        match err {
            BillingError::MissingSecret => {
                tracing::error!("billing secret key not configured");
                ApiError::internal_server_error("Billing is not configured")
            }
            BillingError::Http(e) => {
                tracing::error!("billing provider unreachable: {}", e);
                ApiError::internal_server_error("Billing provider is unreachable")
            }
            BillingError::Api { status, message } => {
                tracing::error!("billing provider error ({}): {}", status, message);
                ApiError::internal_server_error(format!(
                    "Billing provider rejected the request: {}",
                    message
                ))
            }
            BillingError::Malformed(msg) => {
                tracing::error!("unexpected billing provider response: {}", msg);
                ApiError::internal_server_error("Billing provider returned an unexpected response")
            }
        }
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_taxonomy() {
        assert_eq!(ApiError::bad_request("x").status_code(), 400);
        assert_eq!(ApiError::unauthorized("x").status_code(), 401);
        assert_eq!(ApiError::forbidden("x").status_code(), 403);
        assert_eq!(ApiError::not_found("x").status_code(), 404);
        assert_eq!(ApiError::internal_server_error("x").status_code(), 500);
        assert_eq!(ApiError::service_unavailable("x").status_code(), 503);
    }

    #[test]
    fn json_body_carries_message_and_code() {
        let body = ApiError::forbidden("admin role required").to_json();
        assert_eq!(body["error"], true);
        assert_eq!(body["message"], "admin role required");
        assert_eq!(body["code"], "FORBIDDEN");
    }

    #[test]
    fn rpc_errors_surface_the_platform_message() {
        let err: ApiError = DbError::Rpc("cannot tip your own band".into()).into();
        assert_eq!(err.status_code(), 500);
        assert!(err.message().contains("cannot tip your own band"));
    }

    #[test]
    fn reorder_failures_keep_their_status_split() {
        let dup: ApiError = ReorderError::Duplicate(uuid::Uuid::nil()).into();
        assert_eq!(dup.status_code(), 400);

        let partial: ApiError = ReorderError::Incomplete { failed: 2, total: 5 }.into();
        assert_eq!(partial.status_code(), 500);
        assert!(partial.message().contains("2 of 5"));
    }
}
