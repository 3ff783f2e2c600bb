//! HTTP error mapping.
//!
//! ```text
//!  ValidationError / JsonRejection ──► InvalidData ──► 400 {"error":"Invalid customer data"}
//!  Ok(None) / Ok(false)            ──► NotFound    ──► 404 {"error":"Customer not found"}
//!  DbError::Domain                 ──► InvalidData ──► 400
//!  any other DbError               ──► Store       ──► 500 {"error":"Failed to create customer"}
//! ```
//!
//! Details stay in the server log. The client only sees the message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use khata_db::DbError;
use serde::Serialize;
use tracing::{debug, error, warn};

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid {resource} data")]
    InvalidData {
        resource: &'static str,
        reason: String,
    },

    #[error("{} not found", capitalized(.resource))]
    NotFound { resource: &'static str },

    #[error("Failed to {action}")]
    Store {
        action: String,
        #[source]
        source: DbError,
    },
}

impl ApiError {
    pub fn invalid(resource: &'static str, reason: impl std::fmt::Display) -> Self {
        ApiError::InvalidData {
            resource,
            reason: reason.to_string(),
        }
    }

    pub fn not_found(resource: &'static str) -> Self {
        ApiError::NotFound { resource }
    }

    /// Maps a repository failure. Business rule failures surfaced by the
    /// store are the caller's fault and become `InvalidData`.
    pub fn store(resource: &'static str, action: impl Into<String>) -> impl FnOnce(DbError) -> Self {
        let action = action.into();
        move |source| {
            if source.is_domain() {
                ApiError::invalid(resource, source)
            } else {
                ApiError::Store { action, source }
            }
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidData { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Store { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::InvalidData { resource, reason } => {
                warn!(resource = %resource, reason = %reason, "Rejected request")
            }
            ApiError::NotFound { resource } => debug!(resource = %resource, "Not found"),
            ApiError::Store { action, source } => {
                error!(action = %action, error = %source, "Store operation failed")
            }
        }

        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

fn capitalized(resource: &str) -> String {
    let mut chars = resource.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use khata_core::{CoreError, InvoiceStatus};

    #[test]
    fn test_messages() {
        assert_eq!(ApiError::not_found("journal entry").to_string(), "Journal entry not found");
        assert_eq!(ApiError::invalid("item", "bad").to_string(), "Invalid item data");
    }

    #[test]
    fn test_store_classifies_domain_errors() {
        let domain = DbError::Domain(CoreError::InvalidStatusTransition {
            from: InvoiceStatus::Paid,
            to: InvoiceStatus::Draft,
        });
        let err = ApiError::store("invoice", "update invoice")(domain);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Invalid invoice data");

        let err = ApiError::store("invoice", "create invoice")(DbError::PoolExhausted);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Failed to create invoice");
    }
}
