//! Typed error handling for the listings API
//!
//! Every fallible operation in the service returns [`ApiError`], which knows
//! its HTTP status, a stable error code for programmatic handling, and how to
//! render itself as a JSON body.
//!
//! # Error Categories
//!
//! - [`ApiError::NotFound`] / [`ApiError::Unchanged`]: the target document is missing
//!   or an update wrote nothing
//! - [`ValidationError`]: malformed pagination, query or update input
//! - [`ApiError::Rejected`]: the query string or JSON body could not be extracted
//! - [`StorageError`]: the document store failed or returned an undecodable document
//! - [`ApiError::CreateFailed`]: the store did not report an inserted identifier
//!
//! # Example
//!
//! ```rust,ignore
//! match service.get("507f1f77bcf86cd799439011").await {
//!     Ok(property) => println!("Found: {}", property.name),
//!     Err(ApiError::NotFound { id }) => println!("Property {} not found", id),
//!     Err(e) => eprintln!("Other error: {}", e),
//! }
//! ```

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// The main error type of the service
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No document matched the identifier
    #[error("Property with id '{id}' not found")]
    NotFound { id: String },

    /// The document exists but the update changed nothing
    #[error("Property with id '{id}' was not modified")]
    Unchanged { id: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The request could not be extracted; keeps the extractor's status
    /// (400 for bad query strings and JSON syntax, 422 for undecodable bodies)
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },

    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The store accepted the insert but reported no identifier
    #[error("Failed to create property: no identifier was returned by the store")]
    CreateFailed,
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Unchanged { .. } => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Rejected { status, .. } => *status,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::CreateFailed => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::NotFound { .. } => "PROPERTY_NOT_FOUND",
            ApiError::Unchanged { .. } => "PROPERTY_UNCHANGED",
            ApiError::Validation(_) | ApiError::Rejected { .. } => "VALIDATION_ERROR",
            ApiError::Storage(_) => "STORAGE_ERROR",
            ApiError::CreateFailed => "CREATE_FAILED",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            ApiError::NotFound { id } | ApiError::Unchanged { id } => {
                Some(serde_json::json!({ "id": id }))
            }
            ApiError::Validation(ValidationError::FieldErrors(errors)) => {
                Some(serde_json::json!({ "fields": errors }))
            }
            ApiError::Validation(ValidationError::FieldError { field, message }) => {
                Some(serde_json::json!({ "fields": [{ "field": field, "message": message }] }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), "{}", self);
        } else {
            tracing::warn!(code = self.error_code(), "{}", self);
        }

        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to input validation
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Validation error for field '{field}': {message}")]
    FieldError { field: String, message: String },

    #[error("Validation errors: {}", join_field_errors(.0))]
    FieldErrors(Vec<FieldValidationError>),

    /// An update body without any recognised field
    #[error("Update body does not contain any property field")]
    EmptyUpdate,
}

/// A single field validation error
#[derive(Debug, Clone, Serialize)]
pub struct FieldValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationError::FieldError {
            field: field.into(),
            message: message.into(),
        }
    }
}

fn join_field_errors(errors: &[FieldValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<validator::ValidationErrors> for ValidationError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<FieldValidationError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| FieldValidationError {
                    field: field.to_string(),
                    message: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string()),
                })
            })
            .collect();
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        ValidationError::FieldErrors(fields)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::Validation(errors.into())
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors raised by a [`crate::core::store::PropertyStore`] or while
/// converting documents
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The backend call itself failed (network, timeout, server error)
    #[error("{backend} {operation} failed: {message}")]
    Backend {
        backend: &'static str,
        operation: &'static str,
        message: String,
    },

    /// A stored document could not be decoded into a property
    #[error("Failed to decode stored property: {0}")]
    Decode(String),

    /// A property could not be converted into a document
    #[error("Failed to encode property: {0}")]
    Encode(String),

    /// The filter uses an operator the backend cannot evaluate
    #[error("Unsupported filter operator '{0}'")]
    UnsupportedOperator(String),
}

impl StorageError {
    pub fn backend(
        backend: &'static str,
        operation: &'static str,
        message: impl ToString,
    ) -> Self {
        StorageError::Backend {
            backend,
            operation,
            message: message.to_string(),
        }
    }
}
