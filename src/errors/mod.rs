//! Error handling module for the SkiDráček backend.
//!
//! Provides centralized error types with mapping to HTTP status codes and response envelopes.

use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Error codes as constants to avoid stringly-typed errors.
pub mod codes {
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const UNKNOWN_SLUG: &str = "UNKNOWN_SLUG";
    pub const NOT_AUTHENTICATED: &str = "NOT_AUTHENTICATED";
    pub const ACCESS_DENIED: &str = "ACCESS_DENIED";
    pub const CONFIGURATION_ERROR: &str = "CONFIGURATION_ERROR";
    pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
    pub const BAD_REQUEST: &str = "BAD_REQUEST";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";

    pub const ALL: [&str; 8] = [
        VALIDATION_ERROR,
        UNKNOWN_SLUG,
        NOT_AUTHENTICATED,
        ACCESS_DENIED,
        CONFIGURATION_ERROR,
        STORAGE_ERROR,
        BAD_REQUEST,
        INTERNAL_ERROR,
    ];
}

/// A single failed check, addressed by a dotted path into the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldIssue {
    /// Empty for problems with the payload as a whole.
    pub path: String,
    pub message: String,
}

/// Every issue found while validating one content payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
    pub slug: String,
    pub issues: Vec<FieldIssue>,
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid content for '{}'", self.slug)?;
        for (i, issue) in self.issues.iter().enumerate() {
            let sep = if i == 0 { ": " } else { "; " };
            if issue.path.is_empty() {
                write!(f, "{}{}", sep, issue.message)?;
            } else {
                write!(f, "{}{}: {}", sep, issue.path, issue.message)?;
            }
        }
        Ok(())
    }
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    /// Write payload does not match its slug's schema
    Validation(ValidationErrors),
    /// Slug outside the known set
    UnknownSlug(String),
    /// No valid session on the request
    NotAuthenticated(String),
    /// Authenticated, but not on the allowlist
    AccessDenied(String),
    /// Allowlist or other settings cannot be resolved
    Configuration(String),
    /// Storage unreachable or query rejected
    Storage(String),
    /// Malformed request body
    BadRequest(String),
    /// Internal server error
    Internal(String),
}

impl AppError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::UnknownSlug(_) => StatusCode::BAD_REQUEST,
            AppError::NotAuthenticated(_) => StatusCode::UNAUTHORIZED,
            AppError::AccessDenied(_) => StatusCode::FORBIDDEN,
            AppError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => codes::VALIDATION_ERROR,
            AppError::UnknownSlug(_) => codes::UNKNOWN_SLUG,
            AppError::NotAuthenticated(_) => codes::NOT_AUTHENTICATED,
            AppError::AccessDenied(_) => codes::ACCESS_DENIED,
            AppError::Configuration(_) => codes::CONFIGURATION_ERROR,
            AppError::Storage(_) => codes::STORAGE_ERROR,
            AppError::BadRequest(_) => codes::BAD_REQUEST,
            AppError::Internal(_) => codes::INTERNAL_ERROR,
        }
    }

    /// Get the error message.
    pub fn message(&self) -> String {
        match self {
            AppError::Validation(errors) => errors.to_string(),
            AppError::UnknownSlug(slug) => format!("Unknown content slug: {}", slug),
            AppError::NotAuthenticated(msg) => msg.clone(),
            AppError::AccessDenied(msg) => msg.clone(),
            AppError::Configuration(msg) => msg.clone(),
            AppError::Storage(msg) => msg.clone(),
            AppError::BadRequest(msg) => msg.clone(),
            AppError::Internal(msg) => msg.clone(),
        }
    }

    /// Czech message shown on the admin surface.
    pub fn localized_message(&self) -> &'static str {
        localized_message(self.error_code())
    }
}

/// Czech message for an error code.
pub fn localized_message(code: &str) -> &'static str {
    match code {
        codes::VALIDATION_ERROR => "Obsah neprošel kontrolou. Opravte zvýrazněná pole.",
        codes::UNKNOWN_SLUG => "Neznámý blok obsahu.",
        codes::NOT_AUTHENTICATED => "Nejste přihlášeni.",
        codes::ACCESS_DENIED => "Přístup odepřen.",
        codes::CONFIGURATION_ERROR => "Seznam správců není nastaven.",
        codes::STORAGE_ERROR => "Uložení se nezdařilo. Zkuste to prosím znovu.",
        codes::BAD_REQUEST => "Neplatný požadavek.",
        _ => "Nastala neočekávaná chyba.",
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error_code(), self.message())
    }
}

impl std::error::Error for AppError {}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::Validation(errors)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("Database error: {:?}", err);
        AppError::Storage(format!("Database error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("JSON error: {:?}", err);
        AppError::Internal(format!("JSON error: {}", err))
    }
}

/// Error response envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub ok: bool,
    pub error: String,
    pub code: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<FieldIssue>,
}

impl ErrorResponse {
    pub fn new(error: &AppError) -> Self {
        let issues = match error {
            AppError::Validation(errors) => errors.issues.clone(),
            _ => Vec::new(),
        };

        Self {
            ok: false,
            error: error.message(),
            code: error.error_code().to_string(),
            issues,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::debug!("Request rejected: {}", self);
        }
        let body = ErrorResponse::new(&self);
        (status, Json(body)).into_response()
    }
}
