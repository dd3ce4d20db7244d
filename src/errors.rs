//! Error taxonomy and the single error-to-HTTP conversion point.

use std::collections::BTreeMap;

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

/// Accumulated field-level validation failures.
///
/// Keys are field names, values are human-readable messages. A request is
/// rejected wholesale when this is non-empty; no partial application.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct ValidationErrors(BTreeMap<&'static str, String>);

impl ValidationErrors {
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        let mut errors = Self::default();
        errors.add(field, message);
        errors
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Returns `value` if no errors accumulated, otherwise the error set.
    pub fn into_result<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

/// Application-level errors, converted to JSON responses at the boundary only.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation failed")]
    Validation(ValidationErrors),

    #[error("Not Found")]
    NotFound,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::Validation(errors)
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<&'a ValidationErrors>,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            ApiError::Validation(errors) => HttpResponse::UnprocessableEntity().json(ErrorBody {
                error: "Validation failed",
                errors: Some(errors),
            }),
            ApiError::NotFound => HttpResponse::NotFound().json(ErrorBody {
                error: "Not Found",
                errors: None,
            }),
            ApiError::Database(err) => {
                // Full detail stays server-side; the client sees a generic 500.
                tracing::error!(error = %err, "store query failed");
                HttpResponse::InternalServerError().json(ErrorBody {
                    error: "Internal Server Error",
                    errors: None,
                })
            }
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
