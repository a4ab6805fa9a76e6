use std::collections::BTreeMap;

use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Key for errors that do not belong to a single field.
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

/// Message carried by every pagination failure.
pub const INVALID_PAGE: &str = "Invalid page.";

pub type FieldErrors = BTreeMap<String, Vec<String>>;

#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
    fields: Option<FieldErrors>,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<FieldErrors>,
}

impl AppError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            fields: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// 400 with per-field messages.
    pub fn validation(fields: FieldErrors) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: "validation failed".to_string(),
            fields: Some(fields),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn invalid_page() -> Self {
        Self::not_found(INVALID_PAGE)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            error: self.message,
            fields: self.fields,
        });
        (self.status, body).into_response()
    }
}

/// `Json` whose rejections are reported as validation errors.
#[derive(FromRequest)]
#[from_request(via(Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        let (field, message) = match &rejection {
            JsonRejection::JsonDataError(err) => data_error_field(&err.body_text()),
            JsonRejection::JsonSyntaxError(_) => (
                NON_FIELD_ERRORS.to_string(),
                "JSON parse error.".to_string(),
            ),
            JsonRejection::MissingJsonContentType(_) => (
                NON_FIELD_ERRORS.to_string(),
                "Expected a JSON request body.".to_string(),
            ),
            other => (NON_FIELD_ERRORS.to_string(), other.body_text()),
        };

        let mut fields = FieldErrors::new();
        fields.entry(field).or_default().push(message);
        AppError::validation(fields)
    }
}

/// Splits axum's "<prefix>: <path>: <serde message>" text into the offending
/// field and a short message.
fn data_error_field(text: &str) -> (String, String) {
    let detail = text
        .split_once("target type: ")
        .map(|(_, rest)| rest)
        .unwrap_or(text);

    let (field, inner) = match detail.split_once(": ") {
        Some((path, inner)) if !path.contains(' ') => (path.to_string(), inner),
        _ => (NON_FIELD_ERRORS.to_string(), detail),
    };

    let message = if inner.contains("expected a boolean") {
        "Must be a valid boolean.".to_string()
    } else if inner.contains("expected a string") {
        "Not a valid string.".to_string()
    } else if inner.starts_with("invalid type") && inner.contains("expected struct") {
        "Invalid data. Expected a dictionary.".to_string()
    } else {
        inner
            .split(" at line ")
            .next()
            .unwrap_or(inner)
            .to_string()
    };

    (field, message)
}
