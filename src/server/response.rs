//! Response status vocabulary and JSON bodies

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};

/// Status text paired with its HTTP code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseCode {
    Success,
    Created,
    Accepted,
    ValidationError,
    Unauthorized,
    Forbidden,
    NotFound,
    MethodNotAllowed,
    InternalError,
    NotImplemented,
    ServiceUnavailable,
}

impl ResponseCode {
    pub fn text(&self) -> &'static str {
        match self {
            ResponseCode::Success => "success",
            ResponseCode::Created => "created",
            ResponseCode::Accepted => "accepted",
            ResponseCode::ValidationError => "validation_error",
            ResponseCode::Unauthorized => "unauthorized",
            ResponseCode::Forbidden => "forbidden",
            ResponseCode::NotFound => "not_found",
            ResponseCode::MethodNotAllowed => "method_not_allowed",
            ResponseCode::InternalError => "internal_error",
            ResponseCode::NotImplemented => "not_implemented",
            ResponseCode::ServiceUnavailable => "service_unavailable",
        }
    }

    pub fn http_code(&self) -> u16 {
        match self {
            ResponseCode::Success => 200,
            ResponseCode::Created => 201,
            ResponseCode::Accepted => 202,
            ResponseCode::ValidationError => 400,
            ResponseCode::Unauthorized => 401,
            ResponseCode::Forbidden => 403,
            ResponseCode::NotFound => 404,
            ResponseCode::MethodNotAllowed => 405,
            ResponseCode::InternalError => 500,
            ResponseCode::NotImplemented => 501,
            ResponseCode::ServiceUnavailable => 503,
        }
    }

    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.http_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// `{"code", "http_status"}` description
    pub fn to_json(&self) -> Value {
        json!({"code": self.text(), "http_status": self.http_code()})
    }
}

/// `200 {"status": "success", "message", "data"}`
pub fn success(message: &str, data: Value) -> Response {
    let code = ResponseCode::Success;
    (
        code.status(),
        Json(json!({"status": code.text(), "message": message, "data": data})),
    )
        .into_response()
}

/// `400 {"status": "validation_error", "message", "details"}`
pub fn validation_error(message: &str, details: Value) -> Response {
    let code = ResponseCode::ValidationError;
    (
        code.status(),
        Json(json!({"status": code.text(), "message": message, "details": details})),
    )
        .into_response()
}

/// Generic 500; never carries internal error text
pub fn internal_error() -> Response {
    let code = ResponseCode::InternalError;
    (
        code.status(),
        Json(json!({"status": code.text(), "message": "Internal server error"})),
    )
        .into_response()
}

pub fn not_found() -> Response {
    (ResponseCode::NotFound.status(), Json(json!({"error": "Not found"}))).into_response()
}
