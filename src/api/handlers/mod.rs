//! API handlers and the response shapes they share.

pub mod assets;
pub mod health;
pub mod types;
pub mod user_login;
pub mod user_register;

use crate::users::{AuthError, PublicUser};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use types::{AuthFailure, AuthSuccess};

/// Decode a request body that must be a JSON object. Arrays are refused even
/// though derived deserializers would map them onto fields by position.
pub(crate) fn parse_object<T: DeserializeOwned>(body: &[u8]) -> Result<T, AuthError> {
    let value: Value = serde_json::from_slice(body).map_err(|e| {
        debug!("body is not JSON: {}", e);
        AuthError::InvalidPayload
    })?;

    if !value.is_object() {
        debug!("body is not a JSON object");
        return Err(AuthError::InvalidPayload);
    }

    serde_json::from_value(value).map_err(|e| {
        debug!("body has unexpected field types: {}", e);
        AuthError::InvalidPayload
    })
}

pub(crate) fn success_response(user: PublicUser) -> Response {
    (
        StatusCode::OK,
        Json(AuthSuccess {
            success: true,
            user,
        }),
    )
        .into_response()
}

pub(crate) fn failure_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(AuthFailure {
            success: false,
            message: message.into(),
        }),
    )
        .into_response()
}

pub(crate) fn error_response(err: &AuthError) -> Response {
    debug!("request failed: {}", err.kind().as_str());
    failure_response(err.status(), err.to_string())
}

/// Fallback for any non-`POST` method on the JSON endpoints.
pub async fn method_not_allowed() -> Response {
    failure_response(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed")
}
