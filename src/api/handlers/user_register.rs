use super::{error_response, parse_object, success_response, types::{AuthFailure, AuthSuccess}};
use crate::users::{RegistrationInput, UserService};
use axum::{body::Bytes, extract::Extension, response::Response};
use serde::Deserialize;
use std::sync::Arc;
use tracing::instrument;
use utoipa::ToSchema;

/// Registration body. `name` and `confirmPassword` are only required when the
/// server runs the extended registration profile.
#[derive(ToSchema, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRegister {
    email: Option<String>,
    password: Option<String>,
    name: Option<String>,
    confirm_password: Option<String>,
}

impl From<UserRegister> for RegistrationInput {
    fn from(body: UserRegister) -> Self {
        Self {
            email: body.email,
            password: body.password,
            name: body.name,
            confirm_password: body.confirm_password,
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/register",
    request_body = UserRegister,
    responses (
        (status = 200, description = "Registration successful", body = AuthSuccess, content_type = "application/json"),
        (status = 400, description = "Missing fields, invalid JSON, duplicate email, or password mismatch", body = AuthFailure),
        (status = 405, description = "Method not allowed", body = AuthFailure),
        (status = 500, description = "User could not be saved", body = AuthFailure),
    ),
    tag = "auth"
)]
// axum handler for register
#[instrument(skip(service, body))]
pub async fn register(service: Extension<Arc<UserService>>, body: Bytes) -> Response {
    let user: UserRegister = match parse_object(&body) {
        Ok(user) => user,
        Err(err) => return error_response(&err),
    };

    match service.register(&user.into()).await {
        Ok(user) => success_response(user),
        Err(err) => error_response(&err),
    }
}
