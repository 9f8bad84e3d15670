use super::{error_response, parse_object, success_response, types::{AuthFailure, AuthSuccess}};
use crate::users::UserService;
use axum::{body::Bytes, extract::Extension, response::Response};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, instrument};
use utoipa::ToSchema;

#[derive(ToSchema, Deserialize)]
pub struct UserLogin {
    email: Option<String>,
    password: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/login",
    request_body = UserLogin,
    responses (
        (status = 200, description = "Login successful", body = AuthSuccess, content_type = "application/json"),
        (status = 400, description = "Missing fields or invalid JSON", body = AuthFailure),
        (status = 401, description = "Invalid email or password", body = AuthFailure),
        (status = 405, description = "Method not allowed", body = AuthFailure),
    ),
    tag = "auth"
)]
// axum handler for login
#[instrument(skip(service, body))]
pub async fn login(service: Extension<Arc<UserService>>, body: Bytes) -> Response {
    let user: UserLogin = match parse_object(&body) {
        Ok(user) => user,
        Err(err) => return error_response(&err),
    };

    match service
        .login(user.email.as_deref(), user.password.as_deref())
        .await
    {
        Ok(user) => {
            debug!("Login successful");
            success_response(user)
        }
        Err(err) => error_response(&err),
    }
}
