//! Response bodies shared by the auth endpoints.

use crate::users::PublicUser;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct AuthSuccess {
    pub success: bool,
    pub user: PublicUser,
}

#[derive(ToSchema, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct AuthFailure {
    pub success: bool,
    pub message: String,
}
