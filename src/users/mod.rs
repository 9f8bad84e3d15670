//! User records, credential hashing, and the register/login flows.
//!
//! Records live in a [`UserStore`] which is always read and written as a
//! whole collection. Passwords are reduced to a digest by a [`PasswordHasher`]
//! before they ever reach the store, and only a [`PublicUser`] view leaves the
//! [`UserService`].

pub mod error;
pub mod hasher;
pub mod service;
pub mod store;

pub use self::error::{AuthError, ErrorKind, StoreError};
pub use self::hasher::{PasswordHasher, Sha256Hasher};
pub use self::service::{RegistrationInput, RegistrationProfile, UserService};
pub use self::store::{JsonFileStore, MemoryStore, UserStore};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A stored user.
///
/// The digest is serialized under `password` so files written by earlier
/// deployments stay readable.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub email: String,
    #[serde(rename = "password")]
    pub password_digest: String,
    pub name: String,
}

impl User {
    #[must_use]
    pub fn public_view(&self) -> PublicUser {
        PublicUser {
            email: self.email.clone(),
            name: self.name.clone(),
        }
    }
}

/// The part of a [`User`] that is safe to return to clients.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PublicUser {
    pub email: String,
    pub name: String,
}

/// Local part of an email address, used as the display name when none is given.
#[must_use]
pub fn default_name(email: &str) -> String {
    email
        .split_once('@')
        .map_or(email, |(local, _)| local)
        .to_string()
}
