//! Failure taxonomy for registration, login, and persistence.

use axum::http::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by a [`UserStore`](super::UserStore) backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to serialize users: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("store unavailable at {path}: {source}")]
    Unavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Machine-readable error kind exposed alongside every failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MissingField,
    InvalidPayload,
    DuplicateEmail,
    PasswordMismatch,
    InvalidCredentials,
    PersistenceFailure,
}

impl ErrorKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "MissingField",
            Self::InvalidPayload => "InvalidPayload",
            Self::DuplicateEmail => "DuplicateEmail",
            Self::PasswordMismatch => "PasswordMismatch",
            Self::InvalidCredentials => "InvalidCredentials",
            Self::PersistenceFailure => "PersistenceFailure",
        }
    }
}

/// Outcome of a failed register or login call.
///
/// The `Display` text is the message returned to clients; the source of a
/// persistence failure is only reachable through `std::error::Error::source`.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    MissingField(&'static str),
    #[error("Invalid JSON")]
    InvalidPayload,
    #[error("Email already exists")]
    DuplicateEmail,
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Could not save user")]
    PersistenceFailure(#[source] StoreError),
}

impl AuthError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingField(_) => ErrorKind::MissingField,
            Self::InvalidPayload => ErrorKind::InvalidPayload,
            Self::DuplicateEmail => ErrorKind::DuplicateEmail,
            Self::PasswordMismatch => ErrorKind::PasswordMismatch,
            Self::InvalidCredentials => ErrorKind::InvalidCredentials,
            Self::PersistenceFailure(_) => ErrorKind::PersistenceFailure,
        }
    }

    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::MissingField
            | ErrorKind::InvalidPayload
            | ErrorKind::DuplicateEmail
            | ErrorKind::PasswordMismatch => StatusCode::BAD_REQUEST,
            ErrorKind::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ErrorKind::PersistenceFailure => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        Self::PersistenceFailure(err)
    }
}
