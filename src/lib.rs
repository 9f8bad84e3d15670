//! # Loginbox
//!
//! `loginbox` is a small email/password authentication service. It serves a
//! static login page and two JSON endpoints, `POST /api/register` and
//! `POST /api/login`, backed by a flat JSON file of user records.
//!
//! ## Storage
//!
//! The user list is loaded in full for every request and rewritten in full on
//! every registration. Registrations on one process are serialized so the
//! email uniqueness check and the write happen as one step.
//!
//! ## Passwords
//!
//! Passwords are stored as an unsalted SHA-256 hex digest. This keeps existing
//! user files valid; it offers little protection if the file leaks.
//!
//! ## Errors
//!
//! Every failure is answered with `{"success": false, "message": ...}`. Login
//! failures never say whether the email exists.

pub mod api;
pub mod cli;
pub mod users;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(
            GIT_COMMIT_HASH.len() >= 7,
            "GIT_COMMIT_HASH should be at least 7 characters long, got: {GIT_COMMIT_HASH}"
        );
    }
}
