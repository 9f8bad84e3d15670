use crate::users::RegistrationProfile;
use anyhow::{Context, Result, anyhow};
use clap::{Arg, ArgMatches, Command};
use std::path::PathBuf;

pub const ARG_STORE: &str = "store";
pub const ARG_USERS_FILE: &str = "users-file";
pub const ARG_PUBLIC_DIR: &str = "public-dir";
pub const ARG_REGISTRATION_PROFILE: &str = "registration-profile";

/// Where user records are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreKind {
    File(PathBuf),
    Memory,
}

#[derive(Debug, Clone)]
pub struct Options {
    pub store: StoreKind,
    pub public_dir: PathBuf,
    pub registration_profile: RegistrationProfile,
}

impl Options {
    /// Parse storage and registration arguments from matches.
    ///
    /// # Errors
    /// Returns an error if a value is missing or not recognized.
    pub fn parse(matches: &ArgMatches) -> Result<Self> {
        let read_required = |id: &str| -> Result<String> {
            matches
                .get_one::<String>(id)
                .cloned()
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| anyhow!("missing required argument: --{id}"))
        };

        let store = match read_required(ARG_STORE)?.as_str() {
            "memory" => StoreKind::Memory,
            "file" => StoreKind::File(PathBuf::from(read_required(ARG_USERS_FILE)?)),
            other => return Err(anyhow!("unknown store: {other}")),
        };

        let registration_profile = read_required(ARG_REGISTRATION_PROFILE)?
            .parse::<RegistrationProfile>()
            .map_err(|e| anyhow!(e))
            .context("invalid --registration-profile")?;

        Ok(Self {
            store,
            public_dir: PathBuf::from(read_required(ARG_PUBLIC_DIR)?),
            registration_profile,
        })
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_STORE)
                .long(ARG_STORE)
                .help("User store backend")
                .env("LOGINBOX_STORE")
                .default_value("file")
                .value_parser(["file", "memory"]),
        )
        .arg(
            Arg::new(ARG_USERS_FILE)
                .long(ARG_USERS_FILE)
                .help("Path to the JSON users file")
                .env("LOGINBOX_USERS_FILE")
                .default_value("users.json"),
        )
        .arg(
            Arg::new(ARG_PUBLIC_DIR)
                .long(ARG_PUBLIC_DIR)
                .help("Directory served for non-API GET requests")
                .env("LOGINBOX_PUBLIC_DIR")
                .default_value("public"),
        )
        .arg(
            Arg::new(ARG_REGISTRATION_PROFILE)
                .long(ARG_REGISTRATION_PROFILE)
                .help("Registration fields: basic (email, password) or extended (name, email, password, confirmPassword)")
                .env("LOGINBOX_REGISTRATION_PROFILE")
                .default_value("basic")
                .value_parser(["basic", "extended"]),
        )
}
