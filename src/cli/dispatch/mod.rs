//! Command-line argument dispatch.
//!
//! Maps validated CLI matches to the action the binary runs.

use crate::cli::actions::{Action, server::Args};
use crate::cli::commands::{ARG_PORT, store};
use anyhow::Result;

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>(ARG_PORT).copied().unwrap_or(3000);
    let store_opts = store::Options::parse(matches)?;

    Ok(Action::Server(Args {
        port,
        store: store_opts.store,
        public_dir: store_opts.public_dir,
        registration_profile: store_opts.registration_profile,
    }))
}
