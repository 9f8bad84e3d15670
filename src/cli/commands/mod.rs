pub mod store;

use clap::{
    Arg, ArgAction, ColorChoice, Command,
    builder::styling::{AnsiColor, Effects, Styles},
};

pub const ARG_PORT: &str = "port";
pub const ARG_VERBOSITY: &str = "verbosity";

/// `LOGINBOX_LOG_LEVEL` takes a level name or the matching `-v` count (0-4).
fn parse_log_level(level: &str) -> Result<u8, String> {
    let count = match level.to_ascii_lowercase().as_str() {
        "error" | "0" => 0,
        "warn" | "1" => 1,
        "info" | "2" => 2,
        "debug" | "3" => 3,
        "trace" | "4" => 4,
        other => return Err(format!("unknown log level: {other}")),
    };
    Ok(count)
}

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("loginbox")
        .about("Email and password login service")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new(ARG_PORT)
                .short('p')
                .long("port")
                .help("Port to listen on")
                .default_value("3000")
                .env("PORT")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new(ARG_VERBOSITY)
                .short('v')
                .long("verbose")
                .help("Log level: -v warn, -vv info, -vvv debug, -vvvv trace (default: error)")
                .env("LOGINBOX_LOG_LEVEL")
                .global(true)
                .action(ArgAction::Count)
                .value_parser(parse_log_level),
        );

    store::with_args(command)
}
