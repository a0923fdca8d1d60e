use std::ffi::OsString;
use std::path::PathBuf;

use crate::command::{PROGRAM_NAME, clap_command};

/// Parsed command produced by [`parse_args`].
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct ParsedArgs {
    pub(crate) show_help: bool,
    pub(crate) show_version: bool,
    pub(crate) config: Option<PathBuf>,
    pub(crate) host: Option<String>,
    pub(crate) port: Option<u16>,
    pub(crate) bind_address: Option<String>,
    pub(crate) insecure: bool,
    pub(crate) trust_store: Option<PathBuf>,
    pub(crate) trust_store_password: Option<String>,
    pub(crate) tls: Option<String>,
    pub(crate) timeout_ms: Option<u64>,
    pub(crate) connect_timeout_ms: Option<u64>,
    pub(crate) request_hex: Option<String>,
    pub(crate) request_file: Option<PathBuf>,
    pub(crate) log_file: Option<PathBuf>,
    pub(crate) verbosity: u8,
    pub(crate) info: Vec<String>,
    pub(crate) debug: Vec<String>,
    pub(crate) legacy_exit_codes: bool,
}

/// Parses command-line arguments into a [`ParsedArgs`] structure.
pub(crate) fn parse_args<I, S>(arguments: I) -> Result<ParsedArgs, clap::Error>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    let mut args: Vec<OsString> = arguments.into_iter().map(Into::into).collect();

    if args.is_empty() {
        args.push(OsString::from(PROGRAM_NAME));
    }

    let mut matches = clap_command().try_get_matches_from(args)?;

    let path = |matches: &mut clap::ArgMatches, id: &str| -> Option<PathBuf> {
        matches.remove_one::<OsString>(id).map(PathBuf::from)
    };
    let strings = |matches: &mut clap::ArgMatches, id: &str| -> Vec<String> {
        matches
            .remove_many::<String>(id)
            .map(Iterator::collect)
            .unwrap_or_default()
    };

    Ok(ParsedArgs {
        show_help: matches.get_flag("help"),
        show_version: matches.get_flag("version"),
        config: path(&mut matches, "config"),
        host: matches.remove_one::<String>("host"),
        port: matches.remove_one::<u16>("port"),
        bind_address: matches.remove_one::<String>("address"),
        insecure: matches.get_flag("insecure-accept-any-cert"),
        trust_store: path(&mut matches, "trust-store"),
        trust_store_password: matches.remove_one::<String>("trust-store-password"),
        tls: matches.remove_one::<String>("tls"),
        timeout_ms: matches.remove_one::<u64>("timeout"),
        connect_timeout_ms: matches.remove_one::<u64>("connect-timeout"),
        request_hex: matches.remove_one::<String>("request-hex"),
        request_file: path(&mut matches, "request-file"),
        log_file: path(&mut matches, "log-file"),
        verbosity: matches.get_count("verbose"),
        info: strings(&mut matches, "info"),
        debug: strings(&mut matches, "debug"),
        legacy_exit_codes: matches.get_flag("legacy-exit-codes"),
    })
}
