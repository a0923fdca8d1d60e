use clap::builder::{OsStringValueParser, PossibleValuesParser};
use clap::{Arg, ArgAction, ArgGroup, Command, value_parser};

/// Program name used in help, version and diagnostics.
pub(crate) const PROGRAM_NAME: &str = "burstlink";

const AFTER_HELP: &str = "\
The endpoint file holds the peer host on its first line and the TCP port on
its second. The response is printed on standard output as lowercase hex.

Exit codes: 0 success, 1 usage error, 2 protocol violation, 5 startup
failure, 10 socket I/O failure, 30 timeout. With --legacy-exit-codes the
exchange reports 0 success, 1 socket failure, 2 stream failure or timeout,
4 protocol failure.";

/// Builds the `clap` command used for parsing.
pub(crate) fn clap_command() -> Command {
    Command::new(PROGRAM_NAME)
        .version(env!("CARGO_PKG_VERSION"))
        .about("Send one request over TLS and print the two-burst response.")
        .disable_help_flag(true)
        .disable_version_flag(true)
        .after_help(AFTER_HELP)
        .arg(
            Arg::new("help")
                .long("help")
                .short('h')
                .help("Show this help message and exit.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("version")
                .long("version")
                .short('V')
                .help("Output version information and exit.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("FILE")
                .help("Read the peer host and port from a two-line endpoint file.")
                .value_parser(OsStringValueParser::new())
                .conflicts_with_all(["host", "port"]),
        )
        .arg(
            Arg::new("host")
                .long("host")
                .value_name("HOST")
                .help("Peer host name or address.")
                .requires("port"),
        )
        .arg(
            Arg::new("port")
                .long("port")
                .value_name("PORT")
                .help("Peer TCP port.")
                .value_parser(value_parser!(u16).range(1..))
                .requires("host"),
        )
        .arg(
            Arg::new("address")
                .long("address")
                .value_name("ADDRESS")
                .help("Bind the local socket to ADDRESS before connecting."),
        )
        .arg(
            Arg::new("insecure-accept-any-cert")
                .long("insecure-accept-any-cert")
                .help("Accept any server certificate. Disables peer authentication.")
                .action(ArgAction::SetTrue)
                .conflicts_with("trust-store"),
        )
        .arg(
            Arg::new("trust-store")
                .long("trust-store")
                .value_name("PEM")
                .help("Validate the server against the certificates in PEM.")
                .value_parser(OsStringValueParser::new()),
        )
        .arg(
            Arg::new("trust-store-password")
                .long("trust-store-password")
                .value_name("PASSWORD")
                .help("Password protecting the trust store.")
                .requires("trust-store"),
        )
        .arg(
            Arg::new("tls")
                .long("tls")
                .value_name("VERSION")
                .help("TLS versions to offer.")
                .value_parser(PossibleValuesParser::new(["any", "1.2", "1.3"]))
                .default_value("any"),
        )
        .arg(
            Arg::new("timeout")
                .long("timeout")
                .value_name("MS")
                .help("Read deadline in milliseconds (default 60000).")
                .value_parser(value_parser!(u64).range(1..)),
        )
        .arg(
            Arg::new("connect-timeout")
                .long("connect-timeout")
                .value_name("MS")
                .help("Connect and handshake timeout in milliseconds (default 60000).")
                .value_parser(value_parser!(u64).range(1..)),
        )
        .arg(
            Arg::new("request-hex")
                .long("request-hex")
                .value_name("HEX")
                .help("Request bytes as hex digits."),
        )
        .arg(
            Arg::new("request-file")
                .long("request-file")
                .value_name("FILE")
                .help("Read the raw request bytes from FILE.")
                .value_parser(OsStringValueParser::new()),
        )
        .group(ArgGroup::new("request").args(["request-hex", "request-file"]))
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .value_name("FILE")
                .help("Append diagnostics to FILE instead of standard error.")
                .value_parser(OsStringValueParser::new()),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Increase diagnostic verbosity; repeat for more detail.")
                .action(ArgAction::Count),
        )
        .arg(
            Arg::new("info")
                .long("info")
                .value_name("FLAGS")
                .help("Fine-grained informational output (session, stats).")
                .value_delimiter(',')
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .value_name("FLAGS")
                .help("Fine-grained debug output (connect, tls, proto, io, exit).")
                .value_delimiter(',')
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("legacy-exit-codes")
                .long("legacy-exit-codes")
                .help("Report exchange failures with the older 0/1/2/4 codes.")
                .action(ArgAction::SetTrue),
        )
}
