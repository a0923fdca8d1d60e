use std::fs;
use std::net::{IpAddr, SocketAddr};

use logging::{LogSink, VerbosityConfig};
use protocol::from_hex;
use session::{EndpointConfig, SessionTimeouts};
use transport::{Endpoint, StorePassword, TransportProtocol, TrustPolicy};

use crate::args::ParsedArgs;
use crate::error::CliError;

/// Everything one exchange needs, validated.
#[derive(Debug)]
pub(crate) struct ClientOptions {
    pub(crate) endpoint: Endpoint,
    pub(crate) policy: TrustPolicy,
    pub(crate) protocol: TransportProtocol,
    pub(crate) timeouts: SessionTimeouts,
    pub(crate) request: Vec<u8>,
    pub(crate) verbosity: VerbosityConfig,
    pub(crate) log_sink: LogSink,
    pub(crate) legacy_exit_codes: bool,
}

impl ClientOptions {
    /// Validates `parsed`, reading the endpoint and request files last so
    /// usage errors win over missing files.
    pub(crate) fn from_parsed(parsed: ParsedArgs) -> Result<Self, CliError> {
        if parsed.config.is_none() && parsed.host.is_none() {
            return Err(CliError::Missing(
                "no peer given: use --config FILE or --host HOST --port PORT",
            ));
        }
        if !parsed.insecure && parsed.trust_store.is_none() {
            return Err(CliError::Missing(
                "no trust decision given: use --trust-store PEM or --insecure-accept-any-cert",
            ));
        }
        if parsed.request_hex.is_none() && parsed.request_file.is_none() {
            return Err(CliError::Missing(
                "no request given: use --request-hex HEX or --request-file FILE",
            ));
        }

        let protocol = match parsed.tls.as_deref() {
            Some(value) => value
                .parse::<TransportProtocol>()
                .map_err(|detail| CliError::InvalidOption {
                    option: "--tls",
                    detail,
                })?,
            None => TransportProtocol::default(),
        };
        let bind_address = parsed
            .bind_address
            .as_deref()
            .map(parse_bind_address)
            .transpose()?;
        let verbosity = verbosity(parsed.verbosity, &parsed.info, &parsed.debug)?;

        let timeouts = SessionTimeouts::from_millis(parsed.timeout_ms, parsed.connect_timeout_ms);
        let policy = if parsed.insecure {
            TrustPolicy::accept_all_insecure()
        } else {
            TrustPolicy::validate_against_store(
                parsed.trust_store.unwrap_or_default(),
                parsed.trust_store_password.map(StorePassword::new),
            )
        };

        let request = match (parsed.request_hex, parsed.request_file) {
            (Some(hex), _) => from_hex(hex.trim()).map_err(CliError::RequestHex)?,
            (None, Some(path)) => {
                fs::read(&path).map_err(|source| CliError::RequestFile { path, source })?
            }
            (None, None) => Vec::new(),
        };

        let mut endpoint = match (parsed.config, parsed.host, parsed.port) {
            (Some(path), _, _) => {
                EndpointConfig::load(&path)?.into_endpoint(timeouts.connect_timeout())
            }
            (None, Some(host), Some(port)) => {
                Endpoint::new(host, port).with_connect_timeout(timeouts.connect_timeout())
            }
            (None, _, _) => return Err(CliError::Missing("--host requires --port")),
        };
        if let Some(address) = bind_address {
            endpoint = endpoint.with_bind_address(address);
        }

        Ok(Self {
            endpoint,
            policy,
            protocol,
            timeouts,
            request,
            verbosity,
            log_sink: parsed.log_file.map_or(LogSink::Stderr, LogSink::File),
            legacy_exit_codes: parsed.legacy_exit_codes,
        })
    }
}

fn parse_bind_address(text: &str) -> Result<SocketAddr, CliError> {
    let trimmed = text.trim().trim_start_matches('[').trim_end_matches(']');
    trimmed
        .parse::<IpAddr>()
        .map(|ip| SocketAddr::new(ip, 0))
        .map_err(|error| CliError::InvalidOption {
            option: "--address",
            detail: format!("'{text}': {error}"),
        })
}

fn verbosity(level: u8, info: &[String], debug: &[String]) -> Result<VerbosityConfig, CliError> {
    let mut config = VerbosityConfig::from_verbose_level(level);
    for token in info.iter().map(|token| token.trim()).filter(|t| !t.is_empty()) {
        config
            .apply_info_flag(token)
            .map_err(|detail| CliError::InvalidOption {
                option: "--info",
                detail,
            })?;
    }
    for token in debug.iter().map(|token| token.trim()).filter(|t| !t.is_empty()) {
        config
            .apply_debug_flag(token)
            .map_err(|detail| CliError::InvalidOption {
                option: "--debug",
                detail,
            })?;
    }
    Ok(config)
}
