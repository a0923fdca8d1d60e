use std::path::PathBuf;
use std::time::Duration;

use clap::error::ErrorKind;

use super::*;

fn run_with_args<const N: usize>(args: [&str; N]) -> (i32, String, String) {
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let code = run(args, &mut stdout, &mut stderr);
    (
        code,
        String::from_utf8_lossy(&stdout).into_owned(),
        String::from_utf8_lossy(&stderr).into_owned(),
    )
}

#[test]
fn parse_args_recognises_every_option() {
    let parsed = parse_args([
        "burstlink",
        "--host",
        "10.0.0.9",
        "--port",
        "8443",
        "--address",
        "10.0.0.1",
        "--trust-store",
        "ca.pem",
        "--trust-store-password",
        "secret",
        "--tls",
        "1.3",
        "--timeout",
        "1200",
        "--connect-timeout",
        "300",
        "--request-hex",
        "0a0b",
        "--log-file",
        "client.log",
        "-vv",
        "--info",
        "stats,session",
        "--debug",
        "io3",
        "--legacy-exit-codes",
    ])
    .expect("parse");

    assert_eq!(parsed.host.as_deref(), Some("10.0.0.9"));
    assert_eq!(parsed.port, Some(8443));
    assert_eq!(parsed.bind_address.as_deref(), Some("10.0.0.1"));
    assert_eq!(parsed.trust_store, Some(PathBuf::from("ca.pem")));
    assert_eq!(parsed.trust_store_password.as_deref(), Some("secret"));
    assert_eq!(parsed.tls.as_deref(), Some("1.3"));
    assert_eq!(parsed.timeout_ms, Some(1200));
    assert_eq!(parsed.connect_timeout_ms, Some(300));
    assert_eq!(parsed.request_hex.as_deref(), Some("0a0b"));
    assert_eq!(parsed.log_file, Some(PathBuf::from("client.log")));
    assert_eq!(parsed.verbosity, 2);
    assert_eq!(parsed.info, vec!["stats".to_owned(), "session".to_owned()]);
    assert_eq!(parsed.debug, vec!["io3".to_owned()]);
    assert!(parsed.legacy_exit_codes);
    assert!(!parsed.insecure);
}

#[test]
fn parse_args_defaults_tls_to_any() {
    let parsed = parse_args(["burstlink"]).expect("parse");
    assert_eq!(parsed.tls.as_deref(), Some("any"));
    assert!(!parsed.show_help);
}

#[test]
fn parse_args_rejects_zero_timeout() {
    let error = parse_args(["burstlink", "--timeout", "0"]).expect_err("zero deadline");
    assert_eq!(error.kind(), ErrorKind::ValueValidation);
}

#[test]
fn parse_args_rejects_unknown_tls_version() {
    let error = parse_args(["burstlink", "--tls", "1.1"]).expect_err("unknown version");
    assert_eq!(error.kind(), ErrorKind::InvalidValue);
}

#[test]
fn parse_args_rejects_conflicting_trust_choices() {
    let error = parse_args([
        "burstlink",
        "--insecure-accept-any-cert",
        "--trust-store",
        "ca.pem",
    ])
    .expect_err("conflict");
    assert_eq!(error.kind(), ErrorKind::ArgumentConflict);
}

#[test]
fn parse_args_rejects_config_with_host() {
    let error = parse_args(["burstlink", "--config", "peer.txt", "--host", "h", "--port", "1"])
        .expect_err("conflict");
    assert_eq!(error.kind(), ErrorKind::ArgumentConflict);
}

#[test]
fn parse_args_rejects_both_request_sources() {
    let error = parse_args([
        "burstlink",
        "--request-hex",
        "00",
        "--request-file",
        "req.bin",
    ])
    .expect_err("conflict");
    assert_eq!(error.kind(), ErrorKind::ArgumentConflict);
}

#[test]
fn help_lists_options_on_stdout() {
    let (code, stdout, stderr) = run_with_args(["burstlink", "--help"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("--insecure-accept-any-cert"));
    assert!(stdout.contains("--request-hex"));
    assert!(stderr.is_empty());
}

#[test]
fn unknown_option_is_a_usage_error() {
    let (code, stdout, stderr) = run_with_args(["burstlink", "--frobnicate"]);
    assert_eq!(code, 1);
    assert!(stdout.is_empty());
    assert!(stderr.contains("--frobnicate"));
}

#[test]
fn missing_trust_decision_is_a_usage_error() {
    let (code, _, stderr) =
        run_with_args(["burstlink", "--host", "h", "--port", "1", "--request-hex", "00"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("--insecure-accept-any-cert"));
}

#[test]
fn missing_endpoint_file_is_a_startup_failure() {
    let (code, _, stderr) = run_with_args([
        "burstlink",
        "--config",
        "/nonexistent/burstlink/endpoint.txt",
        "--insecure-accept-any-cert",
        "--request-hex",
        "00",
    ]);
    assert_eq!(code, 5);
    assert!(stderr.contains("endpoint file"));
}

#[test]
fn failed_exchange_reports_status_and_exit_code() {
    let result = SessionResult::failed(
        session::SessionStatus::Timeout,
        session::SessionFailure::new(session::FailureKind::Timeout, "timed out"),
    );
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();

    assert_eq!(render_result(&result, false, &mut stdout, &mut stderr), 30);
    assert_eq!(render_result(&result, true, &mut stdout, &mut stderr), 2);
    assert!(stdout.is_empty());
    assert!(String::from_utf8_lossy(&stderr).starts_with("burstlink: timeout: timed out"));
}

#[test]
fn coordinator_uses_configured_grace_period() {
    let timeouts = SessionTimeouts::default().with_grace_period(Duration::from_millis(25));
    let coordinator = build_coordinator(TransportProtocol::Tls13, &timeouts);
    assert_eq!(coordinator.grace_period(), Duration::from_millis(25));
    assert_eq!(coordinator.connector().protocol(), TransportProtocol::Tls13);

    let coordinator = build_coordinator(TransportProtocol::Any, &SessionTimeouts::default());
    assert_eq!(coordinator.grace_period(), Duration::from_millis(10));
}
