use std::time::Duration;

use session::{ConfigError, EndpointConfig, ExitCode, HasExitCode};
use test_support::{endpoint_file, write_endpoint_file};

#[test]
fn loads_written_endpoint_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_endpoint_file(dir.path(), "127.0.0.1", 4433).expect("write");

    let config = EndpointConfig::load(&path).expect("load");

    assert_eq!(config.host(), "127.0.0.1");
    assert_eq!(config.port(), 4433);
    let endpoint = config.into_endpoint(Duration::from_millis(750));
    assert_eq!(endpoint.to_string(), "127.0.0.1:4433");
}

#[test]
fn missing_file_is_a_startup_failure() {
    let dir = tempfile::tempdir().expect("tempdir");
    let error = EndpointConfig::load(&dir.path().join("absent.txt")).expect_err("missing");

    assert!(matches!(error, ConfigError::Read { .. }));
    assert_eq!(error.exit_code(), ExitCode::StartClient);
    assert!(error.to_string().contains("absent.txt"));
}

#[test]
fn port_line_must_be_numeric() {
    let file = endpoint_file("host.example\nport\n").expect("temp file");
    let error = EndpointConfig::load(file.path()).expect_err("bad port");
    assert!(matches!(error, ConfigError::InvalidPort { ref value, .. } if value == "port"));
}
