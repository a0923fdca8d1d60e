//! Drives `cli::run` against a loopback TLS server.

use std::time::Duration;

use test_support::{LoopbackTlsServer, ServerStep, write_endpoint_file};

fn run(args: &[String]) -> (i32, String, String) {
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let mut argv = vec!["burstlink".to_owned()];
    argv.extend_from_slice(args);
    let code = cli::run(argv, &mut stdout, &mut stderr);
    (
        code,
        String::from_utf8_lossy(&stdout).into_owned(),
        String::from_utf8_lossy(&stderr).into_owned(),
    )
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| (*item).to_owned()).collect()
}

#[test]
fn prints_reassembled_response_as_hex() {
    let server = LoopbackTlsServer::spawn(vec![
        ServerStep::Expect(3),
        ServerStep::Send(b"ashu".to_vec()),
        ServerStep::Expect(2),
        ServerStep::Send(vec![0x00, 0x0a, 0xbc, 0xde]),
        ServerStep::Close,
    ])
    .expect("server");
    let dir = tempfile::tempdir().expect("tempdir");
    let config = write_endpoint_file(dir.path(), "127.0.0.1", server.port()).expect("config");
    let store = server.write_trust_store(dir.path()).expect("store");

    let (code, stdout, stderr) = run(&[
        "--config".to_owned(),
        config.display().to_string(),
        "--trust-store".to_owned(),
        store.display().to_string(),
        "--request-hex".to_owned(),
        "010203".to_owned(),
    ]);

    assert_eq!(code, 0, "stderr: {stderr}");
    assert_eq!(stdout, "000abcde\n");
    assert_eq!(server.join().expect("server run"), b"\x01\x02\x03OK");
}

#[test]
fn request_file_is_sent_verbatim() {
    let server = LoopbackTlsServer::spawn(vec![
        ServerStep::Expect(5),
        ServerStep::Send(vec![0xff]),
        ServerStep::Close,
    ])
    .expect("server");
    let dir = tempfile::tempdir().expect("tempdir");
    let request = dir.path().join("request.bin");
    std::fs::write(&request, b"hello").expect("request file");

    let mut args = strings(&["--host", "127.0.0.1", "--insecure-accept-any-cert"]);
    args.extend([
        "--port".to_owned(),
        server.port().to_string(),
        "--request-file".to_owned(),
        request.display().to_string(),
    ]);
    let (code, stdout, _) = run(&args);

    assert_eq!(code, 0);
    assert_eq!(stdout, "ff\n");
    assert_eq!(server.join().expect("server run"), b"hello");
}

#[test]
fn silent_server_exits_with_timeout_code() {
    let server = LoopbackTlsServer::spawn(vec![
        ServerStep::Expect(1),
        ServerStep::Pause(Duration::from_millis(800)),
    ])
    .expect("server");

    let mut args = strings(&[
        "--host",
        "127.0.0.1",
        "--insecure-accept-any-cert",
        "--timeout",
        "200",
        "--request-hex",
        "7f",
    ]);
    args.extend(["--port".to_owned(), server.port().to_string()]);
    let (code, stdout, stderr) = run(&args);

    assert_eq!(code, 30);
    assert!(stdout.is_empty());
    assert!(stderr.contains("timeout"), "stderr: {stderr}");
    let _ = server.join();
}

#[test]
fn legacy_codes_report_socket_failure_as_one() {
    let server = LoopbackTlsServer::spawn(Vec::new()).expect("server");
    let dir = tempfile::tempdir().expect("tempdir");
    let unrelated = test_support::write_unrelated_trust_store(dir.path()).expect("store");

    let mut args = strings(&["--host", "localhost", "--request-hex", "00", "--legacy-exit-codes"]);
    args.extend([
        "--port".to_owned(),
        server.port().to_string(),
        "--trust-store".to_owned(),
        unrelated.display().to_string(),
    ]);
    let (code, _, stderr) = run(&args);

    assert_eq!(code, 1, "stderr: {stderr}");
    assert!(stderr.contains("io failure"));
    let _ = server.join();
}
