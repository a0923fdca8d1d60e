//! Integration tests for the target macros and the tracing bridge.

use logging::{
    BurstlinkLayer, DebugFlag, DiagnosticEvent, InfoFlag, VerbosityConfig, drain_events, init,
    trace_connect, trace_exit, trace_io, trace_proto, trace_session, trace_tls,
};
use tracing_subscriber::layer::SubscriberExt;

fn capture(level: u8, emit: impl FnOnce()) -> Vec<DiagnosticEvent> {
    init(VerbosityConfig::from_verbose_level(level));
    drain_events();
    let subscriber = tracing_subscriber::registry().with(BurstlinkLayer::new());
    tracing::subscriber::with_default(subscriber, emit);
    drain_events()
}

fn emit_one_of_each() {
    trace_connect!("connect line");
    trace_tls!("tls line");
    trace_proto!("proto line");
    trace_io!("io line");
    trace_exit!("exit line");
    trace_session!("session line");
}

/// Every macro lands on its own flag at the level its tracing macro implies.
#[test]
fn macros_route_to_their_flags() {
    let events = capture(3, emit_one_of_each);

    let flags: Vec<String> = events
        .iter()
        .map(|event| match event {
            DiagnosticEvent::Debug { flag, level, .. } => format!("{flag:?}{level}"),
            DiagnosticEvent::Info { flag, level, .. } => format!("{flag:?}{level}"),
        })
        .collect();
    assert_eq!(
        flags,
        vec!["Connect2", "Tls2", "Proto2", "Io3", "Exit2", "Session1"]
    );
}

/// Quiet mode records nothing.
#[test]
fn quiet_mode_records_nothing() {
    assert!(capture(0, emit_one_of_each).is_empty());
}

/// A single `-v` keeps only the session line.
#[test]
fn single_verbose_keeps_session_line() {
    let events = capture(1, emit_one_of_each);
    assert_eq!(
        events,
        vec![DiagnosticEvent::Info {
            flag: InfoFlag::Session,
            level: 1,
            message: "session line".to_owned(),
        }]
    );
}

/// Formatting arguments are rendered into the recorded message.
#[test]
fn messages_are_formatted() {
    let events = capture(2, || trace_proto!("second burst: {} bytes", 2));
    assert_eq!(
        events,
        vec![DiagnosticEvent::Debug {
            flag: DebugFlag::Proto,
            level: 2,
            message: "second burst: 2 bytes".to_owned(),
        }]
    );
}
