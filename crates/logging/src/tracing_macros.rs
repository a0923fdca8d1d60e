//! Convenience macros for burstlink tracing targets.
//!
//! Each macro forwards to the matching `tracing` macro with a fixed
//! `burstlink::*` target so [`BurstlinkLayer`](crate::BurstlinkLayer) can map
//! the event onto its flag.

/// Emit a connection trace.
///
/// # Example
/// ```ignore
/// trace_connect!("connecting to {}", address);
/// ```
#[macro_export]
macro_rules! trace_connect {
    ($($arg:tt)*) => {
        $crate::tracing::debug!(target: "burstlink::connect", $($arg)*)
    };
}

/// Emit a TLS trace.
///
/// # Example
/// ```ignore
/// trace_tls!("handshake complete: {:?}", version);
/// ```
#[macro_export]
macro_rules! trace_tls {
    ($($arg:tt)*) => {
        $crate::tracing::debug!(target: "burstlink::tls", $($arg)*)
    };
}

/// Emit a response protocol trace.
///
/// # Example
/// ```ignore
/// trace_proto!("first burst accepted: {} bytes", len);
/// ```
#[macro_export]
macro_rules! trace_proto {
    ($($arg:tt)*) => {
        $crate::tracing::debug!(target: "burstlink::proto", $($arg)*)
    };
}

/// Emit an I/O trace.
///
/// # Example
/// ```ignore
/// trace_io!("read {} bytes", count);
/// ```
#[macro_export]
macro_rules! trace_io {
    ($($arg:tt)*) => {
        $crate::tracing::trace!(target: "burstlink::io", $($arg)*)
    };
}

/// Emit an exit or release trace.
///
/// # Example
/// ```ignore
/// trace_exit!("channel closed");
/// ```
#[macro_export]
macro_rules! trace_exit {
    ($($arg:tt)*) => {
        $crate::tracing::debug!(target: "burstlink::exit", $($arg)*)
    };
}

/// Emit a session outcome line.
///
/// # Example
/// ```ignore
/// trace_session!("exchange with {} finished: {}", endpoint, status);
/// ```
#[macro_export]
macro_rules! trace_session {
    ($($arg:tt)*) => {
        $crate::tracing::info!(target: "burstlink::session", $($arg)*)
    };
}

/// Emit a counter trace.
///
/// # Example
/// ```ignore
/// trace_stats!("received {} bytes", total);
/// ```
#[macro_export]
macro_rules! trace_stats {
    ($($arg:tt)*) => {
        $crate::tracing::info!(target: "burstlink::stats", $($arg)*)
    };
}
