#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `logging` provides the diagnostic plumbing shared by every burstlink
//! crate: a small set of info and debug flags with per-flag levels, a
//! `tracing` layer that maps event targets onto those flags, and the
//! subscriber installation used by the command-line front end.
//!
//! # Design
//!
//! - [`InfoFlag`] and [`DebugFlag`] name the diagnostic categories;
//!   [`VerbosityConfig`] holds a level per flag and is derived from the `-v`
//!   count by [`VerbosityConfig::from_verbose_level`].
//! - The active configuration lives in thread-local storage
//!   ([`init`], [`info_gte`], [`debug_gte`]). Events admitted by it are
//!   buffered, up to [`MAX_BUFFERED_EVENTS`] per thread, and can be inspected
//!   with [`drain_events`], which is how tests assert on protocol traces.
//! - Code emits events through the target macros ([`trace_connect!`],
//!   [`trace_tls!`], [`trace_proto!`], [`trace_io!`], [`trace_exit!`],
//!   [`trace_session!`], [`trace_stats!`]).
//! - [`init_tracing`] installs [`BurstlinkLayer`] together with a `fmt` layer
//!   writing to a [`LogSink`].
//!
//! # Invariants
//!
//! - Verbosity is per thread. The burstlink client is single-threaded, so the
//!   thread that calls [`init_tracing`] is the one whose events are filtered.
//! - Warnings and errors always reach the sink.

mod config;
mod levels;
mod sink;
mod thread_local;
mod tracing_bridge;
mod tracing_macros;

#[doc(hidden)]
pub use tracing;

pub use config::VerbosityConfig;
pub use levels::{DebugFlag, DebugLevels, InfoFlag, InfoLevels};
pub use sink::{LOG_FILTER_ENV, LogInitError, LogSink, init_tracing};
pub use thread_local::{
    DiagnosticEvent, MAX_BUFFERED_EVENTS, apply_debug_flag, apply_info_flag, current, debug_gte,
    drain_events, emit_debug, emit_info, info_gte, init,
};
pub use tracing_bridge::{BurstlinkLayer, TargetFlag};
