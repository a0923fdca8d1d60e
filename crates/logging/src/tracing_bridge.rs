//! Bridge between the tracing crate and burstlink's verbosity flags.
//!
//! [`BurstlinkLayer`] maps event targets under `burstlink::` onto
//! [`InfoFlag`] and [`DebugFlag`] values and records the events the current
//! thread's [`VerbosityConfig`](crate::VerbosityConfig) admits into the
//! diagnostic buffer read by [`drain_events`](crate::drain_events).
//!
//! ```
//! use logging::{BurstlinkLayer, DebugFlag, VerbosityConfig, drain_events, init};
//! use tracing_subscriber::layer::SubscriberExt;
//!
//! init(VerbosityConfig::from_verbose_level(2));
//! let subscriber = tracing_subscriber::registry().with(BurstlinkLayer::new());
//! tracing::subscriber::with_default(subscriber, || {
//!     logging::trace_proto!("handshake probe received");
//! });
//!
//! let events = drain_events();
//! assert_eq!(events.len(), 1);
//! assert_eq!(events[0].message(), "handshake probe received");
//! ```

use super::levels::{DebugFlag, InfoFlag};
use super::thread_local::{debug_gte, emit_debug, emit_info, info_gte};
use tracing::{Level, Metadata, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

/// Flag an event target belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TargetFlag {
    /// A user-facing category.
    Info(InfoFlag),
    /// A developer category.
    Debug(DebugFlag),
}

impl TargetFlag {
    /// Maps a tracing target onto a flag.
    ///
    /// Targets are matched by their last `::` segment, so both
    /// `burstlink::proto` and a bare `proto` resolve. `rustls` internals are
    /// reported under [`DebugFlag::Tls`].
    pub fn for_target(target: &str) -> Option<Self> {
        if target == "rustls" || target.starts_with("rustls::") {
            return Some(Self::Debug(DebugFlag::Tls));
        }

        let leaf = target.rsplit("::").next().unwrap_or(target);
        match leaf {
            "connect" => Some(Self::Debug(DebugFlag::Connect)),
            "tls" => Some(Self::Debug(DebugFlag::Tls)),
            "proto" | "protocol" => Some(Self::Debug(DebugFlag::Proto)),
            "io" => Some(Self::Debug(DebugFlag::Io)),
            "exit" => Some(Self::Debug(DebugFlag::Exit)),
            "session" => Some(Self::Info(InfoFlag::Session)),
            "stats" => Some(Self::Info(InfoFlag::Stats)),
            _ => None,
        }
    }

    /// Reports whether the current thread's configuration admits an event of
    /// `level` for this flag.
    pub fn enabled(self, level: &Level) -> bool {
        let verbosity = level_to_verbosity_level(level);
        match self {
            Self::Info(flag) => info_gte(flag, verbosity),
            Self::Debug(flag) => debug_gte(flag, verbosity),
        }
    }
}

/// Decides whether an event is shown by the log sink.
///
/// Flagged targets follow their flag level. Warnings and errors always pass;
/// other untargeted events follow the most verbose flag.
pub(crate) fn sink_admits(metadata: &Metadata<'_>) -> bool {
    let level = metadata.level();
    if *level <= Level::WARN {
        return true;
    }
    match TargetFlag::for_target(metadata.target()) {
        Some(flag) => flag.enabled(level),
        None => crate::thread_local::current().max_level() >= *level,
    }
}

/// Map a tracing level to a verbosity level.
const fn level_to_verbosity_level(level: &Level) -> u8 {
    match *level {
        Level::ERROR | Level::WARN | Level::INFO => 1,
        Level::DEBUG => 2,
        Level::TRACE => 3,
    }
}

/// A tracing layer that records flagged events into the diagnostic buffer.
#[derive(Clone, Copy, Debug, Default)]
pub struct BurstlinkLayer {
    _private: (),
}

impl BurstlinkLayer {
    /// Create a new layer.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }
}

impl<S> Layer<S> for BurstlinkLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let Some(flag) = TargetFlag::for_target(metadata.target()) else {
            return;
        };
        if !flag.enabled(metadata.level()) {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        let Some(message) = visitor.message else {
            return;
        };

        let verbosity = level_to_verbosity_level(metadata.level());
        match flag {
            TargetFlag::Info(flag) => emit_info(flag, verbosity, message),
            TargetFlag::Debug(flag) => emit_debug(flag, verbosity, message),
        }
    }
}

/// Visitor to extract message from tracing event.
#[derive(Default)]
struct MessageVisitor {
    message: Option<String>,
}

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{value:?}"));
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_owned());
        }
    }
}
