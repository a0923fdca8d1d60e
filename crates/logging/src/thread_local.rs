//! Thread-local storage for verbosity configuration and event collection.

use super::config::VerbosityConfig;
use super::levels::{DebugFlag, InfoFlag};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

/// Most events kept per thread; older events are dropped first.
pub const MAX_BUFFERED_EVENTS: usize = 1024;

thread_local! {
    static VERBOSITY: Cell<VerbosityConfig> =
        const { Cell::new(VerbosityConfig::from_verbose_level(0)) };
    #[allow(clippy::missing_const_for_thread_local)]
    static EVENTS: RefCell<VecDeque<DiagnosticEvent>> = RefCell::new(VecDeque::new());
}

/// Diagnostic event collected during execution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DiagnosticEvent {
    /// Info-level diagnostic event.
    Info {
        /// The info flag category.
        flag: InfoFlag,
        /// The verbosity level.
        level: u8,
        /// The diagnostic message.
        message: String,
    },
    /// Debug-level diagnostic event.
    Debug {
        /// The debug flag category.
        flag: DebugFlag,
        /// The verbosity level.
        level: u8,
        /// The diagnostic message.
        message: String,
    },
}

impl DiagnosticEvent {
    /// Returns the message text.
    pub fn message(&self) -> &str {
        match self {
            Self::Info { message, .. } | Self::Debug { message, .. } => message,
        }
    }
}

/// Initialize verbosity configuration for the current thread.
pub fn init(config: VerbosityConfig) {
    VERBOSITY.with(|v| v.set(config));
}

/// Returns the configuration active on the current thread.
pub fn current() -> VerbosityConfig {
    VERBOSITY.with(Cell::get)
}

/// Check if the info flag is at or above the specified level.
pub fn info_gte(flag: InfoFlag, level: u8) -> bool {
    VERBOSITY.with(|v| v.get().info.get(flag) >= level)
}

/// Check if the debug flag is at or above the specified level.
pub fn debug_gte(flag: DebugFlag, level: u8) -> bool {
    VERBOSITY.with(|v| v.get().debug.get(flag) >= level)
}

/// Emit an info diagnostic event.
pub fn emit_info(flag: InfoFlag, level: u8, message: String) {
    push_event(DiagnosticEvent::Info {
        flag,
        level,
        message,
    });
}

/// Emit a debug diagnostic event.
pub fn emit_debug(flag: DebugFlag, level: u8, message: String) {
    push_event(DiagnosticEvent::Debug {
        flag,
        level,
        message,
    });
}

fn push_event(event: DiagnosticEvent) {
    EVENTS.with(|e| {
        let mut events = e.borrow_mut();
        if events.len() == MAX_BUFFERED_EVENTS {
            events.pop_front();
        }
        events.push_back(event);
    });
}

/// Drain all collected events, clearing the internal buffer.
pub fn drain_events() -> Vec<DiagnosticEvent> {
    EVENTS.with(|e| e.borrow_mut().drain(..).collect())
}

/// Apply an info flag token to the current configuration.
pub fn apply_info_flag(token: &str) -> Result<(), String> {
    VERBOSITY.with(|v| {
        let mut config = v.get();
        config.apply_info_flag(token)?;
        v.set(config);
        Ok(())
    })
}

/// Apply a debug flag token to the current configuration.
pub fn apply_debug_flag(token: &str) -> Result<(), String> {
    VERBOSITY.with(|v| {
        let mut config = v.get();
        config.apply_debug_flag(token)?;
        v.set(config);
        Ok(())
    })
}
