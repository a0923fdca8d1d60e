//! Subscriber installation and log destinations.

use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use thiserror::Error;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::{Layer, SubscriberExt};
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};

use super::config::VerbosityConfig;
use super::tracing_bridge::{BurstlinkLayer, sink_admits};

/// Environment variable holding an `EnvFilter` directive that replaces the
/// flag-based filter of the log sink.
pub const LOG_FILTER_ENV: &str = "BURSTLINK_LOG";

/// Where human-readable log lines go.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum LogSink {
    /// Standard error.
    #[default]
    Stderr,
    /// A file opened in append mode, created when missing.
    File(PathBuf),
}

impl LogSink {
    fn make_writer(&self) -> Result<BoxMakeWriter, LogInitError> {
        match self {
            Self::Stderr => Ok(BoxMakeWriter::new(io::stderr)),
            Self::File(path) => {
                let file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .map_err(|source| LogInitError::OpenFile {
                        path: path.clone(),
                        source,
                    })?;
                Ok(BoxMakeWriter::new(Mutex::new(file)))
            }
        }
    }
}

/// Errors raised while installing the global subscriber.
#[derive(Debug, Error)]
pub enum LogInitError {
    /// The log file could not be opened.
    #[error("failed to open log file {}: {source}", path.display())]
    OpenFile {
        /// Requested log file.
        path: PathBuf,
        /// Filesystem error.
        #[source]
        source: io::Error,
    },
    /// A global subscriber was already installed.
    #[error("tracing subscriber already installed: {0}")]
    AlreadyInstalled(#[from] TryInitError),
}

/// Installs the global subscriber.
///
/// Two layers are registered: [`BurstlinkLayer`], which records flagged
/// events for the calling thread, and a `fmt` layer writing lines to `sink`.
/// The `fmt` layer follows the flag levels in `config` unless
/// [`LOG_FILTER_ENV`] holds a valid directive.
pub fn init_tracing(config: VerbosityConfig, sink: &LogSink) -> Result<(), LogInitError> {
    super::thread_local::init(config);

    let writer = sink.make_writer()?;
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true);

    let fmt_layer = match EnvFilter::try_from_env(LOG_FILTER_ENV) {
        Ok(filter) => fmt_layer.with_filter(filter).boxed(),
        Err(_) => fmt_layer.with_filter(filter_fn(sink_admits)).boxed(),
    };

    tracing_subscriber::registry()
        .with(BurstlinkLayer::new())
        .with(fmt_layer)
        .try_init()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_sink_is_stderr() {
        assert_eq!(LogSink::default(), LogSink::Stderr);
    }

    #[test]
    fn unopenable_file_is_reported() {
        let dir = tempfile::tempdir().expect("temp dir");
        let sink = LogSink::File(dir.path().join("missing").join("burstlink.log"));

        let error = sink.make_writer().expect_err("parent directory is missing");
        assert!(matches!(error, LogInitError::OpenFile { .. }));
        assert!(error.to_string().contains("burstlink.log"));
    }

    #[test]
    fn file_sink_creates_the_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("burstlink.log");

        LogSink::File(path.clone()).make_writer().expect("writer");
        assert!(path.exists());
    }
}
