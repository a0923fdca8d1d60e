#![deny(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(missing_docs)]

//! # Overview
//!
//! `session` drives one burstlink exchange end to end: open a channel, apply
//! the read deadline, write the request, wait a short grace period, reassemble
//! the two-burst reply and release the channel. The outcome is always a
//! [`SessionResult`]; nothing in this crate panics or returns an error from
//! [`SessionCoordinator::exchange`].
//!
//! It also holds the small pieces the command-line front end needs around an
//! exchange:
//!
//! - [`config`] reads the two-line endpoint file.
//! - [`timeout`] gathers read, connect and grace durations.
//! - [`exit_code`] maps outcomes to process exit codes.
//!
//! # Examples
//!
//! ```no_run
//! use std::time::Duration;
//! use session::SessionCoordinator;
//! use transport::{Endpoint, TlsConnector, TrustPolicy};
//!
//! let coordinator = SessionCoordinator::<TlsConnector>::default();
//! let result = coordinator.exchange(
//!     &Endpoint::new("gateway.example", 8443),
//!     &TrustPolicy::validate_against_store("/etc/burstlink/ca.pem", None),
//!     b"\x00\x10request",
//!     Duration::from_secs(60),
//! );
//! if let Some(response) = result.response() {
//!     println!("{}", response.to_hex());
//! }
//! ```

mod coordinator;
mod result;

pub mod config;
pub mod exit_code;
pub mod timeout;

pub use config::{ConfigError, EndpointConfig};
pub use coordinator::SessionCoordinator;
pub use exit_code::{ExitCode, HasExitCode};
pub use result::{FailureKind, SessionFailure, SessionResult, SessionStatus};
pub use timeout::SessionTimeouts;
