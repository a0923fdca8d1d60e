#![deny(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(missing_docs)]

//! # Overview
//!
//! `transport` owns the encrypted connection a burstlink session runs over.
//! A [`SecureChannel`] wraps one TLS client session on one TCP socket and
//! exposes exactly what the response protocol needs: a deadline-bounded
//! blocking read, a non-blocking "how much is already here" query, and a
//! write that flushes before returning.
//!
//! # Design
//!
//! - [`Endpoint`] names the peer and the connect timeout.
//! - [`TrustPolicy`] decides how the peer certificate is judged. It is passed
//!   to every connect call; there is no process-wide trust configuration.
//! - [`TransportProtocol`] selects the TLS versions to offer.
//! - [`Connector`] and [`Channel`] are the seams the session layer is generic
//!   over, so exchanges can be driven by scripted channels in tests.
//! - [`TlsConnector`] is the production connector built on `rustls`.
//!
//! # Invariants
//!
//! - A channel is used for one exchange and closed; [`Channel::close`] is
//!   idempotent and dropping an open channel closes it.
//! - [`TrustPolicy::AcceptAll`] is never a default. It has to be requested
//!   through [`TrustPolicy::accept_all_insecure`].
//!
//! # Errors
//!
//! Every operation returns [`ChannelError`], classified by
//! [`ChannelErrorKind`] into connection, algorithm, timeout and I/O failures.

mod channel;
mod connect;
mod connector;
mod endpoint;
mod error;
mod tls;
mod trust;
mod verifier;

pub use channel::{DEFAULT_READ_DEADLINE, SecureChannel};
pub use connector::{Channel, Connector, TlsConnector};
pub use endpoint::{DEFAULT_CONNECT_TIMEOUT, Endpoint};
pub use error::{ChannelError, ChannelErrorKind};
pub use tls::{TransportProtocol, client_config};
pub use trust::{StorePassword, TrustPolicy, load_trust_store};
