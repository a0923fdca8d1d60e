//! Shared test utilities for the burstlink workspace.
//!
//! - [`ScriptedChannel`] and [`ScriptedConnector`] replay a fixed list of
//!   [`Burst`]s so the response protocol and the session layer can be
//!   exercised without sockets.
//! - [`LoopbackTlsServer`] is a one-shot `rustls` server on `127.0.0.1` with
//!   a freshly generated certificate, for end-to-end channel tests.
//! - [`write_endpoint_file`] and [`endpoint_file`] produce the two-line
//!   host/port file read by the command-line client.

mod files;
mod scripted;
mod server;

pub use files::{endpoint_file, write_endpoint_file};
pub use scripted::{Burst, ChannelLog, ScriptedChannel, ScriptedConnector};
pub use server::{LoopbackTlsServer, SERVER_NAMES, ServerStep, write_unrelated_trust_store};
