use std::io::{self, Read, Write};
use std::net::{Shutdown, TcpStream};
use std::sync::Arc;
use std::time::Duration;

use logging::{trace_exit, trace_io, trace_tls};
use protocol::BurstChannel;
use rustls::crypto::CryptoProvider;
use rustls::pki_types::ServerName;
use rustls::{ClientConnection, StreamOwned};

use crate::connect::connect_tcp;
use crate::endpoint::Endpoint;
use crate::error::ChannelError;
use crate::tls::{TransportProtocol, client_config};
use crate::trust::TrustPolicy;

/// Read deadline applied until [`SecureChannel::set_read_deadline`] is called.
pub const DEFAULT_READ_DEADLINE: Duration = Duration::from_millis(60_000);

type TlsStream = StreamOwned<ClientConnection, TcpStream>;

/// One TLS client session on one TCP socket.
///
/// The handshake completes inside [`open`](Self::open); a returned channel is
/// ready for application data. Reads block for at most the read deadline.
/// [`close`](Self::close) is idempotent and runs on drop.
#[derive(Debug)]
pub struct SecureChannel {
    stream: Option<TlsStream>,
    peer: String,
}

impl SecureChannel {
    /// Connects to `endpoint` with the `ring` crypto provider.
    pub fn open(
        endpoint: &Endpoint,
        policy: &TrustPolicy,
        protocol: TransportProtocol,
    ) -> Result<Self, ChannelError> {
        let provider = Arc::new(rustls::crypto::ring::default_provider());
        Self::open_with(&provider, endpoint, policy, protocol)
    }

    /// Connects to `endpoint` using `provider` for every cryptographic
    /// operation.
    pub fn open_with(
        provider: &Arc<CryptoProvider>,
        endpoint: &Endpoint,
        policy: &TrustPolicy,
        protocol: TransportProtocol,
    ) -> Result<Self, ChannelError> {
        let peer = endpoint.to_string();
        let config = client_config(provider, protocol, policy)?;

        let host = endpoint.server_name_host();
        let server_name =
            ServerName::try_from(host.to_owned()).map_err(|_| ChannelError::InvalidServerName {
                host: host.to_owned(),
            })?;
        let mut conn = ClientConnection::new(config, server_name).map_err(|error| {
            ChannelError::Handshake {
                endpoint: peer.clone(),
                source: io::Error::new(io::ErrorKind::InvalidData, error),
            }
        })?;

        let mut sock = connect_tcp(endpoint)?;
        set_socket_timeouts(&sock, endpoint.connect_timeout())?;

        trace_tls!("starting {protocol} handshake with {peer}");
        while conn.is_handshaking() {
            conn.complete_io(&mut sock)
                .map_err(|source| ChannelError::Handshake {
                    endpoint: peer.clone(),
                    source,
                })?;
        }
        trace_tls!(
            "handshake with {peer} complete: {:?} {:?}",
            conn.protocol_version(),
            conn.negotiated_cipher_suite().map(|suite| suite.suite())
        );

        set_socket_timeouts(&sock, DEFAULT_READ_DEADLINE)?;
        Ok(Self {
            stream: Some(StreamOwned::new(conn, sock)),
            peer,
        })
    }

    /// Returns the `host:port` this channel is connected to.
    pub fn peer(&self) -> &str {
        &self.peer
    }

    /// Reports whether [`close`](Self::close) has not run yet.
    pub const fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    /// Bounds every later read and write by `deadline`.
    ///
    /// A zero deadline is rejected by the operating system.
    pub fn set_read_deadline(&mut self, deadline: Duration) -> Result<(), ChannelError> {
        let stream = self.stream_mut()?;
        set_socket_timeouts(&stream.sock, deadline)
    }

    /// Writes every byte of `bytes` and flushes the TLS records.
    pub fn write(&mut self, bytes: &[u8]) -> Result<(), ChannelError> {
        let stream = self.stream_mut()?;
        stream
            .write_all(bytes)
            .and_then(|()| stream.flush())
            .map_err(|source| ChannelError::io("write to peer", source))?;
        trace_io!("wrote {} bytes", bytes.len());
        Ok(())
    }

    /// Reports how much plaintext can be read without blocking.
    ///
    /// When nothing is buffered, records already waiting on the socket are
    /// pulled in and decrypted until some plaintext is available. The count
    /// never exceeds what rustls holds in its plaintext buffer, so a large
    /// burst is reported in pieces across calls.
    pub fn bytes_available_now(&mut self) -> Result<usize, ChannelError> {
        let stream = self.stream_mut()?;
        let buffered = process_packets(&mut stream.conn)?;
        if buffered > 0 {
            return Ok(buffered);
        }

        stream
            .sock
            .set_nonblocking(true)
            .map_err(|source| ChannelError::io("poll socket", source))?;
        let drained = drain_socket(stream);
        stream
            .sock
            .set_nonblocking(false)
            .map_err(|source| ChannelError::io("poll socket", source))?;
        drained?;

        process_packets(&mut stream.conn)
    }

    /// Reads up to `buf.len()` bytes, blocking until data arrives, the peer
    /// closes, or the read deadline passes.
    ///
    /// Returns `0` once the peer has closed the session.
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize, ChannelError> {
        let stream = self.stream_mut()?;
        match stream.read(buf) {
            Ok(read) => Ok(read),
            Err(error) if error.kind() == io::ErrorKind::UnexpectedEof => {
                trace_io!("peer closed without close_notify");
                Ok(0)
            }
            Err(source) => Err(ChannelError::io("read from peer", source)),
        }
    }

    /// Sends close_notify and shuts the socket down.
    ///
    /// Failures are logged and swallowed. Later calls do nothing.
    pub fn close(&mut self) {
        let Some(mut stream) = self.stream.take() else {
            return;
        };

        stream.conn.send_close_notify();
        while stream.conn.wants_write() {
            match stream.conn.write_tls(&mut stream.sock) {
                Ok(0) => break,
                Ok(_) => {}
                Err(error) => {
                    trace_exit!("close_notify to {} not delivered: {error}", self.peer);
                    break;
                }
            }
        }
        if let Err(error) = stream.sock.shutdown(Shutdown::Both) {
            trace_exit!("shutdown of {} failed: {error}", self.peer);
        }
        trace_exit!("channel to {} closed", self.peer);
    }

    fn stream_mut(&mut self) -> Result<&mut TlsStream, ChannelError> {
        self.stream.as_mut().ok_or(ChannelError::Closed)
    }
}

impl Drop for SecureChannel {
    fn drop(&mut self) {
        self.close();
    }
}

impl BurstChannel for SecureChannel {
    fn bytes_available_now(&mut self) -> io::Result<usize> {
        Self::bytes_available_now(self).map_err(io::Error::from)
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Self::read(self, buf).map_err(io::Error::from)
    }

    fn write_all_and_flush(&mut self, bytes: &[u8]) -> io::Result<()> {
        Self::write(self, bytes).map_err(io::Error::from)
    }
}

fn set_socket_timeouts(sock: &TcpStream, timeout: Duration) -> Result<(), ChannelError> {
    sock.set_read_timeout(Some(timeout))
        .map_err(|source| ChannelError::io("set read deadline", source))?;
    sock.set_write_timeout(Some(timeout))
        .map_err(|source| ChannelError::io("set write deadline", source))
}

/// Decrypts buffered records and returns the plaintext byte count.
fn process_packets(conn: &mut ClientConnection) -> Result<usize, ChannelError> {
    let state = conn.process_new_packets().map_err(|error| {
        ChannelError::io(
            "decrypt records",
            io::Error::new(io::ErrorKind::InvalidData, error),
        )
    })?;
    Ok(state.plaintext_bytes_to_read())
}

/// Pulls records from the non-blocking socket until plaintext is ready.
///
/// rustls refuses `read_tls` once its plaintext buffer is full, so reading
/// stops as soon as anything decrypts or the connection wants no more input.
fn drain_socket(stream: &mut TlsStream) -> Result<(), ChannelError> {
    while stream.conn.wants_read() {
        match stream.conn.read_tls(&mut stream.sock) {
            Ok(0) => return Ok(()),
            Ok(_) => {
                if process_packets(&mut stream.conn)? > 0 {
                    return Ok(());
                }
            }
            Err(error) if error.kind() == io::ErrorKind::WouldBlock => return Ok(()),
            Err(error) if error.kind() == io::ErrorKind::Interrupted => {}
            Err(source) => return Err(ChannelError::Io {
                operation: "poll socket",
                source,
            }),
        }
    }
    Ok(())
}
