use std::fs;
use std::io::{self, Read, Write};
use std::net::{Ipv4Addr, SocketAddr, TcpListener};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use rustls::pki_types::{CertificateDer, PrivateKeyDer, PrivatePkcs8KeyDer};
use rustls::{ServerConfig, ServerConnection, StreamOwned};

/// Host names and addresses the generated server certificate is valid for.
pub const SERVER_NAMES: [&str; 2] = ["localhost", "127.0.0.1"];

/// Socket timeout on the server side, so a failed client never hangs a test.
const SERVER_IO_TIMEOUT: Duration = Duration::from_secs(10);

/// One step a [`LoopbackTlsServer`] performs after accepting its client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ServerStep {
    /// Read exactly this many bytes from the client.
    Expect(usize),
    /// Write and flush the bytes as their own TLS record.
    Send(Vec<u8>),
    /// Sleep without touching the connection.
    Pause(Duration),
    /// Send close_notify.
    Close,
}

/// A single-connection TLS server on `127.0.0.1` with a fresh self-signed
/// certificate.
///
/// The server thread accepts one client, runs its steps in order and returns
/// everything it read. Handshake failures surface as the thread's error.
#[derive(Debug)]
pub struct LoopbackTlsServer {
    address: SocketAddr,
    certificate_pem: String,
    handle: JoinHandle<io::Result<Vec<u8>>>,
}

impl LoopbackTlsServer {
    /// Binds a listener and starts serving `steps` to the first client.
    pub fn spawn(steps: Vec<ServerStep>) -> io::Result<Self> {
        let names: Vec<String> = SERVER_NAMES.iter().map(|name| (*name).to_owned()).collect();
        let certified = rcgen::generate_simple_self_signed(names).map_err(io::Error::other)?;
        let certificate_pem = certified.cert.pem();
        let key = PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(
            certified.key_pair.serialize_der(),
        ));
        let config = server_config(certified.cert.der().clone(), key)?;

        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0))?;
        let address = listener.local_addr()?;
        let handle = thread::spawn(move || serve(&listener, config, steps));

        Ok(Self {
            address,
            certificate_pem,
            handle,
        })
    }

    /// Port the server listens on.
    pub fn port(&self) -> u16 {
        self.address.port()
    }

    /// Full listening address.
    pub fn address(&self) -> SocketAddr {
        self.address
    }

    /// PEM encoding of the server certificate.
    pub fn certificate_pem(&self) -> &str {
        &self.certificate_pem
    }

    /// Writes the server certificate as a PEM trust store inside `dir`.
    pub fn write_trust_store(&self, dir: &Path) -> io::Result<PathBuf> {
        let path = dir.join("server-ca.pem");
        fs::write(&path, &self.certificate_pem)?;
        Ok(path)
    }

    /// Waits for the server thread and returns the bytes it read.
    pub fn join(self) -> io::Result<Vec<u8>> {
        self.handle
            .join()
            .map_err(|_| io::Error::other("server thread panicked"))?
    }
}

/// Writes a PEM trust store holding a certificate unrelated to any server.
pub fn write_unrelated_trust_store(dir: &Path) -> io::Result<PathBuf> {
    let certified = rcgen::generate_simple_self_signed(vec!["unrelated.invalid".to_owned()])
        .map_err(io::Error::other)?;
    let path = dir.join("unrelated-ca.pem");
    fs::write(&path, certified.cert.pem())?;
    Ok(path)
}

fn server_config(
    certificate: CertificateDer<'static>,
    key: PrivateKeyDer<'static>,
) -> io::Result<Arc<ServerConfig>> {
    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let config = ServerConfig::builder_with_provider(provider)
        .with_protocol_versions(rustls::ALL_VERSIONS)
        .map_err(io::Error::other)?
        .with_no_client_auth()
        .with_single_cert(vec![certificate], key)
        .map_err(io::Error::other)?;
    Ok(Arc::new(config))
}

fn serve(
    listener: &TcpListener,
    config: Arc<ServerConfig>,
    steps: Vec<ServerStep>,
) -> io::Result<Vec<u8>> {
    let (socket, _) = listener.accept()?;
    socket.set_read_timeout(Some(SERVER_IO_TIMEOUT))?;
    socket.set_write_timeout(Some(SERVER_IO_TIMEOUT))?;

    let conn = ServerConnection::new(config).map_err(io::Error::other)?;
    let mut tls = StreamOwned::new(conn, socket);
    while tls.conn.is_handshaking() {
        tls.conn.complete_io(&mut tls.sock)?;
    }

    let mut received = Vec::new();
    for step in steps {
        match step {
            ServerStep::Expect(len) => {
                let mut buf = vec![0u8; len];
                tls.read_exact(&mut buf)?;
                received.extend_from_slice(&buf);
            }
            ServerStep::Send(bytes) => {
                tls.write_all(&bytes)?;
                tls.flush()?;
            }
            ServerStep::Pause(duration) => thread::sleep(duration),
            ServerStep::Close => {
                tls.conn.send_close_notify();
                tls.flush()?;
            }
        }
    }
    Ok(received)
}
