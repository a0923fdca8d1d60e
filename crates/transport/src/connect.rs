use std::io;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use logging::trace_connect;
use socket2::{Domain, Protocol, SockAddr, Socket, Type};

use crate::endpoint::Endpoint;
use crate::error::ChannelError;

/// Resolves the endpoint and returns the first address that accepts a TCP
/// connection within the endpoint's connect timeout.
pub(crate) fn connect_tcp(endpoint: &Endpoint) -> Result<TcpStream, ChannelError> {
    let addresses = resolve(endpoint)?;
    let mut last_error: Option<(SocketAddr, io::Error)> = None;

    for candidate in addresses {
        trace_connect!("connecting to {candidate} for {endpoint}");
        match connect_with_optional_bind(
            candidate,
            endpoint.bind_address(),
            endpoint.connect_timeout(),
        ) {
            Ok(stream) => {
                trace_connect!("connected to {candidate}");
                return Ok(stream);
            }
            Err(error) => {
                trace_connect!("connect to {candidate} failed: {error}");
                last_error = Some((candidate, error));
            }
        }
    }

    Err(match last_error {
        Some((candidate, source)) => ChannelError::Connect {
            address: candidate.to_string(),
            source,
        },
        None => ChannelError::NoAddresses {
            endpoint: endpoint.to_string(),
        },
    })
}

/// Resolves `endpoint` into socket addresses, keeping the family of the bind
/// address when one is configured.
fn resolve(endpoint: &Endpoint) -> Result<Vec<SocketAddr>, ChannelError> {
    let addresses: Vec<SocketAddr> = (endpoint.server_name_host(), endpoint.port())
        .to_socket_addrs()
        .map_err(|source| ChannelError::Resolve {
            endpoint: endpoint.to_string(),
            source,
        })?
        .filter(|candidate| {
            endpoint
                .bind_address()
                .is_none_or(|bind| bind.is_ipv4() == candidate.is_ipv4())
        })
        .collect();

    if addresses.is_empty() {
        return Err(ChannelError::NoAddresses {
            endpoint: endpoint.to_string(),
        });
    }
    Ok(addresses)
}

/// Opens a TCP connection to `target`, binding to `bind_address` first when
/// given. The bind port is forced to `0`.
fn connect_with_optional_bind(
    target: SocketAddr,
    bind_address: Option<SocketAddr>,
    timeout: Duration,
) -> io::Result<TcpStream> {
    let Some(mut bind) = bind_address else {
        return TcpStream::connect_timeout(&target, timeout);
    };

    let domain = if target.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };
    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;
    bind.set_port(0);
    socket.bind(&SockAddr::from(bind))?;
    socket.connect_timeout(&SockAddr::from(target), timeout)?;
    Ok(socket.into())
}
