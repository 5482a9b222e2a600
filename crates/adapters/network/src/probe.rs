//! TCP port probe.

use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::TcpStream;

use hestia_app::ports::PortProbe;

/// Probes by opening (and immediately dropping) a TCP connection.
#[derive(Debug, Default, Clone, Copy)]
pub struct TcpProbe;

impl PortProbe for TcpProbe {
    fn is_open(&self, address: SocketAddr, timeout: Duration) -> impl Future<Output = bool> + Send {
        async move {
            match tokio::time::timeout(timeout, TcpStream::connect(address)).await {
                Ok(Ok(_stream)) => true,
                Ok(Err(err)) => {
                    tracing::trace!(%address, error = %err, "port closed");
                    false
                }
                Err(_) => {
                    tracing::trace!(%address, "connect timed out");
                    false
                }
            }
        }
    }
}
