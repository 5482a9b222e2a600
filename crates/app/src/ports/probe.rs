//! Port probe: TCP reachability used by the generic discovery probe.

use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

/// Checks whether something accepts connections at an address.
pub trait PortProbe: Send + Sync {
    /// `true` when a connection to `address` succeeds within `timeout`.
    /// Refusals, unreachable hosts and timeouts are all `false`.
    fn is_open(&self, address: SocketAddr, timeout: Duration)
    -> impl Future<Output = bool> + Send;
}
