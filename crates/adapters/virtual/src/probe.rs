//! Virtual port probe.

use std::collections::HashSet;
use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

use hestia_app::ports::PortProbe;

/// Reports a fixed set of sockets as open; everything else is closed.
#[derive(Debug, Default, Clone)]
pub struct VirtualProbe {
    open: HashSet<SocketAddr>,
}

impl VirtualProbe {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_open(mut self, address: SocketAddr) -> Self {
        self.open.insert(address);
        self
    }
}

impl PortProbe for VirtualProbe {
    fn is_open(&self, address: SocketAddr, _timeout: Duration) -> impl Future<Output = bool> + Send {
        let open = self.open.contains(&address);
        async move { open }
    }
}
