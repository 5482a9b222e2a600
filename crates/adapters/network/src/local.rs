//! Local address detection.

use std::net::{IpAddr, Ipv4Addr};

use tokio::net::UdpSocket;

/// The IPv4 address of the interface that routes to the wider network.
///
/// Connecting a UDP socket sends nothing; it only asks the OS to pick a
/// route. Returns `None` when there is no such route.
pub async fn local_ipv4() -> Option<Ipv4Addr> {
    let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)).await.ok()?;
    socket.connect((Ipv4Addr::new(8, 8, 8, 8), 80)).await.ok()?;
    match socket.local_addr().ok()?.ip() {
        IpAddr::V4(address) if !address.is_unspecified() => Some(address),
        _ => None,
    }
}

/// First three octets of `address`, the /24 discovery scans.
#[must_use]
pub fn network_base(address: Ipv4Addr) -> [u8; 3] {
    let [a, b, c, _] = address.octets();
    [a, b, c]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_drop_host_octet() {
        assert_eq!(network_base(Ipv4Addr::new(10, 1, 2, 99)), [10, 1, 2]);
    }
}
