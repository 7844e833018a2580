//! Worker id derivation from the host's IPv4 address
//!
//! Uses the low two bytes of the address, so hosts in one /16 get distinct
//! ids. The result can exceed a factory's worker range: validate it with
//! [`crate::Worker::with_factory`].

use std::net::{IpAddr, Ipv4Addr, UdpSocket};

use tracing::debug;

/// Public address used only to select the outbound interface. Connecting a
/// UDP socket sends no packets.
const ROUTE_PROBE: (Ipv4Addr, u16) = (Ipv4Addr::new(8, 8, 8, 8), 80);

/// Worker id from the last two octets of an IPv4 (or IPv4-mapped IPv6)
/// address, `0` for anything else
pub fn worker_id_from_ip(ip: Option<IpAddr>) -> u32 {
    let v4 = match ip {
        Some(IpAddr::V4(v4)) => v4,
        Some(IpAddr::V6(v6)) => match v6.to_ipv4_mapped() {
            Some(v4) => v4,
            None => return 0,
        },
        None => return 0,
    };
    let [_, _, hi, lo] = v4.octets();
    (u32::from(hi) << 8) + u32::from(lo)
}

/// Non-loopback IPv4 address of the interface used for outbound traffic
pub fn local_ipv4() -> Option<Ipv4Addr> {
    let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)).ok()?;
    socket.connect(ROUTE_PROBE).ok()?;
    match socket.local_addr().ok()?.ip() {
        IpAddr::V4(v4) if !v4.is_loopback() && !v4.is_unspecified() => Some(v4),
        _ => None,
    }
}

/// Worker id derived from [`local_ipv4`], `0` when no address is usable
pub fn worker_id_from_local_ip() -> u32 {
    match local_ipv4() {
        Some(v4) => worker_id_from_ip(Some(IpAddr::V4(v4))),
        None => {
            debug!("no usable local ipv4 address, falling back to worker id 0");
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use std::net::Ipv6Addr;

    use super::*;

    #[test]
    fn test_worker_id_from_ip() {
        for (addr, expected) in [
            ("255.255.255.255", 65535),
            ("127.0.0.1", 1),
            ("10.0.3.7", 0x0307),
            ("::ffff:192.168.1.2", 0x0102),
        ] {
            let ip: IpAddr = addr.parse().unwrap();
            assert_eq!(worker_id_from_ip(Some(ip)), expected, "{addr}");
        }
    }

    #[test]
    fn test_worker_id_without_ipv4() {
        assert_eq!(worker_id_from_ip(None), 0);
        assert_eq!(worker_id_from_ip(Some(IpAddr::V6(Ipv6Addr::LOCALHOST))), 0);
    }

    #[test]
    fn test_worker_id_from_local_ip_never_fails() {
        let id = worker_id_from_local_ip();
        assert!(id <= 0xFFFF);
        if let Some(v4) = local_ipv4() {
            assert!(!v4.is_loopback());
            assert_eq!(id, worker_id_from_ip(Some(IpAddr::V4(v4))));
        }
    }
}
