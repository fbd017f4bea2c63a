use std::net::{IpAddr, Ipv4Addr, ToSocketAddrs};

use crate::error::TraceError;

/// Resolve a hostname or literal address to the IPv4 address to trace
pub fn resolve_target(host: &str) -> Result<Ipv4Addr, TraceError> {
    let fail = |reason: String| TraceError::Resolution {
        host: host.to_string(),
        reason,
    };

    // Try parsing as IP address first
    if let Ok(ip) = host.parse::<IpAddr>() {
        return match ip {
            IpAddr::V4(v4) => Ok(v4),
            IpAddr::V6(_) => Err(fail("IPv6 targets are not supported".to_string())),
        };
    }

    let addrs = (host, 0)
        .to_socket_addrs()
        .map_err(|e| fail(e.to_string()))?;

    addrs
        .filter_map(|addr| match addr.ip() {
            IpAddr::V4(v4) => Some(v4),
            IpAddr::V6(_) => None,
        })
        .next()
        .ok_or_else(|| fail("No IPv4 addresses found".to_string()))
}
