//! Remote address extraction.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Parse the IP out of a connection origin such as `1.2.3.4:5678`.
///
/// An empty origin yields `0.0.0.0` so that callers treat it as unspecified.
/// An origin containing a colon must be `host:port` or `[host]:port`; a bare
/// IPv6 literal such as `::1` has no port to split off and yields `None`.
/// Anything that does not contain an IP literal yields `None`.
pub fn extract_remote_ip(origin: &str) -> Option<IpAddr> {
    if origin.is_empty() {
        return Some(IpAddr::V4(Ipv4Addr::UNSPECIFIED));
    }
    if !origin.contains(':') {
        return origin.parse().ok();
    }
    if let Ok(addr) = origin.parse::<SocketAddr>() {
        return Some(addr.ip());
    }

    // host:port with a port that is not numeric
    let (host, _port) = split_host_port(origin)?;
    host.parse().ok()
}

/// Split `host:port` or `[host]:port`. A colon in an unbracketed host is
/// ambiguous and rejected.
fn split_host_port(origin: &str) -> Option<(&str, &str)> {
    if let Some(rest) = origin.strip_prefix('[') {
        let (host, after) = rest.split_once(']')?;
        let port = after.strip_prefix(':')?;
        return Some((host, port));
    }

    let (host, port) = origin.rsplit_once(':')?;
    if host.contains(':') || host.contains('[') || host.contains(']') {
        return None;
    }
    Some((host, port))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extracted(origin: &str) -> Option<String> {
        extract_remote_ip(origin).map(|ip| ip.to_string())
    }

    #[test]
    fn test_empty_origin_is_unspecified() {
        assert_eq!(extracted("").as_deref(), Some("0.0.0.0"));
    }

    #[test]
    fn test_plain_and_port_forms() {
        assert_eq!(extracted("1.2.3.4").as_deref(), Some("1.2.3.4"));
        assert_eq!(extracted("1.2.3.4:5678").as_deref(), Some("1.2.3.4"));
        assert_eq!(extracted("[::1]:8080").as_deref(), Some("::1"));
        assert_eq!(extracted("1.2.3.4:http").as_deref(), Some("1.2.3.4"));
        assert_eq!(extracted("[fc00::1]:x").as_deref(), Some("fc00::1"));
    }

    #[test]
    fn test_garbage_is_none() {
        assert_eq!(extracted("localhost"), None);
        assert_eq!(extracted("localhost:8080"), None);
        assert_eq!(extracted("[::1]"), None);
        assert_eq!(extracted("1.2.3"), None);
    }

    #[test]
    fn test_bare_ipv6_without_port_is_none() {
        assert_eq!(extracted("::1"), None);
        assert_eq!(extracted("fe80::1:2"), None);
        assert_eq!(extracted("2001:db8::7"), None);
        assert_eq!(extracted("[::1]:"), Some("::1".to_string()));
        assert_eq!(extracted("1.2.3.4:"), Some("1.2.3.4".to_string()));
    }
}
