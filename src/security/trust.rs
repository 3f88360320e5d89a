//! Origin trust evaluation.
//!
//! # Responsibilities
//! - Resolve trust toggles and the trusted network list once
//! - Classify a remote address as trusted or untrusted
//!
//! # Rule Order
//! ```text
//! trust_all                          → trusted
//! trust_private  && (private|loopback) → trusted
//! trust_localhost && loopback          → trusted
//! address in any explicit network      → trusted
//! otherwise                            → untrusted
//! ```
//!
//! # Design Decisions
//! - Loopback counts as private under the private-network rule
//! - One malformed network entry rejects the whole list
//! - Entries are taken verbatim; surrounding whitespace is malformed
//! - Unspecified or unparseable addresses are never trusted

use std::net::{IpAddr, Ipv6Addr};

use ipnet::IpNet;

use crate::trace::error::InjectorError;

/// `trust_networks` value meaning "trust every origin".
pub const TRUST_EVERYTHING: &str = "*";

/// Immutable set of trust rules.
#[derive(Debug, Clone, Default)]
pub struct TrustPolicy {
    trust_all: bool,
    trust_private: bool,
    trust_localhost: bool,
    networks: Box<[IpNet]>,
}

impl TrustPolicy {
    /// Build a policy from the configured toggles and network list.
    ///
    /// `networks` is either empty, `*`, or a comma-separated list of CIDR
    /// blocks such as `10.0.0.0/8,fd00::/8`.
    pub fn new(
        trust_all: bool,
        trust_private: bool,
        trust_localhost: bool,
        networks: &str,
    ) -> Result<Self, InjectorError> {
        let (trust_all, networks) = if networks == TRUST_EVERYTHING {
            (true, Box::default())
        } else {
            (trust_all, parse_networks(networks)?)
        };

        Ok(Self {
            trust_all,
            trust_private,
            trust_localhost,
            networks,
        })
    }

    /// Trusted networks in configuration order.
    pub fn networks(&self) -> &[IpNet] {
        &self.networks
    }

    pub fn trusts_everything(&self) -> bool {
        self.trust_all
    }

    /// Whether a concrete address is trusted by the configured rules.
    pub fn is_trusted(&self, ip: IpAddr) -> bool {
        let ip = ip.to_canonical();

        if self.trust_all {
            return true;
        }
        if self.trust_private && (is_private(ip) || ip.is_loopback()) {
            return true;
        }
        if self.trust_localhost && ip.is_loopback() {
            return true;
        }
        self.networks.iter().any(|net| net.contains(&ip))
    }

    /// Whether an extracted origin should keep its existing trace ID.
    ///
    /// Absent and unspecified addresses always get a fresh one.
    pub fn admits(&self, ip: Option<IpAddr>) -> bool {
        match ip {
            Some(ip) if !ip.to_canonical().is_unspecified() => self.is_trusted(ip),
            _ => false,
        }
    }
}

fn parse_networks(list: &str) -> Result<Box<[IpNet]>, InjectorError> {
    if list.is_empty() {
        return Ok(Box::default());
    }

    list.split(',')
        .map(|entry| {
            entry
                .parse::<IpNet>()
                .map_err(|e| InjectorError::InvalidNetwork {
                    entry: entry.to_string(),
                    reason: e.to_string(),
                })
        })
        .collect()
}

/// RFC 1918 for IPv4, RFC 4193 unique-local (`fc00::/7`) for IPv6.
fn is_private(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => v4.is_private(),
        IpAddr::V6(v6) => is_unique_local(&v6),
    }
}

fn is_unique_local(ip: &Ipv6Addr) -> bool {
    (ip.segments()[0] & 0xfe00) == 0xfc00
}
