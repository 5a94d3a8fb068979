//! Outbound fetch destination policy.
//!
//! A URL is fetched only when its scheme, host and every resolved address
//! pass this policy. Address checks cover the IPv4-mapped and NAT64 forms of
//! each refused IPv4 range.

use std::collections::BTreeSet;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use url::{Host, Url};

/// Reasons a fetch destination is refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchPolicyError {
    #[error("url is not valid")]
    InvalidUrl,
    #[error("url scheme is not allowed")]
    SchemeNotAllowed,
    #[error("url must not contain credentials")]
    UserinfoNotAllowed,
    #[error("url host is not allowed")]
    HostNotAllowed,
    #[error("destination address is not public")]
    NonPublicAddress,
}

/// Allow-list and scheme rules for `/fetch-url`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchPolicy {
    allowed_hosts: BTreeSet<String>,
    allow_http: bool,
}

/// A URL that passed the static checks and still needs address vetting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTarget {
    url: Url,
    host: String,
    port: u16,
    literal: Option<IpAddr>,
}

impl FetchTarget {
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Host name as written in the URL, lowercased.
    pub fn host(&self) -> &str {
        self.host.as_str()
    }

    /// Effective port, including scheme defaults.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Address when the URL host is an IP literal; no resolution needed.
    pub fn literal(&self) -> Option<IpAddr> {
        self.literal
    }
}

impl FetchPolicy {
    /// Build a policy from allowed host names. Hosts are compared
    /// case-insensitively; an empty list refuses every destination.
    pub fn new<I, S>(allowed_hosts: I, allow_http: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let allowed_hosts = allowed_hosts
            .into_iter()
            .map(|host| host.as_ref().trim().to_ascii_lowercase())
            .filter(|host| !host.is_empty())
            .collect();
        Self {
            allowed_hosts,
            allow_http,
        }
    }

    /// Apply the scheme, credential and allow-list rules.
    ///
    /// # Examples
    /// ```
    /// use bastion::domain::{FetchPolicy, FetchPolicyError};
    ///
    /// let policy = FetchPolicy::new(["api.example.com"], false);
    /// assert!(policy.check("https://api.example.com/v1").is_ok());
    /// assert_eq!(
    ///     policy.check("http://169.254.169.254/latest/meta-data").unwrap_err(),
    ///     FetchPolicyError::SchemeNotAllowed,
    /// );
    /// ```
    pub fn check(&self, raw: &str) -> Result<FetchTarget, FetchPolicyError> {
        let mut url = Url::parse(raw).map_err(|_| FetchPolicyError::InvalidUrl)?;
        match url.scheme() {
            "https" => {}
            "http" if self.allow_http => {}
            _ => return Err(FetchPolicyError::SchemeNotAllowed),
        }
        if !url.username().is_empty() || url.password().is_some() {
            return Err(FetchPolicyError::UserinfoNotAllowed);
        }
        let (host, literal) = match url.host() {
            Some(Host::Domain(domain)) => (
                domain.strip_suffix('.').unwrap_or(domain).to_ascii_lowercase(),
                None,
            ),
            Some(Host::Ipv4(ip)) => (ip.to_string(), Some(IpAddr::V4(ip))),
            Some(Host::Ipv6(ip)) => (ip.to_string(), Some(IpAddr::V6(ip))),
            None => return Err(FetchPolicyError::InvalidUrl),
        };
        if !self.allowed_hosts.contains(&host) {
            return Err(FetchPolicyError::HostNotAllowed);
        }
        // The request must name the same host the resolver override is keyed on.
        if literal.is_none() && url.host_str() != Some(host.as_str()) {
            url.set_host(Some(&host))
                .map_err(|_| FetchPolicyError::InvalidUrl)?;
        }
        if let Some(ip) = literal {
            ensure_public(&[ip])?;
        }
        let port = url
            .port_or_known_default()
            .ok_or(FetchPolicyError::InvalidUrl)?;
        Ok(FetchTarget {
            url,
            host,
            port,
            literal,
        })
    }
}

/// Refuse the destination unless every address is public.
pub fn ensure_public(addrs: &[IpAddr]) -> Result<(), FetchPolicyError> {
    if addrs.is_empty() || !addrs.iter().copied().all(is_public_ip) {
        return Err(FetchPolicyError::NonPublicAddress);
    }
    Ok(())
}

/// Whether `ip` is globally routable for the purposes of outbound fetches.
pub fn is_public_ip(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => is_public_v4(v4),
        IpAddr::V6(v6) => is_public_v6(v6),
    }
}

fn is_public_v4(ip: Ipv4Addr) -> bool {
    let [a, b, c, _] = ip.octets();
    let refused = match a {
        // "this network", RFC 1918, loopback
        0 | 10 | 127 => true,
        // CGNAT
        100 => (64..=127).contains(&b),
        // link-local
        169 => b == 254,
        172 => (16..=31).contains(&b),
        // protocol assignments, TEST-NET-1, RFC 1918
        192 => (b == 0 && (c == 0 || c == 2)) || b == 168,
        // benchmarking, TEST-NET-2
        198 => (18..=19).contains(&b) || (b == 51 && c == 100),
        // TEST-NET-3
        203 => b == 0 && c == 113,
        // multicast, reserved, broadcast
        224..=255 => true,
        _ => false,
    };
    !refused
}

fn is_public_v6(ip: Ipv6Addr) -> bool {
    if let Some(v4) = embedded_v4(ip) {
        return is_public_v4(v4);
    }
    if ip.is_unspecified() || ip.is_loopback() {
        return false;
    }
    let segments = ip.segments();
    let refused = match segments[0] {
        // multicast
        0xff00..=0xffff => true,
        // unique local
        0xfc00..=0xfdff => true,
        // link-local and deprecated site-local
        0xfe80..=0xfeff => true,
        // documentation and IETF special-purpose blocks
        0x2001 => segments[1] == 0x0db8 || segments[1] < 0x0200,
        // discard-only
        0x0100 => segments[1..4] == [0, 0, 0],
        _ => false,
    };
    !refused
}

/// IPv4 address carried inside IPv4-mapped, IPv4-compatible or NAT64 forms.
fn embedded_v4(ip: Ipv6Addr) -> Option<Ipv4Addr> {
    if let Some(v4) = ip.to_ipv4_mapped() {
        return Some(v4);
    }
    let segments = ip.segments();
    let octets = ip.octets();
    let tail = Ipv4Addr::new(octets[12], octets[13], octets[14], octets[15]);
    let nat64 = segments[..6] == [0x0064, 0xff9b, 0, 0, 0, 0];
    let compatible = segments[..6] == [0; 6] && !ip.is_loopback() && !ip.is_unspecified();
    (nat64 || compatible).then_some(tail)
}
