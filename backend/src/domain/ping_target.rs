//! Ping destinations.
//!
//! A [`PingTarget`] is either an IP literal or an RFC 1123 hostname. Parsing
//! happens before any subprocess exists, so shell metacharacters never reach
//! the command runner.

use std::fmt;
use std::net::IpAddr;

/// Maximum total hostname length.
pub const HOSTNAME_MAX: usize = 253;
/// Maximum length of a single hostname label.
pub const LABEL_MAX: usize = 63;

/// Reasons a ping destination is refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PingTargetError {
    #[error("host must not be empty")]
    Empty,
    #[error("host must be at most {max} characters")]
    TooLong { max: usize },
    #[error("host must be an IP address or a hostname")]
    Malformed,
}

/// Validated ping destination.
///
/// # Examples
/// ```
/// use bastion::domain::PingTarget;
///
/// assert!(PingTarget::parse("example.com").is_ok());
/// assert!(PingTarget::parse("::1").is_ok());
/// assert!(PingTarget::parse("127.0.0.1; rm -rf /").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PingTarget {
    Ip(IpAddr),
    Hostname(String),
}

impl PingTarget {
    pub fn parse(raw: &str) -> Result<Self, PingTargetError> {
        if raw.is_empty() {
            return Err(PingTargetError::Empty);
        }
        if raw.len() > HOSTNAME_MAX {
            return Err(PingTargetError::TooLong { max: HOSTNAME_MAX });
        }
        if let Ok(ip) = raw.parse::<IpAddr>() {
            return Ok(Self::Ip(ip));
        }
        let host = raw.strip_suffix('.').unwrap_or(raw);
        if host.is_empty() || !host.split('.').all(is_valid_label) {
            return Err(PingTargetError::Malformed);
        }
        // An all-numeric dotted name that failed IP parsing is not a hostname.
        if host.split('.').all(|label| label.bytes().all(|b| b.is_ascii_digit())) {
            return Err(PingTargetError::Malformed);
        }
        Ok(Self::Hostname(host.to_ascii_lowercase()))
    }
}

fn is_valid_label(label: &str) -> bool {
    !label.is_empty()
        && label.len() <= LABEL_MAX
        && !label.starts_with('-')
        && !label.ends_with('-')
        && label.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
}

impl fmt::Display for PingTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ip(ip) => write!(f, "{ip}"),
            Self::Hostname(host) => f.write_str(host),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("8.8.8.8")]
    #[case("2001:4860:4860::8888")]
    #[case("example.com")]
    #[case("EXAMPLE.com.")]
    #[case("a-b.c-d.example")]
    #[case("localhost")]
    fn accepts_addresses_and_hostnames(#[case] raw: &str) {
        assert!(PingTarget::parse(raw).is_ok(), "{raw} should be accepted");
    }

    #[rstest]
    #[case("127.0.0.1; rm -rf /")]
    #[case("example.com && cat /etc/passwd")]
    #[case("$(whoami)")]
    #[case("`id`")]
    #[case("host|nc")]
    #[case("-c 100 example.com")]
    #[case("-example.com")]
    #[case("example-.com")]
    #[case("exa mple.com")]
    #[case("a..b")]
    #[case("999.1.1.1")]
    #[case("example.com\n")]
    fn rejects_metacharacters_and_malformed_names(#[case] raw: &str) {
        assert_eq!(
            PingTarget::parse(raw).expect_err("must be refused"),
            PingTargetError::Malformed
        );
    }

    #[rstest]
    fn rejects_empty_and_overlong() {
        assert_eq!(PingTarget::parse(""), Err(PingTargetError::Empty));
        let long = format!("{}.com", "a".repeat(HOSTNAME_MAX));
        assert_eq!(
            PingTarget::parse(&long),
            Err(PingTargetError::TooLong { max: HOSTNAME_MAX })
        );
    }

    #[rstest]
    #[case("a".repeat(LABEL_MAX), true)]
    #[case("a".repeat(LABEL_MAX + 1), false)]
    fn enforces_label_length(#[case] label: String, #[case] ok: bool) {
        let host = format!("{label}.example");
        assert_eq!(PingTarget::parse(&host).is_ok(), ok);
    }

    #[rstest]
    fn hostnames_are_lowercased_without_trailing_dot() {
        let target = PingTarget::parse("EXAMPLE.com.").expect("valid");
        assert_eq!(target.to_string(), "example.com");
    }
}
