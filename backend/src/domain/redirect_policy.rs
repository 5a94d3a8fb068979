//! Redirect target policy.
//!
//! Same-site paths are always allowed; absolute URLs must use `https` and
//! name a host on the allow-list.

use std::collections::BTreeSet;

use url::Url;

/// Reasons a redirect target is refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RedirectPolicyError {
    #[error("redirect target is not allowed")]
    NotAllowed,
}

/// Allow-list for `/redirect`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RedirectPolicy {
    allowed_hosts: BTreeSet<String>,
}

impl RedirectPolicy {
    pub fn new<I, S>(allowed_hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            allowed_hosts: allowed_hosts
                .into_iter()
                .map(|host| host.as_ref().trim().to_ascii_lowercase())
                .filter(|host| !host.is_empty())
                .collect(),
        }
    }

    /// Return the `Location` value to send, or refuse.
    ///
    /// # Examples
    /// ```
    /// use bastion::domain::RedirectPolicy;
    ///
    /// let policy = RedirectPolicy::new(["docs.example.com"]);
    /// assert_eq!(policy.check("/account").unwrap(), "/account");
    /// assert!(policy.check("//evil.example").is_err());
    /// assert!(policy.check("https://evil.example/").is_err());
    /// ```
    pub fn check(&self, raw: &str) -> Result<String, RedirectPolicyError> {
        if raw.chars().any(|ch| ch.is_control() || ch == '\\') {
            return Err(RedirectPolicyError::NotAllowed);
        }
        if raw.starts_with('/') {
            if raw.starts_with("//") {
                return Err(RedirectPolicyError::NotAllowed);
            }
            return Ok(raw.to_owned());
        }
        let url = Url::parse(raw).map_err(|_| RedirectPolicyError::NotAllowed)?;
        let host_allowed = url
            .host_str()
            .is_some_and(|host| self.allowed_hosts.contains(&host.to_ascii_lowercase()));
        if url.scheme() != "https" || !url.username().is_empty() || !host_allowed {
            return Err(RedirectPolicyError::NotAllowed);
        }
        Ok(url.into())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn policy() -> RedirectPolicy {
        RedirectPolicy::new(["docs.example.com"])
    }

    #[rstest]
    #[case("/", "/")]
    #[case("/products?page=2", "/products?page=2")]
    #[case("https://docs.example.com/guide", "https://docs.example.com/guide")]
    #[case("https://DOCS.example.com/", "https://docs.example.com/")]
    fn allows_local_paths_and_listed_hosts(
        policy: RedirectPolicy,
        #[case] raw: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(policy.check(raw).expect("allowed"), expected);
    }

    #[rstest]
    #[case("//evil.example/")]
    #[case("/\\evil.example")]
    #[case("https://evil.example/")]
    #[case("http://docs.example.com/")]
    #[case("javascript:alert(1)")]
    #[case("https://user@docs.example.com/")]
    #[case("/ok\r\nSet-Cookie: x=1")]
    #[case("relative/path")]
    #[case("")]
    fn refuses_everything_else(policy: RedirectPolicy, #[case] raw: &str) {
        assert_eq!(
            policy.check(raw).expect_err("refused"),
            RedirectPolicyError::NotAllowed
        );
    }
}
