//! Upstream host allow-list.

use url::Url;

use crate::relay::error::RelayError;

/// Which upstream hosts the relay may contact.
///
/// An empty list places no restriction on hosts.
#[derive(Debug, Clone, Default)]
pub struct HostPolicy {
    allowed: Vec<String>,
}

impl HostPolicy {
    pub fn new<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            allowed: hosts
                .into_iter()
                .map(|h| h.as_ref().trim().to_ascii_lowercase())
                .filter(|h| !h.is_empty())
                .collect(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.allowed.is_empty()
    }

    /// Reject `url` unless its host is allowed.
    pub fn check(&self, url: &Url) -> Result<(), RelayError> {
        if self.is_open() {
            return Ok(());
        }

        // Url lowercases domain hosts while parsing.
        let host = url.host_str().unwrap_or_default();
        if self.allowed.iter().any(|allowed| allowed == host) {
            Ok(())
        } else {
            Err(RelayError::HostNotAllowed(host.to_string()))
        }
    }
}
