//! Outbound HTTP client used to fetch images.

use std::time::Duration;

use reqwest::{redirect, Client, Response};
use url::Url;

use crate::config::RelaySettings;

/// Pooled client shared by all relay requests.
///
/// Cloning is cheap; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: Client,
}

impl UpstreamClient {
    /// Build a client with the relay's total timeout, User-Agent and
    /// redirect limit.
    pub fn new(settings: &RelaySettings) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder()
            .timeout(Duration::from_secs(settings.upstream_timeout_secs))
            .user_agent(settings.user_agent.clone())
            .redirect(redirect::Policy::limited(settings.max_redirects));

        if !settings.use_system_proxy {
            builder = builder.no_proxy();
        }

        let client = builder.build()?;

        Ok(Self { client })
    }

    /// Issue a GET for `url` and return once response headers arrive.
    ///
    /// The timeout keeps running while the body is read. Dropping the
    /// returned future or response aborts the transfer.
    pub async fn fetch(&self, url: &Url) -> Result<Response, reqwest::Error> {
        self.client.get(url.clone()).send().await
    }
}
