//! Main RapidDNS API client implementation.

use crate::api::{ExportApi, SearchApi};
use crate::config::PollConfig;
use rapiddns_core::envelope::{self, Payload, StatusRule};
use rapiddns_core::{RapidDnsError, Result};
use reqwest::Client as HttpClient;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use url::Url;

/// The RapidDNS API base URL
pub const DEFAULT_BASE_URL: &str = "https://rapiddns.io/api";

/// Default request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Header carrying the API key
const API_KEY_HEADER: &str = "X-API-KEY";

/// Main RapidDNS API client
#[derive(Clone)]
pub struct RapidDnsClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: HttpClient,
    api_key: Option<String>,
    base_url: String,
    timeout: Duration,
    poll: PollConfig,
}

impl RapidDnsClient {
    /// Create a new client using default settings.
    ///
    /// Searches work without a key but may return limited results; exports need one.
    pub fn new(api_key: Option<String>) -> Result<Self> {
        RapidDnsClientBuilder::new(api_key).build()
    }

    /// Create a builder for custom configuration
    #[must_use]
    pub fn builder(api_key: Option<String>) -> RapidDnsClientBuilder {
        RapidDnsClientBuilder::new(api_key)
    }

    /// Access search and advanced-query endpoints
    #[must_use]
    pub fn search(&self) -> SearchApi<'_> {
        SearchApi::new(self)
    }

    /// Access bulk export endpoints
    #[must_use]
    pub fn export(&self) -> ExportApi<'_> {
        ExportApi::new(self)
    }

    /// Whether an API key is configured
    #[must_use]
    pub fn has_api_key(&self) -> bool {
        self.inner.api_key.is_some()
    }

    /// Polling configuration used by export workflows
    #[must_use]
    pub fn poll_config(&self) -> &PollConfig {
        &self.inner.poll
    }

    /// Perform a GET request and decode the envelope
    pub(crate) async fn get<P: Payload>(
        &self,
        path: &[&str],
        params: &[(&str, String)],
        rule: StatusRule,
    ) -> Result<P> {
        let url = self.build_url(path, params)?;
        debug!(url = %url, "GET request");

        let response = self
            .authorized(self.inner.http.get(url))
            .timeout(self.inner.timeout)
            .send()
            .await
            .map_err(|e| RapidDnsError::Http(e.to_string()))?;

        Self::handle_response(response, rule).await
    }

    /// Perform a POST request with JSON body and decode the envelope
    pub(crate) async fn post<P: Payload, B: serde::Serialize + Sync>(
        &self,
        path: &[&str],
        body: &B,
        rule: StatusRule,
    ) -> Result<P> {
        let url = self.build_url(path, &[])?;
        debug!(url = %url, "POST request");

        let response = self
            .authorized(self.inner.http.post(url))
            .timeout(self.inner.timeout)
            .json(body)
            .send()
            .await
            .map_err(|e| RapidDnsError::Http(e.to_string()))?;

        Self::handle_response(response, rule).await
    }

    /// Stream a file to `dest`, returning the number of bytes written.
    ///
    /// Relative URLs are resolved against the base URL. The API key is not
    /// sent, since download links may point at a different host. A partially
    /// written file is removed on failure. There is no total deadline; only
    /// a stalled connection times out.
    pub(crate) async fn download_to(&self, url: &str, dest: &Path) -> Result<u64> {
        let url = self.resolve(url)?;
        debug!(url = %url, dest = %dest.display(), "download");

        let mut response = self
            .inner
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| RapidDnsError::Http(e.to_string()))?;

        let status = response.status().as_u16();
        match status {
            401 | 403 => return Err(RapidDnsError::Auth { status }),
            400..=599 => return Err(RapidDnsError::Transport { status }),
            _ => {}
        }

        let mut file = tokio::fs::File::create(dest).await?;
        let copied: Result<u64> = async {
            let mut written = 0u64;
            while let Some(chunk) = response
                .chunk()
                .await
                .map_err(|e| RapidDnsError::Http(e.to_string()))?
            {
                file.write_all(&chunk).await?;
                written += chunk.len() as u64;
            }
            file.flush().await?;
            Ok(written)
        }
        .await;
        drop(file);

        if copied.is_err() {
            if let Err(e) = tokio::fs::remove_file(dest).await {
                warn!(path = %dest.display(), error = %e, "failed to remove partial download");
            }
        }
        copied
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.inner.api_key {
            Some(key) => request.header(API_KEY_HEADER, key),
            None => request,
        }
    }

    /// Build an endpoint URL from raw path segments and query parameters.
    ///
    /// Segments are inserted verbatim apart from the characters that would
    /// end the path; CIDR keywords keep their slash.
    fn build_url(&self, path: &[&str], params: &[(&str, String)]) -> Result<Url> {
        let mut raw = self.inner.base_url.clone();
        for segment in path {
            raw.push('/');
            raw.push_str(&escape_segment(segment));
        }

        let mut url = Url::parse(&raw).map_err(|e| RapidDnsError::InvalidUrl(format!("{raw}: {e}")))?;
        if !params.is_empty() {
            let mut query = url.query_pairs_mut();
            for (key, value) in params {
                query.append_pair(key, value);
            }
        }
        Ok(url)
    }

    fn resolve(&self, url: &str) -> Result<Url> {
        match Url::parse(url) {
            Ok(url) => Ok(url),
            Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse(&self.inner.base_url)
                .and_then(|base| base.join(url))
                .map_err(|e| RapidDnsError::InvalidUrl(format!("{url}: {e}"))),
            Err(e) => Err(RapidDnsError::InvalidUrl(format!("{url}: {e}"))),
        }
    }

    async fn handle_response<P: Payload>(response: reqwest::Response, rule: StatusRule) -> Result<P> {
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| RapidDnsError::Http(e.to_string()))?;
        debug!(status, bytes = body.len(), "response received");

        envelope::decode(status, &body, rule)
    }
}

/// Builder for configuring a [`RapidDnsClient`]
pub struct RapidDnsClientBuilder {
    api_key: Option<String>,
    base_url: String,
    timeout: Duration,
    user_agent: String,
    poll: PollConfig,
}

impl RapidDnsClientBuilder {
    /// Create a new builder with an optional API key
    #[must_use]
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key: api_key.filter(|k| !k.is_empty()),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("rapiddns-rs/{}", env!("CARGO_PKG_VERSION")),
            poll: PollConfig::default(),
        }
    }

    /// Set the base URL (useful for testing)
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the timeout for API calls.
    ///
    /// Also bounds connecting and each read of a download, but not the
    /// download as a whole.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the User-Agent header
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Set export polling configuration
    #[must_use]
    pub fn poll(mut self, config: PollConfig) -> Self {
        self.poll = config;
        self
    }

    /// Build the client
    pub fn build(self) -> Result<RapidDnsClient> {
        let base_url = self.base_url.trim_end_matches('/').to_string();
        Url::parse(&base_url).map_err(|e| RapidDnsError::InvalidUrl(format!("{base_url}: {e}")))?;

        let http = HttpClient::builder()
            .connect_timeout(self.timeout)
            .read_timeout(self.timeout)
            .user_agent(&self.user_agent)
            .gzip(true)
            .build()
            .map_err(|e| RapidDnsError::Http(e.to_string()))?;

        Ok(RapidDnsClient {
            inner: Arc::new(ClientInner {
                http,
                api_key: self.api_key,
                base_url,
                timeout: self.timeout,
                poll: self.poll,
            }),
        })
    }
}

// Percent-encode only what would terminate or corrupt a path segment
fn escape_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for c in segment.chars() {
        match c {
            '%' => out.push_str("%25"),
            '?' => out.push_str("%3F"),
            '#' => out.push_str("%23"),
            _ => out.push(c),
        }
    }
    out
}
