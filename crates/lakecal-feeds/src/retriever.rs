//! Feed retrieval through a chain of forwarding proxies.
//!
//! A [`FeedRetriever`] tries every configured proxy in order, then (unless
//! disabled) the feed URL itself. The first attempt that yields a plausible
//! calendar document wins. Attempts that fail are logged and collected, but
//! retrieval as a whole never returns an error.

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use reqwest::Client;
use reqwest::header::ACCEPT;
use serde::Serialize;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::{ProxyEndpoint, RetrieverConfig};
use crate::error::{FeedError, FeedResult};

/// Media types sent with every attempt.
const ACCEPT_FEED: &str = "text/calendar, application/json";

/// A boxed future for async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// How a feed document was obtained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum FetchRoute {
    /// Through the named forwarding proxy.
    Proxy(String),
    /// By requesting the feed URL directly.
    Direct,
}

impl FetchRoute {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Proxy(name) => name,
            Self::Direct => "direct",
        }
    }
}

impl fmt::Display for FetchRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Proxy(name) => write!(f, "proxy {}", name),
            Self::Direct => write!(f, "direct"),
        }
    }
}

/// Outcome of retrieving a feed.
#[derive(Debug)]
pub enum FeedFetch {
    /// The feed URL is absent, blank, a placeholder or not an http(s) URL.
    /// No request was made.
    NotConfigured,
    /// A plausible calendar document was obtained.
    Fetched { body: String, route: FetchRoute },
    /// Every attempt failed. The failures are listed in attempt order.
    Unavailable { failures: Vec<FeedError> },
}

impl FeedFetch {
    pub fn is_fetched(&self) -> bool {
        matches!(self, Self::Fetched { .. })
    }

    /// Returns the document text, if one was obtained.
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Fetched { body, .. } => Some(body),
            _ => None,
        }
    }

    pub fn route(&self) -> Option<&FetchRoute> {
        match self {
            Self::Fetched { route, .. } => Some(route),
            _ => None,
        }
    }
}

/// Something that can obtain the text of a calendar feed.
///
/// Implementations never fail: problems are reported through
/// [`FeedFetch::NotConfigured`] and [`FeedFetch::Unavailable`].
pub trait FeedFetcher: Send + Sync {
    /// Retrieves the document behind `url`.
    fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, FeedFetch>;
}

/// Retrieves feeds over HTTP, proxies first, then directly.
pub struct FeedRetriever {
    client: Client,
    config: RetrieverConfig,
}

impl FeedRetriever {
    /// Creates a retriever with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns a `configuration_error` if a proxy template is unusable or the
    /// HTTP client cannot be built.
    pub fn new(config: RetrieverConfig) -> FeedResult<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| {
                FeedError::configuration(format!("Failed to create HTTP client: {}", e))
                    .with_source(e)
            })?;

        Ok(Self { client, config })
    }

    /// Retrieves the feed at `url`.
    pub async fn retrieve(&self, url: &str) -> FeedFetch {
        let Some(target) = self.check_target(url) else {
            return FeedFetch::NotConfigured;
        };

        let mut failures = Vec::new();

        for proxy in &self.config.proxies {
            debug!(proxy = %proxy.name, "Trying forwarding proxy");
            match self.fetch_via_proxy(proxy, target.as_str()).await {
                Ok(body) => {
                    info!(proxy = %proxy.name, bytes = body.len(), "Fetched calendar feed");
                    return FeedFetch::Fetched {
                        body,
                        route: FetchRoute::Proxy(proxy.name.clone()),
                    };
                }
                Err(e) => {
                    let e = e.with_route(proxy.name.as_str());
                    warn!(error = %e, "Proxy attempt failed");
                    failures.push(e);
                }
            }
        }

        if self.config.direct_fallback {
            debug!("Trying direct request");
            match self.fetch_direct(target).await {
                Ok(body) => {
                    info!(bytes = body.len(), "Fetched calendar feed directly");
                    return FeedFetch::Fetched {
                        body,
                        route: FetchRoute::Direct,
                    };
                }
                Err(e) => {
                    let e = e.with_route(FetchRoute::Direct.as_str());
                    warn!(error = %e, "Direct attempt failed");
                    failures.push(e);
                }
            }
        }

        warn!(attempts = failures.len(), "All feed retrieval attempts failed");
        FeedFetch::Unavailable { failures }
    }

    /// Returns the parsed feed URL, or None if it should not be requested.
    fn check_target(&self, url: &str) -> Option<Url> {
        let url = url.trim();
        if url.is_empty() {
            debug!("No feed URL configured");
            return None;
        }
        if self.config.is_placeholder(url) {
            debug!(url, "Feed URL is a placeholder, skipping");
            return None;
        }

        match Url::parse(url) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Some(parsed),
            Ok(parsed) => {
                warn!(url, scheme = parsed.scheme(), "Unsupported feed URL scheme");
                None
            }
            Err(e) => {
                warn!(url, error = %e, "Invalid feed URL");
                None
            }
        }
    }

    async fn fetch_via_proxy(&self, proxy: &ProxyEndpoint, target: &str) -> FeedResult<String> {
        let request_url = proxy.wrap(target)?;
        let text = self.get_text(request_url).await?;

        let envelope: serde_json::Value = serde_json::from_str(&text).map_err(|e| {
            FeedError::invalid_envelope("response is not JSON").with_source(e)
        })?;
        let Some(object) = envelope.as_object() else {
            return Err(FeedError::invalid_envelope("response is not a JSON object"));
        };

        let payload = object
            .get(&proxy.payload_field)
            .and_then(serde_json::Value::as_str)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| FeedError::missing_payload(&proxy.payload_field))?;

        self.accept_document(payload.to_string())
    }

    async fn fetch_direct(&self, target: Url) -> FeedResult<String> {
        let text = self.get_text(target).await?;
        self.accept_document(text)
    }

    async fn get_text(&self, url: Url) -> FeedResult<String> {
        let response = self
            .client
            .get(url)
            .header(ACCEPT, ACCEPT_FEED)
            .send()
            .await
            .map_err(FeedError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::http_status(status.as_u16()));
        }

        response.text().await.map_err(FeedError::from_transport)
    }

    fn accept_document(&self, body: String) -> FeedResult<String> {
        let min = self.config.min_document_len;
        if body.len() < min {
            return Err(FeedError::document_too_short(body.len(), min));
        }
        Ok(body)
    }
}

impl FeedFetcher for FeedRetriever {
    fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, FeedFetch> {
        Box::pin(self.retrieve(url))
    }
}
