//! Retriever configuration: the forwarding proxy chain and its limits.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{FeedError, FeedResult};

/// Placeholder for the target URL inserted verbatim.
const RAW_PLACEHOLDER: &str = "{url}";
/// Placeholder for the target URL percent-encoded as a query value.
const ENCODED_PLACEHOLDER: &str = "{url_encoded}";

fn default_payload_field() -> String {
    "contents".to_string()
}

/// A public forwarding service that fetches the feed on our behalf.
///
/// The service answers with a JSON envelope whose `payload_field` holds the
/// raw feed body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyEndpoint {
    /// Short name used in logs and diagnostics.
    pub name: String,
    /// URL with a `{url}` or `{url_encoded}` placeholder for the feed URL.
    pub url_template: String,
    /// Envelope field holding the feed body.
    #[serde(default = "default_payload_field")]
    pub payload_field: String,
}

impl ProxyEndpoint {
    pub fn new(name: impl Into<String>, url_template: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url_template: url_template.into(),
            payload_field: default_payload_field(),
        }
    }

    pub fn with_payload_field(mut self, field: impl Into<String>) -> Self {
        self.payload_field = field.into();
        self
    }

    /// Returns true if the template contains a target placeholder.
    pub fn has_placeholder(&self) -> bool {
        self.url_template.contains(RAW_PLACEHOLDER) || self.url_template.contains(ENCODED_PLACEHOLDER)
    }

    /// Builds the proxy request URL for `target`.
    ///
    /// # Errors
    ///
    /// Returns an `invalid_url` error if the template has no placeholder or
    /// the result does not parse.
    pub fn wrap(&self, target: &str) -> FeedResult<Url> {
        if !self.has_placeholder() {
            return Err(FeedError::invalid_url(format!(
                "proxy template {:?} has no {} or {} placeholder",
                self.url_template, RAW_PLACEHOLDER, ENCODED_PLACEHOLDER
            )));
        }

        let wrapped = self
            .url_template
            .replace(ENCODED_PLACEHOLDER, &urlencoding::encode(target))
            .replace(RAW_PLACEHOLDER, target);

        Url::parse(&wrapped).map_err(|e| {
            FeedError::invalid_url(format!("proxy URL {:?} is invalid", wrapped)).with_source(e)
        })
    }

    /// The public services tried by default, in order.
    pub fn default_chain() -> Vec<Self> {
        vec![
            Self::new("allorigins", "https://api.allorigins.win/get?url={url_encoded}"),
            Self::new("cors-anywhere", "https://cors-anywhere.herokuapp.com/{url}"),
            Self::new("thingproxy", "https://thingproxy.freeboard.io/fetch/{url}"),
        ]
    }
}

/// Configuration for the feed retriever.
#[derive(Debug, Clone)]
pub struct RetrieverConfig {
    /// Forwarding services, tried in order.
    pub proxies: Vec<ProxyEndpoint>,
    /// Whether to request the feed URL directly after every proxy failed.
    pub direct_fallback: bool,
    /// Timeout for each individual attempt.
    pub timeout: Duration,
    /// Payloads shorter than this are not accepted as calendar documents.
    pub min_document_len: usize,
    /// Substrings marking a feed URL as a placeholder.
    pub placeholder_patterns: Vec<String>,
    pub user_agent: String,
}

impl Default for RetrieverConfig {
    fn default() -> Self {
        Self {
            proxies: ProxyEndpoint::default_chain(),
            direct_fallback: true,
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
            min_document_len: Self::DEFAULT_MIN_DOCUMENT_LEN,
            placeholder_patterns: vec!["example.ics".to_string()],
            user_agent: format!("lakecal/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl RetrieverConfig {
    pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

    pub const DEFAULT_MIN_DOCUMENT_LEN: usize = 100;

    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the proxy chain.
    pub fn with_proxies(mut self, proxies: Vec<ProxyEndpoint>) -> Self {
        self.proxies = proxies;
        self
    }

    pub fn with_direct_fallback(mut self, enabled: bool) -> Self {
        self.direct_fallback = enabled;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_min_document_len(mut self, len: usize) -> Self {
        self.min_document_len = len;
        self
    }

    pub fn with_placeholder_patterns(mut self, patterns: Vec<String>) -> Self {
        self.placeholder_patterns = patterns;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Returns true if `url` matches one of the placeholder patterns.
    pub fn is_placeholder(&self, url: &str) -> bool {
        self.placeholder_patterns
            .iter()
            .filter(|pattern| !pattern.is_empty())
            .any(|pattern| url.contains(pattern.as_str()))
    }

    /// Checks that every proxy template can wrap a URL.
    ///
    /// # Errors
    ///
    /// Returns a `configuration_error` naming the first broken proxy.
    pub fn validate(&self) -> FeedResult<()> {
        for proxy in &self.proxies {
            if proxy.name.trim().is_empty() {
                return Err(FeedError::configuration("proxy name must not be empty"));
            }
            if proxy.payload_field.trim().is_empty() {
                return Err(FeedError::configuration(format!(
                    "proxy {} has an empty payload field",
                    proxy.name
                )));
            }
            proxy.wrap("https://calendar.invalid/feed.ics").map_err(|e| {
                FeedError::configuration(format!("proxy {}: {}", proxy.name, e.message()))
            })?;
        }
        Ok(())
    }
}
