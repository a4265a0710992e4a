//! Client configuration.
//!
//! All settings live in a single `config.toml` file at
//! `~/.config/lakecal/config.toml` by default:
//!
//! ```toml
//! [retriever]
//! timeout_secs = 5
//!
//! [[retriever.proxies]]
//! name = "allorigins"
//! url_template = "https://api.allorigins.win/get?url={url_encoded}"
//!
//! [[apartments]]
//! id = "lakeside"
//! name = "Lakeside Loft"
//! feed_url = "https://www.airbnb.com/calendar/ical/12345.ics?s=abc"
//!
//! [watch]
//! interval_secs = 900
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use lakecal_core::Apartment;
use lakecal_feeds::{ProxyEndpoint, RetrieverConfig};

/// Configuration for the lakecal client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Debug mode.
    pub debug: bool,

    /// Feed retrieval settings.
    pub retriever: RetrieverSettings,

    /// Watch command settings.
    pub watch: WatchSettings,

    /// The apartment catalog.
    pub apartments: Vec<Apartment>,
}

/// Feed retrieval settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrieverSettings {
    /// Timeout for each retrieval attempt, in seconds.
    pub timeout_secs: u64,

    /// Documents shorter than this many bytes are rejected.
    pub min_document_len: usize,

    /// Request the feed URL directly after every proxy failed.
    pub direct_fallback: bool,

    /// Feed URLs containing one of these are treated as not configured.
    pub placeholder_patterns: Vec<String>,

    /// User agent override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,

    /// Forwarding proxies, tried in order.
    pub proxies: Vec<ProxyEndpoint>,
}

impl Default for RetrieverSettings {
    fn default() -> Self {
        let defaults = RetrieverConfig::default();
        Self {
            timeout_secs: RetrieverConfig::DEFAULT_TIMEOUT_SECS,
            min_document_len: defaults.min_document_len,
            direct_fallback: defaults.direct_fallback,
            placeholder_patterns: defaults.placeholder_patterns,
            user_agent: None,
            proxies: defaults.proxies,
        }
    }
}

impl RetrieverSettings {
    /// Converts to retriever configuration.
    pub fn to_retriever_config(&self) -> RetrieverConfig {
        let config = RetrieverConfig::new()
            .with_proxies(self.proxies.clone())
            .with_direct_fallback(self.direct_fallback)
            .with_timeout(Duration::from_secs(self.timeout_secs))
            .with_min_document_len(self.min_document_len)
            .with_placeholder_patterns(self.placeholder_patterns.clone());

        match self.user_agent {
            Some(ref agent) => config.with_user_agent(agent),
            None => config,
        }
    }
}

/// Watch command settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchSettings {
    /// Seconds between scheduled syncs.
    pub interval_secs: u64,
}

impl Default for WatchSettings {
    fn default() -> Self {
        Self { interval_secs: 900 }
    }
}

impl ClientConfig {
    /// Loads configuration from the default path.
    pub fn load() -> Result<Self, String> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read {}: {}", path.display(), e))?;
        toml::from_str(&content)
            .map_err(|e| format!("failed to parse {}: {}", path.display(), e))
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("lakecal")
    }

    /// Looks up an apartment by id.
    pub fn apartment(&self, id: &str) -> Option<&Apartment> {
        self.apartments.iter().find(|apartment| apartment.id == id)
    }

    /// Checks the catalog and retriever settings.
    pub fn validate(&self) -> Result<(), String> {
        let mut seen = HashSet::new();
        for apartment in &self.apartments {
            if apartment.id.trim().is_empty() {
                return Err("apartment id must not be empty".to_string());
            }
            if !seen.insert(apartment.id.as_str()) {
                return Err(format!("duplicate apartment id {:?}", apartment.id));
            }
        }

        if self.retriever.timeout_secs == 0 {
            return Err("retriever.timeout_secs must be greater than zero".to_string());
        }
        if self.retriever.proxies.is_empty() && !self.retriever.direct_fallback {
            return Err(
                "retriever has no proxies and direct_fallback is disabled".to_string(),
            );
        }
        if self.watch.interval_secs == 0 {
            return Err("watch.interval_secs must be greater than zero".to_string());
        }

        self.retriever
            .to_retriever_config()
            .validate()
            .map_err(|e| e.message().to_string())
    }
}
