//! Feed sources and the apartment catalog entries they come from.

use serde::{Deserialize, Serialize};

/// An apartment paired with its external calendar feed.
///
/// A missing or blank `feed_url` means no feed is configured for the
/// apartment, which is a valid state rather than an error.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeedSource {
    /// Identifier of the apartment in the catalog.
    pub apartment_id: String,
    /// Absolute URL of the calendar feed.
    pub feed_url: Option<String>,
}

impl FeedSource {
    /// Creates a source with a feed URL.
    pub fn new(apartment_id: impl Into<String>, feed_url: impl Into<String>) -> Self {
        Self {
            apartment_id: apartment_id.into(),
            feed_url: Some(feed_url.into()),
        }
    }

    /// Creates a source for an apartment without any feed.
    pub fn unconfigured(apartment_id: impl Into<String>) -> Self {
        Self {
            apartment_id: apartment_id.into(),
            feed_url: None,
        }
    }

    /// Returns the trimmed feed URL, or `None` if it is absent or blank.
    pub fn url(&self) -> Option<&str> {
        self.feed_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Returns true if a non-blank feed URL is present.
    pub fn is_configured(&self) -> bool {
        self.url().is_some()
    }
}

/// A rental apartment as listed in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Apartment {
    /// Stable identifier used on the command line and in URLs.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Calendar export URL from the booking platform.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feed_url: Option<String>,
}

impl Apartment {
    /// Returns the feed source for this apartment.
    pub fn feed_source(&self) -> FeedSource {
        FeedSource {
            apartment_id: self.id.clone(),
            feed_url: self.feed_url.clone(),
        }
    }

    /// Returns the display name, falling back to the id.
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}
