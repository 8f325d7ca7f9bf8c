//! Response metadata shared by every API call.
//!
//! A [`Response`] is produced by the transport for each completed HTTP exchange and
//! returned to the caller next to the decoded payload. Pagination [`Links`] are filled
//! in afterwards by the envelope decoder when the body carries a `links` block.

use chrono::{DateTime, Utc};
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};

/// Header carrying the request quota for the current window.
pub const HEADER_RATE_LIMIT: &str = "ratelimit-limit";
/// Header carrying the remaining requests in the current window.
pub const HEADER_RATE_REMAINING: &str = "ratelimit-remaining";
/// Header carrying the window reset time as a UNIX timestamp.
pub const HEADER_RATE_RESET: &str = "ratelimit-reset";

/// Metadata for a completed API call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// HTTP status code
    pub status: StatusCode,
    /// Rate limit state reported by the API, when the headers were present
    pub rate: Option<Rate>,
    /// Pagination links copied from the response envelope
    pub links: Option<Links>,
}

impl Response {
    /// Metadata with only a status code.
    #[must_use]
    pub const fn new(status: StatusCode) -> Self {
        Self {
            status,
            rate: None,
            links: None,
        }
    }

    /// Build metadata from a status code and the response headers.
    #[must_use]
    pub fn from_headers(status: StatusCode, headers: &HeaderMap) -> Self {
        Self {
            status,
            rate: Rate::from_headers(headers),
            links: None,
        }
    }

    /// Whether the call returned a further page of results.
    #[must_use]
    pub fn has_next_page(&self) -> bool {
        self.links
            .as_ref()
            .and_then(|links| links.pages.as_ref())
            .is_some_and(|pages| pages.next.is_some())
    }
}

/// Rate limit state for the current token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rate {
    /// Requests allowed per window
    pub limit: u32,
    /// Requests left in the window
    pub remaining: u32,
    /// When the window resets
    pub reset: Option<DateTime<Utc>>,
}

impl Rate {
    /// Parse the `RateLimit-*` headers. Returns `None` unless limit and remaining are present.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let number = |name: &str| {
            headers
                .get(name)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.trim().parse::<i64>().ok())
        };

        let limit = u32::try_from(number(HEADER_RATE_LIMIT)?).ok()?;
        let remaining = u32::try_from(number(HEADER_RATE_REMAINING)?).ok()?;
        let reset = number(HEADER_RATE_RESET).and_then(|secs| DateTime::from_timestamp(secs, 0));

        Some(Self {
            limit,
            remaining,
            reset,
        })
    }
}

/// Pagination block attached to collection envelopes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Links {
    /// Page navigation URLs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<Pages>,
    /// Actions linked to the returned resource (e.g. the create action of a droplet)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<LinkAction>,
}

impl Links {
    /// Page number of the response these links came with.
    ///
    /// Derived from the `prev` URL when present; a response without a `prev` link is
    /// the first page.
    ///
    /// # Errors
    ///
    /// Returns an error if the `prev` URL cannot be parsed.
    pub fn current_page(&self) -> Result<u32> {
        match self.pages.as_ref().and_then(|pages| pages.prev.as_deref()) {
            Some(prev) => page_for_url(prev)?.checked_add(1).ok_or_else(|| {
                Error::InvalidEndpoint(format!("Page number out of range in `{prev}`"))
            }),
            None => Ok(1),
        }
    }

    /// Whether there are no further pages.
    #[must_use]
    pub fn is_last_page(&self) -> bool {
        self.pages.as_ref().map_or(true, |pages| pages.last.is_none())
    }
}

/// Navigation URLs between pages of a collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pages {
    /// First page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first: Option<String>,
    /// Previous page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev: Option<String>,
    /// Next page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    /// Last page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last: Option<String>,
}

/// Reference to an action related to the returned resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkAction {
    /// Action id
    #[serde(default)]
    pub id: u64,
    /// Relation name (e.g. `create`)
    #[serde(default)]
    pub rel: String,
    /// Canonical action URI
    #[serde(default)]
    pub href: String,
}

fn page_for_url(raw: &str) -> Result<u32> {
    let url = Url::parse(raw)?;
    let page = url
        .query_pairs()
        .find(|(key, _)| key == "page")
        .map_or(Ok(1), |(_, value)| value.parse::<u32>())
        .map_err(|err| Error::InvalidEndpoint(format!("Invalid page in `{raw}`: {err}")))?;
    Ok(page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn pages(prev: Option<&str>, next: Option<&str>, last: Option<&str>) -> Links {
        Links {
            pages: Some(Pages {
                first: None,
                prev: prev.map(str::to_string),
                next: next.map(str::to_string),
                last: last.map(str::to_string),
            }),
            actions: Vec::new(),
        }
    }

    #[test]
    fn test_rate_from_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(HEADER_RATE_LIMIT, HeaderValue::from_static("5000"));
        headers.insert(HEADER_RATE_REMAINING, HeaderValue::from_static("4817"));
        headers.insert(HEADER_RATE_RESET, HeaderValue::from_static("1415984218"));

        let rate = Rate::from_headers(&headers).unwrap();
        assert_eq!(rate.limit, 5000);
        assert_eq!(rate.remaining, 4817);
        assert_eq!(rate.reset.map(|t| t.timestamp()), Some(1_415_984_218));
    }

    #[test]
    fn test_rate_requires_limit_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(HEADER_RATE_RESET, HeaderValue::from_static("1415984218"));
        assert!(Rate::from_headers(&headers).is_none());
    }

    #[test]
    fn test_response_from_headers_has_no_links() {
        let response = Response::from_headers(StatusCode::OK, &HeaderMap::new());
        assert_eq!(response.status, StatusCode::OK);
        assert!(response.rate.is_none());
        assert!(response.links.is_none());
        assert!(!response.has_next_page());
    }

    #[test]
    fn test_current_page() {
        let first = pages(None, Some("https://api.digitalocean.com/v2/droplets?page=2"), None);
        assert_eq!(first.current_page().unwrap(), 1);

        let middle = pages(
            Some("https://api.digitalocean.com/v2/droplets?page=2&per_page=1"),
            Some("https://api.digitalocean.com/v2/droplets?page=4&per_page=1"),
            Some("https://api.digitalocean.com/v2/droplets?page=7&per_page=1"),
        );
        assert_eq!(middle.current_page().unwrap(), 3);

        let no_page_param = pages(Some("https://api.digitalocean.com/v2/droplets"), None, None);
        assert_eq!(no_page_param.current_page().unwrap(), 2);

        assert_eq!(Links::default().current_page().unwrap(), 1);
    }

    #[test]
    fn test_current_page_rejects_bad_urls() {
        let links = pages(Some("::not a url::"), None, None);
        assert!(matches!(links.current_page(), Err(Error::InvalidEndpoint(_))));

        let links = pages(Some("https://api.digitalocean.com/v2/droplets?page=two"), None, None);
        assert!(links.current_page().is_err());
    }

    #[test]
    fn test_current_page_after_last_representable_page() {
        let links = pages(
            Some("https://api.digitalocean.com/v2/droplets?page=4294967295"),
            None,
            None,
        );
        assert!(matches!(links.current_page(), Err(Error::InvalidEndpoint(_))));

        let links = pages(
            Some("https://api.digitalocean.com/v2/droplets?page=4294967294"),
            None,
            None,
        );
        assert_eq!(links.current_page().unwrap(), u32::MAX);
    }

    #[test]
    fn test_is_last_page() {
        assert!(Links::default().is_last_page());
        assert!(pages(Some("https://x/?page=1"), None, None).is_last_page());
        assert!(!pages(None, Some("https://x/?page=2"), Some("https://x/?page=3")).is_last_page());
    }

    #[test]
    fn test_links_deserialize() {
        let links: Links = serde_json::from_str(
            r#"{"pages":{"next":"https://api.digitalocean.com/v2/droplets?page=2"},
                "actions":[{"id":36804636,"rel":"create","href":"https://api.digitalocean.com/v2/actions/36804636"}]}"#,
        )
        .unwrap();

        assert_eq!(
            links.pages.as_ref().and_then(|p| p.next.as_deref()),
            Some("https://api.digitalocean.com/v2/droplets?page=2")
        );
        assert_eq!(links.actions.len(), 1);
        assert_eq!(links.actions[0].rel, "create");
    }
}
