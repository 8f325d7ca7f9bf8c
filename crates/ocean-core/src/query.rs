//! List options and query string encoding.
//!
//! [`QueryParams`] collects optional key/value pairs; [`add_options`] validates a
//! [`ListOptions`] and appends it to a request path.

use serde::{Deserialize, Serialize};
use url::form_urlencoded;
use validator::Validate;

use crate::error::Result;

/// Largest page size the API accepts.
pub const MAX_PER_PAGE: u32 = 200;

/// Pagination options accepted by every list endpoint.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ListOptions {
    /// Page to fetch, starting at 1.
    #[validate(range(min = 1))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,

    /// Number of items per page.
    #[validate(range(min = 1, max = 200))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
}

impl ListOptions {
    /// Options with neither page nor page size set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            page: None,
            per_page: None,
        }
    }

    /// Request a specific page.
    #[must_use]
    pub const fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Request a specific page size.
    #[must_use]
    pub const fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page);
        self
    }

    /// Convert the options into URL query pairs.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut params = QueryParams::new();
        params.push_opt("page", self.page);
        params.push_opt("per_page", self.per_page);
        params.into_pairs()
    }
}

/// Append validated list options to `path` as a query string.
///
/// `None` or empty options leave the path untouched.
///
/// # Errors
///
/// Returns [`Error::ValidationError`](crate::Error::ValidationError) if the options are
/// out of range; no request should be sent in that case.
pub fn add_options(path: &str, options: Option<&ListOptions>) -> Result<String> {
    let Some(options) = options else {
        return Ok(path.to_string());
    };
    options.validate()?;

    let pairs = options.to_pairs();
    if pairs.is_empty() {
        return Ok(path.to_string());
    }

    let query = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs.iter().map(|(key, value)| (*key, value.as_str())))
        .finish();
    let separator = if path.contains('?') { '&' } else { '?' };

    Ok(format!("{path}{separator}{query}"))
}

/// Builder for assembling query parameter pairs.
#[derive(Debug, Default, Clone)]
pub struct QueryParams {
    pairs: Vec<(&'static str, String)>,
}

impl QueryParams {
    /// Create a new, empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Append a key/value pair when the value is present.
    pub fn push_opt<T>(&mut self, key: &'static str, value: Option<T>)
    where
        T: ToString,
    {
        if let Some(value) = value {
            self.pairs.push((key, value.to_string()));
        }
    }

    /// Return the collected key/value pairs.
    #[must_use]
    pub fn into_pairs(self) -> Vec<(&'static str, String)> {
        self.pairs
    }
}
