//! Root-object decoding shared by every resource.
//!
//! The API wraps each payload in a root object keyed by the resource name, next to an
//! optional `links` block:
//!
//! ```json
//! {"kernels": [{"id": 1, "name": "...", "version": "..."}],
//!  "links": {"pages": {"next": "..."}}}
//! ```
//!
//! A [`Root`] names the key and payload type of one such shape; [`Envelope`] decodes any
//! of them and moves the links into the call's [`Response`].

use std::fmt;

use serde::de::{self, DeserializeOwned, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::transport::RawResponse;
use crate::types::{Links, Response};

/// Name of the pagination block inside every root object.
pub const LINKS_KEY: &str = "links";

/// Describes one root-object shape.
pub trait Root {
    /// JSON key holding the payload (e.g. `droplet`, `droplets`).
    const KEY: &'static str;
    /// Payload type stored under [`Root::KEY`].
    type Payload: Serialize + DeserializeOwned;
}

/// A decoded root object: the payload plus the optional links block.
pub struct Envelope<R: Root> {
    /// Resource payload
    pub payload: R::Payload,
    /// Pagination links, `None` when the block was absent or `null`
    pub links: Option<Links>,
}

impl<R: Root> Envelope<R> {
    /// Wrap a payload.
    pub fn new(payload: R::Payload, links: Option<Links>) -> Self {
        Self { payload, links }
    }

    /// Decode a body received with `response`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DecodeError`] carrying a copy of `response` when the body is not
    /// JSON, lacks the payload key, or the payload has the wrong shape.
    pub fn decode(body: &[u8], response: &Response) -> Result<Self> {
        serde_json::from_slice(body).map_err(|err| {
            Error::decode(
                format!("expected `{}` root object: {err}", R::KEY),
                response.clone(),
            )
        })
    }

    /// Decode the body of a completed call, handing back its metadata.
    ///
    /// # Errors
    ///
    /// See [`Envelope::decode`].
    pub fn from_raw(raw: RawResponse) -> Result<(Self, Response)> {
        let envelope = Self::decode(&raw.body, &raw.response)?;
        Ok((envelope, raw.response))
    }

    /// Copy the links block into `response` when present and return the payload.
    ///
    /// An absent links block leaves `response.links` untouched.
    pub fn propagate_links(self, response: &mut Response) -> R::Payload {
        if let Some(links) = self.links {
            response.links = Some(links);
        }
        self.payload
    }

    /// Drop the links block and return the payload.
    pub fn into_payload(self) -> R::Payload {
        self.payload
    }
}

impl<R: Root> fmt::Debug for Envelope<R>
where
    R::Payload: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Envelope")
            .field("key", &R::KEY)
            .field("payload", &self.payload)
            .field("links", &self.links)
            .finish()
    }
}

impl<R: Root> Clone for Envelope<R>
where
    R::Payload: Clone,
{
    fn clone(&self) -> Self {
        Self {
            payload: self.payload.clone(),
            links: self.links.clone(),
        }
    }
}

impl<R: Root> PartialEq for Envelope<R>
where
    R::Payload: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.payload == other.payload && self.links == other.links
    }
}

impl<R: Root> Serialize for Envelope<R> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry(R::KEY, &self.payload)?;
        map.serialize_entry(LINKS_KEY, &self.links)?;
        map.end()
    }
}

impl<'de, R: Root> Deserialize<'de> for Envelope<R> {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct RawRoot {
            #[serde(default)]
            links: Option<Links>,
            #[serde(flatten)]
            rest: Map<String, Value>,
        }

        let mut raw = RawRoot::deserialize(deserializer)?;
        let value = raw
            .rest
            .remove(R::KEY)
            .ok_or_else(|| de::Error::missing_field(R::KEY))?;
        let payload = R::Payload::deserialize(value).map_err(de::Error::custom)?;

        Ok(Self {
            payload,
            links: raw.links,
        })
    }
}
