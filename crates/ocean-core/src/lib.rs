//! # ocean-core
//!
//! Core types and utilities for working with the DigitalOcean v2 API.
//!
//! This crate provides the shared error taxonomy, configuration, response metadata,
//! envelope decoding and the HTTP transport used by the resource crates.
//!
//! ## Modules
//!
//! - [`error`] - Error taxonomy (request-build, transport, decode)
//! - [`ids`] - Strongly-typed numeric identifiers for API resources
//! - [`types`] - Response metadata: status, rate limits and pagination links
//! - [`envelope`] - Generic root-object decoding and link propagation
//! - [`query`] - List options and query string encoding
//! - [`config`] - Validated API configuration
//! - [`client`] - HTTP client settings
//! - [`transport`] - The request/execute seam and its `reqwest` implementation

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod ids;
pub mod query;
pub mod transport;
pub mod types;

// Re-export commonly used types
pub use envelope::{Envelope, Root};
pub use error::{Error, Result};
pub use query::ListOptions;
pub use transport::{HttpTransport, HttpTransportBuilder, RawResponse, Request, Transport};
pub use types::{Links, Pages, Rate, Response};
