//! The request/execute seam between resource services and the network.
//!
//! Services never talk to `reqwest` directly: they ask a [`Transport`] to build a
//! [`Request`] for a relative path and then to send it, getting back the raw body and
//! the call's [`Response`] metadata. [`HttpTransport`] is the production implementation;
//! tests substitute their own.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, ClientBuilder, Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};
use url::Url;

use crate::client::ClientConfig;
use crate::config::ApiConfig;
use crate::error::{ApiErrorBody, Error, Result};
use crate::types::Response;

const USER_AGENT: &str = concat!("ocean-core/", env!("CARGO_PKG_VERSION"));
const MEDIA_TYPE: &str = "application/json";

/// A request ready to be sent.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    /// HTTP method
    pub method: Method,
    /// Absolute URL, including any query string
    pub url: Url,
    /// JSON body, only set for requests that carry one
    pub body: Option<Value>,
}

/// A completed 2xx exchange: metadata plus the undecoded body.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    /// Response metadata
    pub response: Response,
    /// Raw response body
    pub body: Vec<u8>,
}

/// Builds and executes API requests.
///
/// Implementations must be safe to share between concurrent callers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Build a request for `path`, relative to the API base URL.
    ///
    /// # Errors
    ///
    /// Returns a request-build error if the path cannot be joined onto the base URL.
    fn new_request(&self, method: Method, path: &str, body: Option<Value>) -> Result<Request>;

    /// Execute a request.
    ///
    /// # Errors
    ///
    /// Returns a transport error for network failures and non-2xx answers. Errors for
    /// non-2xx answers carry the response metadata.
    async fn send(&self, request: Request) -> Result<RawResponse>;
}

/// Serialize a request body.
///
/// # Errors
///
/// Returns [`Error::InvalidRequest`] if the value cannot be represented as JSON.
pub fn to_body<B>(body: &B) -> Result<Value>
where
    B: Serialize + ?Sized,
{
    serde_json::to_value(body)
        .map_err(|err| Error::InvalidRequest(format!("Failed to serialize request body: {err}")))
}

/// Join a relative resource path onto a base URL.
///
/// An absolute URL (such as an action `href` from a links block) is used as is.
///
/// # Errors
///
/// Returns [`Error::InvalidEndpoint`] if the result is not a valid URL.
pub fn join_path(base_url: &Url, path: &str) -> Result<Url> {
    if let Ok(absolute) = Url::parse(path) {
        return Ok(absolute);
    }

    let normalized = path.strip_prefix('/').unwrap_or(path);

    base_url
        .join(normalized)
        .map_err(|err| Error::InvalidEndpoint(format!("Invalid API path `{path}`: {err}")))
}

/// Builder for [`HttpTransport`].
#[derive(Debug)]
pub struct HttpTransportBuilder {
    config: ApiConfig,
    http_config: ClientConfig,
    token: Option<SecretString>,
}

impl HttpTransportBuilder {
    /// Create a builder from an [`ApiConfig`].
    #[must_use]
    pub fn new(config: ApiConfig) -> Self {
        let http_config = config.http_config();
        Self {
            config,
            http_config,
            token: None,
        }
    }

    /// Override the HTTP client configuration.
    #[must_use]
    pub fn with_http_config(mut self, config: ClientConfig) -> Self {
        self.http_config = config;
        self
    }

    /// Authenticate every request with this personal access token.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(SecretString::from(token.into()));
        self
    }

    /// Build the transport.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the base URL is invalid or the HTTP client
    /// cannot be constructed.
    pub fn build(self) -> Result<HttpTransport> {
        let base_url = self.config.parse_api_url()?;
        let user_agent = self
            .config
            .user_agent
            .clone()
            .unwrap_or_else(|| USER_AGENT.to_string());

        let mut builder = ClientBuilder::new()
            .timeout(self.http_config.timeout)
            .connect_timeout(self.http_config.connect_timeout)
            .user_agent(user_agent)
            .pool_idle_timeout(self.http_config.pool_idle_timeout)
            .pool_max_idle_per_host(self.http_config.pool_max_idle_per_host);

        if !self.http_config.enable_compression {
            builder = builder.no_gzip();
        }

        if self.token.is_none() {
            warn!("no access token configured; API calls will be rejected");
        }

        let http = builder
            .build()
            .map_err(|err| Error::ConfigError(format!("Failed to build HTTP client: {err}")))?;

        Ok(HttpTransport {
            http,
            base_url,
            token: self.token,
        })
    }
}

/// [`Transport`] backed by `reqwest`.
#[derive(Debug)]
pub struct HttpTransport {
    http: Client,
    base_url: Url,
    token: Option<SecretString>,
}

impl HttpTransport {
    /// Create a transport for `api_url` authenticated with `token`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn new(api_url: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        HttpTransportBuilder::new(ApiConfig::new(api_url)?)
            .with_token(token)
            .build()
    }

    /// Access the base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn new_request(&self, method: Method, path: &str, body: Option<Value>) -> Result<Request> {
        let url = join_path(&self.base_url, path)?;
        Ok(Request { method, url, body })
    }

    async fn send(&self, request: Request) -> Result<RawResponse> {
        let Request { method, url, body } = request;
        let path = url.path().to_string();

        let mut builder = self
            .http
            .request(method.clone(), url)
            .header(ACCEPT, MEDIA_TYPE);

        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token.expose_secret());
        }
        if let Some(payload) = &body {
            builder = builder.header(CONTENT_TYPE, MEDIA_TYPE).json(payload);
        }

        info!(%method, path = %path, "DigitalOcean request");

        let response = builder.send().await?;
        let status = response.status();
        let metadata = Response::from_headers(status, response.headers());
        debug!(%status, rate = ?metadata.rate, "DigitalOcean response");

        if status.is_success() {
            let body = response.bytes().await.map_err(|err| {
                Error::HttpError(format!("Failed to read response body for `{path}`: {err}"))
            })?;
            return Ok(RawResponse {
                response: metadata,
                body: body.to_vec(),
            });
        }

        let text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        let message = ApiErrorBody::message_from(&text);
        let err = map_status_to_error(metadata, message);
        if err.should_log() {
            warn!(%method, path = %path, %status, code = err.error_code(), error = %err, "DigitalOcean request failed");
        } else {
            debug!(%method, path = %path, %status, code = err.error_code(), error = %err, "DigitalOcean request failed");
        }

        Err(err)
    }
}

fn map_status_to_error(response: Response, message: String) -> Error {
    let response = Box::new(response);
    match response.status {
        StatusCode::NOT_FOUND => Error::NotFound { message, response },
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            Error::Unauthorized { message, response }
        }
        _ => Error::Api { message, response },
    }
}
