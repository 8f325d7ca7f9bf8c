//! Asynchronous droplets client implementation.

use std::sync::Arc;

use async_trait::async_trait;
use ocean_core::config::{ApiConfig, ENV_TOKEN};
use ocean_core::ids::DropletId;
use ocean_core::query::add_options;
use ocean_core::transport::to_body;
use ocean_core::{
    Envelope, Error, HttpTransportBuilder, ListOptions, Response, Root, Transport,
};
use reqwest::Method;
use serde_json::Value;
use tracing::debug;

use crate::actions::{DropletActionsService, DropletActionsServiceOp};
use crate::models::{Action, Droplet, Image, Kernel};
use crate::request::DropletCreateRequest;
use crate::roots::{
    ActionsRoot, BackupsRoot, DropletRoot, DropletsRoot, KernelsRoot, SnapshotsRoot,
};
use crate::Result;

/// Path of the droplets collection, relative to the API base URL.
pub const DROPLET_BASE_PATH: &str = "v2/droplets";

/// Operations on droplets.
///
/// Every call returns the response metadata next to the payload. List-style calls copy
/// the `links` block of the body into [`Response::links`]; [`DropletsService::get`] and
/// [`DropletsService::neighbors`] never do.
#[async_trait]
pub trait DropletsService: Send + Sync {
    /// List droplets.
    async fn list(&self, options: Option<&ListOptions>) -> Result<(Vec<Droplet>, Response)>;

    /// Fetch one droplet.
    async fn get(&self, id: DropletId) -> Result<(Droplet, Response)>;

    /// Create a droplet.
    async fn create(&self, request: &DropletCreateRequest) -> Result<(Droplet, Response)>;

    /// Delete a droplet. The response body is ignored.
    async fn delete(&self, id: DropletId) -> Result<Response>;

    /// List kernels available to a droplet.
    async fn kernels(
        &self,
        id: DropletId,
        options: Option<&ListOptions>,
    ) -> Result<(Vec<Kernel>, Response)>;

    /// List snapshots of a droplet.
    async fn snapshots(
        &self,
        id: DropletId,
        options: Option<&ListOptions>,
    ) -> Result<(Vec<Image>, Response)>;

    /// List backups of a droplet.
    async fn backups(
        &self,
        id: DropletId,
        options: Option<&ListOptions>,
    ) -> Result<(Vec<Image>, Response)>;

    /// List actions performed on a droplet.
    async fn actions(
        &self,
        id: DropletId,
        options: Option<&ListOptions>,
    ) -> Result<(Vec<Action>, Response)>;

    /// List droplets running on the same physical hardware.
    async fn neighbors(&self, id: DropletId) -> Result<(Vec<Droplet>, Response)>;
}

/// [`DropletsService`] over a [`Transport`].
#[derive(Clone)]
pub struct DropletsServiceOp {
    transport: Arc<dyn Transport>,
}

impl DropletsServiceOp {
    /// Create the service.
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Status string (`in-progress`, `completed`, `errored`) of the action at `uri`.
    ///
    /// # Errors
    ///
    /// Returns the error of the underlying action lookup.
    pub async fn action_status(&self, uri: &str) -> Result<String> {
        let actions = DropletActionsServiceOp::new(Arc::clone(&self.transport));
        let (action, _) = actions.get_by_uri(uri).await?;
        Ok(action.status)
    }

    async fn fetch<R: Root>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<(Envelope<R>, Response)> {
        let request = self.transport.new_request(method, path, body)?;
        let raw = self.transport.send(request).await?;
        Envelope::<R>::from_raw(raw)
    }

    async fn list_root<R: Root>(
        &self,
        path: &str,
        options: Option<&ListOptions>,
    ) -> Result<(R::Payload, Response)> {
        let path = add_options(path, options)?;
        let (envelope, mut response) = self.fetch::<R>(Method::GET, &path, None).await?;
        let payload = envelope.propagate_links(&mut response);
        Ok((payload, response))
    }
}

fn droplet_path(id: DropletId) -> String {
    format!("{DROPLET_BASE_PATH}/{id}")
}

fn droplet_sub_path(id: DropletId, resource: &str) -> String {
    format!("{DROPLET_BASE_PATH}/{id}/{resource}")
}

#[async_trait]
impl DropletsService for DropletsServiceOp {
    async fn list(&self, options: Option<&ListOptions>) -> Result<(Vec<Droplet>, Response)> {
        self.list_root::<DropletsRoot>(DROPLET_BASE_PATH, options)
            .await
    }

    async fn get(&self, id: DropletId) -> Result<(Droplet, Response)> {
        let (envelope, response) = self
            .fetch::<DropletRoot>(Method::GET, &droplet_path(id), None)
            .await?;
        Ok((envelope.into_payload(), response))
    }

    async fn create(&self, request: &DropletCreateRequest) -> Result<(Droplet, Response)> {
        debug!(name = %request.name, region = %request.region, "creating droplet");

        let body = to_body(request)?;
        let (envelope, mut response) = self
            .fetch::<DropletRoot>(Method::POST, DROPLET_BASE_PATH, Some(body))
            .await?;
        let droplet = envelope.propagate_links(&mut response);
        Ok((droplet, response))
    }

    async fn delete(&self, id: DropletId) -> Result<Response> {
        debug!(droplet_id = %id, "deleting droplet");
        let request = self
            .transport
            .new_request(Method::DELETE, &droplet_path(id), None)?;
        let raw = self.transport.send(request).await?;
        Ok(raw.response)
    }

    async fn kernels(
        &self,
        id: DropletId,
        options: Option<&ListOptions>,
    ) -> Result<(Vec<Kernel>, Response)> {
        self.list_root::<KernelsRoot>(&droplet_sub_path(id, "kernels"), options)
            .await
    }

    async fn snapshots(
        &self,
        id: DropletId,
        options: Option<&ListOptions>,
    ) -> Result<(Vec<Image>, Response)> {
        self.list_root::<SnapshotsRoot>(&droplet_sub_path(id, "snapshots"), options)
            .await
    }

    async fn backups(
        &self,
        id: DropletId,
        options: Option<&ListOptions>,
    ) -> Result<(Vec<Image>, Response)> {
        self.list_root::<BackupsRoot>(&droplet_sub_path(id, "backups"), options)
            .await
    }

    async fn actions(
        &self,
        id: DropletId,
        options: Option<&ListOptions>,
    ) -> Result<(Vec<Action>, Response)> {
        self.list_root::<ActionsRoot>(&droplet_sub_path(id, "actions"), options)
            .await
    }

    async fn neighbors(&self, id: DropletId) -> Result<(Vec<Droplet>, Response)> {
        let (envelope, response) = self
            .fetch::<DropletsRoot>(Method::GET, &droplet_sub_path(id, "neighbors"), None)
            .await?;
        Ok((envelope.into_payload(), response))
    }
}

/// Entry point bundling the droplet services over one shared transport.
#[derive(Clone)]
pub struct DigitalOceanClient {
    droplets: DropletsServiceOp,
    droplet_actions: DropletActionsServiceOp,
}

impl DigitalOceanClient {
    /// Client for the public API authenticated with `token`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the HTTP client cannot be built.
    pub fn new(token: impl Into<String>) -> Result<Self> {
        let transport = HttpTransportBuilder::new(ApiConfig::default())
            .with_token(token)
            .build()?;
        Ok(Self::with_transport(Arc::new(transport)))
    }

    /// Client configured from `DIGITALOCEAN_TOKEN` and `DIGITALOCEAN_API_URL`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the token is missing or the URL is invalid.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Client configured from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// See [`DigitalOceanClient::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = lookup(ENV_TOKEN)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .ok_or_else(|| Error::ConfigError(format!("{ENV_TOKEN} is not set")))?;
        let config = ApiConfig::from_lookup(&lookup)?;

        let transport = HttpTransportBuilder::new(config).with_token(token).build()?;
        Ok(Self::with_transport(Arc::new(transport)))
    }

    /// Client over a caller-supplied transport.
    #[must_use]
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self {
            droplets: DropletsServiceOp::new(Arc::clone(&transport)),
            droplet_actions: DropletActionsServiceOp::new(transport),
        }
    }

    /// Droplets service.
    #[must_use]
    pub fn droplets(&self) -> &DropletsServiceOp {
        &self.droplets
    }

    /// Droplet actions service.
    #[must_use]
    pub fn droplet_actions(&self) -> &DropletActionsServiceOp {
        &self.droplet_actions
    }
}
