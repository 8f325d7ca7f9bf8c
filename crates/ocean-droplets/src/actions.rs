//! Droplet action lookups.

use std::sync::Arc;

use async_trait::async_trait;
use ocean_core::ids::{ActionId, DropletId};
use ocean_core::{Envelope, Error, Response, Transport};
use reqwest::Method;
use url::Url;

use crate::client::DROPLET_BASE_PATH;
use crate::models::Action;
use crate::roots::ActionRoot;
use crate::Result;

/// Read access to actions performed on droplets.
#[async_trait]
pub trait DropletActionsService: Send + Sync {
    /// Fetch one action of a droplet.
    async fn get(&self, droplet: DropletId, action: ActionId) -> Result<(Action, Response)>;

    /// Fetch an action from an absolute URI, as found in a `links.actions[].href`.
    ///
    /// The URI is requested unchanged, host and path prefix included.
    async fn get_by_uri(&self, uri: &str) -> Result<(Action, Response)>;
}

/// [`DropletActionsService`] over a [`Transport`].
#[derive(Clone)]
pub struct DropletActionsServiceOp {
    transport: Arc<dyn Transport>,
}

impl DropletActionsServiceOp {
    /// Create the service.
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    async fn fetch(&self, path: &str) -> Result<(Action, Response)> {
        let request = self.transport.new_request(Method::GET, path, None)?;
        let raw = self.transport.send(request).await?;
        let (envelope, response) = Envelope::<ActionRoot>::from_raw(raw)?;
        Ok((envelope.into_payload(), response))
    }
}

#[async_trait]
impl DropletActionsService for DropletActionsServiceOp {
    async fn get(&self, droplet: DropletId, action: ActionId) -> Result<(Action, Response)> {
        let path = format!("{DROPLET_BASE_PATH}/{droplet}/actions/{action}");
        self.fetch(&path).await
    }

    async fn get_by_uri(&self, uri: &str) -> Result<(Action, Response)> {
        let url = Url::parse(uri)
            .map_err(|err| Error::InvalidRequest(format!("Invalid action URI `{uri}`: {err}")))?;
        self.fetch(url.as_str()).await
    }
}
