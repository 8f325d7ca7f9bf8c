//! Droplets client and data models for the DigitalOcean v2 API.
//!
//! Provides typed structures and an asynchronous service for listing, creating and
//! deleting droplets and for browsing their kernels, snapshots, backups, actions and
//! neighbors.

#![deny(missing_docs)]

pub mod actions;
pub mod client;
pub mod models;
pub mod request;
pub mod roots;

pub use actions::{DropletActionsService, DropletActionsServiceOp};
pub use client::{DigitalOceanClient, DropletsService, DropletsServiceOp, DROPLET_BASE_PATH};
pub use models::{Action, Droplet, Image, Kernel, NetworkV4, NetworkV6, Networks, Region, Size};
pub use request::{DropletCreateImage, DropletCreateRequest, DropletCreateSshKey};

/// Convenient result alias that reuses the shared error type.
pub type Result<T> = ocean_core::Result<T>;
