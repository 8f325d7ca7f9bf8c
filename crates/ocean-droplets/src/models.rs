//! Droplet models as returned by the API.
//!
//! Every field is populated from server responses only. Optional scalars are skipped
//! when serializing so a decoded value re-encodes to the same JSON it came from.

use chrono::{DateTime, Utc};
use ocean_core::ids::{ActionId, DropletId, ImageId, KernelId};
use serde::{Deserialize, Serialize};

/// Status of a droplet that is still being provisioned.
pub const STATUS_NEW: &str = "new";
/// Status of a running droplet.
pub const STATUS_ACTIVE: &str = "active";
/// Status of a powered-off droplet.
pub const STATUS_OFF: &str = "off";
/// Status of an archived droplet.
pub const STATUS_ARCHIVE: &str = "archive";

/// Action status while the action is running.
pub const ACTION_IN_PROGRESS: &str = "in-progress";
/// Action status once it finished successfully.
pub const ACTION_COMPLETED: &str = "completed";
/// Action status when it failed.
pub const ACTION_ERRORED: &str = "errored";

/// A droplet (compute instance).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Droplet {
    /// Droplet id, assigned by the API.
    pub id: DropletId,
    /// Droplet name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Memory in MB.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<u64>,
    /// Number of virtual CPUs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vcpus: Option<u32>,
    /// Disk size in GB.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disk: Option<u64>,
    /// Region the droplet runs in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<Region>,
    /// Image the droplet was created from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<Image>,
    /// Size descriptor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
    /// Size slug (e.g. `s-1vcpu-1gb`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_slug: Option<String>,
    /// Ids of backup images.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub backup_ids: Vec<ImageId>,
    /// Ids of snapshot images.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub snapshot_ids: Vec<ImageId>,
    /// Whether the droplet is locked against actions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
    /// Status string (`new`, `active`, `off`, `archive`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Network interfaces.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub networks: Option<Networks>,
    /// Ids of pending and past actions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub action_ids: Vec<ActionId>,
    /// Creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Droplet {
    /// Whether the droplet reports the `active` status.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status.as_deref() == Some(STATUS_ACTIVE)
    }

    /// Public IPv4 address, if one is assigned.
    #[must_use]
    pub fn public_ipv4(&self) -> Option<&str> {
        self.networks
            .as_ref()?
            .v4
            .iter()
            .find(|net| net.kind.as_deref() == Some("public"))
            .and_then(|net| net.ip_address.as_deref())
    }

    /// Private IPv4 address, if private networking is enabled.
    #[must_use]
    pub fn private_ipv4(&self) -> Option<&str> {
        self.networks
            .as_ref()?
            .v4
            .iter()
            .find(|net| net.kind.as_deref() == Some("private"))
            .and_then(|net| net.ip_address.as_deref())
    }

    /// Public IPv6 address, if IPv6 is enabled.
    #[must_use]
    pub fn public_ipv6(&self) -> Option<&str> {
        self.networks
            .as_ref()?
            .v6
            .iter()
            .find(|net| net.kind.as_deref() == Some("public"))
            .and_then(|net| net.ip_address.as_deref())
    }
}

/// A boot kernel available to a droplet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Kernel {
    /// Kernel id.
    pub id: KernelId,
    /// Kernel name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Kernel version string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// A datacenter region.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Region {
    /// Region slug (e.g. `nyc3`).
    #[serde(default)]
    pub slug: String,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Size slugs available in the region.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sizes: Vec<String>,
    /// Whether new droplets can be created in the region.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available: Option<bool>,
    /// Feature flags (e.g. `backups`, `ipv6`).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,
}

/// A distribution image, snapshot or backup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Image {
    /// Image id.
    pub id: ImageId,
    /// Image name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Image type (`snapshot`, `backup`, `base`).
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Distribution name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distribution: Option<String>,
    /// Public image slug.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// Whether the image is public.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public: Option<bool>,
    /// Region slugs the image is available in.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub regions: Vec<String>,
    /// Minimum disk size in GB needed to use the image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_disk_size: Option<u64>,
    /// Creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// A droplet size (plan).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Size {
    /// Size slug.
    #[serde(default)]
    pub slug: String,
    /// Memory in MB.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<u64>,
    /// Virtual CPUs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vcpus: Option<u32>,
    /// Disk in GB.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disk: Option<u64>,
    /// Monthly price in USD.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_monthly: Option<f64>,
    /// Hourly price in USD.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_hourly: Option<f64>,
    /// Region slugs offering this size.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub regions: Vec<String>,
    /// Whether the size can currently be ordered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available: Option<bool>,
    /// Monthly transfer allowance in TB.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transfer: Option<f64>,
}

/// IPv4 and IPv6 interfaces of a droplet.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Networks {
    /// IPv4 interfaces.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub v4: Vec<NetworkV4>,
    /// IPv6 interfaces.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub v6: Vec<NetworkV6>,
}

/// An IPv4 interface.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NetworkV4 {
    /// Address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    /// Dotted netmask.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub netmask: Option<String>,
    /// Gateway address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway: Option<String>,
    /// `public` or `private`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// An IPv6 interface.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NetworkV6 {
    /// Address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    /// Prefix length.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub netmask: Option<u8>,
    /// Gateway address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway: Option<String>,
    /// `public`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// An action performed on a droplet (power cycle, snapshot, create...).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Action {
    /// Action id.
    pub id: ActionId,
    /// `in-progress`, `completed` or `errored`.
    #[serde(default)]
    pub status: String,
    /// Action type (e.g. `create`, `power_off`).
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// When the action started.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    /// When the action completed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    /// Id of the resource the action applies to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<u64>,
    /// Resource type (e.g. `droplet`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    /// Region of the resource.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<Region>,
    /// Region slug of the resource.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region_slug: Option<String>,
}

impl Action {
    /// Whether the action has stopped running, successfully or not.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.status == ACTION_COMPLETED || self.status == ACTION_ERRORED
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn networked() -> Droplet {
        serde_json::from_value(json!({
            "id": 3164494,
            "status": "active",
            "networks": {
                "v4": [
                    {"ip_address": "10.128.0.5", "netmask": "255.255.0.0", "gateway": "10.128.0.1", "type": "private"},
                    {"ip_address": "104.236.32.182", "netmask": "255.255.192.0", "gateway": "104.236.0.1", "type": "public"}
                ],
                "v6": [
                    {"ip_address": "2604:A880:0800:0010:0000:0000:02DD:4001", "netmask": 64, "gateway": "2604:A880:0800:0010:0000:0000:0000:0001", "type": "public"}
                ]
            }
        }))
        .unwrap()
    }

    #[test]
    fn droplet_address_helpers() {
        let droplet = networked();
        assert!(droplet.is_active());
        assert_eq!(droplet.public_ipv4(), Some("104.236.32.182"));
        assert_eq!(droplet.private_ipv4(), Some("10.128.0.5"));
        assert_eq!(
            droplet.public_ipv6(),
            Some("2604:A880:0800:0010:0000:0000:02DD:4001")
        );
    }

    #[test]
    fn droplet_without_networks() {
        let droplet: Droplet = serde_json::from_value(json!({"id": 1})).unwrap();
        assert!(droplet.public_ipv4().is_none());
        assert!(!droplet.is_active());
        assert!(droplet.backup_ids.is_empty());
    }

    #[test]
    fn droplet_requires_id() {
        assert!(serde_json::from_value::<Droplet>(json!({"name": "web-1"})).is_err());
    }

    #[test]
    fn sparse_droplet_serializes_sparse() {
        let droplet: Droplet =
            serde_json::from_value(json!({"id": 7, "name": "web-1"})).unwrap();
        assert_eq!(
            serde_json::to_value(&droplet).unwrap(),
            json!({"id": 7, "name": "web-1"})
        );
    }

    #[test]
    fn image_type_field_is_renamed() {
        let image: Image = serde_json::from_value(json!({
            "id": 6918990,
            "name": "14.04 x64",
            "type": "snapshot",
            "distribution": "Ubuntu",
            "slug": "ubuntu-14-04-x64",
            "public": true,
            "regions": ["nyc1", "ams1"],
            "min_disk_size": 20,
            "created_at": "2014-10-17T20:24:33Z"
        }))
        .unwrap();

        assert_eq!(image.kind.as_deref(), Some("snapshot"));
        assert_eq!(image.regions.len(), 2);
        assert_eq!(serde_json::to_value(&image).unwrap()["type"], "snapshot");
    }

    #[test]
    fn action_finished_states() {
        let mut action: Action =
            serde_json::from_value(json!({"id": 36804636, "status": "in-progress", "type": "create"}))
                .unwrap();
        assert!(!action.is_finished());

        action.status = ACTION_COMPLETED.to_string();
        assert!(action.is_finished());

        action.status = ACTION_ERRORED.to_string();
        assert!(action.is_finished());
    }
}
