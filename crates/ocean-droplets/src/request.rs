//! Request bodies for creating droplets.

use ocean_core::ids::{ImageId, SshKeyId};
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Writes `alias` as a string when it is non-empty, otherwise `id` as a number.
fn serialize_alias_or_id<S>(alias: &str, id: u64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if alias.is_empty() {
        serializer.serialize_u64(id)
    } else {
        serializer.serialize_str(alias)
    }
}

/// Reads either a string alias or a numeric id.
struct AliasOrId;

enum AliasOrIdValue {
    Alias(String),
    Id(u64),
}

impl<'de> Visitor<'de> for AliasOrId {
    type Value = AliasOrIdValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string alias or a non-negative integer id")
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
        Ok(AliasOrIdValue::Id(value))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
        u64::try_from(value)
            .map(AliasOrIdValue::Id)
            .map_err(|_| E::invalid_value(de::Unexpected::Signed(value), &self))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        Ok(AliasOrIdValue::Alias(value.to_string()))
    }
}

/// Image to boot a new droplet from: a public slug or a private image id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropletCreateImage {
    /// Public image slug, e.g. `ubuntu-22-04-x64`.
    Slug(String),
    /// Snapshot, backup or custom image id.
    Id(ImageId),
}

impl DropletCreateImage {
    /// Build from the slug/id pair; a non-empty slug wins.
    #[must_use]
    pub fn from_parts(slug: impl Into<String>, id: ImageId) -> Self {
        let slug = slug.into();
        if slug.is_empty() {
            Self::Id(id)
        } else {
            Self::Slug(slug)
        }
    }

    /// Slug, when the image is referenced by slug.
    #[must_use]
    pub fn slug(&self) -> Option<&str> {
        match self {
            Self::Slug(slug) => Some(slug.as_str()),
            Self::Id(_) => None,
        }
    }

    /// Id, when the image is referenced by id.
    #[must_use]
    pub const fn id(&self) -> Option<ImageId> {
        match self {
            Self::Id(id) => Some(*id),
            Self::Slug(_) => None,
        }
    }
}

impl From<&str> for DropletCreateImage {
    fn from(slug: &str) -> Self {
        Self::from_parts(slug, ImageId::default())
    }
}

impl From<String> for DropletCreateImage {
    fn from(slug: String) -> Self {
        Self::from_parts(slug, ImageId::default())
    }
}

impl From<ImageId> for DropletCreateImage {
    fn from(id: ImageId) -> Self {
        Self::Id(id)
    }
}

impl Serialize for DropletCreateImage {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Slug(slug) => serialize_alias_or_id(slug, 0, serializer),
            Self::Id(id) => serialize_alias_or_id("", id.get(), serializer),
        }
    }
}

impl<'de> Deserialize<'de> for DropletCreateImage {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match deserializer.deserialize_any(AliasOrId)? {
            AliasOrIdValue::Alias(slug) => Self::from_parts(slug, ImageId::default()),
            AliasOrIdValue::Id(id) => Self::Id(ImageId::new(id)),
        })
    }
}

/// SSH key to install on a new droplet: a fingerprint or a key id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropletCreateSshKey {
    /// Key fingerprint, e.g. `3b:16:bf:e4:8b:00:8b:b8:59:8c:a9:d3:f0:19:45:fa`.
    Fingerprint(String),
    /// Key id.
    Id(SshKeyId),
}

impl DropletCreateSshKey {
    /// Build from the fingerprint/id pair; a non-empty fingerprint wins.
    #[must_use]
    pub fn from_parts(fingerprint: impl Into<String>, id: SshKeyId) -> Self {
        let fingerprint = fingerprint.into();
        if fingerprint.is_empty() {
            Self::Id(id)
        } else {
            Self::Fingerprint(fingerprint)
        }
    }
}

impl From<&str> for DropletCreateSshKey {
    fn from(fingerprint: &str) -> Self {
        Self::from_parts(fingerprint, SshKeyId::default())
    }
}

impl From<String> for DropletCreateSshKey {
    fn from(fingerprint: String) -> Self {
        Self::from_parts(fingerprint, SshKeyId::default())
    }
}

impl From<SshKeyId> for DropletCreateSshKey {
    fn from(id: SshKeyId) -> Self {
        Self::Id(id)
    }
}

impl Serialize for DropletCreateSshKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Fingerprint(fingerprint) => serialize_alias_or_id(fingerprint, 0, serializer),
            Self::Id(id) => serialize_alias_or_id("", id.get(), serializer),
        }
    }
}

impl<'de> Deserialize<'de> for DropletCreateSshKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match deserializer.deserialize_any(AliasOrId)? {
            AliasOrIdValue::Alias(fingerprint) => {
                Self::from_parts(fingerprint, SshKeyId::default())
            }
            AliasOrIdValue::Id(id) => Self::Id(SshKeyId::new(id)),
        })
    }
}

/// Body of `POST v2/droplets`.
///
/// `ssh_keys` is always sent, as `[]` when empty. `user_data` is omitted unless set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropletCreateRequest {
    /// Droplet name (hostname).
    pub name: String,
    /// Region slug.
    pub region: String,
    /// Size slug.
    pub size: String,
    /// Boot image.
    pub image: DropletCreateImage,
    /// Keys to install.
    #[serde(default)]
    pub ssh_keys: Vec<DropletCreateSshKey>,
    /// Enable automated backups.
    #[serde(default)]
    pub backups: bool,
    /// Enable IPv6.
    #[serde(default)]
    pub ipv6: bool,
    /// Enable private networking.
    #[serde(default)]
    pub private_networking: bool,
    /// Cloud-init user data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_data: Option<String>,
}

impl DropletCreateRequest {
    /// Start a request with the required fields.
    pub fn new(
        name: impl Into<String>,
        region: impl Into<String>,
        size: impl Into<String>,
        image: impl Into<DropletCreateImage>,
    ) -> Self {
        Self {
            name: name.into(),
            region: region.into(),
            size: size.into(),
            image: image.into(),
            ssh_keys: Vec::new(),
            backups: false,
            ipv6: false,
            private_networking: false,
            user_data: None,
        }
    }

    /// Add an SSH key.
    #[must_use]
    pub fn with_ssh_key(mut self, key: impl Into<DropletCreateSshKey>) -> Self {
        self.ssh_keys.push(key.into());
        self
    }

    /// Toggle automated backups.
    #[must_use]
    pub const fn with_backups(mut self, enabled: bool) -> Self {
        self.backups = enabled;
        self
    }

    /// Toggle IPv6.
    #[must_use]
    pub const fn with_ipv6(mut self, enabled: bool) -> Self {
        self.ipv6 = enabled;
        self
    }

    /// Toggle private networking.
    #[must_use]
    pub const fn with_private_networking(mut self, enabled: bool) -> Self {
        self.private_networking = enabled;
        self
    }

    /// Set cloud-init user data.
    #[must_use]
    pub fn with_user_data(mut self, user_data: impl Into<String>) -> Self {
        self.user_data = Some(user_data.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn slug_image_encodes_as_string() {
        let image = DropletCreateImage::from("ubuntu-14-04-x64");
        assert_eq!(serde_json::to_value(&image).unwrap(), json!("ubuntu-14-04-x64"));
        assert_eq!(image.slug(), Some("ubuntu-14-04-x64"));
        assert!(image.id().is_none());
    }

    #[test]
    fn id_image_encodes_as_number() {
        let image = DropletCreateImage::from(ImageId::new(3_445_812));
        assert_eq!(serde_json::to_value(&image).unwrap(), json!(3_445_812));
    }

    #[test]
    fn empty_slug_falls_back_to_id() {
        assert_eq!(
            DropletCreateImage::from_parts("", ImageId::new(7)),
            DropletCreateImage::Id(ImageId::new(7))
        );
        assert_eq!(serde_json::to_value(DropletCreateImage::from("")).unwrap(), json!(0));
    }

    #[test]
    fn ssh_keys_encode_per_kind() {
        let keys = vec![
            DropletCreateSshKey::from(SshKeyId::new(107_149)),
            DropletCreateSshKey::from("3b:16:bf:e4:8b:00:8b:b8:59:8c:a9:d3:f0:19:45:fa"),
        ];
        assert_eq!(
            serde_json::to_value(&keys).unwrap(),
            json!([107_149, "3b:16:bf:e4:8b:00:8b:b8:59:8c:a9:d3:f0:19:45:fa"])
        );
    }

    #[test]
    fn references_decode_from_either_form() {
        let image: DropletCreateImage = serde_json::from_value(json!("debian-12-x64")).unwrap();
        assert_eq!(image, DropletCreateImage::Slug("debian-12-x64".to_string()));

        let key: DropletCreateSshKey = serde_json::from_value(json!(42)).unwrap();
        assert_eq!(key, DropletCreateSshKey::Id(SshKeyId::new(42)));

        assert!(serde_json::from_value::<DropletCreateImage>(json!(-1)).is_err());
        assert!(serde_json::from_value::<DropletCreateImage>(json!(true)).is_err());
    }

    #[test]
    fn create_request_wire_shape() {
        let request = DropletCreateRequest::new("example.com", "nyc3", "s-1vcpu-1gb", "ubuntu-14-04-x64");

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "name": "example.com",
                "region": "nyc3",
                "size": "s-1vcpu-1gb",
                "image": "ubuntu-14-04-x64",
                "ssh_keys": [],
                "backups": false,
                "ipv6": false,
                "private_networking": false
            })
        );
    }

    #[test]
    fn create_request_with_options() {
        let request = DropletCreateRequest::new("web-1", "ams3", "s-2vcpu-2gb", ImageId::new(123))
            .with_ssh_key(SshKeyId::new(1))
            .with_ssh_key("aa:bb")
            .with_backups(true)
            .with_ipv6(true)
            .with_private_networking(true)
            .with_user_data("#cloud-config\n");

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["image"], json!(123));
        assert_eq!(value["ssh_keys"], json!([1, "aa:bb"]));
        assert_eq!(value["backups"], json!(true));
        assert_eq!(value["user_data"], json!("#cloud-config\n"));

        let decoded: DropletCreateRequest = serde_json::from_value(value).unwrap();
        assert_eq!(decoded, request);
    }

    proptest! {
        #[test]
        fn non_empty_alias_always_encodes_as_string(alias in "[a-z0-9-]{1,24}", id in any::<u64>()) {
            let image = DropletCreateImage::from_parts(alias.clone(), ImageId::new(id));
            prop_assert_eq!(serde_json::to_value(&image).unwrap(), json!(alias.clone()));

            let key = DropletCreateSshKey::from_parts(alias.clone(), SshKeyId::new(id));
            prop_assert_eq!(serde_json::to_value(&key).unwrap(), json!(alias));
        }

        #[test]
        fn empty_alias_always_encodes_the_id(id in any::<u64>()) {
            let image = DropletCreateImage::from_parts("", ImageId::new(id));
            prop_assert_eq!(serde_json::to_value(&image).unwrap(), json!(id));

            let key = DropletCreateSshKey::from_parts(String::new(), SshKeyId::new(id));
            prop_assert_eq!(serde_json::to_value(&key).unwrap(), json!(id));
        }
    }
}
