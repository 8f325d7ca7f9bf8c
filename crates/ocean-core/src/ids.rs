//! Strongly-typed numeric identifiers for DigitalOcean resources.
//!
//! The API identifies droplets, images, keys, kernels and actions by plain integers.
//! Wrapping each in its own type keeps a droplet id from being passed where an image
//! id is expected, while serializing exactly like the bare number.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Macro to generate strongly-typed numeric id wrapper types.
macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident, $doc:expr) => {
        $(#[$meta])*
        #[doc = $doc]
        #[derive(
            Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Wraps a raw id.
            #[must_use]
            pub const fn new(id: u64) -> Self {
                Self(id)
            }

            /// Returns the raw id.
            #[must_use]
            pub const fn get(self) -> u64 {
                self.0
            }

            /// Whether the id is the zero value (never assigned by the API).
            #[must_use]
            pub const fn is_unset(self) -> bool {
                self.0 == 0
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                s.trim().parse::<u64>().map(Self).map_err(|err| {
                    Error::InvalidRequest(format!(
                        "Invalid {} `{s}`: {err}",
                        stringify!($name)
                    ))
                })
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type!(DropletId, "Droplet id");
id_type!(ImageId, "Image (distribution, snapshot or backup) id");
id_type!(SshKeyId, "SSH key id");
id_type!(KernelId, "Kernel id");
id_type!(ActionId, "Action id");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_droplet_id_roundtrip_as_number() {
        let id = DropletId::new(3_164_494);
        assert_eq!(serde_json::to_string(&id).unwrap(), "3164494");

        let parsed: DropletId = serde_json::from_str("3164494").unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_id_display_is_bare_number() {
        assert_eq!(DropletId::new(123).to_string(), "123");
        assert_eq!(format!("v2/droplets/{}", DropletId::new(7)), "v2/droplets/7");
    }

    #[test]
    fn test_id_from_str() {
        let id: ImageId = " 6918990 ".parse().unwrap();
        assert_eq!(id.get(), 6_918_990);

        let err = "ubuntu".parse::<ImageId>().unwrap_err();
        assert!(matches!(err, Error::InvalidRequest(_)));
        assert!(err.to_string().contains("ImageId"));
    }

    #[test]
    fn test_id_rejects_negative_json() {
        assert!(serde_json::from_str::<KernelId>("-1").is_err());
    }

    #[test]
    fn test_unset_id() {
        assert!(SshKeyId::default().is_unset());
        assert!(!SshKeyId::new(512_189).is_unset());
    }

    #[test]
    fn test_id_conversions() {
        let id: ActionId = 36_804_636.into();
        let raw: u64 = id.into();
        assert_eq!(raw, 36_804_636);
    }

    #[test]
    fn test_id_hash() {
        use std::collections::HashSet;

        let mut set = HashSet::new();
        set.insert(DropletId::new(1));
        set.insert(DropletId::new(2));
        set.insert(DropletId::new(1));

        assert_eq!(set.len(), 2);
    }
}
