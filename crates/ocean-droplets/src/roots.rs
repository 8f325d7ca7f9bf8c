//! Root-object shapes used by the droplet endpoints.

use ocean_core::Root;

use crate::models::{Action, Droplet, Image, Kernel};

macro_rules! root {
    ($name:ident, $key:literal, $payload:ty, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy)]
        pub struct $name;

        impl Root for $name {
            const KEY: &'static str = $key;
            type Payload = $payload;
        }
    };
}

root!(DropletRoot, "droplet", Droplet, "`{\"droplet\": {...}}`");
root!(DropletsRoot, "droplets", Vec<Droplet>, "`{\"droplets\": [...], \"links\": {...}}`");
root!(KernelsRoot, "kernels", Vec<Kernel>, "`{\"kernels\": [...], \"links\": {...}}`");
root!(SnapshotsRoot, "snapshots", Vec<Image>, "`{\"snapshots\": [...], \"links\": {...}}`");
root!(BackupsRoot, "backups", Vec<Image>, "`{\"backups\": [...], \"links\": {...}}`");
root!(ActionsRoot, "actions", Vec<Action>, "`{\"actions\": [...], \"links\": {...}}`");
root!(ActionRoot, "action", Action, "`{\"action\": {...}}`");
