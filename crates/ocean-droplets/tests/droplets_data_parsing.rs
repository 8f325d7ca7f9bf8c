//! Integration tests for parsing droplet API data.
//!
//! These tests validate that the ocean-droplets models and envelope roots decode
//! realistic API responses.

use std::fs;
use std::path::PathBuf;

use chrono::{TimeZone, Utc};
use ocean_core::ids::{ActionId, DropletId, ImageId};
use ocean_core::{Envelope, Response};
use ocean_droplets::roots::{DropletRoot, DropletsRoot};
use reqwest::StatusCode;

/// Get the path to the test fixtures directory.
fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

/// Load a fixture from disk.
fn load_fixture(name: &str) -> String {
    let fixture_path = fixtures_dir().join(name);
    fs::read_to_string(&fixture_path).unwrap_or_else(|e| {
        panic!(
            "Failed to read fixture at {}: {}",
            fixture_path.display(),
            e
        )
    })
}

fn ok() -> Response {
    Response::new(StatusCode::OK)
}

#[test]
fn test_deserialize_droplet_envelope() {
    let json_data = load_fixture("droplet.json");
    let envelope = Envelope::<DropletRoot>::decode(json_data.as_bytes(), &ok())
        .unwrap_or_else(|e| panic!("Failed to decode droplet: {e}\nJSON: {json_data}"));

    assert!(envelope.links.is_none());
    let droplet = envelope.payload;

    assert_eq!(droplet.id, DropletId::new(3_164_494));
    assert_eq!(droplet.name.as_deref(), Some("example.com"));
    assert_eq!(droplet.memory, Some(1024));
    assert_eq!(droplet.vcpus, Some(1));
    assert_eq!(droplet.disk, Some(25));
    assert_eq!(droplet.locked, Some(false));
    assert!(droplet.is_active());
    assert_eq!(
        droplet.created_at,
        Some(Utc.with_ymd_and_hms(2014, 11, 14, 16, 36, 31).unwrap())
    );
    assert_eq!(droplet.backup_ids, vec![ImageId::new(7_938_206)]);
    assert_eq!(droplet.snapshot_ids, vec![ImageId::new(7_938_291)]);
    assert_eq!(droplet.action_ids, vec![ActionId::new(36_804_636)]);
}

#[test]
fn test_droplet_nested_objects() {
    let json_data = load_fixture("droplet.json");
    let droplet = Envelope::<DropletRoot>::decode(json_data.as_bytes(), &ok())
        .unwrap()
        .into_payload();

    let region = droplet.region.as_ref().expect("region");
    assert_eq!(region.slug, "nyc3");
    assert_eq!(region.available, Some(true));
    assert!(region.features.iter().any(|f| f == "ipv6"));

    let image = droplet.image.as_ref().expect("image");
    assert_eq!(image.id, ImageId::new(6_918_990));
    assert_eq!(image.kind.as_deref(), Some("snapshot"));
    assert_eq!(image.min_disk_size, Some(20));

    let size = droplet.size.as_ref().expect("size");
    assert_eq!(size.slug, "s-1vcpu-1gb");
    assert_eq!(size.price_monthly, Some(5.0));

    let networks = droplet.networks.as_ref().expect("networks");
    assert_eq!(networks.v4.len(), 2);
    assert_eq!(networks.v6[0].netmask, Some(64));
    assert_eq!(droplet.public_ipv4(), Some("104.236.32.182"));
    assert_eq!(droplet.private_ipv4(), Some("10.128.0.5"));
}

#[test]
fn test_droplet_envelope_round_trip() {
    let json_data = load_fixture("droplet.json");
    let envelope = Envelope::<DropletRoot>::decode(json_data.as_bytes(), &ok()).unwrap();

    let encoded = serde_json::to_vec(&envelope).unwrap();
    let decoded = Envelope::<DropletRoot>::decode(&encoded, &ok()).unwrap();

    assert_eq!(decoded, envelope);
}

#[test]
fn test_deserialize_droplet_list_with_links() {
    let json_data = load_fixture("droplet_list.json");
    let envelope = Envelope::<DropletsRoot>::decode(json_data.as_bytes(), &ok()).unwrap();

    let mut response = ok();
    let droplets = envelope.propagate_links(&mut response);

    assert_eq!(droplets.len(), 2, "Expected 2 droplets in test data");
    assert_eq!(droplets[1].status.as_deref(), Some("off"));
    assert_eq!(droplets[1].locked, Some(true));
    assert!(droplets[1].networks.is_none());

    let links = response.links.as_ref().expect("links");
    assert_eq!(links.current_page().unwrap(), 2);
    assert!(!links.is_last_page());
    assert!(response.has_next_page());
}

#[test]
fn test_droplet_list_round_trip() {
    let json_data = load_fixture("droplet_list.json");
    let envelope = Envelope::<DropletsRoot>::decode(json_data.as_bytes(), &ok()).unwrap();

    let encoded = serde_json::to_string(&envelope).unwrap();
    let decoded = Envelope::<DropletsRoot>::decode(encoded.as_bytes(), &ok()).unwrap();

    assert_eq!(decoded.payload, envelope.payload);
    assert_eq!(decoded.links, envelope.links);
}
