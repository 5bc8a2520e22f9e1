// SPDX-License-Identifier: PMPL-1.0-or-later

//! Campaign reports written to disk.

use probe_memory_model::campaign::{Campaign, CampaignConfig};
use probe_memory_model::memory::Serialized;
use probe_memory_model::report;
use probe_memory_model::types::{CampaignReport, Probe};
use std::fs;

fn finished_campaign() -> CampaignReport {
    let config = CampaignConfig {
        iterations: Some(50),
        seed: Some(9),
        announce: false,
        ..CampaignConfig::new(Probe::ReadBuffering)
    };
    let mut campaign = Campaign::new(config).expect("campaign");
    campaign.run_with::<Serialized>().expect("run")
}

#[test]
fn test_save_json_report() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("rb.json");
    let original = finished_campaign();

    report::save_report(&original, &path).expect("save");

    let loaded: CampaignReport =
        serde_json::from_str(&fs::read_to_string(&path).expect("read")).expect("parse");
    assert_eq!(loaded.probe, Probe::ReadBuffering);
    assert_eq!(loaded.iterations, 50);
    assert_eq!(loaded.seed, 9);
    assert_eq!(loaded.target, "r1=1 r2=1");
    assert_eq!(loaded.outcomes, original.outcomes);
}

#[test]
fn test_save_yaml_report() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("rb.yaml");
    report::save_report(&finished_campaign(), &path).expect("save");

    let loaded: CampaignReport =
        serde_yaml::from_str(&fs::read_to_string(&path).expect("read")).expect("parse");
    assert_eq!(loaded.detections, 0);
    assert_eq!(loaded.probe, Probe::ReadBuffering);
}

#[test]
fn test_unknown_report_extension_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("rb.csv");
    let err = report::save_report(&finished_campaign(), &path).expect_err("csv unsupported");
    assert!(err.to_string().contains("unsupported report extension"));
    assert!(err.to_string().contains("use .json or .yaml"));
    assert!(!path.exists());
}
