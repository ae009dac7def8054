//! ---
//! ems_section: "01-core-functionality"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Shared primitives and utilities for the adapter host."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use std::fs;

use workshop_common::config::AppConfig;

#[test]
fn first_existing_candidate_wins() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.toml");
    let present = dir.path().join("present.toml");
    fs::write(
        &present,
        "[adapters.workshop]\nmodule = \"workshop\"\n[adapters.workshop.options]\nlabel = \"bench\"\n",
    )
    .unwrap();

    let loaded = AppConfig::load_with_source(&[missing, present.clone()]).unwrap();
    assert_eq!(loaded.source, present);
    assert_eq!(
        loaded.config.adapter("workshop").unwrap().options["label"],
        "bench"
    );
}

#[test]
fn missing_candidates_are_reported() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.toml");
    let err = AppConfig::load(&[missing]).unwrap_err();
    assert!(err.to_string().contains("no configuration files found"));
}

#[test]
fn invalid_file_mentions_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.toml");
    fs::write(&path, "adapters = 3").unwrap();
    let err = AppConfig::from_path(&path).unwrap_err();
    assert!(err.to_string().contains("broken.toml"));
}
