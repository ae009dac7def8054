//! ---
//! ems_section: "15-testing-qa-runbook"
//! ems_subsection: "integration-tests"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Integration and validation tests for the Workshop stack."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde_json::json;
use workshop_adapter::{WorkshopAdapter, MODULE_NAME};
use workshop_common::AppConfig;
use workshop_host::{AdapterCatalog, AdapterHost};

fn shipped_config() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../configs/workshop.toml")
}

#[test]
fn shipped_config_builds_every_adapter() {
    let config = AppConfig::from_path(&shipped_config()).unwrap();
    let catalog = AdapterCatalog::new().with(MODULE_NAME, WorkshopAdapter::factory);
    let adapters = catalog.create_all(&config.adapters).unwrap();
    let names: Vec<&String> = adapters.keys().collect();
    assert_eq!(names, vec!["workshop", "scratch"]);
    assert_eq!(
        adapters["workshop"].get("info/label", false).unwrap(),
        json!("bench")
    );
}

#[tokio::test(start_paused = true)]
async fn shipped_config_runs_under_the_host() {
    let config = AppConfig::from_path(&shipped_config()).unwrap();
    let catalog = AdapterCatalog::new().with(MODULE_NAME, WorkshopAdapter::factory);
    let runtime = AdapterHost::from_adapters(catalog.create_all(&config.adapters).unwrap()).start();
    let host = runtime.handle();

    tokio::time::sleep(Duration::from_millis(2100)).await;
    assert_eq!(host.get("workshop", "info/update_count", false).await.unwrap(), json!(4));
    assert_eq!(host.get("scratch", "info/update_count", false).await.unwrap(), json!(1));

    // scratch enforces its bounds, workshop does not.
    host.set("workshop", "num_val", json!(150)).await.unwrap();
    let err = host.set("scratch", "num_val", json!(150)).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "num_val: value 150 is above the maximum of 100"
    );

    let snapshot = host.get("scratch", "", false).await.unwrap();
    assert_eq!(snapshot["info"]["adapters"], json!(["workshop", "scratch"]));
    assert_eq!(snapshot["num_val"], json!(10));

    runtime.shutdown().await.unwrap();
}
