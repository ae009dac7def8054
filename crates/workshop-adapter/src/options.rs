//! ---
//! ems_section: "03-adapters"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Workshop controller and adapter."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use std::time::Duration;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_with::{serde_as, DurationMilliSeconds};

use crate::error::ControllerError;

/// Construction options of a workshop adapter, read from the host's opaque option map.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorkshopOptions {
    pub example_param: String,
    pub num_val: i64,
    pub num_min: i64,
    pub num_max: i64,
    pub selection_list: Vec<String>,
    /// Initial selection; the first entry of `selection_list` when absent.
    pub selected: Option<String>,
    pub toggle: bool,
    pub label: String,
    #[serde(rename = "update_interval_ms")]
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub update_interval: Duration,
    /// Seed for the random-number updater; entropy when absent.
    pub random_seed: Option<u64>,
    /// Reject writes outside the declared `num_min`/`num_max`.
    pub enforce_bounds: bool,
}

impl Default for WorkshopOptions {
    fn default() -> Self {
        Self {
            example_param: "Example".into(),
            num_val: 10,
            num_min: 0,
            num_max: 100,
            selection_list: vec!["alpha".into(), "beta".into(), "gamma".into()],
            selected: None,
            toggle: false,
            label: "workshop".into(),
            update_interval: Duration::from_millis(500),
            random_seed: None,
            enforce_bounds: false,
        }
    }
}

impl WorkshopOptions {
    /// Decode and validate the options table of an adapter configuration.
    pub fn from_map(options: &IndexMap<String, Value>) -> Result<Self, ControllerError> {
        let table = Value::Object(
            options
                .iter()
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        );
        let options: Self =
            serde_json::from_value(table).map_err(|err| ControllerError::options(err.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<(), ControllerError> {
        if self.selection_list.is_empty() {
            return Err(ControllerError::options("selection_list must not be empty"));
        }
        if let Some(selected) = &self.selected {
            if !self.selection_list.contains(selected) {
                return Err(ControllerError::options(format!(
                    "selected value '{selected}' is not in selection_list"
                )));
            }
        }
        if self.update_interval.is_zero() {
            return Err(ControllerError::options("update_interval_ms must be greater than zero"));
        }
        if self.num_min > self.num_max {
            return Err(ControllerError::options(format!(
                "num_min ({}) exceeds num_max ({})",
                self.num_min, self.num_max
            )));
        }
        Ok(())
    }

    /// Effective initial selection.
    pub fn initial_selection(&self) -> &str {
        self.selected
            .as_deref()
            .or_else(|| self.selection_list.first().map(String::as_str))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(entries: Value) -> IndexMap<String, Value> {
        serde_json::from_value(entries).unwrap()
    }

    #[test]
    fn empty_map_gives_defaults() {
        let options = WorkshopOptions::from_map(&IndexMap::new()).unwrap();
        assert_eq!(options, WorkshopOptions::default());
        assert_eq!(options.initial_selection(), "alpha");
        assert_eq!(options.update_interval, Duration::from_millis(500));
    }

    #[test]
    fn interval_is_read_in_milliseconds() {
        let options = WorkshopOptions::from_map(&map(json!({
            "update_interval_ms": 250,
            "selected": "gamma",
            "random_seed": 7
        })))
        .unwrap();
        assert_eq!(options.update_interval, Duration::from_millis(250));
        assert_eq!(options.initial_selection(), "gamma");
        assert_eq!(options.random_seed, Some(7));
    }

    #[test]
    fn invalid_options_are_rejected() {
        for entries in [
            json!({ "selection_list": [] }),
            json!({ "selected": "delta" }),
            json!({ "update_interval_ms": 0 }),
            json!({ "num_min": 5, "num_max": 1 }),
            json!({ "colour": "red" }),
            json!({ "num_val": "ten" }),
        ] {
            let err = WorkshopOptions::from_map(&map(entries.clone())).unwrap_err();
            assert!(
                matches!(err, ControllerError::Options(_)),
                "{entries} should be rejected, got {err:?}"
            );
        }
    }
}
