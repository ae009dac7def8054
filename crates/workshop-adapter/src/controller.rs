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
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::Value;
use tracing::{debug, error, info, trace};
use workshop_host::AdapterDirectory;
use workshop_tree::{BoundsPolicy, Metadata, Node, ParameterTree};

use crate::error::ControllerError;
use crate::options::WorkshopOptions;
use crate::state::{Field, WorkshopState};

/// Inclusive range drawn by the periodic updater.
pub const RAND_RANGE: std::ops::RangeInclusive<i64> = 0..=100;

/// Owner of the workshop state and the tree addressing it.
#[derive(Debug)]
pub struct WorkshopController {
    tree: ParameterTree<Field>,
    state: WorkshopState,
    rng: StdRng,
    update_interval: Duration,
    adapters: AdapterDirectory,
}

impl WorkshopController {
    pub fn new(options: WorkshopOptions) -> Result<Self, ControllerError> {
        options.validate()?;
        let mut rng = match options.random_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut state = WorkshopState::from_options(&options);
        state.rand_num = rng.gen_range(RAND_RANGE);

        let bounds = if options.enforce_bounds {
            BoundsPolicy::Enforced
        } else {
            BoundsPolicy::Advisory
        };
        let tree = build_tree(&options).with_bounds_policy(bounds);
        debug!(
            interval_ms = options.update_interval.as_millis() as u64,
            bounds = ?bounds,
            "workshop controller created"
        );
        Ok(Self {
            tree,
            state,
            rng,
            update_interval: options.update_interval,
            adapters: AdapterDirectory::default(),
        })
    }

    /// Build from the host's opaque option map.
    pub fn from_options(options: &IndexMap<String, Value>) -> Result<Self, ControllerError> {
        Self::new(WorkshopOptions::from_map(options)?)
    }

    /// Record the sibling adapters loaded alongside this one.
    pub fn initialize(&mut self, adapters: &AdapterDirectory) {
        self.state.adapters = adapters.names().map(str::to_owned).collect();
        self.adapters = adapters.clone();
        debug!(adapters = ?self.state.adapters, "adapters initialised");
    }

    pub fn cleanup(&mut self) {
        info!(
            updates = self.state.update_count,
            triggers = self.state.trigger_count,
            "cleaning up workshop controller"
        );
    }

    pub fn get(&self, path: &str, with_metadata: bool) -> Result<Value, ControllerError> {
        self.tree
            .get(path, with_metadata, &self.state)
            .map_err(|err| {
                error!(path, error = %err, "parameter get failed");
                ControllerError::from(err)
            })
    }

    pub fn set(&mut self, path: &str, data: Value) -> Result<(), ControllerError> {
        self.tree.set(path, data, &mut self.state).map_err(|err| {
            error!(path, error = %err, "parameter set failed");
            ControllerError::from(err)
        })
    }

    /// Body of the periodic updater: draw a new `rand_num`.
    pub fn tick(&mut self) {
        self.state.rand_num = self.rng.gen_range(RAND_RANGE);
        self.state.update_count += 1;
        trace!(
            rand_num = self.state.rand_num,
            count = self.state.update_count,
            "workshop values updated"
        );
    }

    pub fn update_interval(&self) -> Duration {
        self.update_interval
    }

    pub fn state(&self) -> &WorkshopState {
        &self.state
    }

    /// Handles to the sibling adapters recorded by [`Self::initialize`].
    pub fn adapters(&self) -> &AdapterDirectory {
        &self.adapters
    }
}

fn build_tree(options: &WorkshopOptions) -> ParameterTree<Field> {
    ParameterTree::from_children([
        (
            "example_param",
            Node::read_write(Field::ExampleParam)
                .with_metadata(Metadata::new().with_description("Free-form example string")),
        ),
        (
            "num_val",
            Node::read_write(Field::NumVal).with_metadata(
                Metadata::new()
                    .with_name("Number")
                    .with_min(options.num_min)
                    .with_max(options.num_max),
            ),
        ),
        (
            "rand_num",
            Node::read_only(Field::RandNum).with_metadata(
                Metadata::new()
                    .with_description("Refreshed by the periodic updater")
                    .with_min(*RAND_RANGE.start())
                    .with_max(*RAND_RANGE.end()),
            ),
        ),
        ("is_even", Node::read_only(Field::IsEven)),
        (
            "half_num",
            Node::read_only(Field::HalfNum)
                .with_metadata(Metadata::new().with_display_precision(1)),
        ),
        ("selection_list", Node::read_only(Field::SelectionList)),
        (
            "selected",
            Node::read_write(Field::Selected).with_metadata(
                Metadata::new().with_allowed_values(options.selection_list.iter().cloned()),
            ),
        ),
        ("toggle", Node::read_write(Field::Toggle)),
        ("trigger", Node::write_only(Field::Trigger)),
        (
            "info",
            Node::branch([
                ("version", Node::constant(env!("CARGO_PKG_VERSION"))),
                ("label", Node::value(options.label.clone())),
                ("update_count", Node::read_only(Field::UpdateCount)),
                ("trigger_count", Node::read_only(Field::TriggerCount)),
                ("adapters", Node::read_only(Field::Adapters)),
            ]),
        ),
    ])
}
