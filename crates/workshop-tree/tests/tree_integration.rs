//! ---
//! ems_section: "02-parameter-tree"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Path-addressable parameter tree."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use serde_json::{json, Value};
use workshop_tree::{FieldError, Metadata, Node, ParamSource, ParameterTree, TreeError};

#[derive(Debug, Clone, Copy)]
enum Pump {
    Speed,
    Running,
    Mode,
}

struct PumpState {
    speed: f64,
    running: bool,
    mode: String,
}

impl ParamSource<Pump> for PumpState {
    fn read(&self, field: Pump) -> Value {
        match field {
            Pump::Speed => json!(self.speed),
            Pump::Running => json!(self.running),
            Pump::Mode => json!(self.mode),
        }
    }

    fn write(&mut self, field: Pump, value: Value) -> Result<(), FieldError> {
        match field {
            Pump::Speed => {
                self.speed = value
                    .as_f64()
                    .ok_or(FieldError::Coercion { expected: "f64" })?
            }
            Pump::Running => self.running = value.as_bool().unwrap_or(self.running),
            Pump::Mode => match value.as_str() {
                Some(mode @ ("auto" | "manual")) => self.mode = mode.to_owned(),
                _ => return Err(FieldError::Rejected("unsupported mode".into())),
            },
        }
        Ok(())
    }
}

fn plant() -> (ParameterTree<Pump>, PumpState) {
    let tree = ParameterTree::from_children([(
        "pumps",
        Node::branch([(
            "p1",
            Node::branch([
                (
                    "speed",
                    Node::read_write(Pump::Speed)
                        .with_metadata(Metadata::new().with_units("rpm").with_display_precision(1)),
                ),
                ("running", Node::read_write(Pump::Running)),
                ("mode", Node::read_write(Pump::Mode)),
            ]),
        )]),
    )]);
    let state = PumpState {
        speed: 0.0,
        running: false,
        mode: "auto".into(),
    };
    (tree, state)
}

#[test]
fn nested_merge_reaches_every_level() {
    let (mut tree, mut state) = plant();
    tree.set(
        "pumps",
        json!({"p1": {"speed": 1200, "running": true}}),
        &mut state,
    )
    .unwrap();
    assert_eq!(
        tree.get("pumps/p1", false, &state).unwrap(),
        json!({"speed": 1200.0, "running": true, "mode": "auto"})
    );
}

#[test]
fn metadata_snapshot_pairs_values_with_declarations() {
    let (tree, state) = plant();
    let described = tree.get("pumps/p1", true, &state).unwrap();
    assert_eq!(described["speed"]["units"], "rpm");
    assert_eq!(described["speed"]["display_precision"], json!(1));
    assert_eq!(
        described["running"],
        json!({"type": "bool", "writeable": true, "value": false})
    );
}

#[test]
fn setter_rejection_carries_the_reason() {
    let (mut tree, mut state) = plant();
    let err = tree
        .set("pumps/p1/mode", json!("turbo"), &mut state)
        .unwrap_err();
    assert!(matches!(err, TreeError::Setter { .. }));
    assert_eq!(err.to_string(), "Failed to set pumps/p1/mode: unsupported mode");
    assert_eq!(state.mode, "auto");
}
