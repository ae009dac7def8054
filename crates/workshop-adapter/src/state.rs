//! ---
//! ems_section: "03-adapters"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Workshop controller and adapter."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use serde_json::{json, Value};
use tracing::{debug, info};
use workshop_tree::{FieldError, ParamSource};

use crate::options::WorkshopOptions;

/// Tags of the field leaves in the workshop tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    ExampleParam,
    NumVal,
    RandNum,
    IsEven,
    HalfNum,
    SelectionList,
    Selected,
    Toggle,
    Trigger,
    UpdateCount,
    TriggerCount,
    Adapters,
}

/// Domain state of one workshop controller.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkshopState {
    pub(crate) example_param: String,
    pub(crate) num_val: i64,
    pub(crate) rand_num: i64,
    pub(crate) selection_list: Vec<String>,
    pub(crate) selected: String,
    pub(crate) toggle: bool,
    pub(crate) update_count: u64,
    pub(crate) trigger_count: u64,
    pub(crate) adapters: Vec<String>,
}

impl WorkshopState {
    pub fn from_options(options: &WorkshopOptions) -> Self {
        Self {
            example_param: options.example_param.clone(),
            num_val: options.num_val,
            rand_num: 0,
            selection_list: options.selection_list.clone(),
            selected: options.initial_selection().to_owned(),
            toggle: options.toggle,
            update_count: 0,
            trigger_count: 0,
            adapters: Vec::new(),
        }
    }

    pub fn update_count(&self) -> u64 {
        self.update_count
    }

    pub fn trigger_count(&self) -> u64 {
        self.trigger_count
    }

    pub fn rand_num(&self) -> i64 {
        self.rand_num
    }
}

impl ParamSource<Field> for WorkshopState {
    fn read(&self, field: Field) -> Value {
        match field {
            Field::ExampleParam => json!(self.example_param),
            Field::NumVal => json!(self.num_val),
            Field::RandNum => json!(self.rand_num),
            Field::IsEven => json!(self.num_val % 2 == 0),
            Field::HalfNum => json!(self.num_val as f64 / 2.0),
            Field::SelectionList => json!(self.selection_list),
            Field::Selected => json!(self.selected),
            Field::Toggle => json!(self.toggle),
            Field::UpdateCount => json!(self.update_count),
            Field::TriggerCount => json!(self.trigger_count),
            Field::Adapters => json!(self.adapters),
            Field::Trigger => Value::Null,
        }
    }

    fn check(&self, field: Field, value: &Value) -> Result<(), FieldError> {
        let representable = match field {
            Field::ExampleParam => value.is_string(),
            Field::NumVal => value.is_i64(),
            Field::Toggle => value.is_boolean(),
            _ => true,
        };
        if representable {
            Ok(())
        } else {
            Err(FieldError::Coercion {
                expected: coercion_target(field),
            })
        }
    }

    fn write(&mut self, field: Field, value: Value) -> Result<(), FieldError> {
        match field {
            Field::ExampleParam => {
                self.example_param = value
                    .as_str()
                    .ok_or(FieldError::Coercion {
                        expected: coercion_target(field),
                    })?
                    .to_owned();
            }
            Field::NumVal => {
                self.num_val = value
                    .as_i64()
                    .ok_or(FieldError::Coercion {
                        expected: coercion_target(field),
                    })?;
            }
            Field::Selected => match value.as_str() {
                Some(choice) if self.selection_list.iter().any(|option| option == choice) => {
                    self.selected = choice.to_owned();
                }
                _ => debug!(value = %value, "ignoring selection outside the option list"),
            },
            Field::Toggle => {
                self.toggle = value
                    .as_bool()
                    .ok_or(FieldError::Coercion {
                        expected: coercion_target(field),
                    })?;
            }
            Field::Trigger => {
                self.trigger_count += 1;
                info!(value = %value, count = self.trigger_count, "trigger fired");
            }
            Field::RandNum
            | Field::IsEven
            | Field::HalfNum
            | Field::SelectionList
            | Field::UpdateCount
            | Field::TriggerCount
            | Field::Adapters => {
                return Err(FieldError::Rejected(format!("{field:?} has no setter")));
            }
        }
        Ok(())
    }
}

fn coercion_target(field: Field) -> &'static str {
    match field {
        Field::ExampleParam => "str",
        Field::NumVal => "int",
        Field::Toggle => "bool",
        _ => "value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> WorkshopState {
        WorkshopState::from_options(&WorkshopOptions::default())
    }

    #[test]
    fn computed_fields_follow_num_val() {
        let mut state = state();
        assert_eq!(state.read(Field::IsEven), json!(true));
        assert_eq!(state.read(Field::HalfNum), json!(5.0));
        state.write(Field::NumVal, json!(7)).unwrap();
        assert_eq!(state.read(Field::IsEven), json!(false));
        assert_eq!(state.read(Field::HalfNum), json!(3.5));
        state.write(Field::NumVal, json!(-3)).unwrap();
        assert_eq!(state.read(Field::IsEven), json!(false));
    }

    #[test]
    fn selection_outside_the_list_is_ignored() {
        let mut state = state();
        state.write(Field::Selected, json!("delta")).unwrap();
        assert_eq!(state.selected, "alpha");
        state.write(Field::Selected, json!("beta")).unwrap();
        assert_eq!(state.selected, "beta");
    }

    #[test]
    fn unrepresentable_values_are_coercion_errors() {
        let mut state = state();
        let err = state.check(Field::NumVal, &json!(u64::MAX)).unwrap_err();
        assert_eq!(err, FieldError::Coercion { expected: "int" });
        let err = state.write(Field::NumVal, json!(u64::MAX)).unwrap_err();
        assert_eq!(err, FieldError::Coercion { expected: "int" });
        assert_eq!(state.num_val, 10);
        assert!(state.check(Field::NumVal, &json!(-4)).is_ok());
        assert!(state.check(Field::Trigger, &json!({ "any": "thing" })).is_ok());
    }
}
