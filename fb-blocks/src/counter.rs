//! `counter`: increments `value` on a configurable edge of a boolean input,
//! with an optional reset and a `carry` flag raised at `final_value`.
//!
//! Grounded on the teacher's `CounterBlock` (`pictorus-blocks::core_blocks::
//! counter_block`), which increments a running count on a truthy input and
//! zeroes it on a truthy reset; this version adds the edge-triggered
//! `trigger` policy and the `final_value`/`carry` wraparound the source
//! spec calls for, since the teacher's static generic counter has no
//! notion of either.

use fb_traits::attrs::{ConfigAttr, InputAttr, OutputAttr};
use fb_traits::{common, BlockState, BlockType, ConfigAttrs, ExecMethod, InputAttrs, OutputAttrs, Status};
use fb_value::Value;
use log::error;
use strum::{Display, EnumString};

pub const TRIGGER: &str = "trigger";
pub const INITIAL_VALUE: &str = "initial_value";
pub const FINAL_VALUE: &str = "final_value";
pub const COUNT: &str = "count";
pub const RESET: &str = "reset";
pub const CARRY: &str = "carry";
const LAST_COUNT: &str = "last_count";

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Trigger {
    AnyChange,
    TrueFalse,
    FalseTrue,
}

impl Trigger {
    fn fires(self, previous: bool, current: bool) -> bool {
        match self {
            Trigger::AnyChange => previous != current,
            Trigger::TrueFalse => previous && !current,
            Trigger::FalseTrue => !previous && current,
        }
    }
}

pub struct CounterBlock;

impl BlockType for CounterBlock {
    fn type_name(&self) -> &'static str {
        "counter"
    }

    fn version(&self) -> &'static str {
        "1.0.0"
    }

    fn default_configs(&self, name: &str, description: &str) -> ConfigAttrs {
        ConfigAttrs::merge(
            common::common_configs(name, self.type_name(), self.version()),
            ConfigAttrs::from_vec(vec![
                ConfigAttr::new(TRIGGER, Value::Tag(Trigger::FalseTrue.to_string())),
                ConfigAttr::new(INITIAL_VALUE, Value::Int(0)),
                ConfigAttr::new(FINAL_VALUE, Value::Int(i64::MAX)),
            ]),
        )
    }

    fn default_inputs(&self) -> InputAttrs {
        InputAttrs::merge(
            common::common_inputs(),
            InputAttrs::from_vec(vec![
                InputAttr::new(COUNT, Value::Bool(false)),
                InputAttr::new(RESET, Value::Bool(false)),
            ]),
        )
    }

    fn default_outputs(&self) -> OutputAttrs {
        OutputAttrs::merge(
            common::common_outputs(),
            OutputAttrs::from_vec(vec![OutputAttr::new(CARRY, Value::NotActive)]),
        )
    }

    fn initialize(&self, mut state: BlockState) -> BlockState {
        let initial = state
            .config
            .get(INITIAL_VALUE)
            .and_then(|a| a.value.as_int())
            .unwrap_or(0);
        let count = state
            .inputs
            .get(COUNT)
            .and_then(|a| a.value.as_bool())
            .unwrap_or(false);
        let _ = state.outputs.set(common::VALUE, Value::Int(initial));
        let _ = state
            .outputs
            .set(common::STATUS, Value::Tag(Status::Initialized.tag().to_string()));
        let _ = state
            .private
            .add(fb_traits::attrs::PrivateAttr::new(LAST_COUNT, Value::Bool(count)));
        state
    }

    fn execute(&self, mut state: BlockState, _exec_method: ExecMethod) -> BlockState {
        let trigger = state
            .config
            .get(TRIGGER)
            .and_then(|a| a.value.as_tag())
            .and_then(|t| t.parse::<Trigger>().ok());
        let Some(trigger) = trigger else {
            error!("block `{}`: `trigger` config is missing or not a recognized tag", state.name);
            let _ = state
                .outputs
                .set(common::STATUS, Value::Tag(Status::ConfigError.tag().to_string()));
            return state;
        };

        let initial_value = match state.config.get(INITIAL_VALUE).and_then(|a| a.value.as_int()) {
            Some(v) => v,
            None => {
                let _ = state
                    .outputs
                    .set(common::STATUS, Value::Tag(Status::ConfigError.tag().to_string()));
                return state;
            }
        };
        let final_value = match state.config.get(FINAL_VALUE).and_then(|a| a.value.as_int()) {
            Some(v) => v,
            None => {
                let _ = state
                    .outputs
                    .set(common::STATUS, Value::Tag(Status::ConfigError.tag().to_string()));
                return state;
            }
        };

        let reset = state.inputs.get(RESET).and_then(|a| a.value.as_bool()).unwrap_or(false);
        let count = match state.inputs.get(COUNT).and_then(|a| a.value.as_bool()) {
            Some(v) => v,
            None => {
                let _ = state
                    .outputs
                    .set(common::STATUS, Value::Tag(Status::InputError.tag().to_string()));
                return state;
            }
        };
        let last_count = state
            .private
            .get(LAST_COUNT)
            .and_then(|a| a.value.as_bool())
            .unwrap_or(count);
        let current_value = state
            .outputs
            .get(common::VALUE)
            .and_then(|a| a.value.as_int())
            .unwrap_or(initial_value);
        let was_carried = matches!(state.outputs.get(CARRY).map(|a| &a.value), Some(Value::Bool(true)));
        let current_carry = state.outputs.get(CARRY).map(|a| a.value.clone()).unwrap_or(Value::NotActive);

        let (new_value, new_carry) = if reset {
            (initial_value, Value::NotActive)
        } else if trigger.fires(last_count, count) {
            if was_carried {
                (initial_value, Value::Bool(false))
            } else {
                let incremented = current_value + 1;
                if incremented >= final_value {
                    (final_value, Value::Bool(true))
                } else {
                    // Not yet at final_value: carry stays whatever it already
                    // was (NotActive until the first overflow, Bool(false)
                    // after a wraparound), never forced to Bool(false) here.
                    (incremented, current_carry)
                }
            }
        } else {
            (current_value, current_carry)
        };

        let _ = state.outputs.set(common::VALUE, Value::Int(new_value));
        let _ = state.outputs.set(CARRY, new_carry);
        let _ = state
            .outputs
            .set(common::STATUS, Value::Tag(Status::Normal.tag().to_string()));
        let _ = state.private.set(LAST_COUNT, Value::Bool(count));
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fb_traits::{ConfigAttrs, Definition, InputAttrs, OutputAttrs};
    use rstest::rstest;

    fn build(trigger: Trigger, initial: i64, final_value: i64) -> BlockState {
        let block = CounterBlock;
        let def: Definition = block.create(
            "c",
            "",
            ConfigAttrs::from_vec(vec![
                ConfigAttr::new(TRIGGER, Value::Tag(trigger.to_string())),
                ConfigAttr::new(INITIAL_VALUE, Value::Int(initial)),
                ConfigAttr::new(FINAL_VALUE, Value::Int(final_value)),
            ]),
            InputAttrs::from_vec(vec![]),
            OutputAttrs::from_vec(vec![]),
        );
        block.initialize(BlockState::from_definition("c".to_string(), block.type_name(), def))
    }

    fn tick(block: &CounterBlock, mut state: BlockState, count: bool) -> BlockState {
        state.inputs.set(COUNT, Value::Bool(count)).unwrap();
        block.execute(state, ExecMethod::Manual)
    }

    #[test]
    fn scenario_counter_basic() {
        let block = CounterBlock;
        let mut state = build(Trigger::FalseTrue, 0, 9);
        let sequence = [false, true, true, false, true];
        let expected = [0, 1, 1, 1, 2];
        for (count, want) in sequence.iter().zip(expected.iter()) {
            state = tick(&block, state, *count);
            assert_eq!(state.outputs.get(common::VALUE).unwrap().value, Value::Int(*want));
            assert_eq!(state.outputs.get(CARRY).unwrap().value, Value::NotActive);
        }
    }

    #[test]
    fn scenario_counter_rollover() {
        let block = CounterBlock;
        let mut state = build(Trigger::FalseTrue, 0, 9);

        for expected in 1..=9 {
            state = tick(&block, state, false);
            state = tick(&block, state, true);
            assert_eq!(state.outputs.get(common::VALUE).unwrap().value, Value::Int(expected));
        }
        assert_eq!(state.outputs.get(CARRY).unwrap().value, Value::Bool(true));

        state = tick(&block, state, false);
        state = tick(&block, state, true);
        assert_eq!(state.outputs.get(common::VALUE).unwrap().value, Value::Int(0));
        assert_eq!(state.outputs.get(CARRY).unwrap().value, Value::Bool(false));
    }

    #[test]
    fn reset_forces_initial_value() {
        let block = CounterBlock;
        let mut state = build(Trigger::FalseTrue, 5, 9);
        state = tick(&block, state, true);
        assert_eq!(state.outputs.get(common::VALUE).unwrap().value, Value::Int(6));
        state.inputs.set(RESET, Value::Bool(true)).unwrap();
        state = tick(&block, state, false);
        assert_eq!(state.outputs.get(common::VALUE).unwrap().value, Value::Int(5));
    }

    #[test]
    fn any_change_trigger_fires_on_both_edges() {
        let trigger = Trigger::AnyChange;
        assert!(trigger.fires(false, true));
        assert!(trigger.fires(true, false));
        assert!(!trigger.fires(true, true));
    }

    #[rstest]
    #[case(Trigger::FalseTrue, false, true, true)]
    #[case(Trigger::FalseTrue, true, false, false)]
    #[case(Trigger::TrueFalse, true, false, true)]
    #[case(Trigger::TrueFalse, false, true, false)]
    #[case(Trigger::AnyChange, false, true, true)]
    #[case(Trigger::AnyChange, true, true, false)]
    fn trigger_fires_matches_policy(
        #[case] trigger: Trigger,
        #[case] previous: bool,
        #[case] current: bool,
        #[case] expected: bool,
    ) {
        assert_eq!(trigger.fires(previous, current), expected);
    }
}
