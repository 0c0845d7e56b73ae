//! `gpio_do`: a digital output block, writing a boolean input to a pin
//! through an `embedded-hal`-shaped driver.
//!
//! Grounded on the teacher's `RenesasOutputPin` (`pictorus-renesas::
//! gpio_protocol`, `set_high`/`set_low` over `embedded_hal::digital::
//! OutputPin`), keeping that trait shape while swapping the teacher's
//! board-addressed HAL pin for a software-simulated one so the block is
//! exercisable outside real hardware.

use embedded_hal::digital::{Error as HalError, ErrorKind, ErrorType, OutputPin};
use fb_traits::attrs::{ConfigAttr, InputAttr};
use fb_traits::{common, BlockState, BlockType, ConfigAttrs, ExecMethod, InputAttrs, OutputAttrs, Status};
use fb_value::Value;
use log::error;
use std::fmt;

pub const GPIO_PIN: &str = "gpio_pin";
pub const DEFAULT_VALUE: &str = "default_value";
pub const INVERT_OUTPUT: &str = "invert_output";
pub const INPUT: &str = "input";
const PIN_STATE: &str = "pin_state";

/// Never actually fails; exists so the block's plumbing matches a real
/// fallible `OutputPin` implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatedPinError;

impl fmt::Display for SimulatedPinError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "simulated pin error")
    }
}

impl std::error::Error for SimulatedPinError {}

impl HalError for SimulatedPinError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// A software-backed stand-in for a board's GPIO pin, shaped like
/// `embedded_hal::digital::OutputPin` so the block's driving code is the
/// same as it would be against real hardware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatedPin {
    pub pin_number: i64,
    pub state: bool,
}

impl SimulatedPin {
    pub fn acquire(pin_number: i64) -> Self {
        Self {
            pin_number,
            state: false,
        }
    }

    fn write(&mut self, high: bool) {
        if high {
            self.set_high().ok();
        } else {
            self.set_low().ok();
        }
    }
}

impl ErrorType for SimulatedPin {
    type Error = SimulatedPinError;
}

impl OutputPin for SimulatedPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.state = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.state = true;
        Ok(())
    }
}

pub struct GpioDoBlock;

impl BlockType for GpioDoBlock {
    fn type_name(&self) -> &'static str {
        "gpio_do"
    }

    fn version(&self) -> &'static str {
        "1.0.0"
    }

    fn default_configs(&self, name: &str, description: &str) -> ConfigAttrs {
        ConfigAttrs::merge(
            common::common_configs(name, self.type_name(), self.version()),
            ConfigAttrs::from_vec(vec![
                ConfigAttr::new(GPIO_PIN, Value::Int(0)),
                ConfigAttr::new(DEFAULT_VALUE, Value::Bool(false)),
                ConfigAttr::new(INVERT_OUTPUT, Value::Bool(false)),
            ]),
        )
    }

    fn default_inputs(&self) -> InputAttrs {
        InputAttrs::merge(
            common::common_inputs(),
            InputAttrs::from_vec(vec![InputAttr::new(INPUT, Value::Bool(false))]),
        )
    }

    fn default_outputs(&self) -> OutputAttrs {
        common::common_outputs()
    }

    fn initialize(&self, mut state: BlockState) -> BlockState {
        let pin_number = state
            .config
            .get(GPIO_PIN)
            .and_then(|a| a.value.as_int())
            .unwrap_or(0);
        let default_value = state
            .config
            .get(DEFAULT_VALUE)
            .and_then(|a| a.value.as_bool())
            .unwrap_or(false);
        let invert = state
            .config
            .get(INVERT_OUTPUT)
            .and_then(|a| a.value.as_bool())
            .unwrap_or(false);

        let mut pin = SimulatedPin::acquire(pin_number);
        let written = default_value ^ invert;
        pin.write(written);

        let _ = state
            .private
            .add(fb_traits::attrs::PrivateAttr::new(PIN_STATE, Value::Bool(pin.state)));
        let _ = state.outputs.set(common::VALUE, Value::Bool(written));
        let _ = state
            .outputs
            .set(common::STATUS, Value::Tag(Status::Initialized.tag().to_string()));
        state
    }

    fn execute(&self, mut state: BlockState, _exec_method: ExecMethod) -> BlockState {
        let invert = match state.config.get(INVERT_OUTPUT).and_then(|a| a.value.as_bool()) {
            Some(v) => v,
            None => {
                let _ = state
                    .outputs
                    .set(common::STATUS, Value::Tag(Status::ConfigError.tag().to_string()));
                return state;
            }
        };
        let input = match state.inputs.get(INPUT).and_then(|a| a.value.as_bool()) {
            Some(v) => v,
            None => {
                error!("block `{}`: `input` is not a bool", state.name);
                let _ = state
                    .outputs
                    .set(common::STATUS, Value::Tag(Status::InputError.tag().to_string()));
                return state;
            }
        };
        let pin_number = state
            .config
            .get(GPIO_PIN)
            .and_then(|a| a.value.as_int())
            .unwrap_or(0);

        let mut pin = SimulatedPin::acquire(pin_number);
        let written = input ^ invert;
        pin.write(written);

        let _ = state.private.set(PIN_STATE, Value::Bool(pin.state));
        let _ = state.outputs.set(common::VALUE, Value::Bool(written));
        let _ = state
            .outputs
            .set(common::STATUS, Value::Tag(Status::Normal.tag().to_string()));
        state
    }

    fn delete(&self, state: BlockState) -> fb_traits::Definition {
        state.into_definition()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fb_traits::{ConfigAttrs, Definition, InputAttrs, OutputAttrs};

    fn build(default_value: bool, invert: bool) -> BlockState {
        let block = GpioDoBlock;
        let def: Definition = block.create(
            "gp",
            "",
            ConfigAttrs::from_vec(vec![
                ConfigAttr::new(GPIO_PIN, Value::Int(4)),
                ConfigAttr::new(DEFAULT_VALUE, Value::Bool(default_value)),
                ConfigAttr::new(INVERT_OUTPUT, Value::Bool(invert)),
            ]),
            InputAttrs::from_vec(vec![]),
            OutputAttrs::from_vec(vec![]),
        );
        block.initialize(BlockState::from_definition("gp".to_string(), block.type_name(), def))
    }

    #[test]
    fn scenario_digital_output_with_invert() {
        let block = GpioDoBlock;
        let mut state = build(false, true);
        // inverted default: default_value=false XOR invert=true -> written high
        assert_eq!(state.outputs.get(common::VALUE).unwrap().value, Value::Bool(true));

        state.inputs.set(INPUT, Value::Bool(true)).unwrap();
        state = block.execute(state, ExecMethod::Manual);
        // input=true XOR invert=true -> written low
        assert_eq!(state.outputs.get(common::VALUE).unwrap().value, Value::Bool(false));

        state.inputs.set(INPUT, Value::Bool(false)).unwrap();
        state = block.execute(state, ExecMethod::Manual);
        assert_eq!(state.outputs.get(common::VALUE).unwrap().value, Value::Bool(true));
    }

    #[test]
    fn without_invert_value_mirrors_input() {
        let block = GpioDoBlock;
        let mut state = build(false, false);
        state.inputs.set(INPUT, Value::Bool(true)).unwrap();
        state = block.execute(state, ExecMethod::Manual);
        assert_eq!(state.outputs.get(common::VALUE).unwrap().value, Value::Bool(true));
    }

    #[test]
    fn bad_input_type_is_input_error() {
        let block = GpioDoBlock;
        let mut state = build(false, false);
        state.inputs.set(INPUT, Value::Str("nope".to_string())).unwrap();
        state = block.execute(state, ExecMethod::Manual);
        assert_eq!(
            state.outputs.get(common::STATUS).unwrap().value,
            Value::Tag(Status::InputError.tag().to_string())
        );
    }
}
