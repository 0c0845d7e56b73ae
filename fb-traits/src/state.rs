//! The runtime tuple binding a block to its attribute sets (§4.D).

use crate::attrs::{ConfigAttrs, InputAttrs, OutputAttrs, PrivateAttrs};
use crate::common;
use serde::{Deserialize, Serialize};

/// What gets persisted: config, inputs, outputs, no private state. Timer
/// handles and counters never survive a save/load round trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Definition {
    pub config: ConfigAttrs,
    pub inputs: InputAttrs,
    pub outputs: OutputAttrs,
}

impl Definition {
    pub fn new(config: ConfigAttrs, inputs: InputAttrs, outputs: OutputAttrs) -> Self {
        Self {
            config,
            inputs,
            outputs,
        }
    }

    pub fn block_name(&self) -> &str {
        self.config
            .get(common::BLOCK_NAME)
            .and_then(|a| a.value.as_str())
            .unwrap_or_default()
    }

    pub fn block_type(&self) -> &str {
        self.config
            .get(common::BLOCK_TYPE)
            .and_then(|a| a.value.as_str())
            .unwrap_or_default()
    }
}

/// The full runtime state of one block instance: its definition plus the
/// private attributes the kernel and type-specific code use between ticks.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockState {
    pub name: String,
    pub module: &'static str,
    pub config: ConfigAttrs,
    pub inputs: InputAttrs,
    pub outputs: OutputAttrs,
    pub private: PrivateAttrs,
}

impl BlockState {
    pub fn from_definition(name: String, module: &'static str, def: Definition) -> Self {
        Self {
            name,
            module,
            config: def.config,
            inputs: def.inputs,
            outputs: def.outputs,
            private: common::common_private(),
        }
    }

    /// Strips private state, yielding the persistable shape.
    pub fn into_definition(self) -> Definition {
        Definition {
            config: self.config,
            inputs: self.inputs,
            outputs: self.outputs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn definition_round_trips_into_state_and_back() {
        let def = Definition::new(
            common::common_configs("c1", "counter", "1.0.0"),
            common::common_inputs(),
            common::common_outputs(),
        );
        let state = BlockState::from_definition("c1".to_string(), "counter", def.clone());
        assert_eq!(state.private.names(), common::common_private().names());
        assert_eq!(state.into_definition(), def);
    }

    #[test]
    fn block_name_and_type_read_from_config() {
        let def = Definition::new(
            common::common_configs("c1", "counter", "1.0.0"),
            common::common_inputs(),
            common::common_outputs(),
        );
        assert_eq!(def.block_name(), "c1");
        assert_eq!(def.block_type(), "counter");
    }
}
