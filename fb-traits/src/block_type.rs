//! The contract every block type implements (§4.C).
//!
//! A block type is stateless with respect to any one instance: all
//! per-instance state lives in the [`BlockState`] the kernel hands it.
//! Implementors should be a unit struct (or hold only shared, immutable
//! configuration such as a driver factory) so one `&dyn BlockType` can back
//! every live instance of that type.

use crate::attrs::{ConfigAttrs, InputAttrs, OutputAttrs};
use crate::exec_method::ExecMethod;
use crate::state::{BlockState, Definition};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpgradeError(pub String);

impl fmt::Display for UpgradeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot upgrade definition: {}", self.0)
    }
}

impl std::error::Error for UpgradeError {}

pub trait BlockType: Send + Sync {
    /// The tag this type registers under (the `block_type` config value).
    fn type_name(&self) -> &'static str;

    /// The version stamped into newly created definitions.
    fn version(&self) -> &'static str;

    /// Type-specific configs merged over the common ones.
    fn default_configs(&self, name: &str, description: &str) -> ConfigAttrs;

    /// Type-specific inputs merged over the common ones.
    fn default_inputs(&self) -> InputAttrs;

    /// Type-specific outputs merged over the common ones.
    fn default_outputs(&self) -> OutputAttrs;

    /// Builds a fresh definition, merging instance overrides over this
    /// type's defaults.
    fn create(
        &self,
        name: &str,
        description: &str,
        init_cfg: ConfigAttrs,
        init_in: InputAttrs,
        init_out: OutputAttrs,
    ) -> Definition {
        Definition::new(
            ConfigAttrs::merge(self.default_configs(name, description), init_cfg),
            InputAttrs::merge(self.default_inputs(), init_in),
            OutputAttrs::merge(self.default_outputs(), init_out),
        )
    }

    /// Reconciles a persisted definition from an older code version. The
    /// default just restamps `version`; types with a real migration to do
    /// override this.
    fn upgrade(&self, mut def: Definition) -> Result<Definition, UpgradeError> {
        def.config
            .set(crate::common::VERSION, fb_value::Value::Str(self.version().to_string()))
            .map_err(|e| UpgradeError(e.to_string()))?;
        Ok(def)
    }

    /// Type-specific setup: read config, acquire drivers, populate private
    /// attributes, set an initial output value/status.
    fn initialize(&self, state: BlockState) -> BlockState;

    /// Reads inputs, computes outputs, sets `value` and `status`. Must not
    /// touch `exec_count`, `last_exec`, or attempt to propagate — the
    /// kernel owns both.
    fn execute(&self, state: BlockState, exec_method: ExecMethod) -> BlockState;

    /// Releases drivers and returns the pruned definition.
    fn delete(&self, state: BlockState) -> Definition {
        state.into_definition()
    }
}
