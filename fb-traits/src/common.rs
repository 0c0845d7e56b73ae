//! The attributes every block carries regardless of type (§3 invariant 2).
//!
//! Concrete block types build their defaults by merging their own
//! type-specific attributes over these with [`AttrList::merge`], so a
//! type-specific `default_configs` never has to remember to add
//! `block_name` itself.

use crate::attrs::{ConfigAttr, ConfigAttrs, InputAttr, InputAttrs, OutputAttr, OutputAttrs,
    PrivateAttr, PrivateAttrs};
use crate::exec_method::ExecMethod;
use crate::status::Status;
use fb_value::Value;

pub const BLOCK_NAME: &str = "block_name";
pub const BLOCK_TYPE: &str = "block_type";
pub const VERSION: &str = "version";
pub const EXECUTE_INTERVAL: &str = "execute_interval";

pub const ENABLE: &str = "enable";
pub const EXECUTE_IN: &str = "execute_in";

pub const EXECUTE_OUT: &str = "execute_out";
pub const STATUS: &str = "status";
pub const VALUE: &str = "value";

pub const EXEC_COUNT: &str = "exec_count";
pub const LAST_EXEC: &str = "last_exec";
pub const TIMER_REF: &str = "timer_ref";
pub const EXEC_METHOD: &str = "exec_method";

/// `(block_name, block_type, version, execute_interval)` with the given
/// name/type/version stamped in and no periodic timer armed by default.
pub fn common_configs(name: &str, block_type: &str, version: &str) -> ConfigAttrs {
    ConfigAttrs::from_vec(vec![
        ConfigAttr::new(BLOCK_NAME, Value::Str(name.to_string())),
        ConfigAttr::new(BLOCK_TYPE, Value::Str(block_type.to_string())),
        ConfigAttr::new(VERSION, Value::Str(version.to_string())),
        ConfigAttr::new(EXECUTE_INTERVAL, Value::Int(0)),
    ])
}

/// `(enable, execute_in)`, enabled by default with no inbound control link.
pub fn common_inputs() -> InputAttrs {
    InputAttrs::from_vec(vec![
        InputAttr::new(ENABLE, Value::Bool(true)),
        InputAttr::new(EXECUTE_IN, Value::NotActive),
    ])
}

/// `(execute_out, status, value)`, freshly created and unlinked.
pub fn common_outputs() -> OutputAttrs {
    OutputAttrs::from_vec(vec![
        OutputAttr::new(EXECUTE_OUT, Value::NotActive),
        OutputAttr::new(STATUS, Value::Tag(Status::Created.tag().to_string())),
        OutputAttr::new(VALUE, Value::NotActive),
    ])
}

/// `(exec_count, last_exec, timer_ref, exec_method)`, zeroed/empty.
pub fn common_private() -> PrivateAttrs {
    PrivateAttrs::from_vec(vec![
        PrivateAttr::new(EXEC_COUNT, Value::Int(0)),
        PrivateAttr::new(LAST_EXEC, Value::Int(0)),
        PrivateAttr::new(TIMER_REF, Value::Empty),
        PrivateAttr::new(EXEC_METHOD, Value::Tag(ExecMethod::Manual.tag().to_string())),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn common_configs_carries_the_required_names() {
        let cfg = common_configs("c1", "counter", "1.0.0");
        assert_eq!(
            cfg.names(),
            vec![BLOCK_NAME, BLOCK_TYPE, VERSION, EXECUTE_INTERVAL]
        );
    }

    #[test]
    fn common_inputs_and_outputs_and_private_carry_the_required_names() {
        assert_eq!(common_inputs().names(), vec![ENABLE, EXECUTE_IN]);
        assert_eq!(common_outputs().names(), vec![EXECUTE_OUT, STATUS, VALUE]);
        assert_eq!(
            common_private().names(),
            vec![EXEC_COUNT, LAST_EXEC, TIMER_REF, EXEC_METHOD]
        );
    }
}
