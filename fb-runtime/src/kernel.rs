//! The generic per-tick execution cycle (§4.E).
//!
//! This module is deliberately pure: it never touches the registry, the
//! timer scheduler, or a mailbox. It takes a state and an [`ExecMethod`]
//! and hands back a new state plus a description of what should happen
//! next (which blocks to notify, whether to re-arm a timer). The actor in
//! `actor.rs` is the thin, effectful shell that carries those out.

use fb_traits::attrs::OutputAttr;
use fb_traits::common;
use fb_traits::{BlockState, BlockType, ExecMethod, Status};
use fb_value::Value;
use log::{debug, error};
use std::time::{SystemTime, UNIX_EPOCH};

/// What to do with the block's periodic timer after this cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerAction {
    /// Leave whatever timer is armed alone (only used when `execute_interval`
    /// itself could not be read at all, which the common attributes make
    /// unreachable in practice, but the kernel stays defensive about it).
    Unchanged,
    Cancel,
    Arm(u64),
}

/// A dataflow write destined for one or more downstream blocks.
#[derive(Debug, Clone, PartialEq)]
pub struct DataflowMsg {
    pub output_name: String,
    pub value: Value,
    pub targets: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CycleOutcome {
    pub state: BlockState,
    pub dataflow: Vec<DataflowMsg>,
    pub control_targets: Vec<String>,
    pub timer_action: TimerAction,
}

fn now_micros() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_micros() as i64)
        .unwrap_or(0)
}

fn force_outputs_not_active(outputs: &mut fb_traits::OutputAttrs, status: Status) {
    for out in outputs.iter_mut() {
        if out.name == common::STATUS {
            out.value = Value::Tag(status.tag().to_string());
        } else {
            out.value = Value::NotActive;
        }
    }
}

/// Runs one tick of the generic cycle.
pub fn run_cycle(
    block_type: &dyn BlockType,
    mut state: BlockState,
    exec_method: ExecMethod,
) -> CycleOutcome {
    let block_name = state.name.clone();
    let previous_outputs = state.outputs.clone();

    // Step 1: enable gate.
    let enable = state.inputs.get(common::ENABLE).map(|a| a.value.clone());
    let gate = match enable {
        Some(Value::Bool(true)) => None,
        Some(Value::Bool(false)) => Some(Status::Disabled),
        _ => {
            error!("block `{block_name}`: `enable` input is not a boolean");
            Some(Status::InputError)
        }
    };

    if let Some(status) = gate {
        force_outputs_not_active(&mut state.outputs, status);
        debug!("block `{block_name}`: skipped execute ({status})");
        return finish(block_name, state, previous_outputs, exec_method, false);
    }

    // Step 2: delegate to the type-specific execute.
    state = block_type.execute(state, exec_method);

    // Step 3: status check -> exec tracking.
    let status_tag = state
        .outputs
        .get(common::STATUS)
        .and_then(|a| a.value.as_tag())
        .map(|s| s.to_string());
    let normal = status_tag.as_deref() == Some(Status::Normal.tag());

    finish(block_name, state, previous_outputs, exec_method, normal)
}

fn finish(
    block_name: String,
    mut state: BlockState,
    previous_outputs: fb_traits::OutputAttrs,
    exec_method: ExecMethod,
    update_tracking: bool,
) -> CycleOutcome {
    if update_tracking {
        let count = state
            .private
            .get(common::EXEC_COUNT)
            .and_then(|a| a.value.as_int())
            .unwrap_or(0);
        let next_count = if count >= 999_999_999 { 0 } else { count + 1 };
        let _ = state.private.set(common::EXEC_COUNT, Value::Int(next_count));
        let _ = state.private.set(common::LAST_EXEC, Value::Int(now_micros()));
        let _ = state
            .private
            .set(common::EXEC_METHOD, Value::Tag(exec_method.tag().to_string()));
    }

    // Step 4: re-arm timer from `execute_interval`.
    let interval_value = state
        .config
        .get(common::EXECUTE_INTERVAL)
        .map(|a| a.value.clone());
    let timer_action = match interval_value {
        Some(Value::Int(i)) if i > 0 => TimerAction::Arm(i as u64),
        Some(Value::Int(0)) => TimerAction::Cancel,
        Some(Value::Int(_)) => {
            // Negative interval: an input-shaped mistake, not a type mistake.
            error!("block `{block_name}`: `execute_interval` must not be negative");
            force_outputs_not_active(&mut state.outputs, Status::InputError);
            TimerAction::Cancel
        }
        Some(_other) => {
            error!("block `{block_name}`: `execute_interval` is not an integer");
            force_outputs_not_active(&mut state.outputs, Status::ConfigError);
            TimerAction::Cancel
        }
        None => TimerAction::Unchanged,
    };

    // Step 5 + 6: diff outputs for dataflow, and read execute_out for control.
    let mut dataflow = Vec::new();
    let mut control_targets = Vec::new();
    for (prev, new) in previous_outputs.iter().zip(state.outputs.iter()) {
        debug_assert_eq!(prev.name, new.name, "output sequences must stay aligned");
        if new.name == common::EXECUTE_OUT {
            control_targets = new.connections.iter().cloned().collect();
            continue;
        }
        if prev.value != new.value {
            dataflow.push(dataflow_msg(new));
        }
    }

    CycleOutcome {
        state,
        dataflow,
        control_targets,
        timer_action,
    }
}

fn dataflow_msg(out: &OutputAttr) -> DataflowMsg {
    DataflowMsg {
        output_name: out.name.clone(),
        value: out.value.clone(),
        targets: out.connections.iter().cloned().collect(),
    }
}
