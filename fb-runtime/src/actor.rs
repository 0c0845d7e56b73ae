//! The per-block actor: one `tokio` task per live block, owning a serial
//! mailbox (§5). This is the effectful shell around the pure kernel cycle
//! in `kernel.rs` — it is the only place that touches the registry, the
//! timer scheduler, and a block's own mailbox.

use crate::kernel::{self, TimerAction};
use crate::mailbox::{channel, Mailbox, MailboxSender};
use crate::registry::Registry;
use crate::timer;
use fb_traits::{BlockState, BlockType, ExecMethod};
use log::{debug, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Spawns a block's actor task, registers it, and runs `initialize`.
/// Returns the mailbox sender the caller can use to deliver the first
/// trigger (or wire up links pointing at this block). `min_tick_ms` is the
/// timer scheduler's granularity floor (`RuntimeConfig::min_tick_ms`,
/// §4.M): any `execute_interval` finer than this is clamped up to it.
pub fn spawn(
    block_type: Arc<dyn BlockType>,
    state: BlockState,
    registry: Registry,
    min_tick_ms: u64,
) -> MailboxSender {
    let (tx, rx) = channel();
    let trigger_pending = registry.register(state.name.clone(), tx.clone());
    let state = block_type.initialize(state);
    info!("block `{}` ({}) initialized", state.name, state.module);
    tokio::spawn(run(block_type, state, registry, rx, tx.clone(), trigger_pending, min_tick_ms));
    tx
}

async fn run(
    block_type: Arc<dyn BlockType>,
    mut state: BlockState,
    registry: Registry,
    mut rx: crate::mailbox::MailboxReceiver,
    self_sender: MailboxSender,
    trigger_pending: Arc<AtomicBool>,
    min_tick_ms: u64,
) {
    let mut timer_handle: Option<timer::TimerHandle> = None;

    while let Some(msg) = rx.recv().await {
        match msg {
            Mailbox::Shutdown => {
                debug!("block `{}` shutting down", state.name);
                timer::cancel(timer_handle.take());
                let name = state.name.clone();
                let _ = block_type.delete(state);
                registry.unregister(&name);
                return;
            }
            Mailbox::Update(update) => {
                apply_update(&mut state, &update, &self_sender, &trigger_pending);
            }
            Mailbox::Trigger(exec_method) => {
                trigger_pending.store(false, Ordering::Release);
                state = run_one_cycle(
                    &block_type,
                    state,
                    exec_method,
                    &registry,
                    &self_sender,
                    &mut timer_handle,
                    min_tick_ms,
                );
            }
            Mailbox::Inspect(reply) => {
                let _ = reply.send(state.clone());
            }
        }
    }

    // Mailbox sender was dropped everywhere (shouldn't normally happen
    // before a Shutdown, but keep the registry consistent if it does).
    registry.unregister(&state.name);
}

fn apply_update(
    state: &mut BlockState,
    update: &crate::mailbox::Update,
    self_sender: &MailboxSender,
    trigger_pending: &Arc<AtomicBool>,
) {
    let target = state.inputs.iter_mut().find(|input| {
        input
            .link
            .as_ref()
            .map(|l| l.block == update.from_block && l.output == update.output_name)
            .unwrap_or(false)
    });

    let Some(input) = target else {
        warn!(
            "block `{}`: update from `{}`.`{}` has no matching linked input, dropping",
            state.name, update.from_block, update.output_name
        );
        return;
    };

    if input.value == update.value {
        return;
    }
    input.value = update.value.clone();

    // An upstream value change on a linked, executing input re-triggers
    // this block (§2: "upstream value change on an executing input"),
    // coalescing with any trigger already in flight exactly like a
    // control-flow trigger does.
    if trigger_pending
        .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
        .is_ok()
    {
        let _ = self_sender.send(Mailbox::Trigger(ExecMethod::InputChange));
    }
}

fn run_one_cycle(
    block_type: &Arc<dyn BlockType>,
    state: BlockState,
    exec_method: ExecMethod,
    registry: &Registry,
    self_sender: &MailboxSender,
    timer_handle: &mut Option<timer::TimerHandle>,
    min_tick_ms: u64,
) -> BlockState {
    let outcome = kernel::run_cycle(block_type.as_ref(), state, exec_method);

    match outcome.timer_action {
        TimerAction::Arm(ms) => {
            *timer_handle = Some(timer::arm(timer_handle.take(), self_sender.clone(), ms, min_tick_ms));
        }
        TimerAction::Cancel => {
            timer::cancel(timer_handle.take());
        }
        TimerAction::Unchanged => {}
    }

    for msg in &outcome.dataflow {
        registry.send_update(&outcome.state.name, &msg.output_name, &msg.value, &msg.targets);
    }
    registry.send_triggers(&outcome.control_targets);

    outcome.state
}

#[cfg(test)]
mod tests {
    use super::*;
    use fb_traits::{common, ConfigAttrs, Definition, InputAttrs, OutputAttrs, Status};
    use fb_value::Value;
    use std::time::Duration;
    use tokio::sync::oneshot;

    async fn inspect(sender: &MailboxSender) -> BlockState {
        let (tx, rx) = oneshot::channel();
        sender.send(Mailbox::Inspect(tx)).unwrap();
        rx.await.expect("actor should reply to Inspect")
    }

    /// Always-normal pass-through block; mirrors every exec_method it ran
    /// under into its private `exec_method` attribute for assertions (the
    /// kernel also does this, this block doesn't need to duplicate it).
    struct Pulse;

    impl BlockType for Pulse {
        fn type_name(&self) -> &'static str {
            "pulse"
        }
        fn version(&self) -> &'static str {
            "1.0.0"
        }
        fn default_configs(&self, name: &str, _d: &str) -> ConfigAttrs {
            common::common_configs(name, self.type_name(), self.version())
        }
        fn default_inputs(&self) -> InputAttrs {
            common::common_inputs()
        }
        fn default_outputs(&self) -> OutputAttrs {
            common::common_outputs()
        }
        fn initialize(&self, state: BlockState) -> BlockState {
            state
        }
        fn execute(&self, mut state: BlockState, _exec_method: ExecMethod) -> BlockState {
            let _ = state
                .outputs
                .set(common::STATUS, Value::Tag(Status::Normal.tag().to_string()));
            state
        }
    }

    fn pulse_def(name: &str) -> Definition {
        let block = Pulse;
        block.create(
            name,
            "",
            ConfigAttrs::from_vec(vec![]),
            InputAttrs::from_vec(vec![]),
            OutputAttrs::from_vec(vec![]),
        )
    }

    #[tokio::test]
    async fn control_flow_chain_fires_downstream_blocks_in_order() {
        let registry = Registry::new();
        let block_type: Arc<dyn BlockType> = Arc::new(Pulse);

        let mut def_a = pulse_def("a");
        def_a
            .outputs
            .get_mut(common::EXECUTE_OUT)
            .unwrap()
            .connections
            .insert("b".to_string());
        let mut def_b = pulse_def("b");
        def_b
            .outputs
            .get_mut(common::EXECUTE_OUT)
            .unwrap()
            .connections
            .insert("c".to_string());
        let def_c = pulse_def("c");

        let state_a = BlockState::from_definition("a".to_string(), "pulse", def_a);
        let state_b = BlockState::from_definition("b".to_string(), "pulse", def_b);
        let state_c = BlockState::from_definition("c".to_string(), "pulse", def_c);

        let tx_a = spawn(block_type.clone(), state_a, registry.clone(), 1);
        let tx_b = spawn(block_type.clone(), state_b, registry.clone(), 1);
        let tx_c = spawn(block_type, state_c, registry.clone(), 1);

        tx_a.send(Mailbox::Trigger(ExecMethod::Manual)).unwrap();

        // Give the chain a moment to propagate across three tasks.
        tokio::time::sleep(Duration::from_millis(50)).await;

        let a_state = inspect(&tx_a).await;
        let b_state = inspect(&tx_b).await;
        let c_state = inspect(&tx_c).await;

        assert_eq!(a_state.private.get(common::EXEC_METHOD).unwrap().value, Value::Tag("manual".to_string()));
        assert_eq!(b_state.private.get(common::EXEC_METHOD).unwrap().value, Value::Tag("exec_in".to_string()));
        assert_eq!(c_state.private.get(common::EXEC_METHOD).unwrap().value, Value::Tag("exec_in".to_string()));
        for state in [&a_state, &b_state, &c_state] {
            assert_eq!(state.private.get(common::EXEC_COUNT).unwrap().value, Value::Int(1));
        }

        registry.broadcast_delete();
    }

    #[tokio::test]
    async fn timer_configured_block_reexecutes_itself() {
        let registry = Registry::new();
        let block_type: Arc<dyn BlockType> = Arc::new(Pulse);
        let mut def = pulse_def("timed");
        def.config
            .set(common::EXECUTE_INTERVAL, Value::Int(10))
            .unwrap();
        let state = BlockState::from_definition("timed".to_string(), "pulse", def);
        let tx = spawn(block_type, state, registry.clone(), 1);

        tx.send(Mailbox::Trigger(ExecMethod::Manual)).unwrap();

        // The first manual trigger arms a 10ms timer which then fires on
        // its own, re-triggering the block with exec_method=timer. A
        // min_tick_ms of 1 here is below the interval, so it's not clamped.
        tokio::time::sleep(Duration::from_millis(60)).await;

        let state = inspect(&tx).await;
        assert_eq!(
            state.private.get(common::EXEC_METHOD).unwrap().value,
            Value::Tag("timer".to_string())
        );
        let count = state
            .private
            .get(common::EXEC_COUNT)
            .unwrap()
            .value
            .as_int()
            .unwrap();
        assert!(count >= 2, "timer should have fired at least once after the initial manual trigger, got {count}");

        registry.broadcast_delete();
    }

    #[tokio::test]
    async fn min_tick_ms_clamps_a_finer_execute_interval() {
        let registry = Registry::new();
        let block_type: Arc<dyn BlockType> = Arc::new(Pulse);
        let mut def = pulse_def("timed-clamped");
        def.config.set(common::EXECUTE_INTERVAL, Value::Int(1)).unwrap();
        let state = BlockState::from_definition("timed-clamped".to_string(), "pulse", def);
        let tx = spawn(block_type, state, registry.clone(), 100);

        tx.send(Mailbox::Trigger(ExecMethod::Manual)).unwrap();

        // execute_interval asked for 1ms, but min_tick_ms=100 should hold
        // the re-trigger off well past a short window.
        tokio::time::sleep(Duration::from_millis(30)).await;
        let state = inspect(&tx).await;
        assert_eq!(state.private.get(common::EXEC_COUNT).unwrap().value, Value::Int(1));

        registry.broadcast_delete();
    }
}
