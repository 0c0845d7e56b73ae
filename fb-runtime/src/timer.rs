//! Per-block periodic re-execution timers (§4.F).
//!
//! A timer is a single delayed trigger, not a `tokio::time::interval`: the
//! kernel re-arms it on every successful cycle (§4.E step 4), so the
//! scheduler only ever needs to fire once and get dropped. Re-arming
//! therefore doubles as "reschedule for next period".

use crate::mailbox::{Mailbox, MailboxSender};
use fb_traits::ExecMethod;
use std::time::Duration;
use tokio::task::JoinHandle;

/// An opaque handle to an armed timer. Carries nothing a block type should
/// ever introspect; it is stripped from persisted definitions because it
/// lives in a private attribute (`timer_ref`) and private state never
/// survives a save.
pub struct TimerHandle {
    join: JoinHandle<()>,
}

impl TimerHandle {
    fn cancel(self) {
        self.join.abort();
    }
}

/// Arms a one-shot timer that sends `Mailbox::Trigger(ExecMethod::Timer)`
/// to `sender` after `interval_ms`, clamped up to `min_tick_ms` if the
/// request is finer than the scheduler's own granularity (§4.M). Cancels
/// `existing` first, matching the "re-arming implicitly cancels" rule and
/// the "at most one armed timer per block" invariant.
pub fn arm(
    existing: Option<TimerHandle>,
    sender: MailboxSender,
    interval_ms: u64,
    min_tick_ms: u64,
) -> TimerHandle {
    cancel(existing);
    let effective_ms = interval_ms.max(min_tick_ms);
    let join = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(effective_ms)).await;
        let _ = sender.send(Mailbox::Trigger(ExecMethod::Timer));
    });
    TimerHandle { join }
}

/// Cancels a timer. A no-op if there is nothing armed.
pub fn cancel(existing: Option<TimerHandle>) {
    if let Some(handle) = existing {
        handle.cancel();
    }
}
