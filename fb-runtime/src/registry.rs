//! The process-wide block directory (§4.I), and the dataflow/control-flow
//! delivery that rides on top of it (§4.G, §4.H).
//!
//! The registry is the only state shared across block actors. Everything
//! else — attributes, driver handles — is owned exclusively by one block's
//! task. Reads (`lookup`, the dispatch helpers) vastly outnumber writes
//! (`register`/`unregister`), so a concurrent map is the right discipline
//! rather than a single mutex around a `HashMap`.

use crate::mailbox::{Mailbox, MailboxSender, Update};
use dashmap::DashMap;
use fb_traits::ExecMethod;
use fb_value::Value;
use log::{debug, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

struct BlockHandle {
    sender: MailboxSender,
    /// Set by the control-flow dispatcher when it sends a trigger, cleared
    /// by the receiving actor when it dequeues one. While set, further
    /// triggers to this block coalesce into the one already in flight
    /// instead of queuing a second (§4.H "extra triggers collapse").
    trigger_pending: Arc<AtomicBool>,
}

#[derive(Clone, Default)]
pub struct Registry {
    blocks: Arc<DashMap<String, BlockHandle>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, name: impl Into<String>, sender: MailboxSender) -> Arc<AtomicBool> {
        let name = name.into();
        let trigger_pending = Arc::new(AtomicBool::new(false));
        self.blocks.insert(
            name,
            BlockHandle {
                sender,
                trigger_pending: trigger_pending.clone(),
            },
        );
        trigger_pending
    }

    /// Drops the mailbox sender. Any message already queued for this block
    /// is delivered to a receiver that will shortly observe a closed
    /// channel and stop; anything sent afterward silently fails to send,
    /// which is the "in-flight messages to a deleted block are discarded"
    /// rule (§5).
    pub fn unregister(&self, name: &str) {
        self.blocks.remove(name);
    }

    pub fn lookup(&self, name: &str) -> Option<MailboxSender> {
        self.blocks.get(name).map(|h| h.sender.clone())
    }

    pub fn broadcast_delete(&self) {
        for entry in self.blocks.iter() {
            let _ = entry.sender.send(Mailbox::Shutdown);
        }
    }

    /// Dataflow propagation (§4.G): publishes one output's new value to
    /// every block named in `targets`.
    pub fn send_update(&self, from_block: &str, output_name: &str, value: &Value, targets: &[String]) {
        for target in targets {
            match self.lookup(target) {
                Some(sender) => {
                    let _ = sender.send(Mailbox::Update(Update {
                        from_block: from_block.to_string(),
                        output_name: output_name.to_string(),
                        value: value.clone(),
                    }));
                }
                None => warn!(
                    "dataflow target `{target}` not found (stale connection from `{from_block}`.`{output_name}`)"
                ),
            }
        }
    }

    /// Control-flow dispatch (§4.H): triggers every target's execution,
    /// coalescing a target that already has a trigger queued.
    pub fn send_triggers(&self, targets: &[String]) {
        for target in targets {
            let Some(entry) = self.blocks.get(target) else {
                warn!("control-flow target `{target}` not found");
                continue;
            };
            if entry
                .trigger_pending
                .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                let _ = entry.sender.send(Mailbox::Trigger(ExecMethod::ExecIn));
            } else {
                debug!("control-flow target `{target}` already has a trigger queued, coalescing");
            }
        }
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}
