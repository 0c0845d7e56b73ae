//! The message surface a block actor receives (§6 "Inter-block messages").

use fb_traits::{BlockState, ExecMethod};
use fb_value::Value;
use tokio::sync::{mpsc, oneshot};

/// A dataflow write: `from_block`'s output `output_name` published `value`.
#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    pub from_block: String,
    pub output_name: String,
    pub value: Value,
}

/// The three logical message kinds a block's mailbox can receive, folded
/// into one channel so ordering between them is FIFO as received (§5).
#[derive(Debug)]
pub enum Mailbox {
    Update(Update),
    /// `exec_method` distinguishes an `execute_out` control trigger from a
    /// self-timer firing; both arrive through this same variant.
    Trigger(ExecMethod),
    Shutdown,
    /// Out-of-band read of the current state, not part of the spec's
    /// inter-block protocol but useful for tests and a future status CLI;
    /// it never mutates anything and queues like any other message so it
    /// observes a consistent snapshot between two real ticks.
    Inspect(oneshot::Sender<BlockState>),
}

pub type MailboxSender = mpsc::UnboundedSender<Mailbox>;
pub type MailboxReceiver = mpsc::UnboundedReceiver<Mailbox>;

pub fn channel() -> (MailboxSender, MailboxReceiver) {
    mpsc::unbounded_channel()
}
