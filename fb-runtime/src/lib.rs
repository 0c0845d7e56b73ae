//! The execution kernel, timer scheduler, dataflow/control-flow
//! propagation, block registry, and the host-facing ambient stack
//! (persisted configuration, runtime configuration) around them.
//!
//! `kernel` is pure and is the thing to read first; `actor` is the
//! `tokio`-task shell that makes it live.

pub mod actor;
pub mod config;
pub mod kernel;
pub mod mailbox;
pub mod persistence;
pub mod registry;
pub mod timer;

pub use actor::spawn;
pub use config::RuntimeConfig;
pub use kernel::{run_cycle, CycleOutcome, DataflowMsg, TimerAction};
pub use mailbox::{Mailbox, MailboxSender, Update};
pub use persistence::PersistenceError;
pub use registry::Registry;
