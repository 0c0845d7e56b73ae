//! The block-type contract, attribute containers, and value validator.
//!
//! This crate has no opinion about concurrency or persistence; that's
//! `fb-runtime`. It defines *what a block is*: the attribute data model
//! (§3), the validator (§4.B), and the trait every concrete block type
//! implements (§4.C), plus the common attributes every block carries
//! regardless of type (§3 invariant 2).

pub mod attrs;
pub mod block_type;
pub mod common;
pub mod exec_method;
pub mod state;
pub mod status;
pub mod validate;

pub use attrs::{AttrError, ConfigAttrs, InputAttrs, OutputAttrs, PrivateAttrs};
pub use block_type::{BlockType, UpgradeError};
pub use exec_method::ExecMethod;
pub use state::{BlockState, Definition};
pub use status::Status;
pub use validate::{ValidationError, Valid, ValidatedValue};
