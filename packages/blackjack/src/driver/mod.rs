//! Runs a table on its own task with presentation pacing.
//!
//! The actor is the only code touching the table once started. Player
//! commands arrive through the [`Mailbox`]; automatic steps wait on a single
//! deadline in the same loop, so the two never overlap.

mod actor;
mod ingress;

pub use actor::Actor;
pub use ingress::{Mailbox, Message};
