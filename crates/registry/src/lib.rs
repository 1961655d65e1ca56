//! Command capabilities and the command registry.
//!
//! The registry owns two alias indexes: the required-prefix index holds every
//! alias of every registered command, the optional-prefix index only the
//! aliases of commands that may be invoked without the command prefix.
//! Mutation is serialized; lookups run lock-free against published snapshots.
//!
//! The registry is an ordinary value: construct one, share it behind an `Arc`
//! and hand it to whoever registers or dispatches commands.

pub mod command;
pub mod index;
pub mod sender;

#[cfg(test)]
pub(crate) mod testing;

pub use command::{
	Command, CommandContext, CommandError, CommandOutcome, CommandOwner, CommandRef, Permission, same_command,
};
pub use index::{CommandRegistry, RegisterError, Snapshot};
pub use sender::{CommandSender, SendError, SenderIdentity};
