//! The herald console: event bridge, builtin commands and process plumbing.
//!
//! The binary wires these together: stdin lines from [`input`] flow through a
//! [`CommandBridge`] that dispatches commands against a registry seeded with
//! the [`builtins`]; replies land on an [`Outbox`].

pub mod bridge;
pub mod builtins;
pub mod config;
pub mod input;
pub mod logging;
pub mod sender;

pub use bridge::{CommandBridge, EventDisposition, MessageEvent};
pub use builtins::register_builtins;
pub use config::{ConfigError, ConsoleConfig};
pub use sender::{ChatSender, ConsoleSender, Outbox, Reply};
