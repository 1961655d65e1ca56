//! Turning chat messages into command executions.
//!
//! * [`parse`] strips a leading bot selector and extracts command content.
//! * [`Dispatcher`] resolves the leading token against a
//!   [`herald_registry::CommandRegistry`], checks permission and runs the
//!   handler with fault isolation.
//! * [`CommandExecuteResult`] is the closed outcome taxonomy every dispatch
//!   produces.

pub mod config;
pub mod dispatch;
pub mod parse;
pub mod result;

pub use config::{CommandConfig, CommandConfigError, DEFAULT_COMMAND_PREFIX, DEFAULT_DENIAL_MESSAGE};
pub use dispatch::Dispatcher;
pub use parse::{NotAddressedToMe, command_content, strip_selector};
pub use result::CommandExecuteResult;
