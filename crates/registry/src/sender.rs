//! Sender capability: who issued a command.

use std::fmt;

use async_trait::async_trait;
use herald_primitives::UserId;
use thiserror::Error;

use crate::command::{Command, CommandError};

/// Identity of a command sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SenderIdentity {
	/// The local console operator.
	Console,
	/// A chat account.
	User(UserId),
}

impl fmt::Display for SenderIdentity {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Console => f.write_str("console"),
			Self::User(id) => write!(f, "user:{id}"),
		}
	}
}

/// Failure to deliver a reply to a sender.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SendError {
	/// The reply channel is gone.
	#[error("reply channel closed")]
	Closed,
}

/// The party a command runs on behalf of.
#[async_trait]
pub trait CommandSender: Send + Sync {
	/// Returns the sender's identity.
	fn identity(&self) -> SenderIdentity;

	/// Returns whether the sender may run `command`.
	fn has_permission(&self, command: &dyn Command) -> bool;

	/// Sends a text reply to the sender.
	async fn reply(&self, text: &str) -> Result<(), SendError>;

	/// Reports a handler fault back to the sender.
	async fn report_failure(&self, command: &dyn Command, cause: &CommandError) {
		tracing::error!(command = command.primary_name(), sender = %self.identity(), error = %cause, "command execution failed");
		let text = format!("Command '{}' failed: {cause}", command.primary_name());
		if let Err(error) = self.reply(&text).await {
			tracing::warn!(sender = %self.identity(), %error, "failed to deliver failure report");
		}
	}
}
