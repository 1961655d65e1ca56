//! Concrete command senders.
//!
//! Replies are not written anywhere directly; they are queued on an
//! [`Outbox`] that the host drains (the binary prints them, tests inspect
//! them).

use async_trait::async_trait;
use herald_primitives::UserId;
use herald_registry::{Command, CommandSender, SendError, SenderIdentity};
use tokio::sync::mpsc;

/// One reply addressed to a sender.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
	pub to: SenderIdentity,
	pub text: String,
}

/// Queue of replies produced by commands.
pub type Outbox = mpsc::UnboundedSender<Reply>;

fn deliver(outbox: &Outbox, to: SenderIdentity, text: &str) -> Result<(), SendError> {
	outbox.send(Reply { to, text: text.to_owned() }).map_err(|_| SendError::Closed)
}

/// The local operator typing at the console. Holds every permission.
#[derive(Debug, Clone)]
pub struct ConsoleSender {
	outbox: Outbox,
}

impl ConsoleSender {
	pub fn new(outbox: Outbox) -> Self {
		Self { outbox }
	}
}

#[async_trait]
impl CommandSender for ConsoleSender {
	fn identity(&self) -> SenderIdentity {
		SenderIdentity::Console
	}

	fn has_permission(&self, command: &dyn Command) -> bool {
		command.permission().permits(SenderIdentity::Console, true)
	}

	async fn reply(&self, text: &str) -> Result<(), SendError> {
		deliver(&self.outbox, SenderIdentity::Console, text)
	}
}

/// A chat account, optionally an operator.
#[derive(Debug, Clone)]
pub struct ChatSender {
	user: UserId,
	operator: bool,
	outbox: Outbox,
}

impl ChatSender {
	/// Prefer [`crate::ConsoleConfig::chat_sender`], which takes the operator flag from config.
	pub fn new(user: UserId, operator: bool, outbox: Outbox) -> Self {
		Self { user, operator, outbox }
	}
}

#[async_trait]
impl CommandSender for ChatSender {
	fn identity(&self) -> SenderIdentity {
		SenderIdentity::User(self.user)
	}

	fn has_permission(&self, command: &dyn Command) -> bool {
		command.permission().permits(self.identity(), self.operator)
	}

	async fn reply(&self, text: &str) -> Result<(), SendError> {
		deliver(&self.outbox, self.identity(), text)
	}
}
