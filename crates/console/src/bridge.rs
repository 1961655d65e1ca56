//! Event bridge between inbound chat messages and command dispatch.
//!
//! Every inbound message is either intercepted (a command consumed it) or
//! passed through to downstream listeners unchanged:
//!
//! | dispatch result      | disposition  | side effect                    |
//! |----------------------|--------------|--------------------------------|
//! | not addressed to me  | pass through |                                |
//! | command not found    | pass through |                                |
//! | success              | intercepted  | output text replied            |
//! | execution failed     | intercepted  | fault reported to sender       |
//! | permission denied    | intercepted  | denial replied                 |
//! | ... prefix-optional  | pass through | none                           |

use std::fmt;
use std::sync::Arc;

use herald_invocation::{CommandExecuteResult, Dispatcher, NotAddressedToMe, command_content};
use herald_primitives::{RichMessage, UserId};
use herald_registry::{CommandOutcome, CommandSender};
use herald_worker::{TaskClass, TaskSet};
use tokio::sync::mpsc;
use tracing::{debug, trace, warn};

/// One inbound chat message and who sent it.
#[derive(Clone)]
pub struct MessageEvent {
	pub sender: Arc<dyn CommandSender>,
	pub message: RichMessage,
}

impl MessageEvent {
	pub fn new(sender: Arc<dyn CommandSender>, message: impl Into<RichMessage>) -> Self {
		Self {
			sender,
			message: message.into(),
		}
	}
}

impl fmt::Debug for MessageEvent {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("MessageEvent")
			.field("sender", &self.sender.identity())
			.field("message", &self.message)
			.finish()
	}
}

/// What happened to an inbound event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventDisposition {
	/// A command consumed the message; downstream listeners never see it.
	Intercepted,
	/// The message continues to downstream listeners.
	PassThrough,
}

/// Routes inbound messages to the dispatcher.
pub struct CommandBridge {
	bot: UserId,
	dispatcher: Dispatcher,
}

impl CommandBridge {
	pub fn new(bot: UserId, dispatcher: Dispatcher) -> Self {
		Self { bot, dispatcher }
	}

	pub fn dispatcher(&self) -> &Dispatcher {
		&self.dispatcher
	}

	/// Parses, dispatches and applies the reply policy for one event.
	pub async fn handle(&self, event: &MessageEvent) -> EventDisposition {
		let content = match command_content(&event.message, self.bot) {
			Ok(content) => content,
			Err(NotAddressedToMe { target }) => {
				trace!(%target, "message addressed to another bot");
				return EventDisposition::PassThrough;
			}
		};

		let sender = event.sender.as_ref();
		match self.dispatcher.execute_command(sender, &content).await {
			CommandExecuteResult::Success { command, outcome } => {
				if let CommandOutcome::Output(text) = outcome {
					if let Err(error) = sender.reply(&text).await {
						warn!(command = command.primary_name(), sender = %sender.identity(), %error, "failed to deliver command output");
					}
				}
				EventDisposition::Intercepted
			}
			CommandExecuteResult::ExecutionFailed { command, cause } => {
				sender.report_failure(command.as_ref(), &cause).await;
				EventDisposition::Intercepted
			}
			CommandExecuteResult::PermissionDenied { command } if command.prefix_optional() => {
				debug!(command = command.primary_name(), "denied prefix-optional command passes through");
				EventDisposition::PassThrough
			}
			CommandExecuteResult::PermissionDenied { command } => {
				if let Err(error) = sender.reply(&self.dispatcher.config().denial_message).await {
					warn!(command = command.primary_name(), sender = %sender.identity(), %error, "failed to deliver denial");
				}
				EventDisposition::Intercepted
			}
			CommandExecuteResult::CommandNotFound { .. } => EventDisposition::PassThrough,
		}
	}

	/// Consumes `inbound` until it closes or the bridge shuts down.
	///
	/// Each event is handled on its own task; pass-through events are
	/// forwarded to `downstream`. In-flight tasks are drained before returning.
	pub async fn listen(self: Arc<Self>, mut inbound: mpsc::Receiver<MessageEvent>, downstream: mpsc::Sender<MessageEvent>) {
		let cancel = self.dispatcher.cancellation().clone();
		let mut tasks = TaskSet::new(TaskClass::Dispatch);
		debug!("command bridge listening");

		loop {
			let event = tokio::select! {
				biased;
				() = cancel.cancelled() => break,
				event = inbound.recv() => event,
			};
			let Some(event) = event else {
				break;
			};

			let bridge = Arc::clone(&self);
			let downstream = downstream.clone();
			tasks.spawn(async move {
				if bridge.handle(&event).await == EventDisposition::PassThrough && downstream.send(event).await.is_err() {
					trace!("downstream closed, dropping pass-through event");
				}
			});
			let reaped = tasks.reap_ready();
			if !reaped.panics.is_empty() {
				warn!(panicked = reaped.panics.len(), in_flight = tasks.in_flight(), "dispatch tasks panicked, listener continues");
			}
		}

		debug!(in_flight = tasks.in_flight(), "command bridge draining");
		let drained = tasks.drain().await;
		debug!(completed = drained.completed, panicked = drained.panics.len(), "command bridge stopped");
	}

	/// Cancels the lifecycle; running handlers observe it through their context.
	pub fn shutdown(&self) {
		self.dispatcher.cancellation().cancel();
	}
}

#[cfg(test)]
mod tests;
