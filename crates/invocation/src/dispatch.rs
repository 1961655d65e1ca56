//! Command execution.
//!
//! Two call shapes share one pipeline:
//!
//! * [`Dispatcher::execute`] runs a known command with pre-tokenized
//!   arguments, optionally skipping the permission check.
//! * [`Dispatcher::execute_command`], [`Dispatcher::execute_text`] and
//!   [`Dispatcher::execute_tokens`] resolve the command from the first token
//!   and always check permission.
//!
//! Handler faults, returned or panicked, end up in
//! [`CommandExecuteResult::ExecutionFailed`] and never reach the caller.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use herald_primitives::{CommandArg, Segment, flatten, tokenize};
use herald_registry::{CommandContext, CommandError, CommandRef, CommandRegistry, CommandSender};
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, debug_span, error};

use crate::{CommandConfig, CommandExecuteResult};

/// Resolves and executes commands against a shared registry.
#[derive(Clone)]
pub struct Dispatcher {
	registry: Arc<CommandRegistry>,
	config: Arc<CommandConfig>,
	cancel: CancellationToken,
}

impl Dispatcher {
	/// Creates a dispatcher with its own lifecycle token.
	pub fn new(registry: Arc<CommandRegistry>, config: CommandConfig) -> Self {
		Self {
			registry,
			config: Arc::new(config),
			cancel: CancellationToken::new(),
		}
	}

	/// Ties handler cancellation to an outer lifecycle.
	pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
		self.cancel = cancel;
		self
	}

	pub fn registry(&self) -> &Arc<CommandRegistry> {
		&self.registry
	}

	pub fn config(&self) -> &CommandConfig {
		&self.config
	}

	/// Lifecycle token; handlers receive child tokens of it.
	pub fn cancellation(&self) -> &CancellationToken {
		&self.cancel
	}

	/// Resolves a raw leading token with the configured prefix.
	pub fn match_command(&self, raw: &str) -> Option<CommandRef> {
		self.registry.match_command(raw, &self.config.prefix)
	}

	/// Runs a known command under its primary name.
	pub async fn execute(&self, command: &CommandRef, sender: &dyn CommandSender, args: &[CommandArg], check_permission: bool) -> CommandExecuteResult {
		self.run(command, sender, args, command.primary_name(), check_permission).await
	}

	/// Resolves and runs the command named by the first content segment.
	pub async fn execute_command(&self, sender: &dyn CommandSender, content: &[Segment]) -> CommandExecuteResult {
		self.execute_tokens(sender, &flatten(content)).await
	}

	/// Resolves and runs the command named by the first word of `text`.
	pub async fn execute_text(&self, sender: &dyn CommandSender, text: &str) -> CommandExecuteResult {
		self.execute_tokens(sender, &tokenize(text)).await
	}

	/// Resolves and runs the command named by the first token.
	pub async fn execute_tokens(&self, sender: &dyn CommandSender, tokens: &[CommandArg]) -> CommandExecuteResult {
		let Some((first, args)) = tokens.split_first() else {
			return CommandExecuteResult::CommandNotFound { name: String::new() };
		};
		let raw = first.to_string();
		let Some(command) = self.match_command(&raw) else {
			debug!(name = %raw, sender = %sender.identity(), "command not found");
			return CommandExecuteResult::CommandNotFound { name: raw };
		};
		let label = raw.strip_prefix(self.config.prefix.as_str()).unwrap_or(&raw);
		self.run(&command, sender, args, label, true).await
	}

	async fn run(&self, command: &CommandRef, sender: &dyn CommandSender, args: &[CommandArg], label: &str, check_permission: bool) -> CommandExecuteResult {
		let span = debug_span!("dispatch", command = command.primary_name(), label, sender = %sender.identity());
		async move {
			if check_permission && !sender.has_permission(command.as_ref()) {
				debug!(permission = ?command.permission(), "permission denied");
				return CommandExecuteResult::PermissionDenied { command: command.clone() };
			}

			let ctx = CommandContext {
				sender,
				args,
				label,
				cancel: self.cancel.child_token(),
			};
			let result = match AssertUnwindSafe(command.execute(ctx)).catch_unwind().await {
				Ok(Ok(outcome)) => CommandExecuteResult::Success {
					command: command.clone(),
					outcome,
				},
				Ok(Err(cause)) => CommandExecuteResult::ExecutionFailed {
					command: command.clone(),
					cause,
				},
				Err(payload) => {
					let message = herald_worker::panic_payload_message(payload.as_ref());
					error!(panic = %message, "command handler panicked");
					CommandExecuteResult::ExecutionFailed {
						command: command.clone(),
						cause: CommandError::Panicked(message),
					}
				}
			};
			debug!(result = result.kind(), "command dispatched");
			result
		}
		.instrument(span)
		.await
	}
}
