use herald_registry::{CommandError, CommandOutcome, CommandRef};

/// Outcome of one dispatch attempt.
#[derive(Debug)]
#[must_use]
pub enum CommandExecuteResult {
	/// The handler returned normally.
	Success {
		command: CommandRef,
		outcome: CommandOutcome,
	},
	/// The sender lacks the command's permission; the handler did not run.
	PermissionDenied { command: CommandRef },
	/// The handler returned an error or panicked.
	ExecutionFailed { command: CommandRef, cause: CommandError },
	/// No registered alias matched the leading token.
	CommandNotFound {
		/// The leading token as written, empty for content-free messages.
		name: String,
	},
}

impl CommandExecuteResult {
	/// Returns the resolved command, if resolution succeeded.
	pub fn command(&self) -> Option<&CommandRef> {
		match self {
			Self::Success { command, .. } | Self::PermissionDenied { command } | Self::ExecutionFailed { command, .. } => Some(command),
			Self::CommandNotFound { .. } => None,
		}
	}

	pub fn is_success(&self) -> bool {
		matches!(self, Self::Success { .. })
	}

	/// Short label for logs.
	pub const fn kind(&self) -> &'static str {
		match self {
			Self::Success { .. } => "success",
			Self::PermissionDenied { .. } => "permission_denied",
			Self::ExecutionFailed { .. } => "execution_failed",
			Self::CommandNotFound { .. } => "command_not_found",
		}
	}
}
