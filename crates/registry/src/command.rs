//! Command capability.
//!
//! A [`Command`] is supplied by whoever registers it (the console itself or a
//! plugin). The registry only relies on its alias list, its prefix policy and
//! its owner; the executor additionally relies on its permission and handler.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use herald_primitives::CommandArg;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::sender::{CommandSender, SenderIdentity};

/// Shared handle to a registered command. Identity is the allocation.
pub type CommandRef = Arc<dyn Command>;

/// Identity of the party that registered a command.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommandOwner(Arc<str>);

impl CommandOwner {
	/// Name reserved for commands built into the console.
	pub const CONSOLE: &'static str = "console";

	pub fn new(name: impl AsRef<str>) -> Self {
		Self(Arc::from(name.as_ref()))
	}

	/// Owner of the builtin console commands.
	pub fn console() -> Self {
		Self::new(Self::CONSOLE)
	}

	pub fn name(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for CommandOwner {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// Permission a sender must hold to run a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Permission {
	/// Any sender may run the command.
	#[default]
	Anyone,
	/// Only operators (and the console) may run the command.
	Operator,
	/// Only the console may run the command.
	ConsoleOnly,
}

impl Permission {
	/// Evaluates the permission for a sender.
	///
	/// The console holds every permission.
	pub const fn permits(self, identity: SenderIdentity, is_operator: bool) -> bool {
		match (self, identity) {
			(_, SenderIdentity::Console) => true,
			(Self::Anyone, _) => true,
			(Self::Operator, _) => is_operator,
			(Self::ConsoleOnly, _) => false,
		}
	}
}

/// Value produced by a handler that returned normally.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CommandOutcome {
	/// The command completed; any replies were sent by the handler.
	#[default]
	Done,
	/// The command completed and produced text for the caller.
	Output(String),
}

/// Fault raised by a command handler.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
	/// General command failure with message.
	#[error("{0}")]
	Failed(String),
	/// A required argument was not provided.
	#[error("missing argument: {0}")]
	MissingArgument(&'static str),
	/// An argument was provided but invalid.
	#[error("invalid argument: {0}")]
	InvalidArgument(String),
	/// The handler observed lifecycle cancellation and gave up.
	#[error("command cancelled")]
	Cancelled,
	/// The handler panicked; carries the panic message.
	#[error("command panicked: {0}")]
	Panicked(String),
	/// Catch-all for other errors.
	#[error("{0}")]
	Other(String),
}

/// Everything a handler gets to see for one invocation.
pub struct CommandContext<'a> {
	/// Who issued the command.
	pub sender: &'a dyn CommandSender,
	/// Argument tokens following the command name.
	pub args: &'a [CommandArg],
	/// The name the command was invoked through, prefix stripped.
	pub label: &'a str,
	/// Cancelled when the owning lifecycle shuts down.
	pub cancel: CancellationToken,
}

impl CommandContext<'_> {
	/// Returns the text of the argument at `index`.
	pub fn text_arg(&self, index: usize) -> Option<&str> {
		self.args.get(index).and_then(CommandArg::as_text)
	}

	/// Returns all arguments joined by single spaces.
	pub fn joined_args(&self) -> String {
		self.args.iter().map(ToString::to_string).collect::<Vec<_>>().join(" ")
	}
}

/// A command that can be registered and executed.
#[async_trait]
pub trait Command: Send + Sync + 'static {
	/// Case-insensitive aliases; the first one is the primary name.
	fn names(&self) -> &[String];

	/// Identity of the registering party.
	fn owner(&self) -> &CommandOwner;

	/// One-line usage description.
	fn description(&self) -> &str {
		""
	}

	/// Permission required to run the command.
	fn permission(&self) -> Permission {
		Permission::Anyone
	}

	/// Whether the command may be invoked without the command prefix.
	fn prefix_optional(&self) -> bool {
		false
	}

	/// Runs the command.
	async fn execute(&self, ctx: CommandContext<'_>) -> Result<CommandOutcome, CommandError>;

	/// Returns the primary name, or an empty string for a nameless command.
	fn primary_name(&self) -> &str {
		self.names().first().map_or("", String::as_str)
	}
}

impl fmt::Debug for dyn Command {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Command")
			.field("names", &self.names())
			.field("owner", self.owner())
			.field("prefix_optional", &self.prefix_optional())
			.finish_non_exhaustive()
	}
}

/// Returns true if both handles point at the same command instance.
pub fn same_command(a: &dyn Command, b: &dyn Command) -> bool {
	std::ptr::addr_eq(a as *const dyn Command, b as *const dyn Command)
}

/// Lower-cased, de-duplicated aliases of a command, in declaration order.
pub(crate) fn lowercase_names(command: &dyn Command) -> Vec<String> {
	let mut names: Vec<String> = Vec::with_capacity(command.names().len());
	for name in command.names() {
		let lower = name.to_lowercase();
		if !names.contains(&lower) {
			names.push(lower);
		}
	}
	names
}
