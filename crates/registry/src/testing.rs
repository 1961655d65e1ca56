use std::sync::Arc;

use async_trait::async_trait;

use crate::{Command, CommandContext, CommandError, CommandOutcome, CommandOwner, CommandRef};

/// Inert command used by registry tests.
pub(crate) struct TestCommand {
	names: Vec<String>,
	owner: CommandOwner,
	prefix_optional: bool,
}

impl TestCommand {
	pub(crate) fn new(names: &[&str]) -> Self {
		Self {
			names: names.iter().map(|n| (*n).to_owned()).collect(),
			owner: CommandOwner::new("tests"),
			prefix_optional: false,
		}
	}

	pub(crate) fn optional(mut self) -> Self {
		self.prefix_optional = true;
		self
	}

	pub(crate) fn owned_by(mut self, owner: &str) -> Self {
		self.owner = CommandOwner::new(owner);
		self
	}

	pub(crate) fn into_ref(self) -> CommandRef {
		Arc::new(self)
	}
}

#[async_trait]
impl Command for TestCommand {
	fn names(&self) -> &[String] {
		&self.names
	}

	fn owner(&self) -> &CommandOwner {
		&self.owner
	}

	fn prefix_optional(&self) -> bool {
		self.prefix_optional
	}

	async fn execute(&self, _ctx: CommandContext<'_>) -> Result<CommandOutcome, CommandError> {
		Ok(CommandOutcome::Done)
	}
}

/// Shorthand for a required-prefix test command.
pub(crate) fn cmd(names: &[&str]) -> CommandRef {
	TestCommand::new(names).into_ref()
}

/// Shorthand for a prefix-optional test command.
pub(crate) fn optional_cmd(names: &[&str]) -> CommandRef {
	TestCommand::new(names).optional().into_ref()
}
