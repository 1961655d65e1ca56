//! Commands built into the console, owned by [`CommandOwner::console`].

use std::sync::{Arc, Weak};

use async_trait::async_trait;
use herald_registry::{Command, CommandContext, CommandError, CommandOutcome, CommandOwner, CommandRef, CommandRegistry, Permission, RegisterError};
use tokio_util::sync::CancellationToken;

fn names(list: &[&str]) -> Vec<String> {
	list.iter().map(|name| (*name).to_owned()).collect()
}

/// `help`, `?`: lists registered commands, or one command given its name.
pub struct Help {
	names: Vec<String>,
	owner: CommandOwner,
	registry: Weak<CommandRegistry>,
	prefix: String,
}

impl Help {
	/// The registry is held weakly; it owns this command.
	pub fn new(registry: &Arc<CommandRegistry>, prefix: impl Into<String>) -> Self {
		Self {
			names: names(&["help", "?"]),
			owner: CommandOwner::console(),
			registry: Arc::downgrade(registry),
			prefix: prefix.into(),
		}
	}

	fn entry(&self, command: &dyn Command) -> String {
		let prefix = if command.prefix_optional() { "" } else { self.prefix.as_str() };
		let aliases = command.names().iter().map(|name| format!("{prefix}{name}")).collect::<Vec<_>>().join(", ");
		if command.description().is_empty() {
			aliases
		} else {
			format!("{aliases}  {}", command.description())
		}
	}

	fn render(&self, registry: &CommandRegistry) -> String {
		let snapshot = registry.snapshot();
		snapshot.commands().iter().map(|command| self.entry(command.as_ref())).collect::<Vec<_>>().join("\n")
	}

	/// Entry for the command `name` (with or without the prefix) resolves to.
	fn render_one(&self, registry: &CommandRegistry, name: &str) -> Result<String, CommandError> {
		let alias = name.strip_prefix(self.prefix.as_str()).unwrap_or(name).to_lowercase();
		let snapshot = registry.snapshot();
		let command = snapshot
			.required(&alias)
			.ok_or_else(|| CommandError::InvalidArgument(format!("unknown command '{name}'")))?;
		Ok(self.entry(command.as_ref()))
	}
}

#[async_trait]
impl Command for Help {
	fn names(&self) -> &[String] {
		&self.names
	}

	fn owner(&self) -> &CommandOwner {
		&self.owner
	}

	fn description(&self) -> &str {
		"List available commands"
	}

	async fn execute(&self, ctx: CommandContext<'_>) -> Result<CommandOutcome, CommandError> {
		let registry = self.registry.upgrade().ok_or_else(|| CommandError::Other("command registry is gone".into()))?;
		let text = match ctx.text_arg(0) {
			Some(name) => self.render_one(&registry, name)?,
			None => self.render(&registry),
		};
		Ok(CommandOutcome::Output(text))
	}
}

/// `stop`, `shutdown`: ends the console lifecycle.
pub struct Stop {
	names: Vec<String>,
	owner: CommandOwner,
	shutdown: CancellationToken,
}

impl Stop {
	pub fn new(shutdown: CancellationToken) -> Self {
		Self {
			names: names(&["stop", "shutdown"]),
			owner: CommandOwner::console(),
			shutdown,
		}
	}
}

#[async_trait]
impl Command for Stop {
	fn names(&self) -> &[String] {
		&self.names
	}

	fn owner(&self) -> &CommandOwner {
		&self.owner
	}

	fn description(&self) -> &str {
		"Stop the console"
	}

	fn permission(&self) -> Permission {
		Permission::Operator
	}

	async fn execute(&self, ctx: CommandContext<'_>) -> Result<CommandOutcome, CommandError> {
		tracing::info!(sender = %ctx.sender.identity(), "stop requested");
		self.shutdown.cancel();
		Ok(CommandOutcome::Output("Stopping.".into()))
	}
}

/// `echo`, `say`: replies with its arguments. Usable without the prefix.
pub struct Echo {
	names: Vec<String>,
	owner: CommandOwner,
}

impl Default for Echo {
	fn default() -> Self {
		Self {
			names: names(&["echo", "say"]),
			owner: CommandOwner::console(),
		}
	}
}

#[async_trait]
impl Command for Echo {
	fn names(&self) -> &[String] {
		&self.names
	}

	fn owner(&self) -> &CommandOwner {
		&self.owner
	}

	fn description(&self) -> &str {
		"Repeat the arguments"
	}

	fn prefix_optional(&self) -> bool {
		true
	}

	async fn execute(&self, ctx: CommandContext<'_>) -> Result<CommandOutcome, CommandError> {
		if ctx.args.is_empty() {
			return Err(CommandError::MissingArgument("text"));
		}
		Ok(CommandOutcome::Output(ctx.joined_args()))
	}
}

/// Registers every builtin, failing on the first alias conflict.
pub fn register_builtins(registry: &Arc<CommandRegistry>, prefix: &str, shutdown: CancellationToken) -> Result<Vec<CommandRef>, RegisterError> {
	let builtins: Vec<CommandRef> = vec![Arc::new(Help::new(registry, prefix)), Arc::new(Stop::new(shutdown)), Arc::new(Echo::default())];
	for command in &builtins {
		registry.register(command, false)?;
	}
	tracing::debug!(count = builtins.len(), "builtin commands registered");
	Ok(builtins)
}
