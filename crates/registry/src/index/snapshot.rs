use rustc_hash::FxHashMap;

use crate::command::{Command, CommandOwner, CommandRef, lowercase_names, same_command};

/// Immutable published registry state.
///
/// Readers pin an `Arc<Snapshot>` and resolve against it; writers clone the
/// current snapshot, mutate the clone under the registry lock and publish it.
#[derive(Clone, Default)]
pub struct Snapshot {
	/// Registered commands in registration order, unique by identity.
	pub(crate) commands: Vec<CommandRef>,
	/// Every alias of every registered command.
	pub(crate) required: FxHashMap<String, CommandRef>,
	/// Aliases of prefix-optional commands only.
	pub(crate) optional: FxHashMap<String, CommandRef>,
}

impl Snapshot {
	/// Registered commands in registration order.
	pub fn commands(&self) -> &[CommandRef] {
		&self.commands
	}

	/// Looks up a lower-cased alias in the prefix-required index.
	pub fn required(&self, alias: &str) -> Option<&CommandRef> {
		self.required.get(alias)
	}

	/// Looks up a lower-cased alias in the prefix-optional index.
	pub fn optional(&self, alias: &str) -> Option<&CommandRef> {
		self.optional.get(alias)
	}

	/// Returns the position of `command` in the registration list.
	pub(crate) fn position(&self, command: &dyn Command) -> Option<usize> {
		self.commands.iter().position(|c| same_command(c.as_ref(), command))
	}

	pub fn contains(&self, command: &dyn Command) -> bool {
		self.position(command).is_some()
	}

	/// First registered command sharing any of `names` (already lower-cased).
	pub(crate) fn find_duplicate(&self, names: &[String]) -> Option<&CommandRef> {
		self.commands
			.iter()
			.find(|existing| lowercase_names(existing.as_ref()).iter().any(|name| names.contains(name)))
	}

	/// Commands registered by `owner`, in registration order.
	pub fn owned_by(&self, owner: &CommandOwner) -> Vec<CommandRef> {
		self.commands.iter().filter(|c| c.owner() == owner).cloned().collect()
	}

	/// Binds `names` to `command`, keeping the optional index in step with its prefix policy.
	pub(crate) fn bind(&mut self, command: &CommandRef, names: &[String], prefix_optional: bool) {
		for name in names {
			if prefix_optional {
				self.optional.insert(name.clone(), command.clone());
			} else {
				self.optional.remove(name);
			}
			self.required.insert(name.clone(), command.clone());
		}
	}

	/// Drops every index entry pointing at `command`.
	pub(crate) fn unbind(&mut self, command: &dyn Command) {
		self.required.retain(|_, c| !same_command(c.as_ref(), command));
		self.optional.retain(|_, c| !same_command(c.as_ref(), command));
	}
}
