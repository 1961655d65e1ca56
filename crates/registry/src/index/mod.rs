//! Command registry with serialized mutation and lock-free reads.
//!
//! # Mental model
//!
//! * Readers load the current `Arc<Snapshot>` and resolve against that
//!   immutable view. A lookup racing an unregister may still see the command
//!   (or already miss it) but never a half-applied mutation.
//! * Writers take `modify_lock`, clone the current snapshot, apply the whole
//!   mutation to the clone and publish it with a single store.
//!
//! # Invariants
//!
//! * Every alias in the optional index is in the required index, bound to the
//!   same command (see `invariants::test_optional_subset_of_required`).
//! * Without override, no two live commands share an alias.
//! * Indexes never reference an unregistered command.
//! * Concurrent registrations lose no updates (see `invariants::test_no_lost_updates`).
//!
//! # Lock discipline
//!
//! `modify_lock` is not reentrant and is held by exactly one stack frame:
//! [`CommandRegistry::unregister_all`] iterates a snapshot and calls
//! [`CommandRegistry::unregister`] per command without holding it.

use std::sync::Arc;

use arc_swap::ArcSwap;
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::command::{Command, CommandOwner, CommandRef, lowercase_names};

mod error;
mod lookup;
mod snapshot;

pub use error::RegisterError;
pub use snapshot::Snapshot;

/// Registry of live commands and their alias indexes.
pub struct CommandRegistry {
	modify_lock: Mutex<()>,
	snap: ArcSwap<Snapshot>,
}

impl Default for CommandRegistry {
	fn default() -> Self {
		Self::new()
	}
}

impl CommandRegistry {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self {
			modify_lock: Mutex::new(()),
			snap: ArcSwap::from_pointee(Snapshot::default()),
		}
	}

	/// Registers `command` under all of its aliases.
	///
	/// Without `override_conflicts`, any alias shared (case-insensitively) with
	/// a registered command rejects the registration and leaves the registry
	/// untouched. With it, colliding aliases are rebound to `command`; the
	/// superseded command keeps its remaining aliases.
	///
	/// Registering an instance that is already registered (with override)
	/// refreshes its index entries without duplicating it.
	pub fn register(&self, command: &CommandRef, override_conflicts: bool) -> Result<(), RegisterError> {
		let names = lowercase_names(command.as_ref());
		if names.is_empty() {
			return Err(RegisterError::EmptyNames);
		}
		let prefix_optional = command.prefix_optional();

		let _guard = self.modify_lock.lock();
		let current = self.snap.load_full();

		if !override_conflicts {
			if let Some(existing) = current.find_duplicate(&names) {
				warn!(
					command = command.primary_name(),
					existing = existing.primary_name(),
					owner = %existing.owner(),
					"command registration rejected: alias conflict"
				);
				return Err(RegisterError::Rejected {
					existing: existing.clone(),
					incoming: command.primary_name().to_owned(),
				});
			}
		}

		let mut next = Snapshot::clone(&current);
		if !next.contains(command.as_ref()) {
			next.commands.push(command.clone());
		}
		next.bind(command, &names, prefix_optional);
		self.snap.store(Arc::new(next));

		debug!(
			command = command.primary_name(),
			aliases = ?names,
			owner = %command.owner(),
			prefix_optional,
			override_conflicts,
			"command registered"
		);
		Ok(())
	}

	/// Unregisters `command`, dropping all of its index entries.
	///
	/// Returns whether the command was registered.
	pub fn unregister(&self, command: &dyn Command) -> bool {
		let _guard = self.modify_lock.lock();
		let current = self.snap.load_full();
		let Some(position) = current.position(command) else {
			return false;
		};

		let mut next = Snapshot::clone(&current);
		next.commands.remove(position);
		next.unbind(command);
		self.snap.store(Arc::new(next));

		debug!(command = command.primary_name(), owner = %command.owner(), "command unregistered");
		true
	}

	/// Unregisters every command owned by `owner`; returns how many this call removed.
	///
	/// Commands concurrently unregistered by someone else are skipped.
	pub fn unregister_all(&self, owner: &CommandOwner) -> usize {
		let owned = self.list_for_owner(owner);
		let removed = owned.iter().filter(|command| self.unregister(command.as_ref())).count();
		debug!(%owner, removed, "unregistered all commands of owner");
		removed
	}

	/// Returns the first registered command sharing an alias with `command`.
	pub fn find_duplicate(&self, command: &dyn Command) -> Option<CommandRef> {
		let names = lowercase_names(command);
		self.snap.load().find_duplicate(&names).cloned()
	}

	/// Returns whether this exact command instance is registered.
	pub fn is_registered(&self, command: &dyn Command) -> bool {
		self.snap.load().contains(command)
	}

	/// Commands registered by `owner`, in registration order.
	pub fn list_for_owner(&self, owner: &CommandOwner) -> Vec<CommandRef> {
		self.snap.load().owned_by(owner)
	}

	/// All registered commands, in registration order.
	pub fn list_all(&self) -> Vec<CommandRef> {
		self.snap.load().commands.clone()
	}

	/// Pins the current published state.
	pub fn snapshot(&self) -> Arc<Snapshot> {
		self.snap.load_full()
	}

	/// Returns the number of registered commands.
	pub fn len(&self) -> usize {
		self.snap.load().commands.len()
	}

	/// Returns true if no command is registered.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

#[cfg(test)]
mod invariants;
