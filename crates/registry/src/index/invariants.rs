use std::sync::Arc;
use std::thread;

use proptest::prelude::*;

use super::{CommandRegistry, Snapshot};
use crate::command::lowercase_names;
use crate::same_command;
use crate::testing::{TestCommand, cmd};

/// Checks the structural invariants of one published snapshot.
fn check_snapshot(snap: &Snapshot) -> Result<(), String> {
	for (alias, command) in &snap.optional {
		let Some(required) = snap.required.get(alias) else {
			return Err(format!("optional alias {alias:?} missing from required index"));
		};
		if !same_command(required.as_ref(), command.as_ref()) {
			return Err(format!("optional alias {alias:?} bound to a different command than required"));
		}
	}
	for (alias, command) in snap.required.iter().chain(snap.optional.iter()) {
		if !snap.contains(command.as_ref()) {
			return Err(format!("alias {alias:?} references an unregistered command"));
		}
	}
	for (i, command) in snap.commands.iter().enumerate() {
		if snap.commands[i + 1..].iter().any(|other| same_command(other.as_ref(), command.as_ref())) {
			return Err(format!("command {:?} listed twice", command.primary_name()));
		}
	}
	Ok(())
}

/// Checks that no two live commands share an alias.
fn check_unique_aliases(snap: &Snapshot) -> Result<(), String> {
	let mut seen: Vec<String> = Vec::new();
	for command in &snap.commands {
		for name in lowercase_names(command.as_ref()) {
			if seen.contains(&name) {
				return Err(format!("alias {name:?} shared by live commands"));
			}
			seen.push(name);
		}
	}
	Ok(())
}

/// Invariant: the optional index is a subset of the required index with identical bindings.
pub(crate) fn inv_optional_subset_of_required() {
	let registry = CommandRegistry::new();
	let optional = TestCommand::new(&["a", "b"]).optional().into_ref();
	let required = cmd(&["b", "c"]);
	registry.register(&optional, false).unwrap();
	registry.register(&required, true).unwrap();
	check_snapshot(&registry.snapshot()).unwrap();

	registry.unregister(required.as_ref());
	check_snapshot(&registry.snapshot()).unwrap();
}

#[cfg_attr(test, test)]
pub(crate) fn test_optional_subset_of_required() {
	inv_optional_subset_of_required()
}

/// Invariant: concurrent registrations with disjoint aliases never lose updates.
pub(crate) fn inv_no_lost_updates() {
	const THREADS: usize = 8;
	const PER_THREAD: usize = 25;

	let registry = Arc::new(CommandRegistry::new());
	thread::scope(|scope| {
		for t in 0..THREADS {
			let registry = Arc::clone(&registry);
			scope.spawn(move || {
				for i in 0..PER_THREAD {
					let name = format!("cmd-{t}-{i}");
					let command = TestCommand::new(&[name.as_str()]).into_ref();
					registry.register(&command, false).unwrap();
				}
			});
		}
	});

	assert_eq!(registry.len(), THREADS * PER_THREAD);
	let snap = registry.snapshot();
	assert_eq!(snap.required.len(), THREADS * PER_THREAD);
	check_snapshot(&snap).unwrap();
}

#[cfg_attr(test, test)]
pub(crate) fn test_no_lost_updates() {
	inv_no_lost_updates()
}

/// Invariant: racing register/unregister of the same commands leaves a consistent registry.
pub(crate) fn inv_racing_unregister_all_is_idempotent() {
	let registry = Arc::new(CommandRegistry::new());
	for i in 0..64 {
		let name = format!("p{i}");
		registry.register(&TestCommand::new(&[name.as_str()]).owned_by("plugin").into_ref(), false).unwrap();
	}

	let owner = crate::CommandOwner::new("plugin");
	let removed: usize = thread::scope(|scope| {
		let handles: Vec<_> = (0..4)
			.map(|_| {
				let registry = Arc::clone(&registry);
				let owner = owner.clone();
				scope.spawn(move || registry.unregister_all(&owner))
			})
			.collect();
		handles.into_iter().map(|h| h.join().unwrap()).sum()
	});

	assert_eq!(removed, 64, "each command is removed exactly once");
	assert!(registry.is_empty());
	check_snapshot(&registry.snapshot()).unwrap();
}

#[cfg_attr(test, test)]
pub(crate) fn test_racing_unregister_all_is_idempotent() {
	inv_racing_unregister_all_is_idempotent()
}

#[derive(Debug, Clone)]
enum Op {
	Register { idx: usize, override_conflicts: bool },
	Unregister { idx: usize },
}

fn op_strategy(pool: usize) -> impl Strategy<Value = Op> {
	prop_oneof![
		(0..pool, any::<bool>()).prop_map(|(idx, override_conflicts)| Op::Register { idx, override_conflicts }),
		(0..pool).prop_map(|idx| Op::Unregister { idx }),
	]
}

proptest! {
	#[test]
	fn random_mutations_preserve_invariants(ops in proptest::collection::vec(op_strategy(6), 1..40)) {
		let pool = [
			TestCommand::new(&["a", "b"]).into_ref(),
			TestCommand::new(&["B", "c"]).optional().into_ref(),
			TestCommand::new(&["c", "d"]).into_ref(),
			TestCommand::new(&["e"]).optional().into_ref(),
			TestCommand::new(&["E", "f"]).into_ref(),
			TestCommand::new(&["g"]).optional().into_ref(),
		];
		let registry = CommandRegistry::new();
		let mut overridden = false;

		for op in ops {
			match op {
				Op::Register { idx, override_conflicts } => {
					overridden |= override_conflicts && registry.find_duplicate(pool[idx].as_ref()).is_some();
					let _ = registry.register(&pool[idx], override_conflicts);
				}
				Op::Unregister { idx } => {
					registry.unregister(pool[idx].as_ref());
				}
			}
			let snap = registry.snapshot();
			prop_assert_eq!(check_snapshot(&snap), Ok(()));
			if !overridden {
				prop_assert_eq!(check_unique_aliases(&snap), Ok(()));
			}
		}
	}
}
