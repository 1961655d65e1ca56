use std::fmt;

use crate::command::CommandRef;

/// Registration failure.
pub enum RegisterError {
	/// The command declares no names; this is a programming error.
	EmptyNames,
	/// An alias collides with an already registered command.
	Rejected {
		/// The first registered command sharing an alias.
		existing: CommandRef,
		/// Primary name of the rejected command.
		incoming: String,
	},
}

impl RegisterError {
	/// Returns the conflicting registered command, if any.
	pub fn existing(&self) -> Option<&CommandRef> {
		match self {
			Self::EmptyNames => None,
			Self::Rejected { existing, .. } => Some(existing),
		}
	}
}

impl fmt::Debug for RegisterError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::EmptyNames => f.write_str("EmptyNames"),
			Self::Rejected { existing, incoming } => f
				.debug_struct("Rejected")
				.field("existing", &existing.primary_name())
				.field("incoming", incoming)
				.finish(),
		}
	}
}

impl fmt::Display for RegisterError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::EmptyNames => f.write_str("command declares no names"),
			Self::Rejected { existing, incoming } => write!(
				f,
				"registration rejected: '{incoming}' shares an alias with registered '{}' (owner {})",
				existing.primary_name(),
				existing.owner()
			),
		}
	}
}

impl std::error::Error for RegisterError {}
