//! Alias resolution.
//!
//! A leading token starting with the command prefix resolves through the
//! required index, which holds every alias. A token without the prefix
//! resolves through the optional index only, so commands that did not opt in
//! to prefix-free invocation never match ordinary chat text.

use tracing::trace;

use super::{CommandRegistry, Snapshot};
use crate::command::CommandRef;

impl Snapshot {
	/// Resolves a raw leading token against this snapshot.
	pub fn resolve(&self, raw: &str, prefix: &str) -> Option<CommandRef> {
		match raw.strip_prefix(prefix) {
			Some(name) => self.required.get(&name.to_lowercase()).cloned(),
			None => self.optional.get(&raw.to_lowercase()).cloned(),
		}
	}
}

impl CommandRegistry {
	/// Resolves a raw leading token to a registered command.
	///
	/// Matching is exact and case-insensitive; there is no fuzzy matching.
	pub fn match_command(&self, raw: &str, prefix: &str) -> Option<CommandRef> {
		let found = self.snap.load().resolve(raw, prefix);
		trace!(raw, prefix, found = found.as_ref().map(|c| c.primary_name()), "command lookup");
		found
	}
}
