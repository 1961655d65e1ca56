use serde::Deserialize;
use thiserror::Error;

/// Prefix marking a chat message as a command.
pub const DEFAULT_COMMAND_PREFIX: &str = "/";

/// Reply sent when a prefixed command is refused for lack of permission.
pub const DEFAULT_DENIAL_MESSAGE: &str = "Permission denied";

/// Dispatch settings supplied by the hosting environment.
///
/// Fixed for the lifetime of a [`crate::Dispatcher`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CommandConfig {
	/// Command prefix, `/` unless overridden.
	pub prefix: String,
	/// Reply for permission-denied prefixed commands.
	pub denial_message: String,
}

impl Default for CommandConfig {
	fn default() -> Self {
		Self {
			prefix: DEFAULT_COMMAND_PREFIX.to_owned(),
			denial_message: DEFAULT_DENIAL_MESSAGE.to_owned(),
		}
	}
}

/// Invalid dispatch settings.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandConfigError {
	#[error("command prefix must not be empty")]
	EmptyPrefix,
	#[error("command prefix {0:?} must not contain whitespace")]
	WhitespaceInPrefix(String),
}

impl CommandConfig {
	/// Checks that the prefix can be recognized at the start of a token.
	pub fn validate(&self) -> Result<(), CommandConfigError> {
		if self.prefix.is_empty() {
			return Err(CommandConfigError::EmptyPrefix);
		}
		if self.prefix.chars().any(char::is_whitespace) {
			return Err(CommandConfigError::WhitespaceInPrefix(self.prefix.clone()));
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults() {
		let config = CommandConfig::default();
		assert_eq!(config.prefix, "/");
		assert_eq!(config.denial_message, "Permission denied");
		assert_eq!(config.validate(), Ok(()));
	}

	#[test]
	fn partial_table_keeps_defaults() {
		let config: CommandConfig = toml::from_str(r#"prefix = "!""#).unwrap();
		assert_eq!(config.prefix, "!");
		assert_eq!(config.denial_message, DEFAULT_DENIAL_MESSAGE);
	}

	#[test]
	fn rejects_unusable_prefixes() {
		let empty = CommandConfig {
			prefix: String::new(),
			..CommandConfig::default()
		};
		assert_eq!(empty.validate(), Err(CommandConfigError::EmptyPrefix));

		let spaced = CommandConfig {
			prefix: "! ".to_owned(),
			..CommandConfig::default()
		};
		assert!(matches!(spaced.validate(), Err(CommandConfigError::WhitespaceInPrefix(_))));
	}
}
