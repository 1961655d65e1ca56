//! Console configuration file.
//!
//! ```toml
//! bot_id = 123456
//! operators = [1001, 1002]
//! log_filter = "herald=debug,info"
//!
//! [commands]
//! prefix = "/"
//! denial_message = "Permission denied"
//! ```
//!
//! Every key is optional. A missing file is not an error.

use std::io;
use std::path::{Path, PathBuf};

use herald_invocation::{CommandConfig, CommandConfigError};
use herald_primitives::UserId;
use rustc_hash::FxHashSet;
use serde::Deserialize;
use thiserror::Error;

use crate::sender::{ChatSender, Outbox};

/// Errors produced while loading [`ConsoleConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
	#[error("failed to read {path}: {source}")]
	Read {
		path: PathBuf,
		#[source]
		source: io::Error,
	},
	#[error("failed to parse {path}: {source}")]
	Parse {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},
	#[error("invalid [commands] table: {0}")]
	Commands(#[from] CommandConfigError),
}

/// Settings for one console process.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConsoleConfig {
	/// Account the bot runs as; mentions of it select this bot.
	pub bot_id: UserId,
	/// Accounts holding [`herald_registry::Permission::Operator`].
	pub operators: FxHashSet<UserId>,
	/// Tracing filter used when `RUST_LOG` is unset.
	pub log_filter: Option<String>,
	/// Dispatch settings.
	pub commands: CommandConfig,
}

impl Default for ConsoleConfig {
	fn default() -> Self {
		Self {
			bot_id: UserId(0),
			operators: FxHashSet::default(),
			log_filter: None,
			commands: CommandConfig::default(),
		}
	}
}

impl ConsoleConfig {
	/// Loads and validates the file at `path`.
	pub fn load(path: &Path) -> Result<Self, ConfigError> {
		let text = match std::fs::read_to_string(path) {
			Ok(text) => text,
			Err(error) if error.kind() == io::ErrorKind::NotFound => {
				tracing::debug!(path = %path.display(), "config file missing, using defaults");
				return Ok(Self::default());
			}
			Err(source) => {
				return Err(ConfigError::Read {
					path: path.to_path_buf(),
					source,
				});
			}
		};
		let config = Self::parse(&text).map_err(|error| match error {
			ConfigError::Parse { source, .. } => ConfigError::Parse {
				path: path.to_path_buf(),
				source,
			},
			other => other,
		})?;
		tracing::debug!(path = %path.display(), operators = config.operators.len(), "config loaded");
		Ok(config)
	}

	/// Parses and validates configuration text.
	pub fn parse(text: &str) -> Result<Self, ConfigError> {
		let config: Self = toml::from_str(text).map_err(|source| ConfigError::Parse {
			path: PathBuf::new(),
			source,
		})?;
		config.commands.validate()?;
		Ok(config)
	}

	pub fn is_operator(&self, user: UserId) -> bool {
		self.operators.contains(&user)
	}

	/// Sender for a chat account, holding `Operator` iff it is listed in `operators`.
	pub fn chat_sender(&self, user: UserId, outbox: Outbox) -> ChatSender {
		ChatSender::new(user, self.is_operator(user), outbox)
	}
}
