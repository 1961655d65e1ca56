//! Command argument tokens.
//!
//! Commands receive their arguments as a flat list of [`CommandArg`]s: text
//! content is split on whitespace, while every non-text content segment
//! (mentions, attachments) stays a single opaque token so handlers can accept
//! e.g. a mentioned user or an image as an argument.

use std::fmt;

use crate::Segment;

/// One command argument token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CommandArg {
	/// A whitespace-free word.
	Text(String),
	/// A non-text content segment.
	Segment(Segment),
}

impl CommandArg {
	/// Returns the word of a text token.
	pub fn as_text(&self) -> Option<&str> {
		match self {
			Self::Text(text) => Some(text),
			Self::Segment(_) => None,
		}
	}
}

impl From<&str> for CommandArg {
	fn from(text: &str) -> Self {
		Self::Text(text.to_owned())
	}
}

impl fmt::Display for CommandArg {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Text(text) => f.write_str(text),
			Self::Segment(segment) => write!(f, "{segment}"),
		}
	}
}

/// Splits raw text into whitespace-separated tokens.
pub fn tokenize(text: &str) -> Vec<CommandArg> {
	text.split_whitespace().map(CommandArg::from).collect()
}

/// Flattens content segments into argument tokens.
///
/// Metadata segments are dropped; empty text produces no tokens.
pub fn flatten<'a>(segments: impl IntoIterator<Item = &'a Segment>) -> Vec<CommandArg> {
	let mut args = Vec::new();
	for segment in segments {
		match segment {
			Segment::Text(text) => args.extend(tokenize(text)),
			Segment::Source(_) => {}
			other => args.push(CommandArg::Segment(other.clone())),
		}
	}
	args
}
