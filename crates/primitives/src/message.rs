//! Rich message model.
//!
//! A [`RichMessage`] is an ordered list of [`Segment`]s as delivered by the bot
//! network. Content segments (text, mentions, attachments) carry what the
//! sender wrote; metadata segments ([`Segment::Source`]) describe the message
//! itself and never take part in command parsing, although they keep their
//! position in the sequence.

use std::fmt;

use crate::UserId;

/// Kind of a binary attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttachmentKind {
	Image,
	Voice,
	File,
}

impl AttachmentKind {
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Image => "image",
			Self::Voice => "voice",
			Self::File => "file",
		}
	}
}

/// Reference to an uploaded binary attachment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Attachment {
	pub kind: AttachmentKind,
	/// Network-assigned resource id.
	pub id: String,
}

impl Attachment {
	pub fn new(kind: AttachmentKind, id: impl Into<String>) -> Self {
		Self { kind, id: id.into() }
	}
}

/// Origin metadata attached to an inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageSource {
	/// Network-assigned message id.
	pub id: u64,
	/// Unix timestamp (seconds) the network recorded for the message.
	pub time: u64,
}

/// One typed element of a [`RichMessage`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
	/// Plain text.
	Text(String),
	/// Mention of ("at") another account.
	Mention(UserId),
	/// Binary content such as an image.
	Attachment(Attachment),
	/// Message metadata; not content.
	Source(MessageSource),
}

impl Segment {
	/// Creates a text segment.
	pub fn text(content: impl Into<String>) -> Self {
		Self::Text(content.into())
	}

	/// Creates a mention segment.
	pub fn mention(target: impl Into<UserId>) -> Self {
		Self::Mention(target.into())
	}

	/// Returns true for segments describing the message rather than its content.
	pub const fn is_metadata(&self) -> bool {
		matches!(self, Self::Source(_))
	}

	/// Returns true for segments that carry user-visible content.
	pub const fn is_content(&self) -> bool {
		!self.is_metadata()
	}

	/// Returns true for text segments containing only whitespace.
	pub fn is_blank_text(&self) -> bool {
		matches!(self, Self::Text(text) if text.trim().is_empty())
	}

	/// Returns the text of a text segment.
	pub fn as_text(&self) -> Option<&str> {
		match self {
			Self::Text(text) => Some(text),
			_ => None,
		}
	}
}

impl fmt::Display for Segment {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Text(text) => f.write_str(text),
			Self::Mention(target) => write!(f, "@{target}"),
			Self::Attachment(attachment) => write!(f, "[{}:{}]", attachment.kind.as_str(), attachment.id),
			Self::Source(_) => Ok(()),
		}
	}
}

/// Ordered sequence of message segments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RichMessage {
	segments: Vec<Segment>,
}

impl RichMessage {
	/// Creates an empty message.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a message holding one text segment.
	pub fn text(content: impl Into<String>) -> Self {
		Self {
			segments: vec![Segment::text(content)],
		}
	}

	/// Appends a segment, builder style.
	pub fn with(mut self, segment: Segment) -> Self {
		self.segments.push(segment);
		self
	}

	/// Appends a segment.
	pub fn push(&mut self, segment: Segment) {
		self.segments.push(segment);
	}

	/// Returns every segment, metadata included.
	pub fn segments(&self) -> &[Segment] {
		&self.segments
	}

	/// Iterates over content segments only.
	pub fn content(&self) -> impl Iterator<Item = &Segment> {
		self.segments.iter().filter(|segment| segment.is_content())
	}

	/// Returns the number of segments, metadata included.
	pub fn len(&self) -> usize {
		self.segments.len()
	}

	/// Returns true if the message has no segments at all.
	pub fn is_empty(&self) -> bool {
		self.segments.is_empty()
	}
}

impl From<Vec<Segment>> for RichMessage {
	fn from(segments: Vec<Segment>) -> Self {
		Self { segments }
	}
}

impl From<&str> for RichMessage {
	fn from(text: &str) -> Self {
		Self::text(text)
	}
}

impl FromIterator<Segment> for RichMessage {
	fn from_iter<I: IntoIterator<Item = Segment>>(iter: I) -> Self {
		Self {
			segments: iter.into_iter().collect(),
		}
	}
}

impl fmt::Display for RichMessage {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for segment in &self.segments {
			write!(f, "{segment}")?;
		}
		Ok(())
	}
}
