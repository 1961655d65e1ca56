//! Bot-selector stripping.
//!
//! In group chats a command may be addressed to one bot by mentioning it
//! first: `@bot /greet Alice`. The selector is the first content segment that
//! is not blank text. Layout of an addressed message, worst case:
//!
//! ```text
//! [Source] [blank Text]* [Mention(bot)] [Text(" /greet Alice")] ...
//! ```
//!
//! Stripping drops the blank texts and the mention, keeps metadata in place
//! and left-trims the first text after the mention. The input is never
//! mutated; a stripped copy is built instead.

use std::borrow::Cow;

use herald_primitives::{RichMessage, Segment, UserId};
use thiserror::Error;

/// The message opens with a mention of another account.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("message is addressed to {target}")]
pub struct NotAddressedToMe {
	/// The mentioned account.
	pub target: UserId,
}

/// Removes a leading selector addressed to `bot`.
///
/// Returns the input unchanged when it does not open with a mention.
pub fn strip_selector(segments: &[Segment], bot: UserId) -> Result<Cow<'_, [Segment]>, NotAddressedToMe> {
	let selector = segments
		.iter()
		.enumerate()
		.find(|(_, segment)| segment.is_content() && !segment.is_blank_text());

	let Some((at, Segment::Mention(target))) = selector else {
		return Ok(Cow::Borrowed(segments));
	};
	if *target != bot {
		return Err(NotAddressedToMe { target: *target });
	}

	let mut stripped = Vec::with_capacity(segments.len());
	stripped.extend(segments[..at].iter().filter(|segment| segment.is_metadata()).cloned());

	let mut trimming = true;
	for segment in &segments[at + 1..] {
		match segment {
			Segment::Source(_) => stripped.push(segment.clone()),
			Segment::Text(text) if trimming => {
				stripped.push(Segment::text(text.trim_start()));
				trimming = false;
			}
			other => {
				trimming = false;
				stripped.push(other.clone());
			}
		}
	}
	Ok(Cow::Owned(stripped))
}

/// Strips the selector and returns the content segments of a command candidate.
pub fn command_content(message: &RichMessage, bot: UserId) -> Result<Vec<Segment>, NotAddressedToMe> {
	let stripped = strip_selector(message.segments(), bot)?;
	Ok(stripped.iter().filter(|segment| segment.is_content()).cloned().collect())
}
