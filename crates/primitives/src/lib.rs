//! Core value types for herald: identities, rich chat messages and command argument tokens.

/// Command argument tokens and message flattening.
pub mod args;
/// Identity newtypes for chat participants.
pub mod ids;
/// Rich message segments.
pub mod message;

pub use args::{CommandArg, flatten, tokenize};
pub use ids::UserId;
pub use message::{Attachment, AttachmentKind, MessageSource, RichMessage, Segment};
