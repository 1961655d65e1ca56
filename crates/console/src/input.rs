//! Console input: stdin lines become messages from the console sender.

use std::io::BufRead;
use std::sync::Arc;

use herald_primitives::RichMessage;
use herald_registry::CommandSender;
use tokio::sync::mpsc;

use crate::bridge::MessageEvent;

/// Turns one typed line into a message, adding the prefix when it is missing.
///
/// Returns `None` for blank lines.
pub fn console_line(line: &str, prefix: &str) -> Option<RichMessage> {
	let line = line.trim();
	if line.is_empty() {
		return None;
	}
	if line.starts_with(prefix) {
		Some(RichMessage::text(line))
	} else {
		Some(RichMessage::text(format!("{prefix}{line}")))
	}
}

/// Blocking reader loop, meant for a dedicated thread.
///
/// Stops at end of input, on a read error, or once the bridge side hangs up.
/// Returns how many lines were forwarded.
pub fn read_lines(input: impl BufRead, sender: Arc<dyn CommandSender>, prefix: &str, inbound: &mpsc::Sender<MessageEvent>) -> usize {
	let mut forwarded = 0;
	for line in input.lines() {
		let line = match line {
			Ok(line) => line,
			Err(error) => {
				tracing::warn!(%error, "console input failed");
				break;
			}
		};
		let Some(message) = console_line(&line, prefix) else {
			continue;
		};
		if inbound.blocking_send(MessageEvent::new(Arc::clone(&sender), message)).is_err() {
			tracing::debug!("bridge closed, console input stops");
			break;
		}
		forwarded += 1;
	}
	forwarded
}
