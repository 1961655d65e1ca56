use std::any::Any;

use tokio::task::JoinError;

/// Renders a caught panic payload for logs and `CommandError::Panicked`.
///
/// `panic!("literal")` carries a `&'static str` and formatted panics carry a
/// `String`; other payloads (e.g. `std::panic::panic_any(17)`) get a fixed
/// placeholder.
pub fn panic_payload_message(payload: &(dyn Any + Send)) -> String {
	if let Some(msg) = payload.downcast_ref::<&'static str>() {
		return (*msg).to_owned();
	}
	if let Some(msg) = payload.downcast_ref::<String>() {
		return msg.clone();
	}
	"<non-string panic payload>".to_owned()
}

/// Panic message of a failed task; `None` when the task was aborted instead.
pub(crate) fn join_error_panic_message(err: JoinError) -> Option<String> {
	if !err.is_panic() {
		return None;
	}
	Some(panic_payload_message(err.into_panic().as_ref()))
}
