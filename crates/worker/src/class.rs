/// What a spawned task or thread is for; attached to spawn logs as `task_class`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskClass {
	/// Handling of one inbound message.
	Dispatch,
	/// The event bridge's intake loop.
	Listener,
	/// Blocking reads on a dedicated thread (console stdin).
	IoBlocking,
}

impl TaskClass {
	pub(crate) const fn as_str(self) -> &'static str {
		match self {
			Self::Dispatch => "dispatch",
			Self::Listener => "listener",
			Self::IoBlocking => "io_blocking",
		}
	}
}
