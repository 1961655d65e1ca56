//! Per-event dispatch tasks.
//!
//! The event bridge runs every inbound message as its own task. A task that
//! panics outside the handler guard (a sender's reply path, say) must not
//! take the listener down; [`TaskSet`] reaps such tasks and turns their
//! panics into log lines and a [`TaskReport`].

use std::future::Future;

use tokio::task::{JoinError, JoinSet};

use crate::TaskClass;
use crate::panic::join_error_panic_message;

/// Tally of reaped tasks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskReport {
	/// Tasks that ran to completion.
	pub completed: usize,
	/// Tasks aborted before completion.
	pub cancelled: usize,
	/// Panic messages of tasks that panicked, in reap order.
	pub panics: Vec<String>,
}

impl TaskReport {
	/// Total number of tasks reaped.
	pub fn reaped(&self) -> usize {
		self.completed + self.cancelled + self.panics.len()
	}

	fn record(&mut self, class: TaskClass, joined: Result<(), JoinError>) {
		let Err(err) = joined else {
			self.completed += 1;
			return;
		};
		match join_error_panic_message(err) {
			Some(message) => {
				tracing::error!(task_class = class.as_str(), panic = %message, "task panicked");
				self.panics.push(message);
			}
			None => self.cancelled += 1,
		}
	}
}

/// Unbounded set of fire-and-forget tasks of one class.
#[derive(Debug)]
pub struct TaskSet {
	class: TaskClass,
	tasks: JoinSet<()>,
}

impl TaskSet {
	pub fn new(class: TaskClass) -> Self {
		Self { class, tasks: JoinSet::new() }
	}

	/// Number of tasks not yet reaped.
	pub fn in_flight(&self) -> usize {
		self.tasks.len()
	}

	pub fn is_empty(&self) -> bool {
		self.tasks.is_empty()
	}

	/// Starts `fut` on the current (or fallback) runtime.
	pub fn spawn<F>(&mut self, fut: F)
	where
		F: Future<Output = ()> + Send + 'static,
	{
		tracing::trace!(task_class = self.class.as_str(), in_flight = self.tasks.len(), "spawning task");
		let handle = crate::spawn::runtime_handle();
		self.tasks.spawn_on(fut, &handle);
	}

	/// Reaps tasks that already finished, without waiting.
	pub fn reap_ready(&mut self) -> TaskReport {
		let mut report = TaskReport::default();
		while let Some(joined) = self.tasks.try_join_next() {
			report.record(self.class, joined);
		}
		report
	}

	/// Waits for every remaining task.
	pub async fn drain(&mut self) -> TaskReport {
		let mut report = TaskReport::default();
		while let Some(joined) = self.tasks.join_next().await {
			report.record(self.class, joined);
		}
		tracing::debug!(task_class = self.class.as_str(), completed = report.completed, panicked = report.panics.len(), "tasks drained");
		report
	}
}
