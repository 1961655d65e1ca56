use std::future::Future;
use std::io;
use std::sync::OnceLock;
use std::thread;

use tokio::runtime::{Builder, Handle, Runtime};
use tokio::task::JoinHandle;

use crate::TaskClass;

/// Runtime the caller is on, or a shared fallback when called from a plain thread.
pub(crate) fn runtime_handle() -> Handle {
	match Handle::try_current() {
		Ok(handle) => handle,
		Err(_) => fallback_runtime().handle().clone(),
	}
}

fn fallback_runtime() -> &'static Runtime {
	static FALLBACK: OnceLock<Runtime> = OnceLock::new();
	FALLBACK.get_or_init(|| {
		tracing::debug!("starting fallback dispatch runtime");
		Builder::new_multi_thread()
			.enable_all()
			.worker_threads(2)
			.thread_name("herald-dispatch")
			.build()
			.expect("fallback dispatch runtime must start")
	})
}

/// Spawns a task of `class` on the current (or fallback) runtime.
pub fn spawn<F>(class: TaskClass, fut: F) -> JoinHandle<F::Output>
where
	F: Future + Send + 'static,
	F::Output: Send + 'static,
{
	tracing::trace!(task_class = class.as_str(), "spawning task");
	runtime_handle().spawn(fut)
}

/// Runs blocking work on a dedicated named OS thread.
///
/// Used for reads that may never return (stdin); unlike the runtime's
/// blocking pool, a parked thread here never holds up runtime shutdown.
pub fn spawn_named_thread<F, R>(class: TaskClass, name: impl Into<String>, f: F) -> io::Result<thread::JoinHandle<R>>
where
	F: FnOnce() -> R + Send + 'static,
	R: Send + 'static,
{
	let name = name.into();
	tracing::debug!(task_class = class.as_str(), thread = %name, "starting dedicated thread");
	thread::Builder::new().name(name).spawn(f)
}
