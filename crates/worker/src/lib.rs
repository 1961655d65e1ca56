//! Task plumbing for herald dispatch.
//!
//! Every inbound message is handled on its own task inside a [`TaskSet`];
//! panics escaping those tasks are reaped into a [`TaskReport`] instead of
//! ending the listener. Console input, which blocks on stdin, runs on a
//! dedicated thread from [`spawn_named_thread`].

mod class;
mod panic;
mod spawn;
mod task_set;

pub use class::TaskClass;
pub use panic::panic_payload_message;
pub use spawn::{spawn, spawn_named_thread};
pub use task_set::{TaskReport, TaskSet};
