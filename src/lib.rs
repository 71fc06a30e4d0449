pub mod config;
pub mod demo;
pub mod error;
pub mod ipc;
pub mod kernel;
pub mod log;

pub use error::{Result, RtosError};
pub use ipc::BlockingQueue;
pub use kernel::Kernel;
pub use kernel::task::{Priority, Task, TaskBuilder, TaskExit, TaskState};
pub use kernel::time::{JitterReport, JitterStats, PeriodicRunner};
