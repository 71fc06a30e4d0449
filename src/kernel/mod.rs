pub mod scheduler;
pub mod task;
pub mod time;

pub use scheduler::Kernel;
