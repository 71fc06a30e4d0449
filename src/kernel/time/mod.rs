pub mod clock;
pub mod jitter;
pub mod periodic;
pub mod systick;
pub mod timer;

pub use clock::{Clock, ManualClock, SystemClock, WakeOffset};
pub use jitter::{JitterReport, JitterStats};
pub use periodic::PeriodicRunner;
pub use systick::Systick;
pub use timer::Delay;
