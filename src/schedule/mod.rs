pub mod countdown;
pub mod triggers;
pub mod window;

pub use countdown::{countdown, Countdown};
pub use triggers::{trigger_schedule, MAX_TRIGGERS};
pub use window::WorkWindow;
