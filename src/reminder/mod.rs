pub mod controller;

pub use controller::{ReminderController, ReminderEvent};
