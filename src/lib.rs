pub mod display;
pub mod exercises;
pub mod history;
pub mod notify;
pub mod playback;
pub mod reminder;
pub mod schedule;
pub mod settings;

pub use history::HistoryDb;
pub use reminder::{ReminderController, ReminderEvent};
pub use schedule::{countdown, trigger_schedule, Countdown, WorkWindow};
pub use settings::SettingsStore;
