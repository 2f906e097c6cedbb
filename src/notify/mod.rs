use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime, Timelike};
use log::{info, warn};
use notify_rust::Notification;
use serde::Serialize;

use crate::schedule::{trigger_schedule, WorkWindow};

pub const REMINDER_TITLE: &str = "\u{1f9d8} Relax Break Time!";
pub const REMINDER_BODY: &str =
    "Take a moment to do eye workouts and stretch. Your health matters!";

/// How a single reminder is registered with the platform notification
/// service: either a calendar-based time of day, or a relative delay from
/// now. Platforms without calendar triggers get the relative form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TriggerSpec {
    Calendar { hour: u32, minute: u32, repeats: bool },
    Relative { seconds_from_now: i64, repeats: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecStyle {
    Calendar,
    Relative,
}

impl TriggerSpec {
    /// Builds the spec for one trigger time. Relative delays are clamped to
    /// at least one second so already-elapsed triggers still register.
    pub fn for_trigger(trigger: NaiveDateTime, now: NaiveDateTime, style: SpecStyle) -> Self {
        match style {
            SpecStyle::Calendar => TriggerSpec::Calendar {
                hour: trigger.hour(),
                minute: trigger.minute(),
                repeats: true,
            },
            SpecStyle::Relative => TriggerSpec::Relative {
                seconds_from_now: (trigger - now).num_seconds().max(1),
                repeats: true,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TriggerHandle(pub u64);

#[derive(Debug, Clone)]
pub struct ReminderContent {
    pub title: String,
    pub body: String,
    pub sound: bool,
}

impl Default for ReminderContent {
    fn default() -> Self {
        Self {
            title: REMINDER_TITLE.to_string(),
            body: REMINDER_BODY.to_string(),
            sound: true,
        }
    }
}

/// The platform notification scheduler the core calls into. Registrations
/// return opaque handles; an individual failure is reported to the caller,
/// never retried.
pub trait NotificationService {
    fn cancel_all(&mut self);
    fn schedule(&mut self, spec: TriggerSpec, content: &ReminderContent) -> Result<TriggerHandle>;
    /// Presents a reminder immediately.
    fn deliver(&mut self, content: &ReminderContent) -> Result<()>;
}

/// Outcome of a best-effort registration pass.
#[derive(Debug, Default)]
pub struct RegistrationReport {
    pub requested: usize,
    pub registered: usize,
    pub errors: Vec<String>,
}

/// Clears previously registered reminders, then registers the day's trigger
/// schedule. Best effort: no rollback on partial failure, and the saved
/// configuration is unaffected by the outcome.
pub fn register_reminders<S: NotificationService + ?Sized>(
    service: &mut S,
    window: &WorkWindow,
    reference_date: NaiveDate,
    now: NaiveDateTime,
    style: SpecStyle,
    content: &ReminderContent,
) -> RegistrationReport {
    service.cancel_all();

    let triggers = trigger_schedule(window, reference_date);
    let mut report = RegistrationReport {
        requested: triggers.len(),
        ..Default::default()
    };

    for trigger in &triggers {
        let spec = TriggerSpec::for_trigger(*trigger, now, style);
        match service.schedule(spec, content) {
            Ok(_) => report.registered += 1,
            Err(err) => {
                warn!("failed to register reminder at {}: {err:#}", trigger.format("%H:%M"));
                report.errors.push(format!("{}: {err:#}", trigger.format("%H:%M")));
            }
        }
    }

    info!(
        "{}/{} reminders registered for {} - {}",
        report.registered,
        report.requested,
        window.start_time.format("%H:%M"),
        window.end_time.format("%H:%M"),
    );

    report
}

/// In-process registry backed by the OS notification daemon. Registration
/// only records the spec; delivery happens when the reminder loop observes a
/// due trigger and calls [`DesktopNotifier::deliver`].
#[derive(Default)]
pub struct DesktopNotifier {
    next_handle: u64,
    registered: Vec<(TriggerHandle, TriggerSpec, ReminderContent)>,
}

impl DesktopNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registered_count(&self) -> usize {
        self.registered.len()
    }
}

impl NotificationService for DesktopNotifier {
    fn cancel_all(&mut self) {
        self.registered.clear();
    }

    fn schedule(&mut self, spec: TriggerSpec, content: &ReminderContent) -> Result<TriggerHandle> {
        self.next_handle += 1;
        let handle = TriggerHandle(self.next_handle);
        self.registered.push((handle, spec, content.clone()));
        Ok(handle)
    }

    /// Shows the reminder through the OS notification daemon. No
    /// auto-dismiss; the sound hint follows the user's sound preference.
    fn deliver(&mut self, content: &ReminderContent) -> Result<()> {
        let mut notification = Notification::new();
        notification
            .summary(&content.title)
            .body(&content.body)
            .timeout(0);
        if content.sound {
            notification.sound_name("message-new-instant");
        }
        notification.show()?;
        Ok(())
    }
}
