use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::schedule::WorkWindow;

/// Hard ceiling on the number of reminders registered per day. Platform
/// notification services silently drop or reject excessive registrations.
pub const MAX_TRIGGERS: usize = 50;

/// Computes the day's reminder trigger times for `window`, anchored to
/// `reference_date`.
///
/// Triggers start at the window's start time and repeat every
/// `interval_minutes`, strictly before the end time, capped at
/// [`MAX_TRIGGERS`]. A disabled or degenerate window yields an empty
/// schedule. Pure function: identical inputs always produce identical
/// output.
pub fn trigger_schedule(window: &WorkWindow, reference_date: NaiveDate) -> Vec<NaiveDateTime> {
    if !window.enabled || window.is_degenerate() {
        return Vec::new();
    }

    let start = reference_date.and_time(window.start_time);
    let end = reference_date.and_time(window.end_time);
    let step = Duration::minutes(i64::from(window.interval_minutes));

    let mut triggers = Vec::new();
    let mut cursor = start;
    while cursor < end && triggers.len() < MAX_TRIGGERS {
        triggers.push(cursor);
        cursor += step;
    }

    triggers
}
