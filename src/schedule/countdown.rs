use chrono::{Duration, NaiveDateTime};
use serde::Serialize;

use crate::schedule::WorkWindow;

/// Where "now" falls relative to the daily work window, and how long until
/// the next reminder fires. Derived on every tick, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "camelCase")]
pub enum Countdown {
    /// Reminders are disabled.
    Paused,
    /// The work day has not started yet; counting down to the start time.
    BeforeWindow { remaining_secs: i64 },
    /// Inside the work window; counting down to the next cycle boundary.
    InWindow { remaining_secs: i64 },
    /// Past the end time; no further triggers today.
    AfterWindow,
}

impl Countdown {
    pub fn remaining_secs(&self) -> Option<i64> {
        match self {
            Countdown::BeforeWindow { remaining_secs } | Countdown::InWindow { remaining_secs } => {
                Some(*remaining_secs)
            }
            Countdown::Paused | Countdown::AfterWindow => None,
        }
    }

    /// Remaining time as (hours, minutes, seconds). The presentation layer
    /// switches from M:SS to H:MM:SS once the hours component is non-zero.
    pub fn remaining_hms(&self) -> Option<(i64, i64, i64)> {
        self.remaining_secs()
            .map(|secs| (secs / 3600, (secs % 3600) / 60, secs % 60))
    }
}

/// Computes the live countdown for `window` at instant `now`.
///
/// Remaining durations are rounded up to whole seconds so a display never
/// reads 0:00 while time actually remains. At the exact instant of a cycle
/// boundary the reminder for that instant has already fired, so the
/// countdown shows one full interval to the next one.
pub fn countdown(window: &WorkWindow, now: NaiveDateTime) -> Countdown {
    if !window.enabled {
        return Countdown::Paused;
    }
    if window.is_degenerate() {
        return Countdown::AfterWindow;
    }

    let start = now.date().and_time(window.start_time);
    let end = now.date().and_time(window.end_time);

    if now < start {
        return Countdown::BeforeWindow {
            remaining_secs: ceil_secs(start - now),
        };
    }
    if now >= end {
        return Countdown::AfterWindow;
    }

    let interval_secs = i64::from(window.interval_minutes) * 60;
    let elapsed_secs = (now - start).num_seconds();
    let next_cycle = elapsed_secs / interval_secs + 1;
    let next_trigger = start + Duration::seconds(next_cycle * interval_secs);

    Countdown::InWindow {
        remaining_secs: ceil_secs(next_trigger - now),
    }
}

fn ceil_secs(duration: Duration) -> i64 {
    let ms = duration.num_milliseconds();
    (ms + 999).div_euclid(1000)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn window(start: &str, end: &str, interval: u32) -> WorkWindow {
        WorkWindow::new(start, end, interval, true).unwrap()
    }

    fn at(hour: u32, min: u32, sec: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 2)
            .unwrap()
            .and_time(NaiveTime::from_hms_opt(hour, min, sec).unwrap())
    }

    #[test]
    fn disabled_is_always_paused() {
        let mut w = window("09:00", "17:00", 60);
        w.enabled = false;
        for now in [at(0, 0, 0), at(9, 0, 0), at(12, 30, 0), at(23, 59, 59)] {
            assert_eq!(countdown(&w, now), Countdown::Paused);
        }
    }

    #[test]
    fn one_second_before_start_never_reads_zero() {
        let got = countdown(&window("09:00", "17:00", 60), at(8, 59, 59));
        assert_eq!(got, Countdown::BeforeWindow { remaining_secs: 1 });
    }

    #[test]
    fn before_window_counts_down_to_start() {
        let got = countdown(&window("09:00", "17:00", 60), at(8, 30, 0));
        assert_eq!(got, Countdown::BeforeWindow { remaining_secs: 30 * 60 });
    }

    #[test]
    fn exactly_at_end_is_after_window() {
        let got = countdown(&window("09:00", "17:00", 60), at(17, 0, 0));
        assert_eq!(got, Countdown::AfterWindow);
    }

    #[test]
    fn past_end_is_after_window() {
        let got = countdown(&window("09:00", "17:00", 60), at(20, 15, 0));
        assert_eq!(got, Countdown::AfterWindow);
    }

    #[test]
    fn mid_cycle_counts_down_to_next_trigger() {
        // 09:20:00 with hourly cycles: next trigger 10:00:00.
        let got = countdown(&window("09:00", "17:00", 60), at(9, 20, 0));
        assert_eq!(got, Countdown::InWindow { remaining_secs: 40 * 60 });
    }

    #[test]
    fn sub_minute_remainder_is_exact() {
        // 09:14:30 with 15-minute cycles: 30 seconds to the 09:15 trigger.
        let got = countdown(&window("09:00", "17:00", 15), at(9, 14, 30));
        assert_eq!(got, Countdown::InWindow { remaining_secs: 30 });
    }

    #[test]
    fn cycle_boundary_shows_a_full_interval() {
        // At 10:00:00 sharp the 10:00 reminder has fired; count to 11:00.
        let got = countdown(&window("09:00", "17:00", 60), at(10, 0, 0));
        assert_eq!(got, Countdown::InWindow { remaining_secs: 3600 });
    }

    #[test]
    fn window_start_counts_a_full_interval() {
        let got = countdown(&window("09:00", "17:00", 60), at(9, 0, 0));
        assert_eq!(got, Countdown::InWindow { remaining_secs: 3600 });
    }

    #[test]
    fn degenerate_window_has_no_triggers_today() {
        let got = countdown(&window("17:00", "09:00", 60), at(12, 0, 0));
        assert_eq!(got, Countdown::AfterWindow);
    }

    #[test]
    fn hms_split_for_long_intervals() {
        let got = countdown(&window("09:00", "17:00", 90), at(9, 10, 15));
        // 09:00 + 90min = 10:30 next trigger; 1h 19m 45s out.
        assert_eq!(got.remaining_hms(), Some((1, 19, 45)));
    }

    #[test]
    fn countdown_is_monotonic_within_a_cycle() {
        let w = window("09:00", "17:00", 30);
        let mut prev = i64::MAX;
        for sec in 1..(30 * 60) {
            let now = at(9, 0, 0) + Duration::seconds(sec);
            let Countdown::InWindow { remaining_secs } = countdown(&w, now) else {
                panic!("expected InWindow");
            };
            assert!(remaining_secs < prev);
            prev = remaining_secs;
        }
    }
}
