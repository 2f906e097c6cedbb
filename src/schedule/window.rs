use anyhow::{bail, Context, Result};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// A daily work window during which break reminders are active.
///
/// Times are naive wall-clock values interpreted against the local calendar
/// day; there is no timezone or DST handling. `end` is conventionally after
/// `start` within the same day. When it is not, the window is empty and
/// produces no triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkWindow {
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    #[serde(rename = "notificationInterval")]
    pub interval_minutes: u32,
    pub enabled: bool,
}

impl Default for WorkWindow {
    fn default() -> Self {
        Self {
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
            interval_minutes: 60,
            enabled: false,
        }
    }
}

impl WorkWindow {
    pub fn new(start: &str, end: &str, interval_minutes: u32, enabled: bool) -> Result<Self> {
        if interval_minutes == 0 {
            bail!("reminder interval must be at least one minute");
        }
        Ok(Self {
            start_time: parse_hhmm(start)?,
            end_time: parse_hhmm(end)?,
            interval_minutes,
            enabled,
        })
    }

    /// Same-day windows only; `start >= end` means no triggers today.
    pub fn is_degenerate(&self) -> bool {
        self.start_time >= self.end_time || self.interval_minutes == 0
    }
}

/// Parses a wall-clock `"HH:MM"` value, e.g. `"09:00"`.
pub fn parse_hhmm(value: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .with_context(|| format!("invalid time '{value}', expected HH:MM"))
}

pub fn format_hhmm(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Serde helpers for the `"HH:MM"` encoding used by the persisted settings.
mod hhmm {
    use chrono::NaiveTime;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_hhmm(*time))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let value = String::deserialize(deserializer)?;
        super::parse_hhmm(&value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_times() {
        assert_eq!(
            parse_hhmm("09:00").unwrap(),
            NaiveTime::from_hms_opt(9, 0, 0).unwrap()
        );
        assert_eq!(
            parse_hhmm("23:59").unwrap(),
            NaiveTime::from_hms_opt(23, 59, 0).unwrap()
        );
    }

    #[test]
    fn rejects_malformed_times() {
        assert!(parse_hhmm("9am").is_err());
        assert!(parse_hhmm("25:00").is_err());
        assert!(parse_hhmm("09:60").is_err());
        assert!(parse_hhmm("").is_err());
    }

    #[test]
    fn rejects_zero_interval() {
        assert!(WorkWindow::new("09:00", "17:00", 0, true).is_err());
    }

    #[test]
    fn serde_uses_hhmm_strings() {
        let window = WorkWindow::new("09:00", "17:00", 60, true).unwrap();
        let json = serde_json::to_string(&window).unwrap();
        assert!(json.contains("\"startTime\":\"09:00\""));
        assert!(json.contains("\"endTime\":\"17:00\""));
        assert!(json.contains("\"notificationInterval\":60"));

        let parsed: WorkWindow = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, window);
    }

    #[test]
    fn inverted_window_is_degenerate() {
        let window = WorkWindow::new("17:00", "09:00", 60, true).unwrap();
        assert!(window.is_degenerate());
    }
}
