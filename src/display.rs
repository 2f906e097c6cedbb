use crate::schedule::Countdown;

/// Formats a remaining-seconds value the way the timer card renders it:
/// `M:SS` under an hour, `H:MM:SS` from an hour up.
pub fn format_remaining(total_secs: i64) -> String {
    let secs = total_secs.max(0);
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;

    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}

pub fn format_countdown(countdown: &Countdown) -> String {
    match countdown {
        Countdown::Paused => "paused".to_string(),
        Countdown::BeforeWindow { remaining_secs } => {
            format!("work starts in {}", format_remaining(*remaining_secs))
        }
        Countdown::InWindow { remaining_secs } => {
            format!("next break in {}", format_remaining(*remaining_secs))
        }
        Countdown::AfterWindow => "done for today".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_durations_use_minute_second_form() {
        assert_eq!(format_remaining(0), "0:00");
        assert_eq!(format_remaining(9), "0:09");
        assert_eq!(format_remaining(59), "0:59");
        assert_eq!(format_remaining(60), "1:00");
        assert_eq!(format_remaining(23 * 60 + 45), "23:45");
        assert_eq!(format_remaining(3599), "59:59");
    }

    #[test]
    fn representation_switches_at_one_hour() {
        assert_eq!(format_remaining(3600), "1:00:00");
        assert_eq!(format_remaining(3661), "1:01:01");
        assert_eq!(format_remaining(2 * 3600 + 5), "2:00:05");
    }

    #[test]
    fn negative_values_clamp_to_zero() {
        assert_eq!(format_remaining(-5), "0:00");
    }

    #[test]
    fn countdown_phases_render() {
        assert_eq!(format_countdown(&Countdown::Paused), "paused");
        assert_eq!(format_countdown(&Countdown::AfterWindow), "done for today");
        assert_eq!(
            format_countdown(&Countdown::InWindow { remaining_secs: 90 }),
            "next break in 1:30"
        );
    }
}
