//! Short display strings for remaining/elapsed values.
//!
//! Pure functions; the category decides the tier table. No category ever
//! produces a negative string: timers clamp at `0:00`, alarms and
//! reminders switch to `Now` and then relative/absolute tiers.

use chrono::{DateTime, Duration, TimeZone, Timelike};

use super::Category;

/// 12h/24h display preference for absolute time-of-day strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClockFormat {
    TwelveHour,
    TwentyFourHour,
}

impl Default for ClockFormat {
    fn default() -> Self {
        ClockFormat::TwentyFourHour
    }
}

/// Format a signed remaining-seconds value for display.
///
/// `now` anchors the absolute time-of-day tier (alarm/reminder values a
/// day or more out); pass the wall clock in whatever zone the display
/// should use.
pub fn format_remaining<Tz: TimeZone>(
    category: Category,
    remaining_secs: f64,
    clock: ClockFormat,
    now: DateTime<Tz>,
) -> String {
    match category {
        Category::Stopwatch => format_elapsed(remaining_secs),
        Category::Timer | Category::Pomodoro => format_countdown(remaining_secs),
        // Unknown categories get the alarm/reminder treatment.
        Category::Alarm | Category::Reminder | Category::Unknown => {
            format_until(remaining_secs, clock, now)
        }
    }
}

/// Elapsed duration, floor-rounded to the second, as `H:MM:SS` or `M:SS`.
pub fn format_elapsed(elapsed_secs: f64) -> String {
    let total = elapsed_secs.max(0.0).floor() as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}

/// Countdown for timer/pomodoro; clamps at `0:00`, never negative.
fn format_countdown(remaining_secs: f64) -> String {
    if remaining_secs <= 0.0 {
        return "0:00".to_string();
    }
    let total = remaining_secs.round() as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}

/// Relative-then-absolute tiers for alarm/reminder fire times.
fn format_until<Tz: TimeZone>(remaining_secs: f64, clock: ClockFormat, now: DateTime<Tz>) -> String {
    if remaining_secs <= 0.0 {
        return "Now".to_string();
    }
    let secs = remaining_secs;
    if secs < 60.0 {
        return "<1m".to_string();
    }
    if secs < 3600.0 {
        let minutes = (secs / 60.0).ceil() as u64;
        return format!("{minutes}m");
    }
    if secs < 86_400.0 {
        let total = secs as u64;
        let mut hours = total / 3600;
        let mut minutes = ((total % 3600) as f64 / 60.0).ceil() as u64;
        if minutes == 60 {
            hours += 1;
            minutes = 0;
        }
        return if minutes == 0 {
            format!("{hours}h")
        } else {
            format!("{hours}h {minutes}m")
        };
    }
    // A day or more out: show the absolute time of day it fires.
    let target = now + Duration::seconds(secs as i64);
    format_time_of_day(target.hour(), target.minute(), clock)
}

fn format_time_of_day(hour: u32, minute: u32, clock: ClockFormat) -> String {
    match clock {
        ClockFormat::TwentyFourHour => format!("{hour:02}:{minute:02}"),
        ClockFormat::TwelveHour => {
            let (suffix, h12) = if hour < 12 { ("AM", hour) } else { ("PM", hour - 12) };
            let h12 = if h12 == 0 { 12 } else { h12 };
            format!("{h12}:{minute:02} {suffix}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn at(epoch: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(epoch, 0).unwrap()
    }

    #[test]
    fn countdown_clamps_at_zero() {
        for r in [-500.0, -1.0, 0.0] {
            assert_eq!(format_remaining(Category::Timer, r, ClockFormat::TwentyFourHour, at(0)), "0:00");
            assert_eq!(format_remaining(Category::Pomodoro, r, ClockFormat::TwentyFourHour, at(0)), "0:00");
        }
    }

    #[test]
    fn countdown_shapes() {
        assert_eq!(format_remaining(Category::Timer, 125.0, ClockFormat::TwentyFourHour, at(0)), "2:05");
        assert_eq!(format_remaining(Category::Timer, 3661.0, ClockFormat::TwentyFourHour, at(0)), "1:01:01");
        assert_eq!(format_remaining(Category::Timer, 59.6, ClockFormat::TwentyFourHour, at(0)), "1:00");
    }

    #[test]
    fn alarm_tiers() {
        let clock = ClockFormat::TwentyFourHour;
        assert_eq!(format_remaining(Category::Alarm, -5.0, clock, at(0)), "Now");
        assert_eq!(format_remaining(Category::Alarm, 30.0, clock, at(0)), "<1m");
        assert_eq!(format_remaining(Category::Alarm, 125.0, clock, at(0)), "3m");
        assert_eq!(format_remaining(Category::Reminder, 5400.0, clock, at(0)), "1h 30m");
        assert_eq!(format_remaining(Category::Reminder, 7200.0, clock, at(0)), "2h");
    }

    #[test]
    fn day_or_more_out_shows_time_of_day() {
        // 90000s after midnight UTC is 01:00 the next day.
        assert_eq!(
            format_remaining(Category::Alarm, 90_000.0, ClockFormat::TwentyFourHour, at(0)),
            "01:00"
        );
        assert_eq!(
            format_remaining(Category::Alarm, 90_000.0, ClockFormat::TwelveHour, at(0)),
            "1:00 AM"
        );
    }

    #[test]
    fn twelve_hour_edges() {
        assert_eq!(format_time_of_day(0, 5, ClockFormat::TwelveHour), "12:05 AM");
        assert_eq!(format_time_of_day(12, 0, ClockFormat::TwelveHour), "12:00 PM");
        assert_eq!(format_time_of_day(23, 59, ClockFormat::TwelveHour), "11:59 PM");
    }

    #[test]
    fn unknown_category_uses_alarm_rule() {
        assert_eq!(format_remaining(Category::Unknown, -1.0, ClockFormat::TwentyFourHour, at(0)), "Now");
        assert_eq!(format_remaining(Category::Unknown, 30.0, ClockFormat::TwentyFourHour, at(0)), "<1m");
    }

    #[test]
    fn elapsed_floors() {
        assert_eq!(format_elapsed(0.0), "0:00");
        assert_eq!(format_elapsed(59.9), "0:59");
        assert_eq!(format_elapsed(61.0), "1:01");
        assert_eq!(format_elapsed(3600.0), "1:00:00");
        assert_eq!(format_elapsed(-3.0), "0:00");
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn never_negative_string(r in -1e6f64..1e6f64) {
                for cat in [Category::Timer, Category::Alarm, Category::Pomodoro,
                            Category::Reminder, Category::Stopwatch] {
                    let s = format_remaining(cat, r, ClockFormat::TwentyFourHour, at(0));
                    prop_assert!(!s.starts_with('-'), "negative string {s:?} for {cat:?} at {r}");
                    prop_assert!(!s.is_empty());
                }
            }

            #[test]
            fn timer_nonpositive_is_zero(r in -1e6f64..=0.0f64) {
                prop_assert_eq!(
                    format_remaining(Category::Timer, r, ClockFormat::TwentyFourHour, at(0)),
                    "0:00"
                );
            }
        }
    }
}
