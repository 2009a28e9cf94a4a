//! Alarm recurrence and snooze scheduling.
//!
//! Alarms fire at a wall-clock time of day under a recurrence rule. The
//! external service executes them; this module owns the derived
//! next-trigger computation the overlay and alarm list consume.

use chrono::{DateTime, Datelike, Duration, TimeZone, Timelike};
use serde::{Deserialize, Serialize};

/// A time today counts as "just missed" (and still fires) for this long.
const GRACE_SECS: i64 = 90;
/// Suppress retrigger this long after a fire, so the already-fired slot
/// schedules for the next occurrence instead of firing again.
const RETRIGGER_SUPPRESS_SECS: i64 = 120;

/// Recurrence rule. Custom day sets use the wire form `"1,3,5"` with
/// `0` = Monday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Recurring {
    Once,
    Daily,
    Weekdays,
    Weekends,
    Days(Vec<u8>),
}

impl From<String> for Recurring {
    fn from(value: String) -> Self {
        match value.as_str() {
            "once" => Recurring::Once,
            "daily" => Recurring::Daily,
            "weekdays" => Recurring::Weekdays,
            "weekends" => Recurring::Weekends,
            other => {
                let days: Vec<u8> = other
                    .split(',')
                    .filter_map(|d| d.trim().parse::<u8>().ok())
                    .filter(|d| *d <= 6)
                    .collect();
                if days.is_empty() {
                    Recurring::Once
                } else {
                    Recurring::Days(days)
                }
            }
        }
    }
}

impl From<Recurring> for String {
    fn from(value: Recurring) -> Self {
        match value {
            Recurring::Once => "once".into(),
            Recurring::Daily => "daily".into(),
            Recurring::Weekdays => "weekdays".into(),
            Recurring::Weekends => "weekends".into(),
            Recurring::Days(days) => days
                .iter()
                .map(|d| d.to_string())
                .collect::<Vec<_>>()
                .join(","),
        }
    }
}

impl Recurring {
    /// Whether the rule allows firing on a day, 0 = Monday .. 6 = Sunday.
    fn allows_day(&self, day: u32) -> bool {
        match self {
            Recurring::Once | Recurring::Daily => true,
            Recurring::Weekdays => day < 5,
            Recurring::Weekends => day >= 5,
            Recurring::Days(days) => days.iter().any(|d| u32::from(*d) == day),
        }
    }
}

/// A scheduled alarm record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alarm {
    pub id: String,
    pub hour: u32,
    pub minute: u32,
    pub label: String,
    pub recurring: Recurring,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub snoozed_until: Option<i64>,
    #[serde(default)]
    pub last_triggered: Option<i64>,
    pub sound: String,
    pub volume: u32,
    /// Minutes a snooze postpones the alarm.
    pub snooze_duration: u32,
    #[serde(default)]
    pub subtle_mode: bool,
    #[serde(default)]
    pub auto_suspend: bool,
    pub created_at: i64,
}

fn default_enabled() -> bool {
    true
}

impl Alarm {
    pub fn new(hour: u32, minute: u32, recurring: Recurring, now: i64) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string()[..8].to_string(),
            hour,
            minute,
            label: format!("Alarm {hour:02}:{minute:02}"),
            recurring,
            enabled: true,
            snoozed_until: None,
            last_triggered: None,
            sound: "alarm.mp3".into(),
            volume: 100,
            snooze_duration: 5,
            subtle_mode: false,
            auto_suspend: false,
            created_at: now,
        }
    }

    /// Next trigger instant in epoch seconds, or `None` when disabled.
    ///
    /// A snooze wins outright, even when already past, so it triggers.
    /// A time that slipped less than the grace period behind `now` still
    /// fires today; older misses roll to the next allowed day. A fire
    /// within the suppression window schedules the next occurrence.
    pub fn next_trigger<Tz: TimeZone>(&self, now: DateTime<Tz>) -> Option<i64> {
        if !self.enabled {
            return None;
        }
        if let Some(snoozed) = self.snoozed_until {
            return Some(snoozed);
        }

        let mut target = now
            .clone()
            .with_hour(self.hour.min(23))
            .and_then(|t| t.with_minute(self.minute.min(59)))
            .and_then(|t| t.with_second(0))
            .and_then(|t| t.with_nanosecond(0))?;

        let recently_fired = self
            .last_triggered
            .is_some_and(|t| now.timestamp() - t < RETRIGGER_SUPPRESS_SECS);
        if recently_fired {
            target = target + Duration::days(1);
        } else if target <= now {
            let missed_by = now.timestamp() - target.timestamp();
            if missed_by >= GRACE_SECS {
                target = target + Duration::days(1);
            }
        }

        // Step forward to the first day the recurrence rule allows.
        for _ in 0..7 {
            if self.recurring.allows_day(target.weekday().num_days_from_monday()) {
                return Some(target.timestamp());
            }
            target = target + Duration::days(1);
        }
        Some(target.timestamp())
    }

    /// Postpone by `minutes` (falling back to the per-alarm duration,
    /// then `default_minutes`). Re-enables the alarm so a fired one-shot
    /// alarm rings again.
    pub fn snooze(&mut self, now: i64, minutes: Option<u32>, default_minutes: u32) -> i64 {
        let minutes = minutes.unwrap_or(if self.snooze_duration > 0 {
            self.snooze_duration
        } else {
            default_minutes
        });
        let until = now + i64::from(minutes) * 60;
        self.snoozed_until = Some(until);
        self.enabled = true;
        until
    }

    /// Toggle on/off; either direction clears a pending snooze.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        self.snoozed_until = None;
    }

    /// Record a fire at `now`. One-shot alarms disable themselves; a
    /// snooze fire does not stamp `last_triggered` so the regular slot
    /// still schedules correctly.
    pub fn mark_fired(&mut self, now: i64) {
        if self.recurring == Recurring::Once {
            self.enabled = false;
            self.snoozed_until = None;
            return;
        }
        let was_snoozed = self.snoozed_until.is_some();
        self.snoozed_until = None;
        if !was_snoozed {
            self.last_triggered = Some(now);
        }
    }

    /// Apply an edit: the user expects an edited alarm to be live again,
    /// with stale snooze/fire state cleared.
    pub fn reschedule(&mut self, hour: u32, minute: u32, recurring: Recurring) {
        self.hour = hour;
        self.minute = minute;
        self.recurring = recurring;
        self.enabled = true;
        self.snoozed_until = None;
        self.last_triggered = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    // 2024-05-10 is a Friday.
    fn friday(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 10, h, m, s).unwrap()
    }

    fn alarm_at(hour: u32, minute: u32, recurring: Recurring) -> Alarm {
        Alarm::new(hour, minute, recurring, friday(0, 0, 0).timestamp())
    }

    #[test]
    fn recurring_wire_forms() {
        assert_eq!(Recurring::from("daily".to_string()), Recurring::Daily);
        assert_eq!(Recurring::from("0,2,4".to_string()), Recurring::Days(vec![0, 2, 4]));
        assert_eq!(Recurring::from("garbage".to_string()), Recurring::Once);
        assert_eq!(String::from(Recurring::Days(vec![1, 3])), "1,3");
    }

    #[test]
    fn future_time_fires_today() {
        let alarm = alarm_at(18, 0, Recurring::Once);
        let next = alarm.next_trigger(friday(9, 0, 0)).unwrap();
        assert_eq!(next, friday(18, 0, 0).timestamp());
    }

    #[test]
    fn just_missed_time_still_fires_within_grace() {
        let alarm = alarm_at(9, 0, Recurring::Daily);
        let next = alarm.next_trigger(friday(9, 1, 0)).unwrap();
        assert_eq!(next, friday(9, 0, 0).timestamp());
    }

    #[test]
    fn missed_past_grace_rolls_to_tomorrow() {
        let alarm = alarm_at(9, 0, Recurring::Daily);
        let next = alarm.next_trigger(friday(9, 1, 30)).unwrap();
        assert_eq!(next, friday(9, 0, 0).timestamp() + 86_400);
    }

    #[test]
    fn disabled_alarm_never_triggers() {
        let mut alarm = alarm_at(9, 0, Recurring::Daily);
        alarm.enabled = false;
        assert_eq!(alarm.next_trigger(friday(8, 0, 0)), None);
    }

    #[test]
    fn snooze_wins_even_when_past() {
        let mut alarm = alarm_at(9, 0, Recurring::Daily);
        alarm.snoozed_until = Some(friday(7, 0, 0).timestamp());
        assert_eq!(alarm.next_trigger(friday(8, 0, 0)), Some(friday(7, 0, 0).timestamp()));
    }

    #[test]
    fn recent_fire_suppresses_retrigger() {
        let mut alarm = alarm_at(9, 0, Recurring::Daily);
        alarm.last_triggered = Some(friday(9, 0, 0).timestamp());
        // Sixty seconds after firing, the slot schedules for tomorrow.
        let next = alarm.next_trigger(friday(9, 1, 0)).unwrap();
        assert_eq!(next, friday(9, 0, 0).timestamp() + 86_400);
    }

    #[test]
    fn weekday_rule_skips_weekend() {
        // Friday 09:00 was missed; Saturday/Sunday are skipped.
        let alarm = alarm_at(9, 0, Recurring::Weekdays);
        let next = alarm.next_trigger(friday(12, 0, 0)).unwrap();
        let monday = Utc.with_ymd_and_hms(2024, 5, 13, 9, 0, 0).unwrap();
        assert_eq!(next, monday.timestamp());
    }

    #[test]
    fn weekend_rule_waits_for_saturday() {
        let alarm = alarm_at(10, 0, Recurring::Weekends);
        let next = alarm.next_trigger(friday(9, 0, 0)).unwrap();
        let saturday = Utc.with_ymd_and_hms(2024, 5, 11, 10, 0, 0).unwrap();
        assert_eq!(next, saturday.timestamp());
    }

    #[test]
    fn custom_days_step_to_next_allowed() {
        // 0 = Monday, 2 = Wednesday; from Friday the next is Monday.
        let alarm = alarm_at(8, 0, Recurring::Days(vec![0, 2]));
        let next = alarm.next_trigger(friday(9, 0, 0)).unwrap();
        let monday = Utc.with_ymd_and_hms(2024, 5, 13, 8, 0, 0).unwrap();
        assert_eq!(next, monday.timestamp());
    }

    #[test]
    fn snooze_reenables_and_postpones() {
        let mut alarm = alarm_at(9, 0, Recurring::Once);
        alarm.enabled = false;
        let now = friday(9, 0, 30).timestamp();
        let until = alarm.snooze(now, None, 10);
        assert_eq!(until, now + 5 * 60); // per-alarm duration wins
        assert!(alarm.enabled);

        alarm.snooze_duration = 0;
        let until = alarm.snooze(now, None, 10);
        assert_eq!(until, now + 10 * 60); // global fallback

        let until = alarm.snooze(now, Some(2), 10);
        assert_eq!(until, now + 2 * 60); // explicit wins
    }

    #[test]
    fn once_alarm_disables_on_fire() {
        let mut alarm = alarm_at(9, 0, Recurring::Once);
        alarm.mark_fired(friday(9, 0, 0).timestamp());
        assert!(!alarm.enabled);
        assert_eq!(alarm.next_trigger(friday(9, 0, 5)), None);
    }

    #[test]
    fn snooze_fire_does_not_stamp_last_triggered() {
        let mut alarm = alarm_at(9, 0, Recurring::Daily);
        alarm.snoozed_until = Some(friday(9, 5, 0).timestamp());
        alarm.mark_fired(friday(9, 5, 0).timestamp());
        assert_eq!(alarm.last_triggered, None);
        assert_eq!(alarm.snoozed_until, None);

        alarm.mark_fired(friday(9, 6, 0).timestamp());
        assert_eq!(alarm.last_triggered, Some(friday(9, 6, 0).timestamp()));
    }

    #[test]
    fn reschedule_clears_stale_state() {
        let mut alarm = alarm_at(9, 0, Recurring::Once);
        alarm.enabled = false;
        alarm.snoozed_until = Some(1);
        alarm.last_triggered = Some(2);
        alarm.reschedule(10, 30, Recurring::Daily);
        assert!(alarm.enabled);
        assert_eq!(alarm.snoozed_until, None);
        assert_eq!(alarm.last_triggered, None);
        assert_eq!((alarm.hour, alarm.minute), (10, 30));
    }
}
