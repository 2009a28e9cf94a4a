//! Recurring reminder scheduling.
//!
//! A reminder's next trigger depends on its frequency, repeat-count
//! policy, and an external "active session" signal that can gate
//! progress entirely. Per-reminder state machine:
//!
//! ```text
//! Paused <-> Scheduled -> Exhausted
//! ```
//!
//! `Disabled` is orthogonal and overrides display regardless of the
//! above. Paused time never counts toward the interval; firing uses a
//! fixed cadence (previous trigger + frequency) so notification latency
//! cannot accumulate drift.

use chrono::{DateTime, Duration, TimeZone, Timelike};
use serde::{Deserialize, Serialize};

/// One-shot scheduling keeps firing "a few seconds ago" requests today
/// instead of rolling them to tomorrow.
const ONE_SHOT_PAST_BUFFER_SECS: i64 = 60;

/// Repeat-count policy.
///
/// The wire form is an integer: `-1` infinite, `0` "custom value pending
/// entry" (never schedules), positive N finite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum Recurrence {
    Infinite,
    Finite(u32),
    PendingCustom,
}

impl From<i64> for Recurrence {
    fn from(value: i64) -> Self {
        match value {
            v if v < 0 => Recurrence::Infinite,
            0 => Recurrence::PendingCustom,
            v => Recurrence::Finite(u32::try_from(v).unwrap_or(u32::MAX)),
        }
    }
}

impl From<Recurrence> for i64 {
    fn from(value: Recurrence) -> Self {
        match value {
            Recurrence::Infinite => -1,
            Recurrence::PendingCustom => 0,
            Recurrence::Finite(n) => i64::from(n),
        }
    }
}

/// Derived display state of a reminder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderState {
    Disabled,
    Paused,
    Scheduled,
    Exhausted,
}

/// Fields a client supplies when creating a reminder; the service fills
/// in identity and derived state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderDraft {
    pub label: String,
    #[serde(default)]
    pub frequency_minutes: Option<u32>,
    pub recurrences: Recurrence,
    #[serde(default)]
    pub only_while_gaming: bool,
    #[serde(default)]
    pub reset_on_game_start: bool,
    /// Requested first-fire local time of day for one-shot reminders.
    #[serde(default)]
    pub start_time: Option<TimeOfDay>,
    #[serde(default)]
    pub sound: Option<String>,
}

/// Local wall-clock time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeOfDay {
    pub hour: u32,
    pub minute: u32,
}

/// A recurring or one-shot reminder record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reminder {
    pub id: String,
    pub label: String,
    /// Interval between triggers; `None` means "explicit start time only".
    #[serde(default)]
    pub frequency_minutes: Option<u32>,
    pub recurrences: Recurrence,
    /// Remaining fires; `-1` infinite. Absent defaults to `recurrences`.
    #[serde(default)]
    pub triggers_remaining: Option<i64>,
    #[serde(default)]
    pub only_while_gaming: bool,
    #[serde(default)]
    pub reset_on_game_start: bool,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Absolute fire instant, epoch seconds. Undefined while paused.
    #[serde(default)]
    pub next_trigger: Option<i64>,
    /// Countdown stashed while gated (seconds to go when the session
    /// ended), so paused wall time does not count toward the interval.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paused_remaining: Option<i64>,
    #[serde(default)]
    pub start_time: Option<TimeOfDay>,
    #[serde(default)]
    pub sound: Option<String>,
}

fn default_enabled() -> bool {
    true
}

impl Reminder {
    pub fn from_draft(id: String, draft: ReminderDraft) -> Self {
        Self {
            id,
            label: draft.label,
            frequency_minutes: draft.frequency_minutes,
            recurrences: draft.recurrences,
            triggers_remaining: None,
            only_while_gaming: draft.only_while_gaming,
            reset_on_game_start: draft.reset_on_game_start,
            enabled: true,
            next_trigger: None,
            paused_remaining: None,
            start_time: draft.start_time,
            sound: draft.sound,
        }
    }

    /// Fires left: `-1` infinite, `0` exhausted.
    pub fn triggers_remaining(&self) -> i64 {
        self.triggers_remaining
            .unwrap_or_else(|| i64::from(self.recurrences))
    }

    fn frequency_secs(&self) -> Option<i64> {
        self.frequency_minutes.map(|m| i64::from(m) * 60)
    }

    /// Derived state given the external session signal.
    ///
    /// An undefined `next_trigger` while gated and no session is active
    /// is `Paused`, never an error.
    pub fn state(&self, session_active: bool) -> ReminderState {
        if !self.enabled {
            ReminderState::Disabled
        } else if self.triggers_remaining() == 0 {
            ReminderState::Exhausted
        } else if self.only_while_gaming && !session_active {
            ReminderState::Paused
        } else {
            ReminderState::Scheduled
        }
    }

    /// Whether the countdown is currently progressing.
    pub fn is_progressing(&self, session_active: bool) -> bool {
        self.state(session_active) == ReminderState::Scheduled && self.next_trigger.is_some()
    }

    /// Compute the first trigger when the reminder is created or edited.
    ///
    /// One-shot reminders anchor on their requested local time of day;
    /// interval reminders start a full interval from `now`. Gated
    /// reminders stay unscheduled until a session begins.
    pub fn schedule_first<Tz: TimeZone>(&mut self, now: DateTime<Tz>) {
        self.paused_remaining = None;
        if !self.enabled || self.triggers_remaining() == 0 {
            self.next_trigger = None;
            return;
        }
        if let Some(at) = self.start_time {
            self.next_trigger = Some(one_shot_trigger(at, now));
            return;
        }
        if self.only_while_gaming {
            // Waits for on_session_start.
            self.next_trigger = None;
            return;
        }
        self.next_trigger = self.frequency_secs().map(|f| now.timestamp() + f);
    }

    /// A gated reminder's session just began.
    pub fn on_session_start(&mut self, now: i64) {
        if !self.only_while_gaming || !self.enabled || self.triggers_remaining() == 0 {
            return;
        }
        let Some(freq) = self.frequency_secs() else {
            return;
        };
        if self.reset_on_game_start {
            // Restart the cycle rather than resuming a stale countdown.
            self.paused_remaining = None;
            self.next_trigger = Some(now + freq);
        } else if let Some(rem) = self.paused_remaining.take() {
            self.next_trigger = Some(now + rem.max(0));
        } else if self.next_trigger.is_none() {
            self.next_trigger = Some(now + freq);
        }
    }

    /// A gated reminder's session just ended: stash the countdown and
    /// clear the trigger so the pause does not consume interval time.
    pub fn on_session_end(&mut self, now: i64) {
        if !self.only_while_gaming {
            return;
        }
        if let Some(next) = self.next_trigger.take() {
            self.paused_remaining = Some((next - now).max(0));
        }
    }

    /// The reminder fired. Decrements the finite count and schedules the
    /// follow-up at `previous trigger + frequency` (fixed cadence).
    /// Returns the resulting state.
    pub fn on_fire(&mut self, session_active: bool) -> ReminderState {
        let previous = self.next_trigger;
        match self.triggers_remaining() {
            -1 => {} // Infinite never decrements.
            0 => {
                self.next_trigger = None;
                return ReminderState::Exhausted;
            }
            n => {
                let left = n - 1;
                self.triggers_remaining = Some(left);
                if left == 0 {
                    self.next_trigger = None;
                    return ReminderState::Exhausted;
                }
            }
        }
        self.next_trigger = match (previous, self.frequency_secs()) {
            (Some(prev), Some(freq)) => Some(prev + freq),
            // One-shot reminders have no follow-up cadence.
            _ => None,
        };
        self.state(session_active)
    }
}

/// First trigger for an explicit local time of day, as an unambiguous
/// epoch-seconds instant.
///
/// Rolls to the next calendar day only when the requested time is more
/// than [`ONE_SHOT_PAST_BUFFER_SECS`] in the past, so a time that
/// slipped a few seconds behind "now" due to UI latency still fires
/// today.
pub fn one_shot_trigger<Tz: TimeZone>(at: TimeOfDay, now: DateTime<Tz>) -> i64 {
    let target = now
        .clone()
        .with_hour(at.hour.min(23))
        .and_then(|t| t.with_minute(at.minute.min(59)))
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or_else(|| now.clone());
    let target = if now.timestamp() - target.timestamp() > ONE_SHOT_PAST_BUFFER_SECS {
        target + Duration::days(1)
    } else {
        target
    };
    target.timestamp()
}
