//! Boundary to the external notification/scheduling service.
//!
//! The service owns persistence and actual timer/alarm/pomodoro
//! execution; this core only queries snapshots, issues commands, and
//! subscribes to its events. All payloads are structured records defined
//! here; no wire format is owned by the core.

pub mod missed;

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::alert::Alert;
use crate::error::ServiceError;
use crate::overlay::OverlaySettings;
use crate::reminder::{Reminder, ReminderDraft};

/// Events published by the service. At-most-once delivery, no replay;
/// handlers must tolerate duplicates and out-of-order arrival.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServiceEvent {
    /// Structural updates: the set of sources changed, full refresh needed.
    TimersUpdated,
    AlarmsUpdated,
    RemindersUpdated,
    StopwatchUpdated,
    PomodoroStarted,
    PomodoroStopped,
    PomodoroPhaseChanged,
    /// Per-second authoritative countdown for one timer.
    TimerTick { id: String, remaining: f64 },
    /// Per-second authoritative pomodoro countdown with phase info.
    PomodoroTick {
        remaining: f64,
        session: u32,
        is_break: bool,
    },
    /// Sleep-inhibitor status flipped on the host.
    SleepInhibitorChanged { active: bool },
    /// The latest missed-alert timestamp changed (epoch seconds).
    MissedAlertsChanged { latest: Option<i64> },
    /// User settings were mutated on the service side.
    SettingsUpdated,
}

/// Snapshot answer for the overlay query: the ordered alert list plus
/// the settings the service believes are current.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlaySnapshot {
    pub alerts: Vec<Alert>,
    pub settings: OverlaySettings,
}

/// One selectable notification sound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoundEntry {
    pub filename: String,
    pub name: String,
}

impl SoundEntry {
    pub fn soundless() -> Self {
        Self {
            filename: "soundless".into(),
            name: "Soundless".into(),
        }
    }

    pub fn default_alarm() -> Self {
        Self {
            filename: "alarm.mp3".into(),
            name: "Alarm".into(),
        }
    }
}

/// Degrade a failed or empty sound query to the minimal usable list.
pub fn sounds_or_default(result: Result<Vec<SoundEntry>, ServiceError>) -> Vec<SoundEntry> {
    match result {
        Ok(sounds) if !sounds.is_empty() => sounds,
        _ => vec![SoundEntry::soundless(), SoundEntry::default_alarm()],
    }
}

/// Request/response surface of the external service.
///
/// Futures are `Send` so the overlay runtime can drive them from a
/// spawned task. Every call is best-effort: failures are logged by the
/// caller and leave prior state untouched.
pub trait OverlayService: Send + Sync + 'static {
    /// Current overlay alert snapshot, in source emission order.
    fn overlay_snapshot(
        &self,
    ) -> impl Future<Output = Result<OverlaySnapshot, ServiceError>> + Send;

    fn reminders(&self) -> impl Future<Output = Result<Vec<Reminder>, ServiceError>> + Send;

    fn sounds(&self) -> impl Future<Output = Result<Vec<SoundEntry>, ServiceError>> + Send;

    fn create_reminder(
        &self,
        draft: ReminderDraft,
    ) -> impl Future<Output = Result<Reminder, ServiceError>> + Send;

    fn update_reminder(
        &self,
        reminder: Reminder,
    ) -> impl Future<Output = Result<Reminder, ServiceError>> + Send;

    fn delete_reminder(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<bool, ServiceError>> + Send;

    fn toggle_reminder(
        &self,
        id: &str,
        enabled: bool,
    ) -> impl Future<Output = Result<bool, ServiceError>> + Send;

    /// Reset lifetime statistics kept by the service.
    fn reset_statistics(&self) -> impl Future<Output = Result<(), ServiceError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_wire_tags() {
        let ev = ServiceEvent::TimerTick {
            id: "ab12".into(),
            remaining: 59.5,
        };
        let json = serde_json::to_value(&ev).unwrap();
        assert_eq!(json["type"], "timer_tick");
        assert_eq!(json["id"], "ab12");

        let parsed: ServiceEvent =
            serde_json::from_str(r#"{"type":"pomodoro_tick","remaining":120.0,"session":2,"is_break":true}"#)
                .unwrap();
        match parsed {
            ServiceEvent::PomodoroTick { session, is_break, .. } => {
                assert_eq!(session, 2);
                assert!(is_break);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn sound_fallback() {
        let fallback = sounds_or_default(Err(ServiceError::Unavailable("down".into())));
        assert_eq!(fallback.len(), 2);
        assert_eq!(fallback[0].filename, "soundless");

        let empty = sounds_or_default(Ok(Vec::new()));
        assert_eq!(empty[1], SoundEntry::default_alarm());

        let real = sounds_or_default(Ok(vec![SoundEntry::default_alarm()]));
        assert_eq!(real.len(), 1);
    }
}
