//! Pomodoro phase state machine.
//!
//! Pure wall-clock model of a focus/break cycle; the external service
//! executes the actual timing and emits phase events, this type answers
//! "what phase is it, and what comes next" from the stored record.

use serde::{Deserialize, Serialize};

/// Durations and cadence of the cycle, in minutes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PomodoroPlan {
    pub work_minutes: u32,
    pub break_minutes: u32,
    pub long_break_minutes: u32,
    pub sessions_until_long_break: u32,
}

impl Default for PomodoroPlan {
    fn default() -> Self {
        Self {
            work_minutes: 25,
            break_minutes: 5,
            long_break_minutes: 15,
            sessions_until_long_break: 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BreakKind {
    Short,
    Long,
}

impl PomodoroPlan {
    /// The kind of break that follows a given work session.
    pub fn break_after(&self, session: u32) -> BreakKind {
        if self.sessions_until_long_break > 0 && session % self.sessions_until_long_break == 0 {
            BreakKind::Long
        } else {
            BreakKind::Short
        }
    }

    fn break_secs(&self, kind: BreakKind) -> i64 {
        let minutes = match kind {
            BreakKind::Short => self.break_minutes,
            BreakKind::Long => self.long_break_minutes,
        };
        i64::from(minutes) * 60
    }

    fn work_secs(&self) -> i64 {
        i64::from(self.work_minutes) * 60
    }
}

/// Stored pomodoro state as the service persists it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PomodoroState {
    pub active: bool,
    pub is_break: bool,
    /// 1-based work session counter; 0 while stopped.
    pub current_session: u32,
    /// Phase end, epoch seconds. `None` while stopped.
    #[serde(default)]
    pub end_time: Option<i64>,
    /// Phase length in seconds.
    pub duration: i64,
}

impl Default for PomodoroState {
    fn default() -> Self {
        Self::stopped()
    }
}

impl PomodoroState {
    pub fn stopped() -> Self {
        Self {
            active: false,
            is_break: false,
            current_session: 0,
            end_time: None,
            duration: 0,
        }
    }

    /// Begin the next work session at `now`.
    pub fn start(&self, plan: &PomodoroPlan, now: i64) -> Self {
        let duration = plan.work_secs();
        Self {
            active: true,
            is_break: false,
            current_session: self.current_session + 1,
            end_time: Some(now + duration),
            duration,
        }
    }

    /// Advance to the next phase at `now` (phase completion or skip).
    ///
    /// Work flows into a break (long every `sessions_until_long_break`),
    /// a break flows into the next work session. Stopped state is
    /// returned unchanged.
    pub fn advance(&self, plan: &PomodoroPlan, now: i64) -> Self {
        if !self.active {
            return self.clone();
        }
        if self.is_break {
            self.start(plan, now)
        } else {
            let kind = plan.break_after(self.current_session);
            let duration = plan.break_secs(kind);
            Self {
                active: true,
                is_break: true,
                current_session: self.current_session,
                end_time: Some(now + duration),
                duration,
            }
        }
    }

    /// Seconds left in the current phase, clamped at zero.
    pub fn remaining(&self, now: i64) -> f64 {
        match (self.active, self.end_time) {
            (true, Some(end)) => ((end - now).max(0)) as f64,
            _ => 0.0,
        }
    }

    pub fn phase_label(&self) -> String {
        if !self.active {
            "Stopped".to_string()
        } else if self.is_break {
            "Break".to_string()
        } else {
            format!("Session {}", self.current_session)
        }
    }
}
