//! # Chime Core Library
//!
//! Aggregation and liveness engine for a multi-source notification
//! overlay: countdown timers, scheduled alarms, recurring reminders, a
//! focus/break cycle, and a stopwatch, merged into one consistent,
//! continuously live view of "what is active and when it fires next."
//!
//! The underlying persistence and actual timer/alarm execution live in a
//! separate long-running service; this crate consumes its snapshots and
//! events. Nothing here is fatal: every failure degrades to the last
//! consistent snapshot rather than an error state.
//!
//! ## Key Components
//!
//! - [`OverlayAggregator`]: owns the rendered alert list; full refreshes
//!   replace it wholesale, ticks patch one item in place
//! - [`TickInterpolator`]: keeps countdowns accurate between refreshes
//!   without re-querying the service every second
//! - [`OverlayRuntime`]: the tokio task wiring events, settings, and the
//!   periodic refresh/tick timers together, torn down via RAII
//! - [`Reminder`]: recurrence/pause state machine with session gating
//! - [`Alarm`]: wall-clock recurrence and snooze scheduling
//! - [`Config`]: TOML preference storage

pub mod alarm;
pub mod alert;
pub mod error;
pub mod overlay;
pub mod pomodoro;
pub mod reminder;
pub mod service;
pub mod storage;

pub use alarm::{Alarm, Recurring};
pub use alert::{format_elapsed, format_remaining, Alert, AlertId, AlertSource, Category, ClockFormat};
pub use error::{ConfigError, CoreError, Result, ServiceError, ValidationError};
pub use overlay::{
    AlertPatch, DisplayMode, OverlayAggregator, OverlayHandle, OverlayPosition, OverlayRuntime,
    OverlaySettings, TickInterpolator,
};
pub use pomodoro::{BreakKind, PomodoroPlan, PomodoroState};
pub use reminder::{one_shot_trigger, Recurrence, Reminder, ReminderDraft, ReminderState, TimeOfDay};
pub use service::{
    missed::DismissalStore, sounds_or_default, OverlayService, OverlaySnapshot, ServiceEvent,
    SoundEntry,
};
pub use storage::Config;
