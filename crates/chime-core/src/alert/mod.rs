//! The alert model.
//!
//! An [`Alert`] is one renderable live notification derived from a source
//! category (timer, alarm, pomodoro, reminder, stopwatch). Alerts are
//! transient: the aggregator rebuilds them on every full refresh and only
//! patches the live countdown field between refreshes.

pub mod format;
pub mod source;

use serde::{Deserialize, Serialize};

pub use format::{format_elapsed, format_remaining, ClockFormat};
pub use source::AlertSource;

/// The kind of source producing an alert.
///
/// Closed set plus a forward-compatible arm: payloads carrying a category
/// this build does not know deserialize to [`Category::Unknown`] and are
/// rendered with the alarm/reminder treatment instead of being rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Timer,
    Alarm,
    Pomodoro,
    Reminder,
    Stopwatch,
    #[serde(other)]
    Unknown,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Timer => "timer",
            Category::Alarm => "alarm",
            Category::Pomodoro => "pomodoro",
            Category::Reminder => "reminder",
            Category::Stopwatch => "stopwatch",
            Category::Unknown => "unknown",
        }
    }

    /// Default label when the source did not supply one.
    pub fn default_label(&self) -> &'static str {
        match self {
            Category::Timer => "Timer",
            Category::Alarm => "Alarm",
            Category::Pomodoro => "Pomodoro",
            Category::Reminder => "Reminder",
            Category::Stopwatch => "Stopwatch",
            Category::Unknown => "Alert",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable identity of an alert within one rendered set.
///
/// Composed as `"<category>-<sourceId>"` so per-source ticks can be routed
/// back to the right item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlertId(String);

impl AlertId {
    pub fn compose(category: Category, source_id: &str) -> Self {
        Self(format!("{}-{}", category.as_str(), source_id))
    }

    /// Accept an id the service already composed.
    pub fn raw(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AlertId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One live notification as displayed by the overlay.
///
/// `time` and `remaining` carry category-dependent semantics:
/// - timer / alarm / reminder / pomodoro: `remaining` counts down to the
///   fire instant; `time` (epoch seconds) is the absolute fire time and
///   may be absent when `remaining` is already known.
/// - stopwatch: `remaining` is elapsed-so-far; `time` is the instant the
///   current running segment began.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: AlertId,
    pub category: Category,
    #[serde(default)]
    pub label: Option<String>,
    /// Reference instant in epoch seconds.
    #[serde(default)]
    pub time: Option<i64>,
    /// Signed seconds; countdown-to-fire or elapsed-so-far per category.
    #[serde(default)]
    pub remaining: Option<f64>,
    #[serde(default)]
    pub prevent_sleep: bool,
    #[serde(default)]
    pub auto_suspend: bool,
    #[serde(default)]
    pub subtle_mode: bool,
}

impl Alert {
    pub fn new(category: Category, source_id: &str) -> Self {
        Self {
            id: AlertId::compose(category, source_id),
            category,
            label: None,
            time: None,
            remaining: None,
            prevent_sleep: false,
            auto_suspend: false,
            subtle_mode: false,
        }
    }

    /// The remaining/elapsed value at `now`, deriving from `time` when the
    /// source did not supply `remaining` directly.
    pub fn effective_remaining(&self, now: i64) -> Option<f64> {
        if let Some(r) = self.remaining {
            return Some(r);
        }
        let t = self.time?;
        Some(match self.category {
            Category::Stopwatch => (now - t) as f64,
            _ => (t - now) as f64,
        })
    }

    /// Label to render, falling back to the category default.
    pub fn display_label(&self) -> &str {
        self.label
            .as_deref()
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| self.category.default_label())
    }
}
