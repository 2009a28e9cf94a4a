//! Overlay aggregation.
//!
//! The aggregator owns the canonical, currently-displayed alert list.
//! Exactly two update operations exist on it:
//!
//! - [`OverlayAggregator::replace_all`] -- an authoritative snapshot
//!   replaces the entire list (full refresh; idempotent).
//! - [`OverlayAggregator::patch_one`] -- a tick mutates the live fields
//!   of one item in place, never touching the rest of the set.
//!
//! Refreshes win over ticks when they interleave; a tick for an id the
//! current set does not hold is a no-op (the alert was removed by a
//! concurrent refresh).

pub mod interpolator;
pub mod runtime;

use serde::{Deserialize, Serialize};

use crate::alert::{Alert, AlertId, Category, ClockFormat};

pub use interpolator::TickInterpolator;
pub use runtime::{OverlayHandle, OverlayRuntime};

/// Partial in-place update to one alert (the tick channel).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlertPatch {
    pub remaining: Option<f64>,
    pub label: Option<String>,
}

impl AlertPatch {
    pub fn remaining(value: f64) -> Self {
        Self {
            remaining: Some(value),
            label: None,
        }
    }
}

/// Owns the rendered alert list.
#[derive(Debug, Default)]
pub struct OverlayAggregator {
    alerts: Vec<Alert>,
}

impl OverlayAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    pub fn get(&self, id: &AlertId) -> Option<&Alert> {
        self.alerts.iter().find(|a| &a.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }

    /// Replace the entire list with an authoritative snapshot.
    ///
    /// Insertion order is preserved as received; a duplicate id keeps the
    /// first occurrence so the uniqueness invariant holds.
    pub fn replace_all(&mut self, snapshot: Vec<Alert>) {
        let mut next = Vec::with_capacity(snapshot.len());
        for alert in snapshot {
            if next.iter().all(|a: &Alert| a.id != alert.id) {
                next.push(alert);
            }
        }
        self.alerts = next;
    }

    /// Mutate one alert's live fields in place. Returns `false` (and
    /// changes nothing) when the id is not in the current set.
    pub fn patch_one(&mut self, id: &AlertId, patch: AlertPatch) -> bool {
        let Some(alert) = self.alerts.iter_mut().find(|a| &a.id == id) else {
            return false;
        };
        if let Some(remaining) = patch.remaining {
            alert.remaining = Some(remaining);
        }
        if let Some(label) = patch.label {
            alert.label = Some(label);
        }
        true
    }

    /// Patch the single alert of a category (pomodoro ticks carry no id).
    pub fn patch_category(&mut self, category: Category, patch: AlertPatch) -> bool {
        let Some(id) = self
            .alerts
            .iter()
            .find(|a| a.category == category)
            .map(|a| a.id.clone())
        else {
            return false;
        };
        self.patch_one(&id, patch)
    }

    /// Force the list empty (feature disabled).
    pub fn clear(&mut self) {
        self.alerts.clear();
    }
}

/// Overlay corner position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverlayPosition {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// How much detail each alert row shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    Full,
    Compact,
}

/// Settings governing the overlay.
///
/// Any change to these forces a full refresh; flipping `enabled` off
/// tears the whole runtime down.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlaySettings {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_true")]
    pub show_timers: bool,
    #[serde(default = "default_true")]
    pub show_alarms: bool,
    #[serde(default = "default_true")]
    pub show_pomodoro: bool,
    #[serde(default = "default_true")]
    pub show_reminders: bool,
    #[serde(default = "default_true")]
    pub show_stopwatch: bool,
    #[serde(default = "default_position")]
    pub position: OverlayPosition,
    #[serde(default = "default_mode")]
    pub display_mode: DisplayMode,
    /// Hide countdown alerts firing further out than this many hours
    /// (0 = no window).
    #[serde(default = "default_window_hours")]
    pub window_hours: u32,
    /// Cap on displayed alerts (0 = unlimited).
    #[serde(default = "default_max_alerts")]
    pub max_alerts: u32,
    #[serde(default)]
    pub clock: ClockFormat,
}

fn default_true() -> bool {
    true
}

fn default_position() -> OverlayPosition {
    OverlayPosition::TopRight
}

fn default_mode() -> DisplayMode {
    DisplayMode::Full
}

fn default_window_hours() -> u32 {
    24
}

fn default_max_alerts() -> u32 {
    5
}

impl Default for OverlaySettings {
    fn default() -> Self {
        Self {
            enabled: true,
            show_timers: true,
            show_alarms: true,
            show_pomodoro: true,
            show_reminders: true,
            show_stopwatch: true,
            position: default_position(),
            display_mode: default_mode(),
            window_hours: default_window_hours(),
            max_alerts: default_max_alerts(),
            clock: ClockFormat::default(),
        }
    }
}

impl OverlaySettings {
    pub fn shows(&self, category: Category) -> bool {
        match category {
            Category::Timer => self.show_timers,
            Category::Alarm => self.show_alarms,
            Category::Pomodoro => self.show_pomodoro,
            Category::Reminder => self.show_reminders,
            Category::Stopwatch => self.show_stopwatch,
            Category::Unknown => true,
        }
    }

    /// Apply category filters, the time window, and the count cap to a
    /// received snapshot, preserving order.
    pub fn apply(&self, snapshot: Vec<Alert>, now: i64) -> Vec<Alert> {
        if !self.enabled {
            return Vec::new();
        }
        let window_secs = i64::from(self.window_hours) * 3600;
        let mut kept: Vec<Alert> = snapshot
            .into_iter()
            .filter(|a| self.shows(a.category))
            .filter(|a| {
                if self.window_hours == 0 || a.category == Category::Stopwatch {
                    return true;
                }
                match a.effective_remaining(now) {
                    Some(r) => r <= window_secs as f64,
                    // No usable reference instant; keep rather than guess.
                    None => true,
                }
            })
            .collect();
        if self.max_alerts > 0 {
            kept.truncate(self.max_alerts as usize);
        }
        kept
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alert(category: Category, source: &str, remaining: f64) -> Alert {
        let mut a = Alert::new(category, source);
        a.remaining = Some(remaining);
        a
    }

    #[test]
    fn replace_all_is_idempotent() {
        let mut agg = OverlayAggregator::new();
        let snapshot = vec![
            alert(Category::Timer, "a", 60.0),
            alert(Category::Alarm, "b", 3600.0),
        ];
        agg.replace_all(snapshot.clone());
        let first = agg.alerts().to_vec();
        agg.replace_all(snapshot);
        assert_eq!(agg.alerts(), first.as_slice());
    }

    #[test]
    fn replace_all_keeps_first_duplicate() {
        let mut agg = OverlayAggregator::new();
        agg.replace_all(vec![
            alert(Category::Timer, "a", 10.0),
            alert(Category::Timer, "a", 99.0),
        ]);
        assert_eq!(agg.alerts().len(), 1);
        assert_eq!(agg.alerts()[0].remaining, Some(10.0));
    }

    #[test]
    fn patch_preserves_order_and_other_items() {
        let mut agg = OverlayAggregator::new();
        agg.replace_all(vec![
            alert(Category::Timer, "a", 60.0),
            alert(Category::Timer, "b", 120.0),
        ]);
        assert!(agg.patch_one(&AlertId::compose(Category::Timer, "b"), AlertPatch::remaining(119.0)));
        assert_eq!(agg.alerts()[0].remaining, Some(60.0));
        assert_eq!(agg.alerts()[1].remaining, Some(119.0));
        assert_eq!(agg.alerts()[0].id.as_str(), "timer-a");
    }

    #[test]
    fn patch_for_absent_id_is_noop() {
        let mut agg = OverlayAggregator::new();
        agg.replace_all(vec![alert(Category::Timer, "a", 60.0)]);
        let before = agg.alerts().to_vec();
        assert!(!agg.patch_one(&AlertId::compose(Category::Timer, "gone"), AlertPatch::remaining(1.0)));
        assert_eq!(agg.alerts(), before.as_slice());
    }

    #[test]
    fn patch_category_routes_to_single_pomodoro() {
        let mut agg = OverlayAggregator::new();
        agg.replace_all(vec![
            alert(Category::Timer, "a", 60.0),
            alert(Category::Pomodoro, "session", 1500.0),
        ]);
        let patch = AlertPatch {
            remaining: Some(1499.0),
            label: Some("Break".into()),
        };
        assert!(agg.patch_category(Category::Pomodoro, patch));
        let pomo = &agg.alerts()[1];
        assert_eq!(pomo.remaining, Some(1499.0));
        assert_eq!(pomo.label.as_deref(), Some("Break"));
    }

    #[test]
    fn settings_filter_window_and_cap() {
        let settings = OverlaySettings {
            show_alarms: false,
            window_hours: 1,
            max_alerts: 2,
            ..OverlaySettings::default()
        };
        let snapshot = vec![
            alert(Category::Alarm, "hidden", 60.0),
            alert(Category::Timer, "near", 120.0),
            alert(Category::Reminder, "far", 7200.0),
            alert(Category::Timer, "also-near", 240.0),
            alert(Category::Timer, "capped", 300.0),
        ];
        let kept = settings.apply(snapshot, 0);
        let ids: Vec<_> = kept.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["timer-near", "timer-also-near"]);
    }

    #[test]
    fn disabled_settings_force_empty() {
        let settings = OverlaySettings {
            enabled: false,
            ..OverlaySettings::default()
        };
        assert!(settings.apply(vec![alert(Category::Timer, "a", 1.0)], 0).is_empty());
    }

    #[test]
    fn stopwatch_ignores_window() {
        let settings = OverlaySettings {
            window_hours: 1,
            ..OverlaySettings::default()
        };
        let mut sw = Alert::new(Category::Stopwatch, "s");
        sw.remaining = Some(100_000.0); // elapsed, not a fire time
        assert_eq!(settings.apply(vec![sw], 0).len(), 1);
    }
}
