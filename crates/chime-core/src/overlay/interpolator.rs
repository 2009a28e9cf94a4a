//! Live tick interpolation.
//!
//! Keeps on-screen countdowns accurate between full refreshes without a
//! round trip to the service for every second of wall clock. Two
//! channels, both additive against the current alert set:
//!
//! 1. Push ticks: the service emits an authoritative remaining value for
//!    exactly one alert; everything else is untouched.
//! 2. Local ticks: once a second, stopwatch alerts recompute elapsed as
//!    `base + (now - segment_start)`. The base is cached the first time a
//!    tick observes the alert so repeated ticks compound on the original
//!    value instead of re-deriving from an already-advanced one.

use std::collections::HashMap;

use crate::alert::{AlertId, Category};

use super::{AlertPatch, OverlayAggregator};

/// Mutates displayed values between refreshes.
#[derive(Debug, Default)]
pub struct TickInterpolator {
    /// Elapsed seconds each stopwatch had when first observed, keyed by
    /// alert id. Cleared on every full refresh so refreshes win.
    stopwatch_base: HashMap<AlertId, f64>,
}

impl TickInterpolator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an authoritative per-alert tick from the service.
    ///
    /// Returns `false` when the id is no longer displayed (removed by a
    /// concurrent refresh); that is a silent no-op by design.
    pub fn push_tick(
        &mut self,
        aggregator: &mut OverlayAggregator,
        id: &AlertId,
        remaining: f64,
        label: Option<String>,
    ) -> bool {
        aggregator.patch_one(id, AlertPatch { remaining: Some(remaining), label })
    }

    /// Advance every displayed stopwatch to `now` (epoch seconds).
    ///
    /// Alerts without a segment-start anchor cannot be interpolated and
    /// are left alone until the next refresh.
    pub fn local_tick(&mut self, aggregator: &mut OverlayAggregator, now: i64) {
        let updates: Vec<(AlertId, f64)> = aggregator
            .alerts()
            .iter()
            .filter(|a| a.category == Category::Stopwatch)
            .filter_map(|a| {
                let start = a.time?;
                let base = *self
                    .stopwatch_base
                    .entry(a.id.clone())
                    .or_insert_with(|| a.remaining.unwrap_or(0.0));
                Some((a.id.clone(), base + (now - start) as f64))
            })
            .collect();
        for (id, elapsed) in updates {
            aggregator.patch_one(&id, AlertPatch::remaining(elapsed));
        }
    }

    /// A full refresh landed: drop cached bases so the next local tick
    /// re-anchors on the authoritative snapshot.
    pub fn reset(&mut self) {
        self.stopwatch_base.clear();
    }
}
