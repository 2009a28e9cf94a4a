//! Source adapter contract.
//!
//! Every notification source the aggregator can display implements this
//! trait when snapshotted. The aggregator assumes nothing beyond it:
//! identity, category, and either a `remaining` value or a `time` anchor
//! from which remaining/elapsed is computable.

use super::{Alert, AlertId, Category};

/// The shape a snapshotted source must expose to become an [`Alert`].
pub trait AlertSource {
    /// Identity unique within the source's own category.
    fn source_id(&self) -> &str;

    fn category(&self) -> Category;

    /// Human-readable label; `None` lets the renderer pick the category
    /// default.
    fn label(&self) -> Option<String> {
        None
    }

    /// Reference instant in epoch seconds (fire time, or segment start
    /// for stopwatches).
    fn reference_time(&self) -> Option<i64> {
        None
    }

    /// Authoritative remaining/elapsed value, when the source knows it.
    fn remaining(&self) -> Option<f64> {
        None
    }

    fn prevent_sleep(&self) -> bool {
        false
    }

    fn auto_suspend(&self) -> bool {
        false
    }

    fn subtle_mode(&self) -> bool {
        false
    }

    /// Build the alert record for this source.
    fn to_alert(&self) -> Alert {
        Alert {
            id: AlertId::compose(self.category(), self.source_id()),
            category: self.category(),
            label: self.label(),
            time: self.reference_time(),
            remaining: self.remaining(),
            prevent_sleep: self.prevent_sleep(),
            auto_suspend: self.auto_suspend(),
            subtle_mode: self.subtle_mode(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Countdown {
        id: String,
        fire_at: i64,
    }

    impl AlertSource for Countdown {
        fn source_id(&self) -> &str {
            &self.id
        }

        fn category(&self) -> Category {
            Category::Timer
        }

        fn reference_time(&self) -> Option<i64> {
            Some(self.fire_at)
        }
    }

    #[test]
    fn builds_alert_with_composed_id() {
        let src = Countdown {
            id: "t1".into(),
            fire_at: 5_000,
        };
        let alert = src.to_alert();
        assert_eq!(alert.id.as_str(), "timer-t1");
        assert_eq!(alert.time, Some(5_000));
        assert_eq!(alert.remaining, None);
        assert_eq!(alert.effective_remaining(4_000), Some(1_000.0));
    }
}
