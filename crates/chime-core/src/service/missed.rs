//! Missed-alert badge state.
//!
//! The service reports the timestamp of the most recent alert that fired
//! while the user was away; the client keeps a single "last dismissed"
//! timestamp locally and shows a badge whenever the service's latest is
//! newer.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::storage;

const STORE_FILE: &str = "missed.json";

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreData {
    /// Epoch seconds of the last time the user dismissed the badge.
    last_dismissed: Option<i64>,
}

/// Client-side persistence for the last-dismissed timestamp.
#[derive(Debug)]
pub struct DismissalStore {
    path: PathBuf,
}

impl DismissalStore {
    /// Store under the chime data directory.
    pub fn open_default() -> Result<Self> {
        Ok(Self {
            path: storage::data_dir()?.join(STORE_FILE),
        })
    }

    pub fn open(path: PathBuf) -> Self {
        Self { path }
    }

    /// Last dismissal instant; `None` when nothing was ever dismissed or
    /// the store is unreadable (treated as "no data", never an error).
    pub fn last_dismissed(&self) -> Option<i64> {
        let raw = std::fs::read_to_string(&self.path).ok()?;
        serde_json::from_str::<StoreData>(&raw).ok()?.last_dismissed
    }

    /// Record a dismissal at `now` (epoch seconds).
    pub fn dismiss(&self, now: i64) -> Result<()> {
        let data = StoreData {
            last_dismissed: Some(now),
        };
        let json = serde_json::to_string(&data)?;
        std::fs::write(&self.path, json).map_err(|e| ConfigError::SaveFailed {
            path: self.path.clone(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Whether the badge should show for the service-reported latest
    /// missed-alert timestamp.
    pub fn has_unseen(&self, latest_missed: Option<i64>) -> bool {
        match latest_missed {
            None => false,
            Some(latest) => match self.last_dismissed() {
                None => true,
                Some(dismissed) => latest > dismissed,
            },
        }
    }
}
