//! Creator data sync: progress tracking and the background worker that
//! pulls profile, fan and transaction data from OnlyFans.

mod tracker;
mod worker;

pub use tracker::SyncStatusTracker;
pub use worker::{SyncError, SyncSummary, SyncWorker};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SyncStage {
    Pending,
    Syncing,
    Completed,
    Failed,
}

/// Last-known sync state of one creator, as served by the sync-status endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SyncStatusRecord {
    pub stage: SyncStage,
    pub message: String,
    /// 0-100
    pub progress: u8,
    pub last_sync_at: Option<DateTime<Utc>>,
}

impl Default for SyncStatusRecord {
    fn default() -> Self {
        Self {
            stage: SyncStage::Pending,
            message: "Waiting for first sync".to_string(),
            progress: 0,
            last_sync_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_record_serialization() {
        let json = serde_json::to_value(SyncStatusRecord::default()).unwrap();
        assert_eq!(json["stage"], "pending");
        assert_eq!(json["progress"], 0);
        assert!(json["lastSyncAt"].is_null());
        assert!(json.get("last_sync_at").is_none());
    }

    #[test]
    fn test_stage_names() {
        for (stage, name) in [
            (SyncStage::Pending, "\"pending\""),
            (SyncStage::Syncing, "\"syncing\""),
            (SyncStage::Completed, "\"completed\""),
            (SyncStage::Failed, "\"failed\""),
        ] {
            assert_eq!(serde_json::to_string(&stage).unwrap(), name);
        }
    }
}
