use super::{SyncStage, SyncStatusRecord};
use chrono::{DateTime, Utc};
use dashmap::DashMap;

/// Last-known sync progress per creator. In-memory only (resets on restart).
pub struct SyncStatusTracker {
    records: DashMap<String, SyncStatusRecord>,
}

impl SyncStatusTracker {
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
        }
    }

    /// Current record for `creator_id`. Unknown creators get (and keep) the
    /// pending default.
    pub fn get_status(&self, creator_id: &str) -> SyncStatusRecord {
        self.records
            .entry(creator_id.to_string())
            .or_insert_with(SyncStatusRecord::default)
            .value()
            .clone()
    }

    /// Overwrite the record for `creator_id`. Progress is clamped to 100.
    pub fn update(&self, creator_id: &str, mut record: SyncStatusRecord) {
        record.progress = record.progress.min(100);
        self.records.insert(creator_id.to_string(), record);
    }

    /// Set stage, message and progress, keeping the previous `last_sync_at`.
    pub fn set_stage(
        &self,
        creator_id: &str,
        stage: SyncStage,
        message: impl Into<String>,
        progress: u8,
    ) {
        let mut entry = self
            .records
            .entry(creator_id.to_string())
            .or_insert_with(SyncStatusRecord::default);
        entry.stage = stage;
        entry.message = message.into();
        entry.progress = progress.min(100);
    }

    /// Move `creator_id` into `Syncing` at progress 0 unless a sync is already
    /// running. Returns false, leaving the record untouched, in that case.
    pub fn begin_sync(&self, creator_id: &str, message: impl Into<String>) -> bool {
        let mut entry = self
            .records
            .entry(creator_id.to_string())
            .or_insert_with(SyncStatusRecord::default);
        if entry.stage == SyncStage::Syncing {
            return false;
        }
        entry.stage = SyncStage::Syncing;
        entry.message = message.into();
        entry.progress = 0;
        true
    }

    /// Most recent completed sync across all creators.
    pub fn last_sync_at(&self) -> Option<DateTime<Utc>> {
        self.records.iter().filter_map(|r| r.last_sync_at).max()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for SyncStatusTracker {
    fn default() -> Self {
        Self::new()
    }
}
