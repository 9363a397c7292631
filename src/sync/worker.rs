use super::{SyncStage, SyncStatusRecord, SyncStatusTracker};
use crate::credentials::{CredentialError, TokenVault};
use crate::onlyfans::{ApiClientError, OnlyFansClient};
use chrono::Utc;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("creator has not connected an OnlyFans account")]
    NotConnected,

    #[error(transparent)]
    Credentials(#[from] CredentialError),

    #[error(transparent)]
    Api(#[from] ApiClientError),
}

/// Counts pulled by one sync run.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncSummary {
    pub username: String,
    pub fans: usize,
    pub transactions: usize,
}

/// Pulls a creator's OnlyFans data and reports progress to the tracker.
///
/// All API calls share the client's rate limiter, so concurrent runs for
/// different creators are spaced like any other outbound traffic.
pub struct SyncWorker {
    client: Arc<OnlyFansClient>,
    tracker: Arc<SyncStatusTracker>,
    vault: Arc<TokenVault>,
}

impl SyncWorker {
    pub fn new(
        client: Arc<OnlyFansClient>,
        tracker: Arc<SyncStatusTracker>,
        vault: Arc<TokenVault>,
    ) -> Self {
        Self {
            client,
            tracker,
            vault,
        }
    }

    /// Run one full sync for `creator_id`. The outcome is recorded in the
    /// tracker either way.
    pub async fn run(&self, creator_id: &str) -> Result<SyncSummary, SyncError> {
        info!(creator_id = %creator_id, "Starting creator sync");

        match self.sync(creator_id).await {
            Ok(summary) => {
                self.tracker.update(
                    creator_id,
                    SyncStatusRecord {
                        stage: SyncStage::Completed,
                        message: format!(
                            "Synced {} fans and {} transactions",
                            summary.fans, summary.transactions
                        ),
                        progress: 100,
                        last_sync_at: Some(Utc::now()),
                    },
                );
                info!(
                    creator_id = %creator_id,
                    fans = summary.fans,
                    transactions = summary.transactions,
                    "Creator sync completed"
                );
                Ok(summary)
            }
            Err(e) => {
                let progress = self.tracker.get_status(creator_id).progress;
                self.tracker
                    .set_stage(creator_id, SyncStage::Failed, e.to_string(), progress);
                error!(creator_id = %creator_id, error = %e, "Creator sync failed");
                Err(e)
            }
        }
    }

    async fn sync(&self, creator_id: &str) -> Result<SyncSummary, SyncError> {
        let tokens = self.vault.open(creator_id)?.ok_or(SyncError::NotConnected)?;
        let token = tokens.access_token.as_str();

        self.tracker
            .set_stage(creator_id, SyncStage::Syncing, "Fetching profile", 10);
        let profile = self.client.get_profile(token).await?;

        self.tracker
            .set_stage(creator_id, SyncStage::Syncing, "Fetching fans", 40);
        let fans = self.client.list_fans(token).await?;

        self.tracker
            .set_stage(creator_id, SyncStage::Syncing, "Fetching transactions", 70);
        let transactions = self.client.list_transactions(token).await?;

        Ok(SyncSummary {
            username: profile.username,
            fans: fans.len(),
            transactions: transactions.len(),
        })
    }
}
