//! Orphaned blob reconciliation.
//!
//! The upload sequence writes bytes before the metadata record, and the
//! two stores are not covered by a transaction. A crash or failed insert
//! between the two steps leaves a file with no record. The sweeper walks
//! the upload root, derives the public id from each stored filename, and
//! removes files whose id has no record once they are older than the
//! grace period.

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use filekeep_db::FileRecordRepository;
use filekeep_storage::LocalContentStore;
use tokio::fs;
use tokio::time::interval;

pub struct OrphanSweeper {
    store: Arc<LocalContentStore>,
    records: Arc<dyn FileRecordRepository>,
    grace: Duration,
}

impl OrphanSweeper {
    pub fn new(
        store: Arc<LocalContentStore>,
        records: Arc<dyn FileRecordRepository>,
        grace: Duration,
    ) -> Self {
        Self {
            store,
            records,
            grace,
        }
    }

    /// Start the hourly background sweep. Returns a JoinHandle for
    /// graceful shutdown.
    pub fn start(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut sweep_interval = interval(Duration::from_secs(3600));

            loop {
                sweep_interval.tick().await;

                match self.sweep().await {
                    Ok(removed) => {
                        tracing::info!(removed, "Orphan sweep completed");
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Orphan sweep failed");
                    }
                }
            }
        })
    }

    /// Remove unreferenced stored files older than the grace period.
    /// Returns the number of files removed.
    pub async fn sweep(&self) -> Result<usize, anyhow::Error> {
        let mut removed = 0;
        let mut dirs = vec![self.store.base_path().to_path_buf()];

        while let Some(dir) = dirs.pop() {
            let mut entries = fs::read_dir(&dir).await?;
            while let Some(entry) = entries.next_entry().await? {
                let path = entry.path();

                if entry.file_type().await?.is_dir() {
                    dirs.push(path);
                    continue;
                }

                let Some(public_id) = path.file_stem().and_then(|s| s.to_str()) else {
                    continue;
                };

                match self.records.exists(public_id).await {
                    Ok(true) => continue,
                    Ok(false) => {}
                    Err(e) => {
                        tracing::error!(error = %e, path = %path.display(), "Orphan check failed");
                        continue;
                    }
                }

                if !self.past_grace(&path).await {
                    continue;
                }

                match fs::remove_file(&path).await {
                    Ok(()) => {
                        tracing::info!(path = %path.display(), "Removed orphaned file");
                        removed += 1;
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, path = %path.display(), "Failed to remove orphaned file");
                    }
                }
            }
        }

        Ok(removed)
    }

    async fn past_grace(&self, path: &Path) -> bool {
        let Ok(meta) = fs::metadata(path).await else {
            return false;
        };
        let Ok(modified) = meta.modified() else {
            return false;
        };
        SystemTime::now()
            .duration_since(modified)
            .map(|age| age >= self.grace)
            .unwrap_or(false)
    }
}
