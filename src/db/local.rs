use std::path::PathBuf;

use tokio::sync::RwLock;

use crate::{
    db::WatchCollection,
    error::{AppError, AppResult},
    models::{RecordFilter, RecordPatch, WatchRecord},
};

/// Single-user store kept in memory, optionally mirrored to a JSON file
///
/// Every mutation is written to the file before it becomes visible, so a
/// failed write leaves the previous state in place.
pub struct LocalCollection {
    path: Option<PathBuf>,
    records: RwLock<Vec<WatchRecord>>,
}

impl LocalCollection {
    pub fn in_memory() -> Self {
        Self {
            path: None,
            records: RwLock::new(Vec::new()),
        }
    }

    /// Loads the store at `path`, starting empty if the file does not exist yet
    pub async fn open(path: PathBuf) -> AppResult<Self> {
        let records = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                AppError::PersistenceFailed(format!("Corrupt store {}: {}", path.display(), e))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                return Err(AppError::PersistenceFailed(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        tracing::info!(path = %path.display(), records = records.len(), "Local store loaded");

        Ok(Self {
            path: Some(path),
            records: RwLock::new(records),
        })
    }

    async fn persist(&self, records: &[WatchRecord]) -> AppResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let json = serde_json::to_vec_pretty(records)
            .map_err(|e| AppError::Internal(format!("Failed to encode store: {}", e)))?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                AppError::PersistenceFailed(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }

        tokio::fs::write(path, json).await.map_err(|e| {
            AppError::PersistenceFailed(format!("Failed to write {}: {}", path.display(), e))
        })
    }
}

#[async_trait::async_trait]
impl WatchCollection for LocalCollection {
    async fn select(&self, filter: &RecordFilter) -> AppResult<Vec<WatchRecord>> {
        let records = self.records.read().await;
        let mut selected: Vec<WatchRecord> = records
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        selected.sort_by(|a, b| b.added_at.cmp(&a.added_at));
        Ok(selected)
    }

    async fn insert(&self, record: WatchRecord) -> AppResult<()> {
        let mut records = self.records.write().await;
        let mut next = records.clone();
        next.push(record);

        self.persist(&next).await?;
        *records = next;
        Ok(())
    }

    async fn update(&self, filter: &RecordFilter, patch: RecordPatch) -> AppResult<u64> {
        let mut records = self.records.write().await;
        let mut next = records.clone();
        let mut changed = 0;
        for record in next.iter_mut().filter(|r| filter.matches(r)) {
            patch.apply(record);
            changed += 1;
        }

        if changed > 0 {
            self.persist(&next).await?;
            *records = next;
        }
        Ok(changed)
    }

    async fn delete(&self, filter: &RecordFilter) -> AppResult<u64> {
        let mut records = self.records.write().await;
        let next: Vec<WatchRecord> = records
            .iter()
            .filter(|r| !filter.matches(r))
            .cloned()
            .collect();
        let removed = (records.len() - next.len()) as u64;

        if removed > 0 {
            self.persist(&next).await?;
            *records = next;
        }
        Ok(removed)
    }

    fn backend(&self) -> &'static str {
        "local"
    }
}
