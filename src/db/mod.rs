use std::sync::Arc;

use crate::{
    config::{Config, StorageBackend},
    error::AppResult,
    models::{RecordFilter, RecordPatch, WatchRecord},
};

pub mod cache;
pub mod local;
pub mod postgres;
pub mod supabase;

mod macros;

pub use cache::{Cache, CacheKey};
pub use local::LocalCollection;
pub use postgres::PgCollection;
pub use supabase::SupabaseCollection;

/// Keyed table of watch records
///
/// Implementations only store and filter; duplicate prevention and state
/// transitions belong to the reconciler. Remote backends scope every call to
/// the configured owner. `select` returns newest records first.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait WatchCollection: Send + Sync {
    async fn select(&self, filter: &RecordFilter) -> AppResult<Vec<WatchRecord>>;

    async fn insert(&self, record: WatchRecord) -> AppResult<()>;

    /// Applies `patch` to every matching record, returning how many changed
    async fn update(&self, filter: &RecordFilter, patch: RecordPatch) -> AppResult<u64>;

    /// Deletes every matching record, returning how many were removed
    async fn delete(&self, filter: &RecordFilter) -> AppResult<u64>;

    /// Backend name for logging
    fn backend(&self) -> &'static str;
}

/// Opens the collection selected by `STORAGE_BACKEND`
pub async fn open_collection(config: &Config) -> anyhow::Result<Arc<dyn WatchCollection>> {
    let collection: Arc<dyn WatchCollection> = match config.storage_backend {
        StorageBackend::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL is required for postgres"))?;
            Arc::new(PgCollection::connect(url, config.owner_id.clone()).await?)
        }
        StorageBackend::Supabase => {
            let (url, key) = config
                .supabase_url
                .as_deref()
                .zip(config.supabase_anon_key.as_deref())
                .ok_or_else(|| {
                    anyhow::anyhow!("SUPABASE_URL and SUPABASE_ANON_KEY are required for supabase")
                })?;
            Arc::new(SupabaseCollection::new(
                url,
                key.to_string(),
                &config.supabase_table,
                config.owner_id.clone(),
            ))
        }
        StorageBackend::Local => match &config.local_store_path {
            Some(path) => Arc::new(LocalCollection::open(path.clone()).await?),
            None => Arc::new(LocalCollection::in_memory()),
        },
    };

    tracing::info!(
        backend = collection.backend(),
        owner = %config.owner_id,
        "Watch collection ready"
    );

    Ok(collection)
}
