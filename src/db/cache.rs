use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use std::fmt::Display;

use crate::models::MovieId;

/// Redis keys for catalog lookups
///
/// Both include the catalog language since TMDB localizes titles.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Search { query: String, language: String },
    Details { id: MovieId, language: String },
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::Search { query, language } => {
                write!(f, "tmdb:search:{}:{}", language, query.trim().to_lowercase())
            }
            CacheKey::Details { id, language } => write!(f, "tmdb:movie:{}:{}", language, id),
        }
    }
}

/// Read-through cache in front of the movie catalog
///
/// Redis trouble never fails a lookup: errors are logged and treated as a
/// miss, and writes are best effort.
#[derive(Clone)]
pub struct Cache {
    connection: ConnectionManager,
}

impl Cache {
    /// Connects to Redis and keeps a self-reconnecting connection
    pub async fn connect(redis_url: &str) -> anyhow::Result<Self> {
        let client = redis::Client::open(redis_url)?;
        let connection = ConnectionManager::new(client).await?;
        tracing::info!("Connected to Redis catalog cache");
        Ok(Self { connection })
    }

    pub async fn get<T: serde::de::DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        let mut conn = self.connection.clone();
        let raw: Option<String> = match conn.get(key.to_string()).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %e, key = %key, "Cache read failed");
                return None;
            }
        };

        let json = raw?;
        match serde_json::from_str(&json) {
            Ok(value) => {
                tracing::debug!(key = %key, "Cache hit");
                Some(value)
            }
            Err(e) => {
                tracing::warn!(error = %e, key = %key, "Discarding undecodable cache entry");
                None
            }
        }
    }

    pub async fn put<T: serde::Serialize>(&self, key: &CacheKey, value: &T, ttl_secs: u64) {
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(error = %e, "Cache serialization error");
                return;
            }
        };

        let mut conn = self.connection.clone();
        if let Err(e) = conn
            .set_ex::<_, _, ()>(key.to_string(), json, ttl_secs)
            .await
        {
            tracing::warn!(error = %e, key = %key, "Cache write failed");
        }
    }
}
