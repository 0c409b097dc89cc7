use serde::Deserialize;
use std::path::PathBuf;

/// Where watch records are stored
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Postgres,
    Supabase,
    #[default]
    Local,
}

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// TMDB v4 read access token
    pub tmdb_access_token: String,

    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Base URL poster paths are appended to
    #[serde(default = "default_tmdb_image_url")]
    pub tmdb_image_url: String,

    #[serde(default = "default_tmdb_language")]
    pub tmdb_language: String,

    #[serde(default)]
    pub storage_backend: StorageBackend,

    /// PostgreSQL connection URL, required for the postgres backend
    pub database_url: Option<String>,

    pub supabase_url: Option<String>,
    pub supabase_anon_key: Option<String>,

    #[serde(default = "default_supabase_table")]
    pub supabase_table: String,

    /// JSON file mirroring the local backend; memory only when unset
    pub local_store_path: Option<PathBuf>,

    /// Owner scope written to every remote row
    #[serde(default = "default_owner_id")]
    pub owner_id: String,

    /// Redis URL for the catalog cache; no caching when unset
    pub redis_url: Option<String>,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_tmdb_image_url() -> String {
    "https://image.tmdb.org/t/p/w500".to_string()
}

fn default_tmdb_language() -> String {
    "id-ID".to_string()
}

fn default_supabase_table() -> String {
    "watchlist".to_string()
}

fn default_owner_id() -> String {
    "local".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the selected backend has what it needs
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.tmdb_access_token.trim().is_empty() {
            anyhow::bail!("TMDB_ACCESS_TOKEN must not be empty");
        }

        match self.storage_backend {
            StorageBackend::Postgres if self.database_url.is_none() => {
                anyhow::bail!("STORAGE_BACKEND=postgres requires DATABASE_URL")
            }
            StorageBackend::Supabase
                if self.supabase_url.is_none() || self.supabase_anon_key.is_none() =>
            {
                anyhow::bail!(
                    "STORAGE_BACKEND=supabase requires SUPABASE_URL and SUPABASE_ANON_KEY"
                )
            }
            _ => Ok(()),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
