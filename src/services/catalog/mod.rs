//! Movie catalog abstraction
//!
//! The catalog is an external lookup service. TMDB is the only production
//! implementation; tests plug in mocks or static catalogs.

use crate::{
    error::AppResult,
    models::{MovieId, MovieSummary},
};

pub mod tmdb;

pub use tmdb::TmdbCatalog;

/// Keyed lookups against a movie catalog
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MovieCatalog: Send + Sync {
    /// Search movies by free text
    ///
    /// An empty or whitespace-only query is rejected with `InvalidInput`.
    async fn search(&self, query: &str) -> AppResult<Vec<MovieSummary>>;

    /// Fetch a single movie by catalog id
    async fn details(&self, id: MovieId) -> AppResult<MovieSummary>;

    /// Catalog name for logging
    fn name(&self) -> &'static str;
}
