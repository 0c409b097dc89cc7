//! TMDB catalog client
//!
//! API Flow:
//! 1. Search: /search/movie?query=... → page of movies
//! 2. Details: /movie/{id} → single movie
//!
//! Authenticates with a v4 read access token sent as a bearer header.

use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{MovieId, MovieSummary, TmdbMovie, TmdbSearchPage},
    services::catalog::MovieCatalog,
};
use reqwest::Client as HttpClient;

const SEARCH_CACHE_TTL: u64 = 3600; // 1 hour
const DETAILS_CACHE_TTL: u64 = 86400; // 1 day

#[derive(Clone)]
pub struct TmdbCatalog {
    http_client: HttpClient,
    access_token: String,
    api_url: String,
    language: String,
    cache: Option<Cache>,
}

impl TmdbCatalog {
    pub fn new(
        access_token: String,
        api_url: String,
        language: String,
        cache: Option<Cache>,
    ) -> Self {
        Self {
            http_client: HttpClient::new(),
            access_token,
            api_url: api_url.trim_end_matches('/').to_string(),
            language,
            cache,
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> AppResult<T> {
        let url = format!("{}{}", self.api_url, path);

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&self.access_token)
            .query(&[("language", self.language.as_str())])
            .query(query)
            .send()
            .await
            .map_err(|e| AppError::LookupFailed {
                status: None,
                message: format!("TMDB unreachable: {}", e),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::lookup_status(status, &body));
        }

        response.json::<T>().await.map_err(|e| {
            tracing::error!(error = %e, path = %path, "Failed to decode TMDB response");
            AppError::LookupFailed {
                status: None,
                message: format!("Invalid TMDB response: {}", e),
            }
        })
    }
}

#[async_trait::async_trait]
impl MovieCatalog for TmdbCatalog {
    async fn search(&self, query: &str) -> AppResult<Vec<MovieSummary>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        cached!(
            self.cache,
            CacheKey::Search {
                query: query.to_string(),
                language: self.language.clone(),
            },
            SEARCH_CACHE_TTL,
            async move {
                let page: TmdbSearchPage =
                    self.get_json("/search/movie", &[("query", query)]).await?;
                let movies: Vec<MovieSummary> =
                    page.results.into_iter().map(MovieSummary::from).collect();

                tracing::info!(
                    query = %query,
                    results = movies.len(),
                    catalog = "tmdb",
                    "Movie search completed"
                );

                Ok::<_, AppError>(movies)
            }
        )
    }

    async fn details(&self, id: MovieId) -> AppResult<MovieSummary> {
        cached!(
            self.cache,
            CacheKey::Details {
                id,
                language: self.language.clone(),
            },
            DETAILS_CACHE_TTL,
            async move {
                let movie: TmdbMovie = self.get_json(&format!("/movie/{}", id), &[]).await?;
                tracing::debug!(movie_id = %id, catalog = "tmdb", "Movie details fetched");
                Ok::<_, AppError>(MovieSummary::from(movie))
            }
        )
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
