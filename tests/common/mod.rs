#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use cinelog_api::{
    error::{AppError, AppResult},
    models::{MovieId, MovieSummary},
    services::MovieCatalog,
};

pub fn movie(id: u64, title: &str, release_date: &str) -> MovieSummary {
    MovieSummary {
        id: MovieId(id),
        title: title.to_string(),
        poster_path: Some(format!("/{}.jpg", id)),
        release_date: Some(release_date.to_string()),
    }
}

/// In-process catalog with a fixed set of movies
pub struct StaticCatalog {
    movies: Vec<MovieSummary>,
    offline: AtomicBool,
    details_calls: AtomicUsize,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self {
            movies: vec![
                movie(27205, "Inception", "2010-07-15"),
                movie(155, "The Dark Knight", "2008-07-16"),
                movie(603, "The Matrix", "1999-03-30"),
            ],
            offline: AtomicBool::new(false),
            details_calls: AtomicUsize::new(0),
        }
    }

    /// Makes every following lookup fail like an unreachable service
    pub fn go_offline(&self) {
        self.offline.store(true, Ordering::SeqCst);
    }

    pub fn details_calls(&self) -> usize {
        self.details_calls.load(Ordering::SeqCst)
    }

    fn check_online(&self) -> AppResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(AppError::LookupFailed {
                status: Some(503),
                message: "catalog offline".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl MovieCatalog for StaticCatalog {
    async fn search(&self, query: &str) -> AppResult<Vec<MovieSummary>> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }
        self.check_online()?;

        Ok(self
            .movies
            .iter()
            .filter(|m| m.title.to_lowercase().contains(&query))
            .cloned()
            .collect())
    }

    async fn details(&self, id: MovieId) -> AppResult<MovieSummary> {
        self.details_calls.fetch_add(1, Ordering::SeqCst);
        self.check_online()?;

        self.movies
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .ok_or_else(|| AppError::LookupFailed {
                status: Some(404),
                message: format!("movie {} not in catalog", id),
            })
    }

    fn name(&self) -> &'static str {
        "static"
    }
}
