use serde::Serialize;
use std::{collections::HashMap, sync::Arc};

use crate::{
    db::WatchCollection,
    error::{AppError, AppResult},
    models::{MovieId, MovieSummary, RecordFilter, RecordPatch, WatchRecord},
    services::{
        catalog::MovieCatalog,
        notify::{notify, Notice, NoticeKind},
    },
};

/// Outcome of a successful watch-state change
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    /// Nothing to do, the movie was already watched
    AlreadyWatched,
    /// A watchlisted record was flipped to watched in place
    PromotedFromWatchlist,
    InsertedAsWatched,
    InsertedAsWatchlist,
    MarkedWatched,
}

impl Transition {
    /// User-facing notice for this outcome
    pub fn notice(&self, title: &str) -> Notice {
        match self {
            Transition::AlreadyWatched => notify(
                NoticeKind::Info,
                format!("\"{}\" is already in your watched list", title),
            ),
            Transition::PromotedFromWatchlist => notify(
                NoticeKind::Success,
                format!("\"{}\" moved from your watchlist to watched", title),
            ),
            Transition::InsertedAsWatched | Transition::MarkedWatched => notify(
                NoticeKind::Success,
                format!("\"{}\" marked as watched", title),
            ),
            Transition::InsertedAsWatchlist => notify(
                NoticeKind::Success,
                format!("\"{}\" added to your watchlist", title),
            ),
        }
    }
}

/// Watch state of every tracked movie, keyed by id (`true` = watched)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackedIndex(HashMap<MovieId, bool>);

impl TrackedIndex {
    pub fn from_records(records: &[WatchRecord]) -> Self {
        let mut index = HashMap::with_capacity(records.len());
        for record in records {
            // Watched wins if a stray duplicate exists
            let entry = index.entry(record.movie_id).or_insert(false);
            *entry |= record.is_watched;
        }
        Self(index)
    }

    /// `Some(true)` watched, `Some(false)` watchlisted, `None` untracked
    pub fn state(&self, movie_id: MovieId) -> Option<bool> {
        self.0.get(&movie_id).copied()
    }
}

/// Applies watch-state transitions against the persistence collection
///
/// A single table holds both lists, distinguished by `is_watched`, so every
/// mutation first checks for a watched record, then a watchlisted one, and
/// only inserts when neither exists. Watched is terminal: nothing moves a
/// movie back to the watchlist.
#[derive(Clone)]
pub struct Reconciler {
    collection: Arc<dyn WatchCollection>,
    catalog: Arc<dyn MovieCatalog>,
}

impl Reconciler {
    pub fn new(collection: Arc<dyn WatchCollection>, catalog: Arc<dyn MovieCatalog>) -> Self {
        Self {
            collection,
            catalog,
        }
    }

    async fn find(&self, movie_id: MovieId, is_watched: bool) -> AppResult<Option<WatchRecord>> {
        let filter = RecordFilter::movie(movie_id).and_watched(is_watched);
        Ok(self.collection.select(&filter).await?.into_iter().next())
    }

    /// Whether the movie already has a watched record
    pub async fn is_watched(&self, movie_id: MovieId) -> AppResult<bool> {
        Ok(self.find(movie_id, true).await?.is_some())
    }

    /// Records a movie as watched, promoting it if it sits on the watchlist
    pub async fn add_to_watched(&self, movie: &MovieSummary) -> AppResult<Transition> {
        if self.find(movie.id, true).await?.is_some() {
            tracing::debug!(movie_id = %movie.id, "Movie already watched");
            return Ok(Transition::AlreadyWatched);
        }

        let transition = if self.find(movie.id, false).await?.is_some() {
            self.collection
                .update(&RecordFilter::movie(movie.id), RecordPatch::set_watched(true))
                .await?;
            Transition::PromotedFromWatchlist
        } else {
            self.collection
                .insert(WatchRecord::new(movie, true))
                .await?;
            Transition::InsertedAsWatched
        };

        tracing::info!(
            movie_id = %movie.id,
            transition = ?transition,
            backend = self.collection.backend(),
            "Movie added to watched"
        );

        Ok(transition)
    }

    /// Puts an untracked movie on the watchlist, fetching its details first
    pub async fn add_to_watchlist(&self, movie_id: MovieId) -> AppResult<Transition> {
        if self.find(movie_id, true).await?.is_some() {
            return Err(AppError::AlreadyWatched);
        }
        if self.find(movie_id, false).await?.is_some() {
            return Err(AppError::AlreadyInWatchlist);
        }

        let movie = self.catalog.details(movie_id).await?;
        self.collection
            .insert(WatchRecord::new(&movie, false))
            .await?;

        tracing::info!(
            movie_id = %movie_id,
            catalog = self.catalog.name(),
            backend = self.collection.backend(),
            "Movie added to watchlist"
        );

        Ok(Transition::InsertedAsWatchlist)
    }

    /// Flips an already tracked movie to watched
    pub async fn mark_as_watched(&self, movie_id: MovieId) -> AppResult<Transition> {
        let filter = RecordFilter::movie(movie_id);
        if self.collection.select(&filter).await?.is_empty() {
            return Err(AppError::NotFound(format!("movie {} is not tracked", movie_id)));
        }

        self.collection
            .update(&filter, RecordPatch::set_watched(true))
            .await?;

        tracing::info!(movie_id = %movie_id, "Movie marked as watched");
        Ok(Transition::MarkedWatched)
    }

    /// Stops tracking a movie, whatever list it is on
    pub async fn remove_movie(&self, movie_id: MovieId) -> AppResult<()> {
        let removed = self
            .collection
            .delete(&RecordFilter::movie(movie_id))
            .await?;

        tracing::info!(movie_id = %movie_id, removed, "Movie removed");
        Ok(())
    }

    pub async fn watchlist(&self) -> AppResult<Vec<WatchRecord>> {
        self.collection.select(&RecordFilter::watched(false)).await
    }

    pub async fn watched(&self) -> AppResult<Vec<WatchRecord>> {
        self.collection.select(&RecordFilter::watched(true)).await
    }

    pub async fn tracked(&self) -> AppResult<TrackedIndex> {
        let records = self.collection.select(&RecordFilter::default()).await?;
        Ok(TrackedIndex::from_records(&records))
    }

    pub fn catalog(&self) -> &Arc<dyn MovieCatalog> {
        &self.catalog
    }
}
