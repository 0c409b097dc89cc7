use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{MovieId, MovieSummary};

/// A tracked movie in the persistence table
///
/// One row per movie per owner. `is_watched = false` means the movie is on
/// the watchlist.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchRecord {
    pub movie_id: MovieId,
    pub title: String,
    #[serde(default)]
    pub poster_path: String,
    #[serde(default)]
    pub release_date: String,
    pub is_watched: bool,
    #[serde(default = "Utc::now")]
    pub added_at: DateTime<Utc>,
}

impl WatchRecord {
    /// Creates a record for a movie that is not yet tracked
    pub fn new(movie: &MovieSummary, is_watched: bool) -> Self {
        Self {
            movie_id: movie.id,
            title: movie.title.clone(),
            poster_path: movie.poster_path.clone().unwrap_or_default(),
            release_date: movie.release_date.clone().unwrap_or_default(),
            is_watched,
            added_at: Utc::now(),
        }
    }
}

/// Row predicate for select, update and delete
///
/// Unset fields match everything, so `RecordFilter::default()` selects every
/// record of the owner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordFilter {
    pub movie_id: Option<MovieId>,
    pub is_watched: Option<bool>,
}

impl RecordFilter {
    pub fn movie(movie_id: MovieId) -> Self {
        Self {
            movie_id: Some(movie_id),
            is_watched: None,
        }
    }

    pub fn watched(is_watched: bool) -> Self {
        Self {
            movie_id: None,
            is_watched: Some(is_watched),
        }
    }

    pub fn and_watched(mut self, is_watched: bool) -> Self {
        self.is_watched = Some(is_watched);
        self
    }

    pub fn matches(&self, record: &WatchRecord) -> bool {
        self.movie_id.map_or(true, |id| id == record.movie_id)
            && self.is_watched.map_or(true, |w| w == record.is_watched)
    }
}

/// Column changes applied by `update`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RecordPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_watched: Option<bool>,
}

impl RecordPatch {
    pub fn set_watched(is_watched: bool) -> Self {
        Self {
            is_watched: Some(is_watched),
        }
    }

    pub fn apply(&self, record: &mut WatchRecord) {
        if let Some(is_watched) = self.is_watched {
            record.is_watched = is_watched;
        }
    }
}
