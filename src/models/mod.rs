use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt::Display, str::FromStr};

pub mod watch_record;

pub use watch_record::{RecordFilter, RecordPatch, WatchRecord};

/// Catalog identifier of a movie
///
/// Wraps TMDB's numeric id but always travels as its decimal string form
/// ("27205"), both over JSON and in the persistence table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MovieId(pub u64);

impl MovieId {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl Display for MovieId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for MovieId {
    fn from(id: u64) -> Self {
        MovieId(id)
    }
}

impl FromStr for MovieId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u64>().map(MovieId)
    }
}

impl Serialize for MovieId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MovieId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Older local stores wrote the raw number
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(u64),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Text(text) => text.parse().map_err(de::Error::custom),
            Raw::Number(n) => Ok(MovieId(n)),
        }
    }
}

/// A movie as returned by the catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieSummary {
    pub id: MovieId,
    pub title: String,
    pub poster_path: Option<String>,
    pub release_date: Option<String>,
}

// ============================================================================
// TMDB API Types
// ============================================================================

/// Raw movie object from TMDB search results and `/movie/{id}`
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovie {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
}

/// One page of `/search/movie` results
#[derive(Debug, Deserialize)]
pub struct TmdbSearchPage {
    #[serde(default)]
    pub results: Vec<TmdbMovie>,
}

impl From<TmdbMovie> for MovieSummary {
    fn from(movie: TmdbMovie) -> Self {
        // TMDB sends "" for unknown dates on unreleased titles
        let non_empty = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

        MovieSummary {
            id: MovieId(movie.id),
            title: movie.title,
            poster_path: non_empty(movie.poster_path),
            release_date: non_empty(movie.release_date),
        }
    }
}
