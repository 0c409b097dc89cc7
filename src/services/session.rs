use std::collections::HashMap;

use crate::{
    models::{MovieId, MovieSummary},
    services::tabs::TabController,
};

/// Last search results, kept so the page only has to send movie ids back
#[derive(Debug, Clone, Default)]
pub struct MovieIndex {
    order: Vec<MovieId>,
    movies: HashMap<MovieId, MovieSummary>,
}

impl MovieIndex {
    /// Replaces the indexed results, keeping the catalog's order
    pub fn replace(&mut self, results: Vec<MovieSummary>) {
        self.order.clear();
        self.movies.clear();
        for movie in results {
            let id = movie.id;
            // Catalog pages occasionally repeat an id
            if self.movies.insert(id, movie).is_none() {
                self.order.push(id);
            }
        }
    }

    pub fn get(&self, id: MovieId) -> Option<&MovieSummary> {
        self.movies.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MovieSummary> {
        self.order.iter().filter_map(|id| self.movies.get(id))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Per-page view state
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub tabs: TabController,
    pub results: MovieIndex,
}
