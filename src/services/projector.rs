use serde::Serialize;

use crate::{
    models::{MovieId, MovieSummary, WatchRecord},
    services::reconciler::TrackedIndex,
};

pub const POSTER_PLACEHOLDER: &str = "https://via.placeholder.com/500x750?text=No+Poster";

/// Which kind of list the cards are rendered for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    /// Catalog search results
    Search,
    /// The watchlist or watched list
    Listed,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    AddToWatched,
    AddToWatchlist,
    MarkWatched,
    Remove,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CardAction {
    pub kind: ActionKind,
    pub label: &'static str,
    pub enabled: bool,
}

impl CardAction {
    fn enabled(kind: ActionKind, label: &'static str) -> Self {
        Self {
            kind,
            label,
            enabled: true,
        }
    }

    fn disabled(kind: ActionKind, label: &'static str) -> Self {
        Self {
            kind,
            label,
            enabled: false,
        }
    }
}

/// Display card for one movie
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MovieCard {
    pub movie_id: MovieId,
    pub poster_url: String,
    pub title: String,
    pub release_year: String,
    pub actions: Vec<CardAction>,
}

/// Anything that can be drawn as a movie card
pub trait CardSource {
    fn movie_id(&self) -> MovieId;
    fn title(&self) -> &str;
    fn poster_path(&self) -> Option<&str>;
    fn release_date(&self) -> Option<&str>;

    /// Stored watch state, when the item comes from the collection
    fn stored_state(&self) -> Option<bool> {
        None
    }
}

impl CardSource for MovieSummary {
    fn movie_id(&self) -> MovieId {
        self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn poster_path(&self) -> Option<&str> {
        self.poster_path.as_deref()
    }

    fn release_date(&self) -> Option<&str> {
        self.release_date.as_deref()
    }
}

impl CardSource for WatchRecord {
    fn movie_id(&self) -> MovieId {
        self.movie_id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn poster_path(&self) -> Option<&str> {
        Some(self.poster_path.as_str()).filter(|p| !p.is_empty())
    }

    fn release_date(&self) -> Option<&str> {
        Some(self.release_date.as_str()).filter(|d| !d.is_empty())
    }

    fn stored_state(&self) -> Option<bool> {
        Some(self.is_watched)
    }
}

impl<T: CardSource + ?Sized> CardSource for &T {
    fn movie_id(&self) -> MovieId {
        (**self).movie_id()
    }

    fn title(&self) -> &str {
        (**self).title()
    }

    fn poster_path(&self) -> Option<&str> {
        (**self).poster_path()
    }

    fn release_date(&self) -> Option<&str> {
        (**self).release_date()
    }

    fn stored_state(&self) -> Option<bool> {
        (**self).stored_state()
    }
}

/// Projects movies into cards; holds no state besides the image host
#[derive(Debug, Clone)]
pub struct Projector {
    image_base_url: String,
}

impl Projector {
    pub fn new(image_base_url: impl Into<String>) -> Self {
        Self {
            image_base_url: image_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Lazily renders `items` for `mode`
    ///
    /// `tracked` supplies the persisted state of search results so already
    /// tracked movies get disabled actions.
    pub fn render<'a, I>(
        &'a self,
        items: I,
        mode: ViewMode,
        tracked: &'a TrackedIndex,
    ) -> impl Iterator<Item = MovieCard> + 'a
    where
        I: IntoIterator,
        I::IntoIter: 'a,
        I::Item: CardSource,
    {
        items
            .into_iter()
            .map(move |item| self.card(&item, mode, tracked))
    }

    fn card(&self, item: &impl CardSource, mode: ViewMode, tracked: &TrackedIndex) -> MovieCard {
        let movie_id = item.movie_id();
        let state = item.stored_state().or_else(|| tracked.state(movie_id));

        MovieCard {
            movie_id,
            poster_url: self.poster_url(item.poster_path()),
            title: item.title().to_string(),
            release_year: release_year(item.release_date()),
            actions: actions(mode, state),
        }
    }

    fn poster_url(&self, poster_path: Option<&str>) -> String {
        match poster_path {
            Some(path) => format!("{}/{}", self.image_base_url, path.trim_start_matches('/')),
            None => POSTER_PLACEHOLDER.to_string(),
        }
    }
}

/// First four characters of an ISO date, "N/A" when unknown
pub fn release_year(release_date: Option<&str>) -> String {
    release_date
        .map(|date| date.chars().take(4).collect::<String>())
        .filter(|year| year.chars().count() == 4)
        .unwrap_or_else(|| "N/A".to_string())
}

fn actions(mode: ViewMode, state: Option<bool>) -> Vec<CardAction> {
    match (mode, state) {
        (ViewMode::Search, None) => vec![
            CardAction::enabled(ActionKind::AddToWatched, "Watched"),
            CardAction::enabled(ActionKind::AddToWatchlist, "Watchlist"),
        ],
        (ViewMode::Search, Some(false)) => vec![
            CardAction::enabled(ActionKind::AddToWatched, "Watched"),
            CardAction::disabled(ActionKind::AddToWatchlist, "In Watchlist"),
        ],
        (ViewMode::Search, Some(true)) => {
            vec![CardAction::disabled(ActionKind::AddToWatched, "Watched")]
        }
        (ViewMode::Listed, Some(true)) => {
            vec![CardAction::enabled(ActionKind::Remove, "Remove")]
        }
        (ViewMode::Listed, _) => vec![
            CardAction::enabled(ActionKind::MarkWatched, "Mark as Watched"),
            CardAction::enabled(ActionKind::Remove, "Remove"),
        ],
    }
}
