use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;

use crate::{
    db::WatchCollection,
    error::AppResult,
    models::{MovieId, MovieSummary, RecordFilter, WatchRecord},
    services::{
        catalog::MovieCatalog,
        projector::MovieCard,
        session::Session,
        tabs::{LoadRequest, Tab},
        Projector, Reconciler, TrackedIndex, ViewMode,
    },
};

/// Cards of one tab, as the page renders them
#[derive(Debug, Clone, Serialize)]
pub struct TabView {
    pub tab: Tab,
    pub cards: Vec<MovieCard>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_message: Option<&'static str>,
}

impl TabView {
    fn new(tab: Tab, cards: Vec<MovieCard>) -> Self {
        let empty_message = cards.is_empty().then_some(match tab {
            Tab::Search => "No movies found",
            Tab::Watchlist => "Your watchlist is empty",
            Tab::Watched => "You have not watched any movies yet",
        });

        Self {
            tab,
            cards,
            empty_message,
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub reconciler: Reconciler,
    pub projector: Arc<Projector>,
    pub session: Arc<RwLock<Session>>,
    collection: Arc<dyn WatchCollection>,
}

impl AppState {
    pub fn new(
        collection: Arc<dyn WatchCollection>,
        catalog: Arc<dyn MovieCatalog>,
        image_base_url: &str,
    ) -> Self {
        Self {
            reconciler: Reconciler::new(collection.clone(), catalog),
            projector: Arc::new(Projector::new(image_base_url)),
            session: Arc::new(RwLock::new(Session::default())),
            collection,
        }
    }

    /// Switches to `tab` and renders it from freshly loaded data
    pub async fn open_tab(&self, tab: Tab) -> AppResult<TabView> {
        let load = self.session.write().await.tabs.select(tab);

        match load {
            Some(LoadRequest::Watchlist) => {
                let records = self.reconciler.watchlist().await?;
                Ok(self.list_view(Tab::Watchlist, &records))
            }
            Some(LoadRequest::Watched) => {
                let records = self.reconciler.watched().await?;
                Ok(self.list_view(Tab::Watched, &records))
            }
            None => self.search_view().await,
        }
    }

    /// Re-renders whichever tab is active
    pub async fn refresh_active(&self) -> AppResult<TabView> {
        let tab = self.session.read().await.tabs.active();
        self.open_tab(tab).await
    }

    /// Indexes new search results and shows the search tab
    pub async fn show_results(&self, movies: Vec<MovieSummary>) -> AppResult<TabView> {
        {
            let mut session = self.session.write().await;
            session.results.replace(movies);
        }
        self.open_tab(Tab::Search).await
    }

    async fn search_view(&self) -> AppResult<TabView> {
        let tracked = self.reconciler.tracked().await?;
        let session = self.session.read().await;
        let cards = self
            .projector
            .render(session.results.iter(), ViewMode::Search, &tracked)
            .collect();
        Ok(TabView::new(Tab::Search, cards))
    }

    fn list_view(&self, tab: Tab, records: &[WatchRecord]) -> TabView {
        let tracked = TrackedIndex::default();
        let cards = self
            .projector
            .render(records, ViewMode::Listed, &tracked)
            .collect();
        TabView::new(tab, cards)
    }

    /// Full movie for an id coming back from the page
    ///
    /// Search results are served from the session index; anything else is
    /// fetched from the catalog.
    pub async fn resolve_movie(&self, movie_id: MovieId) -> AppResult<MovieSummary> {
        let indexed = self.session.read().await.results.get(movie_id).cloned();
        if let Some(movie) = indexed {
            return Ok(movie);
        }
        self.reconciler.catalog().details(movie_id).await
    }

    /// Best-effort display title for notices
    pub async fn title_for(&self, movie_id: MovieId) -> String {
        let indexed = self.session.read().await.results.get(movie_id).cloned();
        if let Some(movie) = indexed {
            return movie.title;
        }

        match self.collection.select(&RecordFilter::movie(movie_id)).await {
            Ok(records) => records
                .into_iter()
                .next()
                .map(|r| r.title)
                .unwrap_or_else(|| format!("Movie {}", movie_id)),
            Err(e) => {
                tracing::warn!(error = %e, movie_id = %movie_id, "Title lookup failed");
                format!("Movie {}", movie_id)
            }
        }
    }
}
