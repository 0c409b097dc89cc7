use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    error::AppResult,
    middleware::RequestId,
    models::MovieId,
    services::{
        notify::{notify, Notice, NoticeKind},
        Tab, Transition,
    },
};

use super::{AppState, TabView};

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
}

/// Result of a user action: the notice plus the re-rendered active tab
#[derive(Debug, Serialize)]
pub struct ActionResponse {
    pub notice: Notice,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transition: Option<Transition>,
    /// Missing when the refresh after a successful change failed
    pub view: Option<TabView>,
}

impl AppState {
    async fn respond(
        &self,
        notice: Notice,
        transition: Option<Transition>,
    ) -> Json<ActionResponse> {
        // The change already happened; a failed refresh must not hide that
        let view = match self.refresh_active().await {
            Ok(view) => Some(view),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to refresh active tab after change");
                None
            }
        };

        Json(ActionResponse {
            notice,
            transition,
            view,
        })
    }
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Search the catalog and show the results on the search tab
pub async fn search(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> AppResult<Json<TabView>> {
    let Query(params) = query?;
    tracing::info!(request_id = %request_id, query = %params.q, "Searching catalog");

    let movies = state.reconciler.catalog().search(&params.q).await?;
    let view = state.show_results(movies).await?;
    Ok(Json(view))
}

/// Switch tabs; list tabs are always re-queried
pub async fn select_tab(
    State(state): State<AppState>,
    tab: Result<Path<Tab>, PathRejection>,
) -> AppResult<Json<TabView>> {
    let Path(tab) = tab?;
    let view = state.open_tab(tab).await?;
    Ok(Json(view))
}

pub async fn add_to_watched(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    id: Result<Path<u64>, PathRejection>,
) -> AppResult<Json<ActionResponse>> {
    let Path(id) = id?;
    let movie_id = MovieId(id);

    // Stored state is checked before the movie is resolved through the catalog
    if state.reconciler.is_watched(movie_id).await? {
        let title = state.title_for(movie_id).await;
        let transition = Transition::AlreadyWatched;
        return Ok(state.respond(transition.notice(&title), Some(transition)).await);
    }

    let movie = state.resolve_movie(movie_id).await?;
    let transition = state.reconciler.add_to_watched(&movie).await?;

    tracing::info!(request_id = %request_id, movie_id = id, transition = ?transition, "Add to watched handled");
    Ok(state
        .respond(transition.notice(&movie.title), Some(transition))
        .await)
}

pub async fn add_to_watchlist(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    id: Result<Path<u64>, PathRejection>,
) -> AppResult<Json<ActionResponse>> {
    let Path(id) = id?;
    let movie_id = MovieId(id);
    let transition = state.reconciler.add_to_watchlist(movie_id).await?;
    let title = state.title_for(movie_id).await;

    tracing::info!(request_id = %request_id, movie_id = id, "Add to watchlist handled");
    Ok(state.respond(transition.notice(&title), Some(transition)).await)
}

/// Watchlist entry point for flipping a tracked movie to watched
pub async fn mark_as_watched(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
) -> AppResult<Json<ActionResponse>> {
    let Path(id) = id?;
    let movie_id = MovieId(id);
    let transition = state.reconciler.mark_as_watched(movie_id).await?;
    let title = state.title_for(movie_id).await;

    Ok(state.respond(transition.notice(&title), Some(transition)).await)
}

pub async fn remove_movie(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
) -> AppResult<Json<ActionResponse>> {
    let Path(id) = id?;
    let movie_id = MovieId(id);
    // Read the title first, the record is gone afterwards
    let title = state.title_for(movie_id).await;
    state.reconciler.remove_movie(movie_id).await?;

    let notice = notify(NoticeKind::Success, format!("\"{}\" removed", title));
    Ok(state.respond(notice, None).await)
}
