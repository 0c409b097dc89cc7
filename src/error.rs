use axum::{
    extract::rejection::{PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::services::notify::{notify, Notice, NoticeKind, GENERIC_FAILURE};

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Catalog lookup failed: {message}")]
    LookupFailed {
        status: Option<u16>,
        message: String,
    },

    #[error("Persistence failed: {0}")]
    PersistenceFailed(String),

    #[error("This movie is already in your watched list")]
    AlreadyWatched,

    #[error("This movie is already in your watchlist")]
    AlreadyInWatchlist,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Builds a lookup failure from a non-2xx catalog response
    pub fn lookup_status(status: reqwest::StatusCode, body: &str) -> Self {
        AppError::LookupFailed {
            status: Some(status.as_u16()),
            message: format!("catalog returned status {}: {}", status, body),
        }
    }

    /// Business-rule rejections are expected outcomes, not failures
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            AppError::AlreadyWatched | AppError::AlreadyInWatchlist | AppError::NotFound(_)
        )
    }

    /// Converts the error into the notice shown to the user, logging it once
    pub fn to_notice(&self) -> Notice {
        if self.is_rejection() {
            return notify(NoticeKind::Warning, self.to_string());
        }

        match self {
            AppError::InvalidInput(msg) => notify(NoticeKind::Warning, msg.clone()),
            _ => {
                tracing::error!(error = %self, "Request failed");
                Notice::new(NoticeKind::Error, GENERIC_FAILURE)
            }
        }
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::PersistenceFailed(err.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        AppError::PersistenceFailed(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::AlreadyWatched | AppError::AlreadyInWatchlist => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::LookupFailed { .. } => StatusCode::BAD_GATEWAY,
            AppError::PersistenceFailed(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({
            "notice": self.to_notice()
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
