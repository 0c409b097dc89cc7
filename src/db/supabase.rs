//! Supabase table accessed through its PostgREST endpoint
//!
//! Filters map to `column=eq.value` query parameters. Mutations ask for
//! `return=representation` so the affected row count can be reported.

use reqwest::{Client as HttpClient, RequestBuilder, Response};
use serde::Serialize;

use crate::{
    db::WatchCollection,
    error::{AppError, AppResult},
    models::{RecordFilter, RecordPatch, WatchRecord},
};

/// Record plus the owner column, as written to the table
#[derive(Serialize)]
struct OwnedRecord<'a> {
    user_id: &'a str,
    #[serde(flatten)]
    record: &'a WatchRecord,
}

#[derive(Clone)]
pub struct SupabaseCollection {
    http_client: HttpClient,
    table_url: String,
    api_key: String,
    owner: String,
}

impl SupabaseCollection {
    pub fn new(project_url: &str, api_key: String, table: &str, owner: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            table_url: format!("{}/rest/v1/{}", project_url.trim_end_matches('/'), table),
            api_key,
            owner,
        }
    }

    fn filter_params(&self, filter: &RecordFilter) -> Vec<(&'static str, String)> {
        let mut params = vec![("user_id", format!("eq.{}", self.owner))];
        if let Some(movie_id) = filter.movie_id {
            params.push(("movie_id", format!("eq.{}", movie_id)));
        }
        if let Some(is_watched) = filter.is_watched {
            params.push(("is_watched", format!("eq.{}", is_watched)));
        }
        params
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    async fn send(&self, request: RequestBuilder, operation: &str) -> AppResult<Response> {
        let response = self
            .authorized(request)
            .send()
            .await
            .map_err(|e| AppError::PersistenceFailed(format!("Supabase unreachable: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::PersistenceFailed(format!(
                "Supabase {} returned status {}: {}",
                operation, status, body
            )));
        }

        Ok(response)
    }

    async fn affected_rows(response: Response) -> AppResult<u64> {
        let rows: Vec<serde_json::Value> = response
            .json()
            .await
            .map_err(|e| AppError::PersistenceFailed(format!("Invalid Supabase response: {}", e)))?;
        Ok(rows.len() as u64)
    }
}

#[async_trait::async_trait]
impl WatchCollection for SupabaseCollection {
    async fn select(&self, filter: &RecordFilter) -> AppResult<Vec<WatchRecord>> {
        let request = self
            .http_client
            .get(&self.table_url)
            .query(&[("select", "*"), ("order", "added_at.desc")])
            .query(&self.filter_params(filter));

        let response = self.send(request, "select").await?;
        response
            .json()
            .await
            .map_err(|e| AppError::PersistenceFailed(format!("Invalid Supabase rows: {}", e)))
    }

    async fn insert(&self, record: WatchRecord) -> AppResult<()> {
        let request = self
            .http_client
            .post(&self.table_url)
            .header("Prefer", "return=minimal")
            .json(&[OwnedRecord {
                user_id: &self.owner,
                record: &record,
            }]);

        self.send(request, "insert").await?;
        Ok(())
    }

    async fn update(&self, filter: &RecordFilter, patch: RecordPatch) -> AppResult<u64> {
        if patch == RecordPatch::default() {
            return Ok(0);
        }

        let request = self
            .http_client
            .patch(&self.table_url)
            .header("Prefer", "return=representation")
            .query(&self.filter_params(filter))
            .json(&patch);

        let response = self.send(request, "update").await?;
        Self::affected_rows(response).await
    }

    async fn delete(&self, filter: &RecordFilter) -> AppResult<u64> {
        let request = self
            .http_client
            .delete(&self.table_url)
            .header("Prefer", "return=representation")
            .query(&self.filter_params(filter));

        let response = self.send(request, "delete").await?;
        Self::affected_rows(response).await
    }

    fn backend(&self) -> &'static str {
        "supabase"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MovieId, MovieSummary};

    fn create_test_collection() -> SupabaseCollection {
        SupabaseCollection::new(
            "https://project.supabase.co/",
            "anon".to_string(),
            "watchlist",
            "alice".to_string(),
        )
    }

    #[test]
    fn test_table_url() {
        let collection = create_test_collection();
        assert_eq!(
            collection.table_url,
            "https://project.supabase.co/rest/v1/watchlist"
        );
    }

    #[test]
    fn test_filter_params_are_owner_scoped() {
        let collection = create_test_collection();

        let params = collection.filter_params(&RecordFilter::default());
        assert_eq!(params, vec![("user_id", "eq.alice".to_string())]);

        let params =
            collection.filter_params(&RecordFilter::movie(MovieId(27205)).and_watched(true));
        assert_eq!(
            params,
            vec![
                ("user_id", "eq.alice".to_string()),
                ("movie_id", "eq.27205".to_string()),
                ("is_watched", "eq.true".to_string()),
            ]
        );
    }

    #[test]
    fn test_owned_record_flattens_columns() {
        let movie = MovieSummary {
            id: MovieId(27205),
            title: "Inception".to_string(),
            poster_path: None,
            release_date: None,
        };
        let record = WatchRecord::new(&movie, false);
        let json = serde_json::to_value(OwnedRecord {
            user_id: "alice",
            record: &record,
        })
        .unwrap();

        assert_eq!(json["user_id"], "alice");
        assert_eq!(json["movie_id"], "27205");
        assert_eq!(json["is_watched"], false);
        assert_eq!(json["poster_path"], "");
    }
}
