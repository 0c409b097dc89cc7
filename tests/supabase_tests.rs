use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use cinelog_api::{
    db::{SupabaseCollection, WatchCollection},
    error::AppError,
    models::{MovieId, MovieSummary, RecordFilter, RecordPatch, WatchRecord},
};

const ANON_KEY: &str = "anon-key";
const FILTER_COLUMNS: [&str; 3] = ["user_id", "movie_id", "is_watched"];

#[derive(Clone, Default)]
struct Table {
    rows: Arc<Mutex<Vec<Value>>>,
    next_id: Arc<Mutex<u64>>,
}

fn column_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Applies PostgREST `column=eq.value` filters
fn matches(row: &Value, params: &HashMap<String, String>) -> bool {
    FILTER_COLUMNS.iter().all(|column| match params.get(*column) {
        Some(filter) => filter.strip_prefix("eq.") == Some(column_text(&row[*column]).as_str()),
        None => true,
    })
}

fn authorized(headers: &HeaderMap) -> bool {
    let api_key = headers.get("apikey").and_then(|v| v.to_str().ok());
    let bearer = headers.get("authorization").and_then(|v| v.to_str().ok());
    let expected_bearer = format!("Bearer {}", ANON_KEY);
    api_key == Some(ANON_KEY) && bearer == Some(expected_bearer.as_str())
}

async fn select_rows(
    State(table): State<Table>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "message": "bad key" })));
    }
    let rows = table.rows.lock().unwrap();
    let selected: Vec<Value> = rows.iter().filter(|r| matches(r, &params)).cloned().collect();
    (StatusCode::OK, Json(Value::Array(selected)))
}

async fn insert_rows(
    State(table): State<Table>,
    headers: HeaderMap,
    Json(new_rows): Json<Vec<Value>>,
) -> StatusCode {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED;
    }
    let mut rows = table.rows.lock().unwrap();
    let mut next_id = table.next_id.lock().unwrap();
    for mut row in new_rows {
        *next_id += 1;
        row["id"] = json!(*next_id);
        rows.push(row);
    }
    StatusCode::CREATED
}

async fn update_rows(
    State(table): State<Table>,
    Query(params): Query<HashMap<String, String>>,
    Json(patch): Json<Value>,
) -> Json<Value> {
    let mut rows = table.rows.lock().unwrap();
    let mut changed = Vec::new();
    for row in rows.iter_mut().filter(|r| matches(r, &params)) {
        if let (Some(target), Some(fields)) = (row.as_object_mut(), patch.as_object()) {
            for (key, value) in fields {
                target.insert(key.clone(), value.clone());
            }
        }
        changed.push(row.clone());
    }
    Json(Value::Array(changed))
}

async fn delete_rows(
    State(table): State<Table>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let mut rows = table.rows.lock().unwrap();
    let (removed, kept): (Vec<Value>, Vec<Value>) =
        rows.drain(..).partition(|r| matches(r, &params));
    *rows = kept;
    Json(Value::Array(removed))
}

async fn unavailable() -> impl IntoResponse {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "message": "database is down" })),
    )
}

/// Starts a fake PostgREST serving `watchlist` and an always failing `broken`
async fn spawn_mock_postgrest() -> (String, Table) {
    let table = Table::default();
    let app = Router::new()
        .route(
            "/rest/v1/watchlist",
            get(select_rows)
                .post(insert_rows)
                .patch(update_rows)
                .delete(delete_rows),
        )
        .route(
            "/rest/v1/broken",
            get(unavailable)
                .post(unavailable)
                .patch(unavailable)
                .delete(unavailable),
        )
        .with_state(table.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), table)
}

fn collection(project_url: &str, table: &str, owner: &str) -> SupabaseCollection {
    SupabaseCollection::new(project_url, ANON_KEY.to_string(), table, owner.to_string())
}

fn record(id: u64, title: &str, is_watched: bool) -> WatchRecord {
    let movie = MovieSummary {
        id: MovieId(id),
        title: title.to_string(),
        poster_path: Some(format!("/{}.jpg", id)),
        release_date: Some("2010-07-15".to_string()),
    };
    WatchRecord::new(&movie, is_watched)
}

#[tokio::test]
async fn test_record_lifecycle() {
    let (url, table) = spawn_mock_postgrest().await;
    let collection = collection(&url, "watchlist", "alice");

    collection
        .insert(record(27205, "Inception", false))
        .await
        .unwrap();

    // Rows come back with the extra id and user_id columns
    {
        let rows = table.rows.lock().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["user_id"], "alice");
        assert_eq!(rows[0]["movie_id"], "27205");
        assert_eq!(rows[0]["id"], 1);
    }
    let watchlist = collection.select(&RecordFilter::watched(false)).await.unwrap();
    assert_eq!(watchlist.len(), 1);
    assert_eq!(watchlist[0].movie_id, MovieId(27205));
    assert_eq!(watchlist[0].poster_path, "/27205.jpg");

    let changed = collection
        .update(
            &RecordFilter::movie(MovieId(27205)),
            RecordPatch::set_watched(true),
        )
        .await
        .unwrap();
    assert_eq!(changed, 1);

    let watched = collection.select(&RecordFilter::watched(true)).await.unwrap();
    assert_eq!(watched.len(), 1);
    assert!(watched[0].is_watched);
    assert!(collection
        .select(&RecordFilter::watched(false))
        .await
        .unwrap()
        .is_empty());

    let removed = collection
        .delete(&RecordFilter::movie(MovieId(27205)))
        .await
        .unwrap();
    assert_eq!(removed, 1);
    assert!(table.rows.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_unmatched_mutations_report_zero_rows() {
    let (url, _) = spawn_mock_postgrest().await;
    let collection = collection(&url, "watchlist", "alice");
    collection
        .insert(record(603, "The Matrix", false))
        .await
        .unwrap();

    let filter = RecordFilter::movie(MovieId(42));
    assert_eq!(
        collection
            .update(&filter, RecordPatch::set_watched(true))
            .await
            .unwrap(),
        0
    );
    assert_eq!(collection.delete(&filter).await.unwrap(), 0);
    assert_eq!(
        collection
            .select(&RecordFilter::default())
            .await
            .unwrap()
            .len(),
        1
    );
}

#[tokio::test]
async fn test_owners_do_not_see_each_other() {
    let (url, table) = spawn_mock_postgrest().await;
    let alice = collection(&url, "watchlist", "alice");
    let bob = collection(&url, "watchlist", "bob");

    alice.insert(record(155, "The Dark Knight", true)).await.unwrap();

    assert!(bob.select(&RecordFilter::default()).await.unwrap().is_empty());
    assert_eq!(
        bob.delete(&RecordFilter::movie(MovieId(155))).await.unwrap(),
        0
    );
    assert_eq!(table.rows.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_server_error_is_a_persistence_failure() {
    let (url, _) = spawn_mock_postgrest().await;
    let collection = collection(&url, "broken", "alice");

    let result = collection.select(&RecordFilter::default()).await;
    match result {
        Err(AppError::PersistenceFailed(message)) => assert!(message.contains("500")),
        other => panic!("expected persistence failure, got {:?}", other),
    }

    let result = collection.insert(record(603, "The Matrix", false)).await;
    assert!(matches!(result, Err(AppError::PersistenceFailed(_))));

    let result = collection
        .delete(&RecordFilter::movie(MovieId(603)))
        .await;
    assert!(matches!(result, Err(AppError::PersistenceFailed(_))));
}

#[tokio::test]
async fn test_wrong_key_is_rejected() {
    let (url, _) = spawn_mock_postgrest().await;
    let collection =
        SupabaseCollection::new(&url, "other-key".to_string(), "watchlist", "alice".to_string());

    let result = collection.select(&RecordFilter::default()).await;
    assert!(matches!(result, Err(AppError::PersistenceFailed(_))));
}
