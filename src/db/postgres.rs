use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, PgPool, Postgres, QueryBuilder};

use crate::{
    db::WatchCollection,
    error::{AppError, AppResult},
    models::{RecordFilter, RecordPatch, WatchRecord},
};

/// Creates a PostgreSQL connection pool
pub async fn create_pool(database_url: &str) -> AppResult<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    Ok(pool)
}

#[derive(Debug, sqlx::FromRow)]
struct WatchRow {
    movie_id: String,
    title: String,
    poster_path: String,
    release_date: String,
    is_watched: bool,
    added_at: DateTime<Utc>,
}

impl TryFrom<WatchRow> for WatchRecord {
    type Error = AppError;

    fn try_from(row: WatchRow) -> Result<Self, Self::Error> {
        let movie_id = row.movie_id.parse().map_err(|_| {
            AppError::PersistenceFailed(format!("Malformed movie_id in row: {}", row.movie_id))
        })?;

        Ok(WatchRecord {
            movie_id,
            title: row.title,
            poster_path: row.poster_path,
            release_date: row.release_date,
            is_watched: row.is_watched,
            added_at: row.added_at,
        })
    }
}

/// `watchlist` table in Postgres, one owner per collection
pub struct PgCollection {
    pool: PgPool,
    owner: String,
}

impl PgCollection {
    /// Connects and applies the embedded migrations
    pub async fn connect(database_url: &str, owner: String) -> AppResult<Self> {
        let pool = create_pool(database_url).await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self::with_pool(pool, owner))
    }

    pub fn with_pool(pool: PgPool, owner: String) -> Self {
        Self { pool, owner }
    }

    fn push_filter(&self, qb: &mut QueryBuilder<'_, Postgres>, filter: &RecordFilter) {
        qb.push(" WHERE user_id = ").push_bind(self.owner.clone());
        if let Some(movie_id) = filter.movie_id {
            qb.push(" AND movie_id = ").push_bind(movie_id.to_string());
        }
        if let Some(is_watched) = filter.is_watched {
            qb.push(" AND is_watched = ").push_bind(is_watched);
        }
    }
}

#[async_trait::async_trait]
impl WatchCollection for PgCollection {
    async fn select(&self, filter: &RecordFilter) -> AppResult<Vec<WatchRecord>> {
        let mut qb = QueryBuilder::new(
            "SELECT movie_id, title, poster_path, release_date, is_watched, added_at FROM watchlist",
        );
        self.push_filter(&mut qb, filter);
        qb.push(" ORDER BY added_at DESC");

        let rows: Vec<WatchRow> = qb.build_query_as().fetch_all(&self.pool).await?;
        rows.into_iter().map(WatchRecord::try_from).collect()
    }

    async fn insert(&self, record: WatchRecord) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO watchlist
                (user_id, movie_id, title, poster_path, release_date, is_watched, added_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(&self.owner)
        .bind(record.movie_id.to_string())
        .bind(&record.title)
        .bind(&record.poster_path)
        .bind(&record.release_date)
        .bind(record.is_watched)
        .bind(record.added_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update(&self, filter: &RecordFilter, patch: RecordPatch) -> AppResult<u64> {
        let Some(is_watched) = patch.is_watched else {
            return Ok(0);
        };

        let mut qb = QueryBuilder::new("UPDATE watchlist SET is_watched = ");
        qb.push_bind(is_watched);
        self.push_filter(&mut qb, filter);

        let result = qb.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn delete(&self, filter: &RecordFilter) -> AppResult<u64> {
        let mut qb = QueryBuilder::new("DELETE FROM watchlist");
        self.push_filter(&mut qb, filter);

        let result = qb.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}
