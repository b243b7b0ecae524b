use async_trait::async_trait;
use sqlx::{FromRow, SqlitePool};
use thiserror::Error;

use super::types::{ShowRecord, ShowStatus};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record has not been saved yet")]
    Unsaved,
    #[error("invalid row {id}: {reason}")]
    InvalidRow { id: i64, reason: String },
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Record store used by the commands. Listing is in insertion order.
#[async_trait]
pub trait ShowStore: Send + Sync {
    async fn add(&self, record: &ShowRecord) -> Result<i64, StoreError>;
    async fn update(&self, record: &ShowRecord) -> Result<u64, StoreError>;
    async fn remove(&self, record: &ShowRecord) -> Result<(), StoreError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<ShowRecord>, StoreError>;
    async fn list_all(&self) -> Result<Vec<ShowRecord>, StoreError>;
}

pub struct SqliteShowStore {
    pool: SqlitePool,
}

impl SqliteShowStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct ShowRow {
    id: i64,
    title: String,
    source_url: String,
    poster_url: String,
    genres: Option<String>,
    season_progress: i64,
    episode_progress: i64,
    progress_updated_at: i64,
    record_updated_at: i64,
    status: i64,
}

impl TryFrom<ShowRow> for ShowRecord {
    type Error = StoreError;

    fn try_from(r: ShowRow) -> Result<Self, Self::Error> {
        let invalid = |reason: &str| StoreError::InvalidRow { id: r.id, reason: reason.to_string() };
        let season_progress = u32::try_from(r.season_progress).map_err(|_| invalid("season_progress out of range"))?;
        let episode_progress = u32::try_from(r.episode_progress).map_err(|_| invalid("episode_progress out of range"))?;
        let status = ShowStatus::from_ordinal(r.status).ok_or_else(|| invalid("unknown status"))?;
        Ok(ShowRecord {
            id: Some(r.id),
            title: r.title,
            source_url: r.source_url,
            poster_url: r.poster_url,
            genres: r.genres,
            season_progress,
            episode_progress,
            progress_updated_at: r.progress_updated_at,
            record_updated_at: r.record_updated_at,
            status,
        })
    }
}

const SELECT_COLUMNS: &str = r#"
    SELECT id, title, source_url, poster_url, genres,
           season_progress, episode_progress,
           progress_updated_at, record_updated_at, status
    FROM tv_shows
"#;

#[async_trait]
impl ShowStore for SqliteShowStore {
    async fn add(&self, record: &ShowRecord) -> Result<i64, StoreError> {
        let res = sqlx::query(
            r#"
            INSERT INTO tv_shows (title, source_url, poster_url, genres,
                season_progress, episode_progress, progress_updated_at, record_updated_at, status)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.title)
        .bind(&record.source_url)
        .bind(&record.poster_url)
        .bind(&record.genres)
        .bind(i64::from(record.season_progress))
        .bind(i64::from(record.episode_progress))
        .bind(record.progress_updated_at)
        .bind(record.record_updated_at)
        .bind(record.status.ordinal())
        .execute(&self.pool)
        .await?;
        Ok(res.last_insert_rowid())
    }

    // source_url is fixed at creation and never rewritten
    async fn update(&self, record: &ShowRecord) -> Result<u64, StoreError> {
        let id = record.id.ok_or(StoreError::Unsaved)?;
        let res = sqlx::query(
            r#"
            UPDATE tv_shows
               SET title = ?, poster_url = ?, genres = ?,
                   season_progress = ?, episode_progress = ?,
                   progress_updated_at = ?, record_updated_at = ?, status = ?
             WHERE id = ?
            "#,
        )
        .bind(&record.title)
        .bind(&record.poster_url)
        .bind(&record.genres)
        .bind(i64::from(record.season_progress))
        .bind(i64::from(record.episode_progress))
        .bind(record.progress_updated_at)
        .bind(record.record_updated_at)
        .bind(record.status.ordinal())
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected())
    }

    async fn remove(&self, record: &ShowRecord) -> Result<(), StoreError> {
        let id = record.id.ok_or(StoreError::Unsaved)?;
        sqlx::query("DELETE FROM tv_shows WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ShowRecord>, StoreError> {
        let sql = format!("{SELECT_COLUMNS} WHERE id = ?");
        let row = sqlx::query_as::<_, ShowRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(ShowRecord::try_from).transpose()
    }

    async fn list_all(&self) -> Result<Vec<ShowRecord>, StoreError> {
        let sql = format!("{SELECT_COLUMNS} ORDER BY id");
        let rows = sqlx::query_as::<_, ShowRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(ShowRecord::try_from).collect()
    }
}
