use sqlx::{FromRow, SqlitePool};
use time::OffsetDateTime;

use crate::sentiment::Sentiment;

use super::{FeedbackRecord, FeedbackRepository, NewFeedback, StoreError};

const COLUMNS: &str = "id,user_id,message,sentiment,timestamp";

#[derive(FromRow)]
struct FeedbackRow {
    id: i64,
    user_id: Option<i64>,
    message: String,
    sentiment: String,
    timestamp: i64,
}

impl TryFrom<FeedbackRow> for FeedbackRecord {
    type Error = StoreError;

    fn try_from(row: FeedbackRow) -> Result<Self, Self::Error> {
        let id = row.id;
        let corrupt = |reason: String| StoreError::Corrupt { id, reason };

        let sentiment = row.sentiment.parse::<Sentiment>().map_err(|e| corrupt(format!("{e}")))?;
        let timestamp = OffsetDateTime::from_unix_timestamp_nanos(row.timestamp.into())
            .map_err(|e| corrupt(format!("timestamp: {e}")))?;

        Ok(FeedbackRecord {
            id,
            user_id: row.user_id,
            message: row.message,
            sentiment,
            timestamp,
        })
    }
}

/// Rows that fail to decode are logged and skipped so one bad row cannot
/// take down every read.
fn decode(rows: Vec<FeedbackRow>) -> Vec<FeedbackRecord> {
    rows.into_iter()
        .filter_map(|row| match FeedbackRecord::try_from(row) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!("skipping feedback row: {e}");
                None
            }
        })
        .collect()
}

fn to_nanos(timestamp: OffsetDateTime) -> Result<i64, StoreError> {
    i64::try_from(timestamp.unix_timestamp_nanos())
        .map_err(|_| StoreError::TimestampOutOfRange(timestamp))
}

#[derive(Debug, Clone)]
pub struct SqliteStore {
    db_pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(db_pool: SqlitePool) -> Self {
        Self { db_pool }
    }
}

impl FeedbackRepository for SqliteStore {
    #[tracing::instrument(skip_all, err)]
    async fn add(&self, feedback: NewFeedback) -> Result<FeedbackRecord, StoreError> {
        let id = sqlx::query("INSERT INTO feedback (user_id,message,sentiment,timestamp) VALUES (?,?,?,?)")
            .bind(feedback.user_id)
            .bind(&feedback.message)
            .bind(feedback.sentiment.as_str())
            .bind(to_nanos(feedback.timestamp)?)
            .execute(&self.db_pool)
            .await?
            .last_insert_rowid();

        Ok(FeedbackRecord {
            id,
            user_id: feedback.user_id,
            message: feedback.message,
            sentiment: feedback.sentiment,
            timestamp: feedback.timestamp,
        })
    }

    #[tracing::instrument(skip(self), err)]
    async fn get_all(&self) -> Result<Vec<FeedbackRecord>, StoreError> {
        let rows: Vec<FeedbackRow> =
            sqlx::query_as(&format!("SELECT {COLUMNS} FROM feedback ORDER BY timestamp DESC, id DESC"))
                .fetch_all(&self.db_pool)
                .await?;
        Ok(decode(rows))
    }

    #[tracing::instrument(skip(self), err)]
    async fn get_by_id(&self, id: i64) -> Result<Option<FeedbackRecord>, StoreError> {
        let row: Option<FeedbackRow> = sqlx::query_as(&format!("SELECT {COLUMNS} FROM feedback WHERE id=?"))
            .bind(id)
            .fetch_optional(&self.db_pool)
            .await?;
        row.map(FeedbackRecord::try_from).transpose()
    }

    #[tracing::instrument(skip(self), err)]
    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM feedback WHERE id=?")
            .bind(id)
            .execute(&self.db_pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip(self), err)]
    async fn get_by_user(&self, user_id: i64) -> Result<Vec<FeedbackRecord>, StoreError> {
        let rows: Vec<FeedbackRow> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM feedback WHERE user_id=? ORDER BY timestamp DESC, id DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.db_pool)
        .await?;
        Ok(decode(rows))
    }

    async fn display_name(&self, user_id: i64) -> Result<Option<String>, StoreError> {
        let name: Option<(String,)> = sqlx::query_as("SELECT name FROM users WHERE id=?")
            .bind(user_id)
            .fetch_optional(&self.db_pool)
            .await?;
        Ok(name.map(|(name,)| name))
    }
}
