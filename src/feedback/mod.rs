mod handlers;
pub mod memory;
pub mod store;

use std::{cmp::Reverse, collections::HashMap, future::Future};

use axum::{Router, routing::{get, post}};
use serde::Serialize;
use time::OffsetDateTime;

use crate::{
    AppState,
    sentiment::{Classifier, Scorer, ScorerError, Sentiment},
};

pub use memory::MemoryStore;
pub use store::SqliteStore;

pub const GUEST: &str = "Guest";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/feedback", post(handlers::submit))
        .route("/feedback/{id}", get(handlers::get_one).delete(handlers::delete))
        .route("/feedback/history/{user_id}", get(handlers::history))
        .route("/summary", get(handlers::summary))
        .route("/all_feedback", get(handlers::list))
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewFeedback {
    pub user_id: Option<i64>,
    pub message: String,
    pub sentiment: Sentiment,
    pub timestamp: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackRecord {
    pub id: i64,
    pub user_id: Option<i64>,
    pub message: String,
    pub sentiment: Sentiment,
    pub timestamp: OffsetDateTime,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database: {0}")]
    Database(#[from] sqlx::Error),
    #[error("record {id} is corrupt: {reason}")]
    Corrupt { id: i64, reason: String },
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("timestamp {0} cannot be stored")]
    TimestampOutOfRange(OffsetDateTime),
}

#[derive(Debug, thiserror::Error)]
pub enum FeedbackError {
    #[error("Feedback message is required")]
    EmptyMessage,
    #[error("user_id must be an integer")]
    InvalidUserId,
    #[error("Feedback not found")]
    NotFound(i64),
    #[error(transparent)]
    Scorer(#[from] ScorerError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Persistence seam for feedback records and the actors they reference.
pub trait FeedbackRepository: Send + Sync {
    /// Persists a record and assigns its id.
    fn add(&self, feedback: NewFeedback) -> impl Future<Output = Result<FeedbackRecord, StoreError>> + Send;

    fn get_all(&self) -> impl Future<Output = Result<Vec<FeedbackRecord>, StoreError>> + Send;

    fn get_by_id(&self, id: i64) -> impl Future<Output = Result<Option<FeedbackRecord>, StoreError>> + Send;

    /// Returns false when no record had that id.
    fn delete(&self, id: i64) -> impl Future<Output = Result<bool, StoreError>> + Send;

    fn get_by_user(&self, user_id: i64) -> impl Future<Output = Result<Vec<FeedbackRecord>, StoreError>> + Send;

    fn display_name(&self, user_id: i64) -> impl Future<Output = Result<Option<String>, StoreError>> + Send;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    #[serde(rename = "Positive")]
    pub positive: u64,
    #[serde(rename = "Negative")]
    pub negative: u64,
    #[serde(rename = "Neutral")]
    pub neutral: u64,
}

impl Summary {
    fn count(&mut self, sentiment: Sentiment) {
        match sentiment {
            Sentiment::Positive => self.positive += 1,
            Sentiment::Negative => self.negative += 1,
            Sentiment::Neutral => self.neutral += 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Submitted {
    pub sentiment: Sentiment,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedbackEntry {
    pub id: i64,
    pub user_name: String,
    pub message: String,
    pub sentiment: Sentiment,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub id: i64,
    pub message: String,
    pub sentiment: Sentiment,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

impl From<FeedbackRecord> for HistoryEntry {
    fn from(record: FeedbackRecord) -> Self {
        Self {
            id: record.id,
            message: record.message,
            sentiment: record.sentiment,
            timestamp: record.timestamp,
        }
    }
}

fn newest_first(records: &mut [FeedbackRecord]) {
    records.sort_by_key(|record| Reverse((record.timestamp, record.id)));
}

/// Classifies then persists. The label is only reported once the record is stored.
pub async fn submit_feedback<R: FeedbackRepository, S: Scorer>(
    repo: &R,
    classifier: &Classifier<S>,
    message: &str,
    user_id: Option<i64>,
) -> Result<Submitted, FeedbackError> {
    if message.trim().is_empty() {
        return Err(FeedbackError::EmptyMessage);
    }

    let sentiment = classifier.classify(message).await?;
    let record = repo
        .add(NewFeedback {
            user_id,
            message: message.to_owned(),
            sentiment,
            timestamp: OffsetDateTime::now_utc(),
        })
        .await?;

    tracing::info!(id = record.id, user_id = ?record.user_id, %sentiment, "stored feedback");
    Ok(Submitted { sentiment })
}

pub async fn get_summary<R: FeedbackRepository>(repo: &R) -> Result<Summary, FeedbackError> {
    let mut summary = Summary::default();
    for record in repo.get_all().await? {
        summary.count(record.sentiment);
    }
    Ok(summary)
}

/// `None` lists every record.
pub async fn list_feedback<R: FeedbackRepository>(
    repo: &R,
    filter: Option<Sentiment>,
) -> Result<Vec<FeedbackEntry>, FeedbackError> {
    let mut records = repo.get_all().await?;
    if let Some(sentiment) = filter {
        records.retain(|record| record.sentiment == sentiment);
    }
    newest_first(&mut records);

    let mut names: HashMap<i64, String> = HashMap::new();
    let mut entries = Vec::with_capacity(records.len());
    for record in records {
        let user_name = match record.user_id {
            Some(user_id) => match names.get(&user_id) {
                Some(name) => name.clone(),
                None => {
                    let name = repo.display_name(user_id).await?.unwrap_or_else(|| GUEST.to_owned());
                    names.insert(user_id, name.clone());
                    name
                }
            },
            None => GUEST.to_owned(),
        };

        entries.push(FeedbackEntry {
            id: record.id,
            user_name,
            message: record.message,
            sentiment: record.sentiment,
            timestamp: record.timestamp,
        });
    }

    Ok(entries)
}

pub async fn get_feedback<R: FeedbackRepository>(repo: &R, id: i64) -> Result<FeedbackEntry, FeedbackError> {
    let record = repo.get_by_id(id).await?.ok_or(FeedbackError::NotFound(id))?;
    let user_name = match record.user_id {
        Some(user_id) => repo.display_name(user_id).await?,
        None => None,
    };

    Ok(FeedbackEntry {
        id: record.id,
        user_name: user_name.unwrap_or_else(|| GUEST.to_owned()),
        message: record.message,
        sentiment: record.sentiment,
        timestamp: record.timestamp,
    })
}

pub async fn get_user_history<R: FeedbackRepository>(
    repo: &R,
    user_id: i64,
) -> Result<Vec<HistoryEntry>, FeedbackError> {
    let mut records = repo.get_by_user(user_id).await?;
    records.retain(|record| record.user_id == Some(user_id));
    newest_first(&mut records);
    Ok(records.into_iter().map(HistoryEntry::from).collect())
}

pub async fn delete_feedback<R: FeedbackRepository>(repo: &R, id: i64) -> Result<(), FeedbackError> {
    if !repo.delete(id).await? {
        return Err(FeedbackError::NotFound(id));
    }

    tracing::info!(id, "deleted feedback");
    Ok(())
}
