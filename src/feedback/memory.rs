use std::{collections::{BTreeMap, HashMap}, sync::Arc};

use tokio::sync::RwLock;

use super::{FeedbackRecord, FeedbackRepository, NewFeedback, StoreError};

#[derive(Debug, Default)]
struct Inner {
    last_id: i64,
    offline: bool,
    records: BTreeMap<i64, FeedbackRecord>,
    actors: HashMap<i64, String>,
}

impl Inner {
    fn check(&self) -> Result<(), StoreError> {
        if self.offline {
            return Err(StoreError::Unavailable("memory store is offline".to_owned()));
        }
        Ok(())
    }
}

/// Process-local repository. Nothing survives a restart.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
    pub async fn add_actor(&self, user_id: i64, name: impl Into<String>) {
        self.inner.write().await.actors.insert(user_id, name.into());
    }

    pub async fn remove_actor(&self, user_id: i64) {
        self.inner.write().await.actors.remove(&user_id);
    }

    /// Makes every call fail, to exercise storage errors.
    pub async fn set_offline(&self, offline: bool) {
        self.inner.write().await.offline = offline;
    }
}

impl FeedbackRepository for MemoryStore {
    async fn add(&self, feedback: NewFeedback) -> Result<FeedbackRecord, StoreError> {
        let mut inner = self.inner.write().await;
        inner.check()?;

        inner.last_id += 1;
        let record = FeedbackRecord {
            id: inner.last_id,
            user_id: feedback.user_id,
            message: feedback.message,
            sentiment: feedback.sentiment,
            timestamp: feedback.timestamp,
        };
        inner.records.insert(record.id, record.clone());
        Ok(record)
    }

    async fn get_all(&self) -> Result<Vec<FeedbackRecord>, StoreError> {
        let inner = self.inner.read().await;
        inner.check()?;
        Ok(inner.records.values().cloned().collect())
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<FeedbackRecord>, StoreError> {
        let inner = self.inner.read().await;
        inner.check()?;
        Ok(inner.records.get(&id).cloned())
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        inner.check()?;
        Ok(inner.records.remove(&id).is_some())
    }

    async fn get_by_user(&self, user_id: i64) -> Result<Vec<FeedbackRecord>, StoreError> {
        let inner = self.inner.read().await;
        inner.check()?;
        Ok(inner
            .records
            .values()
            .filter(|record| record.user_id == Some(user_id))
            .cloned()
            .collect())
    }

    async fn display_name(&self, user_id: i64) -> Result<Option<String>, StoreError> {
        let inner = self.inner.read().await;
        inner.check()?;
        Ok(inner.actors.get(&user_id).cloned())
    }
}
