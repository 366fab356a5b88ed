use serde::{Deserialize, Serialize};

use super::{Scorer, ScorerError};

#[derive(Serialize)]
struct ScoreRequest<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct ScoreResponse {
    compound: Option<f64>,
}

/// Fetches compound scores from an external scoring service.
#[derive(Debug, Clone)]
pub struct RemoteScorer {
    url: String,
    http_client: reqwest::Client,
}

impl RemoteScorer {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            http_client: reqwest::Client::new(),
        }
    }
}

impl Scorer for RemoteScorer {
    #[tracing::instrument(skip(self, text), fields(url = %self.url), err)]
    async fn compound(&self, text: &str) -> Result<f64, ScorerError> {
        let unavailable = |e: reqwest::Error| ScorerError::Unavailable(e.to_string());

        let body: ScoreResponse = self
            .http_client
            .post(&self.url)
            .json(&ScoreRequest { text })
            .send()
            .await
            .map_err(unavailable)?
            .error_for_status()
            .map_err(unavailable)?
            .json()
            .await
            .map_err(unavailable)?;

        body.compound.ok_or(ScorerError::MissingCompound)
    }
}
