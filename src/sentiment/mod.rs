mod remote;
mod vader;

use std::{fmt, future::Future, str::FromStr};

use serde::{Deserialize, Serialize};

pub use remote::RemoteScorer;
pub use vader::VaderScorer;

pub const POSITIVE_THRESHOLD: f64 = 0.05;
pub const NEGATIVE_THRESHOLD: f64 = -0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    pub const ALL: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Negative, Sentiment::Neutral];

    /// Thresholds a compound score into a label. Both boundaries are inclusive
    /// on the polar side.
    pub fn from_compound(score: f64) -> Self {
        if score >= POSITIVE_THRESHOLD {
            Sentiment::Positive
        } else if score <= NEGATIVE_THRESHOLD {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        use Sentiment::*;
        match self {
            Positive => "Positive",
            Negative => "Negative",
            Neutral => "Neutral",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sentiment label {0:?}")]
pub struct UnknownSentiment(pub String);

impl FromStr for Sentiment {
    type Err = UnknownSentiment;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Sentiment::ALL
            .into_iter()
            .find(|label| label.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownSentiment(s.to_owned()))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ScorerError {
    #[error("scorer unavailable: {0}")]
    Unavailable(String),
    #[error("scorer returned no compound score")]
    MissingCompound,
    #[error("compound score {0} outside [-1, 1]")]
    OutOfRange(f64),
}

/// Black-box polarity scorer producing a compound score in [-1, 1].
pub trait Scorer: Send + Sync {
    fn compound(&self, text: &str) -> impl Future<Output = Result<f64, ScorerError>> + Send;
}

/// The scorer picked at startup from configuration.
#[derive(Debug, Clone)]
pub enum PolarityScorer {
    Vader(VaderScorer),
    Remote(RemoteScorer),
}

impl Scorer for PolarityScorer {
    async fn compound(&self, text: &str) -> Result<f64, ScorerError> {
        match self {
            PolarityScorer::Vader(scorer) => scorer.compound(text).await,
            PolarityScorer::Remote(scorer) => scorer.compound(text).await,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Classifier<S> {
    scorer: S,
}

impl<S: Scorer> Classifier<S> {
    pub fn new(scorer: S) -> Self {
        Self { scorer }
    }

    pub fn scorer(&self) -> &S {
        &self.scorer
    }

    pub async fn classify(&self, message: &str) -> Result<Sentiment, ScorerError> {
        let score = self.scorer.compound(message).await?;
        if !score.is_finite() || !(-1.0..=1.0).contains(&score) {
            return Err(ScorerError::OutOfRange(score));
        }

        let sentiment = Sentiment::from_compound(score);
        tracing::debug!(score, %sentiment, "classified feedback");
        Ok(sentiment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(f64);

    impl Scorer for Fixed {
        async fn compound(&self, _text: &str) -> Result<f64, ScorerError> {
            Ok(self.0)
        }
    }

    struct Down;

    impl Scorer for Down {
        async fn compound(&self, _text: &str) -> Result<f64, ScorerError> {
            Err(ScorerError::Unavailable("connection refused".to_owned()))
        }
    }

    #[test]
    fn thresholds_are_exact() {
        assert_eq!(Sentiment::from_compound(0.05), Sentiment::Positive);
        assert_eq!(Sentiment::from_compound(-0.05), Sentiment::Negative);
        assert_eq!(Sentiment::from_compound(0.0), Sentiment::Neutral);
        assert_eq!(Sentiment::from_compound(0.049), Sentiment::Neutral);
        assert_eq!(Sentiment::from_compound(-0.049), Sentiment::Neutral);
        assert_eq!(Sentiment::from_compound(1.0), Sentiment::Positive);
        assert_eq!(Sentiment::from_compound(-1.0), Sentiment::Negative);
    }

    #[test]
    fn parses_labels() {
        assert_eq!("Positive".parse::<Sentiment>(), Ok(Sentiment::Positive));
        assert_eq!("negative".parse::<Sentiment>(), Ok(Sentiment::Negative));
        assert_eq!(" Neutral ".parse::<Sentiment>(), Ok(Sentiment::Neutral));
        assert!("All".parse::<Sentiment>().is_err());
        assert!("Postive".parse::<Sentiment>().is_err());
    }

    #[test]
    fn serializes_as_label() {
        assert_eq!(serde_json::to_string(&Sentiment::Negative).unwrap(), "\"Negative\"");
    }

    #[tokio::test]
    async fn classifier_applies_thresholds() {
        assert_eq!(Classifier::new(Fixed(0.3)).classify("x").await.unwrap(), Sentiment::Positive);
        assert_eq!(Classifier::new(Fixed(-0.3)).classify("x").await.unwrap(), Sentiment::Negative);
        assert_eq!(Classifier::new(Fixed(0.01)).classify("x").await.unwrap(), Sentiment::Neutral);
    }

    #[tokio::test]
    async fn classifier_rejects_bad_scores() {
        assert!(matches!(
            Classifier::new(Fixed(1.5)).classify("x").await,
            Err(ScorerError::OutOfRange(_))
        ));
        assert!(matches!(
            Classifier::new(Fixed(f64::NAN)).classify("x").await,
            Err(ScorerError::OutOfRange(_))
        ));
    }

    #[tokio::test]
    async fn classifier_propagates_scorer_failure() {
        assert!(matches!(
            Classifier::new(Down).classify("x").await,
            Err(ScorerError::Unavailable(_))
        ));
    }
}
