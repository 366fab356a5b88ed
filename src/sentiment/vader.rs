use vader_sentiment::SentimentIntensityAnalyzer;

use super::{Scorer, ScorerError};

/// Lexicon-based VADER scorer bundled with the service.
#[derive(Debug, Clone, Copy, Default)]
pub struct VaderScorer;

impl VaderScorer {
    /// Text without polar words scores 0.0, whatever its "!" or "?" emphasis.
    pub fn score(text: &str) -> Result<f64, ScorerError> {
        let analyzer = SentimentIntensityAnalyzer::new();
        let scores = analyzer.polarity_scores(text);

        let polar = |key: &str| scores.get(key).copied().unwrap_or_default();
        if polar("pos") == 0.0 && polar("neg") == 0.0 {
            return Ok(0.0);
        }

        scores.get("compound").copied().ok_or(ScorerError::MissingCompound)
    }
}

impl Scorer for VaderScorer {
    async fn compound(&self, text: &str) -> Result<f64, ScorerError> {
        Self::score(text)
    }
}

#[cfg(test)]
mod tests {
    use crate::sentiment::{Classifier, Sentiment};

    use super::*;

    #[tokio::test]
    async fn scores_obvious_polarity() {
        let classifier = Classifier::new(VaderScorer);
        assert_eq!(
            classifier.classify("I love this product, it is great!").await.unwrap(),
            Sentiment::Positive
        );
        assert_eq!(
            classifier.classify("This is terrible and I hate it.").await.unwrap(),
            Sentiment::Negative
        );
        assert_eq!(
            classifier.classify("The package arrived on Tuesday.").await.unwrap(),
            Sentiment::Neutral
        );
    }

    #[tokio::test]
    async fn emphasis_alone_stays_neutral() {
        assert_eq!(VaderScorer::score("The package arrived on Tuesday!").unwrap(), 0.0);
        assert_eq!(VaderScorer::score("Where is my order?").unwrap(), 0.0);
        assert_eq!(VaderScorer::score("!!!").unwrap(), 0.0);

        let classifier = Classifier::new(VaderScorer);
        assert_eq!(
            classifier.classify("The package arrived on Tuesday!").await.unwrap(),
            Sentiment::Neutral
        );
        assert_eq!(
            classifier.classify("I love it!").await.unwrap(),
            Sentiment::Positive
        );
    }

    #[test]
    fn compound_stays_in_range() {
        let score = VaderScorer::score("AMAZING!!! best best best ever :)").unwrap();
        assert!((-1.0..=1.0).contains(&score));
    }
}
