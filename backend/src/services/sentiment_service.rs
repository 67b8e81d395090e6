use std::time::Duration;

use async_trait::async_trait;
use log::warn;
use reqwest::{Client, Url};
use shared::{SentimentCategory, SentimentRequest, SentimentResponse, SentimentResult};

use super::SentimentAnalyzer;
use super::classifier_service::with_trailing_slash;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SentimentError {
    #[error("Text is empty. Enter some text to analyze.")]
    EmptyText,
    #[error("Unable to determine a sentiment score for this text")]
    NoScore,
    #[error("Sentiment service error: {0}")]
    Service(String),
    #[error("{0}")]
    Other(String),
}

/// Scores text through a remote sentiment endpoint. Scores are expected in
/// [-1, 1] and bucketed with `neutral_band`.
#[derive(Clone, Debug)]
pub struct RemoteSentimentAnalyzer {
    client: Client,
    endpoint: Url,
    neutral_band: f64,
}

impl RemoteSentimentAnalyzer {
    pub fn new(base_url: Url, timeout: Duration, neutral_band: f64) -> Result<Self, SentimentError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SentimentError::Other(format!("HTTP client setup failed: {e}")))?;

        let endpoint = with_trailing_slash(base_url)
            .join("api/sentiment")
            .map_err(|e| SentimentError::Other(format!("Invalid sentiment URL: {e}")))?;

        Ok(Self {
            client,
            endpoint,
            neutral_band,
        })
    }
}

#[async_trait(?Send)]
impl SentimentAnalyzer for RemoteSentimentAnalyzer {
    async fn analyze(&self, text: &str) -> Result<SentimentResult, SentimentError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SentimentError::EmptyText);
        }

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&SentimentRequest {
                text: text.to_string(),
            })
            .send()
            .await
            .map_err(|e| SentimentError::Service(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Sentiment service returned {}: {}", status, body);
            return Err(SentimentError::Service(format!("{status} - {body}")));
        }

        let scored: SentimentResponse = response
            .json()
            .await
            .map_err(|e| SentimentError::Service(format!("Failed to parse response: {e}")))?;

        let score = scored.score.ok_or(SentimentError::NoScore)?;
        Ok(SentimentResult {
            score,
            category: SentimentCategory::from_score(score, self.neutral_band),
        })
    }
}
