use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// Body sent to the remote image classifier.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct InferenceRequest {
    pub image_data: String,
}

/// Raw class scores returned by the remote image classifier.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct InferenceResponse {
    pub predictions: Vec<f32>,
    pub class_labels: Vec<String>,
}

impl InferenceResponse {
    /// Picks the highest scoring class. `None` when there is nothing to pick
    /// from or no label exists for the winning index.
    pub fn top_class(&self) -> Option<ClassificationResult> {
        let (index, confidence) = self
            .predictions
            .iter()
            .copied()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))?;

        let label = self.class_labels.get(index)?;
        Some(ClassificationResult {
            label: label.clone(),
            confidence: f64::from(confidence).clamp(0.0, 1.0),
        })
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ClassificationResult {
    pub label: String,
    pub confidence: f64,
}

#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
pub enum SentimentCategory {
    #[strum(serialize = "Positive")]
    Positive,
    #[strum(serialize = "Neutral")]
    Neutral,
    #[strum(serialize = "Negative")]
    Negative,
}

impl SentimentCategory {
    pub fn display_name(&self) -> String {
        self.to_string()
    }

    /// Buckets a score in [-1, 1]. Anything within `neutral_band` of zero
    /// (inclusive) is neutral.
    pub fn from_score(score: f64, neutral_band: f64) -> Self {
        if score > neutral_band {
            SentimentCategory::Positive
        } else if score < -neutral_band {
            SentimentCategory::Negative
        } else {
            SentimentCategory::Neutral
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct SentimentResult {
    pub score: f64,
    pub category: SentimentCategory,
}

/// Body sent to the remote sentiment analyzer.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SentimentRequest {
    pub text: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SentimentResponse {
    pub score: Option<f64>,
}
