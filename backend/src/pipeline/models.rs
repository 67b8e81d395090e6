use serde::Serialize;
use uuid::Uuid;

use crate::services::ImageData;

pub const DEFAULT_PREDICTION: &str = "Tap below to get started";
pub const LOAD_IMAGE_ERROR: &str = "Unable to load image.";

pub const DEFAULT_SENTIMENT_LABEL: &str = "Enter text and tap Analyze";
pub const ANALYZING_SENTIMENT_LABEL: &str = "Analyzing...";

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ImageInfo {
    pub format: Option<String>,
    pub width: u32,
    pub height: u32,
    pub byte_len: usize,
}

impl ImageInfo {
    /// `None` when the bytes cannot be read as an image header.
    pub fn probe(image: &ImageData) -> Option<Self> {
        let (width, height) = image.dimensions().ok()?;
        Some(Self {
            format: image.format().map(|f| format!("{f:?}").to_lowercase()),
            width,
            height,
            byte_len: image.len(),
        })
    }
}

/// Published state of the classify-then-analyze flow.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ClassificationState {
    pub request_id: Option<Uuid>,
    pub selected_image: Option<ImageInfo>,
    pub prediction: String,
    pub confidence: f64,
    pub is_loading: bool,
    pub error_message: Option<String>,

    pub prediction_sentiment_label: String,
    pub prediction_sentiment_score: f64,
    pub is_analyzing_sentiment: bool,
    pub prediction_sentiment_error_message: Option<String>,
}

impl Default for ClassificationState {
    fn default() -> Self {
        Self {
            request_id: None,
            selected_image: None,
            prediction: DEFAULT_PREDICTION.to_string(),
            confidence: 0.0,
            is_loading: false,
            error_message: None,
            prediction_sentiment_label: String::new(),
            prediction_sentiment_score: 0.0,
            is_analyzing_sentiment: false,
            prediction_sentiment_error_message: None,
        }
    }
}

impl ClassificationState {
    /// Clears the sentiment phase and marks it pending.
    pub(crate) fn reset_sentiment(&mut self) {
        self.prediction_sentiment_label.clear();
        self.prediction_sentiment_score = 0.0;
        self.prediction_sentiment_error_message = None;
        self.is_analyzing_sentiment = true;
    }

    pub fn is_idle(&self) -> bool {
        !self.is_loading && !self.is_analyzing_sentiment
    }
}

/// Published state of the free-form text flow.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SentimentState {
    pub request_id: Option<Uuid>,
    pub input_text: String,
    pub sentiment_label: String,
    pub sentiment_score: f64,
    pub is_analyzing: bool,
    pub error_message: Option<String>,
}

impl Default for SentimentState {
    fn default() -> Self {
        Self {
            request_id: None,
            input_text: String::new(),
            sentiment_label: DEFAULT_SENTIMENT_LABEL.to_string(),
            sentiment_score: 0.0,
            is_analyzing: false,
            error_message: None,
        }
    }
}

impl SentimentState {
    pub fn has_result(&self) -> bool {
        self.sentiment_label != DEFAULT_SENTIMENT_LABEL
            && self.sentiment_label != ANALYZING_SENTIMENT_LABEL
    }

    pub(crate) fn reset_result(&mut self) {
        self.sentiment_label = DEFAULT_SENTIMENT_LABEL.to_string();
        self.sentiment_score = 0.0;
    }
}
