use std::sync::Arc;

use log::{debug, info, warn};
use tokio::sync::watch;
use uuid::Uuid;

use super::models::{ClassificationState, DEFAULT_PREDICTION, ImageInfo, LOAD_IMAGE_ERROR};
use super::text::capitalize_words;
use crate::services::{ImageClassifier, ImageData, SentimentAnalyzer, SentimentError};

/// Classifies an image, then runs sentiment analysis on the predicted label.
///
/// Every submission runs as a local task on the current thread (see
/// `actix_web::rt::spawn`), so the entry points must be called from inside
/// an actix system or a tokio `LocalSet`. Completed phases overwrite the
/// state in whatever order the services answer; a slow response from an
/// earlier submission can still land after a newer one.
#[derive(Clone)]
pub struct ClassificationPipeline {
    classifier: Arc<dyn ImageClassifier>,
    sentiment: Arc<dyn SentimentAnalyzer>,
    state: Arc<watch::Sender<ClassificationState>>,
}

impl ClassificationPipeline {
    pub fn new(classifier: Arc<dyn ImageClassifier>, sentiment: Arc<dyn SentimentAnalyzer>) -> Self {
        let (state, _) = watch::channel(ClassificationState::default());
        Self {
            classifier,
            sentiment,
            state: Arc::new(state),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ClassificationState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> ClassificationState {
        self.state.borrow().clone()
    }

    /// Loads raw bytes coming from a photo picker. Bytes that do not carry a
    /// readable image header are reported without calling the classifier.
    pub fn process_picked_bytes(&self, bytes: Vec<u8>) {
        let image = ImageData::new(bytes);
        match ImageInfo::probe(&image) {
            Some(info) => {
                self.state.send_modify(|state| state.selected_image = Some(info));
                self.submit_image(image);
            }
            None => {
                warn!("Picked item is not a readable image ({} bytes)", image.len());
                self.state
                    .send_modify(|state| state.error_message = Some(LOAD_IMAGE_ERROR.to_string()));
            }
        }
    }

    /// Records a camera capture as the selected image and classifies it.
    pub fn handle_captured_image(&self, image: ImageData) {
        let info = ImageInfo::probe(&image);
        self.state.send_modify(|state| state.selected_image = info);
        self.submit_image(image);
    }

    /// Starts a classify-then-analyze run. Returns immediately; progress is
    /// published through [`subscribe`](Self::subscribe).
    pub fn submit_image(&self, image: ImageData) {
        let request_id = Uuid::new_v4();
        info!("Classification request {} ({} bytes)", request_id, image.len());

        self.state.send_modify(|state| {
            state.request_id = Some(request_id);
            state.is_loading = true;
            state.error_message = None;
            state.reset_sentiment();
        });

        let pipeline = self.clone();
        actix_web::rt::spawn(async move {
            pipeline.run(request_id, image).await;
        });
    }

    async fn run(&self, request_id: Uuid, image: ImageData) {
        let result = match self.classifier.classify(&image).await {
            Ok(result) => result,
            Err(e) => {
                warn!("Classification request {} failed: {}", request_id, e);
                self.state.send_modify(|state| {
                    state.prediction = DEFAULT_PREDICTION.to_string();
                    state.confidence = 0.0;
                    state.is_loading = false;
                    state.is_analyzing_sentiment = false;
                    state.error_message = Some(e.to_string());
                });
                return;
            }
        };

        let prediction = capitalize_words(&result.label);
        debug!(
            "Classification request {} predicted {:?} ({:.3})",
            request_id, prediction, result.confidence
        );
        self.state.send_modify(|state| {
            state.prediction = prediction.clone();
            state.confidence = result.confidence;
            state.is_loading = false;
        });

        self.analyze_prediction_sentiment(request_id, &prediction).await;
    }

    async fn analyze_prediction_sentiment(&self, request_id: Uuid, prediction: &str) {
        let trimmed = prediction.trim();
        if trimmed.is_empty() {
            warn!("Classification request {} produced a blank label", request_id);
            self.state.send_modify(|state| {
                state.prediction_sentiment_error_message = Some(SentimentError::EmptyText.to_string());
                state.is_analyzing_sentiment = false;
            });
            return;
        }

        let outcome = self.sentiment.analyze(trimmed).await;
        self.state.send_modify(|state| {
            match &outcome {
                Ok(sentiment) => {
                    state.prediction_sentiment_label = sentiment.category.display_name();
                    state.prediction_sentiment_score = sentiment.score;
                    state.prediction_sentiment_error_message = None;
                }
                Err(e) => {
                    state.prediction_sentiment_label.clear();
                    state.prediction_sentiment_score = 0.0;
                    state.prediction_sentiment_error_message = Some(e.to_string());
                }
            }
            state.is_analyzing_sentiment = false;
        });

        match outcome {
            Ok(sentiment) => info!(
                "Classification request {} sentiment {} ({:.3})",
                request_id, sentiment.category, sentiment.score
            ),
            Err(e) => warn!("Sentiment for request {} failed: {}", request_id, e),
        }
    }
}
