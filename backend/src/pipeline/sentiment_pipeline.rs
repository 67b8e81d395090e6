use std::sync::Arc;

use log::{info, warn};
use tokio::sync::watch;
use uuid::Uuid;

use super::models::{ANALYZING_SENTIMENT_LABEL, SentimentState};
use crate::services::{SentimentAnalyzer, SentimentError};

/// Analyzes free-form text. Same threading rules as
/// [`ClassificationPipeline`](super::ClassificationPipeline).
#[derive(Clone)]
pub struct SentimentPipeline {
    analyzer: Arc<dyn SentimentAnalyzer>,
    state: Arc<watch::Sender<SentimentState>>,
}

impl SentimentPipeline {
    pub fn new(analyzer: Arc<dyn SentimentAnalyzer>) -> Self {
        let (state, _) = watch::channel(SentimentState::default());
        Self {
            analyzer,
            state: Arc::new(state),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SentimentState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> SentimentState {
        self.state.borrow().clone()
    }

    pub fn has_result(&self) -> bool {
        self.state.borrow().has_result()
    }

    pub fn analyze(&self, text: &str) {
        let trimmed = text.trim().to_string();

        if trimmed.is_empty() {
            self.state.send_modify(|state| {
                state.input_text = text.to_string();
                state.is_analyzing = false;
                state.error_message = Some(SentimentError::EmptyText.to_string());
                state.reset_result();
            });
            return;
        }

        let request_id = Uuid::new_v4();
        info!("Sentiment request {} ({} chars)", request_id, trimmed.chars().count());

        self.state.send_modify(|state| {
            state.request_id = Some(request_id);
            state.input_text = text.to_string();
            state.is_analyzing = true;
            state.error_message = None;
            state.sentiment_label = ANALYZING_SENTIMENT_LABEL.to_string();
        });

        let analyzer = self.analyzer.clone();
        let state = self.state.clone();
        actix_web::rt::spawn(async move {
            let outcome = analyzer.analyze(&trimmed).await;
            state.send_modify(|state| {
                match &outcome {
                    Ok(result) => {
                        state.sentiment_label = result.category.display_name();
                        state.sentiment_score = result.score;
                        state.error_message = None;
                    }
                    Err(e) => {
                        state.reset_result();
                        state.error_message = Some(e.to_string());
                    }
                }
                state.is_analyzing = false;
            });

            if let Err(e) = outcome {
                warn!("Sentiment request {} failed: {}", request_id, e);
            }
        });
    }
}
