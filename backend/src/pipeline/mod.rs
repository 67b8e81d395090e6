pub mod classification_pipeline;
pub mod models;
pub mod sentiment_pipeline;
pub mod text;

pub use classification_pipeline::ClassificationPipeline;
pub use models::{ClassificationState, ImageInfo, SentimentState};
pub use sentiment_pipeline::SentimentPipeline;
