pub mod classifier_service;
pub mod sentiment_service;

use std::io::Cursor;

use async_trait::async_trait;
use image::{ImageFormat, ImageReader, ImageResult};
use shared::{ClassificationResult, SentimentResult};

pub use classifier_service::{ClassificationError, RemoteImageClassifier};
pub use sentiment_service::{RemoteSentimentAnalyzer, SentimentError};

/// Encoded image bytes as received from a picker, a camera or an upload.
#[derive(Clone, Debug)]
pub struct ImageData {
    bytes: Vec<u8>,
}

impl ImageData {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Sniffs the container format from the magic bytes.
    pub fn format(&self) -> Option<ImageFormat> {
        image::guess_format(&self.bytes).ok()
    }

    /// Reads the width and height from the image header without decoding
    /// the pixel data.
    pub fn dimensions(&self) -> ImageResult<(u32, u32)> {
        ImageReader::new(Cursor::new(&self.bytes))
            .with_guessed_format()?
            .into_dimensions()
    }
}

impl From<Vec<u8>> for ImageData {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

/// Maps an image to its most likely label.
#[async_trait(?Send)]
pub trait ImageClassifier: Send + Sync {
    async fn classify(&self, image: &ImageData) -> Result<ClassificationResult, ClassificationError>;
}

/// Scores the sentiment of a piece of text.
#[async_trait(?Send)]
pub trait SentimentAnalyzer: Send + Sync {
    async fn analyze(&self, text: &str) -> Result<SentimentResult, SentimentError>;
}
