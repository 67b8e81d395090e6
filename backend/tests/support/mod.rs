#![allow(dead_code)]

use std::io::Cursor;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use image::{ImageFormat, Rgb, RgbImage};
use liquidvision::services::{
    ClassificationError, ImageClassifier, ImageData, SentimentAnalyzer, SentimentError,
};
use shared::{ClassificationResult, SentimentCategory, SentimentResult};
use tokio::sync::watch;

pub struct MockClassifier {
    result: Result<ClassificationResult, ClassificationError>,
    calls: AtomicUsize,
}

impl MockClassifier {
    pub fn succeeding(label: &str, confidence: f64) -> Self {
        Self::with_result(Ok(ClassificationResult {
            label: label.to_string(),
            confidence,
        }))
    }

    pub fn failing(error: ClassificationError) -> Self {
        Self::with_result(Err(error))
    }

    fn with_result(result: Result<ClassificationResult, ClassificationError>) -> Self {
        Self {
            result,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait(?Send)]
impl ImageClassifier for MockClassifier {
    async fn classify(&self, _image: &ImageData) -> Result<ClassificationResult, ClassificationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone()
    }
}

pub struct MockSentimentAnalyzer {
    result: Result<SentimentResult, SentimentError>,
    received: Mutex<Vec<String>>,
}

impl MockSentimentAnalyzer {
    pub fn succeeding(score: f64, category: SentimentCategory) -> Self {
        Self::with_result(Ok(SentimentResult { score, category }))
    }

    pub fn failing(error: SentimentError) -> Self {
        Self::with_result(Err(error))
    }

    fn with_result(result: Result<SentimentResult, SentimentError>) -> Self {
        Self {
            result,
            received: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.received.lock().unwrap().len()
    }

    pub fn received_texts(&self) -> Vec<String> {
        self.received.lock().unwrap().clone()
    }
}

#[async_trait(?Send)]
impl SentimentAnalyzer for MockSentimentAnalyzer {
    async fn analyze(&self, text: &str) -> Result<SentimentResult, SentimentError> {
        self.received.lock().unwrap().push(text.to_string());
        self.result.clone()
    }
}

pub fn solid_color_png() -> Vec<u8> {
    let img = RgbImage::from_pixel(8, 8, Rgb([255, 99, 71]));
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .unwrap();
    buf
}

pub fn solid_color_image() -> ImageData {
    ImageData::new(solid_color_png())
}

/// Waits until the published state satisfies `done`, failing the test after
/// two seconds.
pub async fn wait_for_state<T, F>(rx: &mut watch::Receiver<T>, done: F) -> T
where
    T: Clone,
    F: FnMut(&T) -> bool,
{
    let state = tokio::time::timeout(Duration::from_secs(2), rx.wait_for(done))
        .await
        .expect("timed out waiting for pipeline state")
        .expect("pipeline state channel closed");
    (*state).clone()
}
