use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use log::{debug, warn};
use reqwest::{Client, Url};
use shared::{ClassificationResult, InferenceRequest, InferenceResponse};

use super::{ImageClassifier, ImageData};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClassificationError {
    #[error("No classification result was produced for this image")]
    NoResult,
    #[error("Unrecognized image format")]
    UnrecognizedFormat,
    #[error("Classifier service error: {0}")]
    Service(String),
    #[error("{0}")]
    Other(String),
}

/// Classifies images by posting them to a remote inference endpoint.
#[derive(Clone, Debug)]
pub struct RemoteImageClassifier {
    client: Client,
    endpoint: Url,
}

impl RemoteImageClassifier {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, ClassificationError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClassificationError::Other(format!("HTTP client setup failed: {e}")))?;

        let endpoint = with_trailing_slash(base_url)
            .join("api/inference")
            .map_err(|e| ClassificationError::Other(format!("Invalid classifier URL: {e}")))?;

        Ok(Self { client, endpoint })
    }
}

#[async_trait(?Send)]
impl ImageClassifier for RemoteImageClassifier {
    async fn classify(&self, image: &ImageData) -> Result<ClassificationResult, ClassificationError> {
        let format = image.format().ok_or(ClassificationError::UnrecognizedFormat)?;
        debug!("Classifying {:?} image ({} bytes)", format, image.len());

        let body = InferenceRequest {
            image_data: BASE64.encode(image.bytes()),
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&body)
            .send()
            .await
            .map_err(|e| ClassificationError::Service(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Classifier returned {}: {}", status, body);
            return Err(ClassificationError::Service(format!("{status} - {body}")));
        }

        let inference: InferenceResponse = response
            .json()
            .await
            .map_err(|e| ClassificationError::Service(format!("Failed to parse response: {e}")))?;

        inference.top_class().ok_or(ClassificationError::NoResult)
    }
}

/// `Url::join` replaces the last path segment unless the base ends in '/'.
pub(crate) fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
