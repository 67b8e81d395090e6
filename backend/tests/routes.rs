mod support;

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::http::header::ContentType;
use actix_web::{App, test, web};
use liquidvision::pipeline::{ClassificationPipeline, SentimentPipeline};
use liquidvision::routes::{UploadLimit, configure_routes};
use serde_json::Value;
use shared::SentimentCategory;
use support::{MockClassifier, MockSentimentAnalyzer, solid_color_png, wait_for_state};

const BOUNDARY: &str = "liquidvision-test-boundary";

fn multipart_body(bytes: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        b"Content-Disposition: form-data; name=\"image\"; filename=\"photo.png\"\r\n",
    );
    body.extend_from_slice(b"Content-Type: image/png\r\n\r\n");
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn pipelines() -> (
    Arc<MockClassifier>,
    Arc<MockSentimentAnalyzer>,
    ClassificationPipeline,
    SentimentPipeline,
) {
    let classifier = Arc::new(MockClassifier::succeeding("happy dog", 0.92));
    let analyzer = Arc::new(MockSentimentAnalyzer::succeeding(0.8, SentimentCategory::Positive));
    let classification = ClassificationPipeline::new(classifier.clone(), analyzer.clone());
    let sentiment = SentimentPipeline::new(analyzer.clone());
    (classifier, analyzer, classification, sentiment)
}

#[actix_web::test]
async fn health_reports_ok() {
    let (_, _, classification, sentiment) = pipelines();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(classification))
            .app_data(web::Data::new(sentiment))
            .app_data(web::Data::new(UploadLimit(1024)))
            .configure(configure_routes),
    )
    .await;

    let body: Value =
        test::call_and_read_body_json(&app, test::TestRequest::get().uri("/health").to_request())
            .await;
    assert_eq!(body["status"], "ok");
}

#[actix_web::test]
async fn upload_starts_classification() {
    let (classifier, _, classification, sentiment) = pipelines();
    let mut rx = classification.subscribe();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(classification.clone()))
            .app_data(web::Data::new(sentiment))
            .app_data(web::Data::new(UploadLimit(1024 * 1024)))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/classification")
        .insert_header((
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        ))
        .set_payload(multipart_body(&solid_color_png()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::ACCEPTED);

    let accepted: Value = test::read_body_json(resp).await;
    assert_eq!(accepted["is_loading"], true);

    let state = wait_for_state(&mut rx, |s| s.is_idle()).await;
    assert_eq!(state.prediction, "Happy Dog");
    assert_eq!(classifier.call_count(), 1);

    let body: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/api/classification").to_request(),
    )
    .await;
    assert_eq!(body["prediction"], "Happy Dog");
    assert_eq!(body["prediction_sentiment_label"], "Positive");
}

#[actix_web::test]
async fn oversized_upload_is_rejected() {
    let (classifier, _, classification, sentiment) = pipelines();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(classification.clone()))
            .app_data(web::Data::new(sentiment))
            .app_data(web::Data::new(UploadLimit(16)))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/classification")
        .insert_header((
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        ))
        .set_payload(multipart_body(&solid_color_png()))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(classifier.call_count(), 0);
    assert!(!classification.snapshot().is_loading);
}

#[actix_web::test]
async fn text_analysis_round_trip() {
    let (_, analyzer, classification, sentiment) = pipelines();
    let mut rx = sentiment.subscribe();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(classification))
            .app_data(web::Data::new(sentiment.clone()))
            .app_data(web::Data::new(UploadLimit(1024)))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/sentiment")
        .insert_header(ContentType::json())
        .set_payload(r#"{"text":"  What a lovely day  "}"#)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::ACCEPTED);

    wait_for_state(&mut rx, |s| !s.is_analyzing).await;
    assert_eq!(analyzer.received_texts(), vec!["What a lovely day".to_string()]);

    let body: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/api/sentiment").to_request(),
    )
    .await;
    assert_eq!(body["sentiment_label"], "Positive");
    assert_eq!(body["has_result"], true);
}

#[actix_web::test]
async fn blank_text_reports_error_immediately() {
    let (_, analyzer, classification, sentiment) = pipelines();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(classification))
            .app_data(web::Data::new(sentiment))
            .app_data(web::Data::new(UploadLimit(1024)))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/sentiment")
        .insert_header(ContentType::json())
        .set_payload(r#"{"text":"   "}"#)
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["has_result"], false);
    assert_eq!(body["is_analyzing"], false);
    assert!(body["error_message"].is_string());
    assert_eq!(analyzer.call_count(), 0);
}
