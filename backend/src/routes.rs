use actix_multipart::Multipart;
use actix_web::{Error, HttpResponse, web};
use futures::{StreamExt, TryStreamExt};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::pipeline::{ClassificationPipeline, SentimentPipeline, SentimentState};

/// Upper bound for a single uploaded image, in bytes.
#[derive(Clone, Copy, Debug)]
pub struct UploadLimit(pub usize);

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Deserialize)]
pub struct AnalyzeTextRequest {
    pub text: String,
}

#[derive(Serialize)]
struct SentimentView<'a> {
    #[serde(flatten)]
    state: &'a SentimentState,
    has_result: bool,
}

impl<'a> SentimentView<'a> {
    fn new(state: &'a SentimentState) -> Self {
        Self {
            state,
            has_result: state.has_result(),
        }
    }
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/health").route(web::get().to(health)))
        .service(
            web::resource("/api/classification")
                .route(web::get().to(get_classification))
                .route(web::post().to(submit_classification)),
        )
        .service(
            web::resource("/api/sentiment")
                .route(web::get().to(get_sentiment))
                .route(web::post().to(submit_sentiment)),
        );
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

async fn get_classification(pipeline: web::Data<ClassificationPipeline>) -> HttpResponse {
    HttpResponse::Ok().json(pipeline.snapshot())
}

async fn submit_classification(
    pipeline: web::Data<ClassificationPipeline>,
    limit: web::Data<UploadLimit>,
    mut payload: Multipart,
) -> Result<HttpResponse, Error> {
    let mut image_data = Vec::new();

    while let Ok(Some(mut field)) = payload.try_next().await {
        while let Some(chunk) = field.next().await {
            let data = chunk?;
            if image_data.len() + data.len() > limit.0 {
                warn!("Rejected upload larger than {} bytes", limit.0);
                return Ok(HttpResponse::PayloadTooLarge().json(ErrorResponse {
                    error: format!("Image exceeds the {} byte limit", limit.0),
                }));
            }
            image_data.extend_from_slice(&data);
        }
        if !image_data.is_empty() {
            break;
        }
    }

    if image_data.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ErrorResponse {
            error: "No image in request".into(),
        }));
    }

    info!("Received image upload ({} bytes)", image_data.len());
    pipeline.process_picked_bytes(image_data);
    Ok(HttpResponse::Accepted().json(pipeline.snapshot()))
}

async fn get_sentiment(pipeline: web::Data<SentimentPipeline>) -> HttpResponse {
    let state = pipeline.snapshot();
    HttpResponse::Ok().json(SentimentView::new(&state))
}

async fn submit_sentiment(
    pipeline: web::Data<SentimentPipeline>,
    body: web::Json<AnalyzeTextRequest>,
) -> HttpResponse {
    pipeline.analyze(&body.text);
    let state = pipeline.snapshot();
    HttpResponse::Accepted().json(SentimentView::new(&state))
}
