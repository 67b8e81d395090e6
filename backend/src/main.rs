use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, web};
use liquidvision::config::AppConfig;
use liquidvision::pipeline::{ClassificationPipeline, SentimentPipeline};
use liquidvision::routes::{UploadLimit, configure_routes};
use liquidvision::services::{
    ImageClassifier, RemoteImageClassifier, RemoteSentimentAnalyzer, SentimentAnalyzer,
};

fn startup_error(context: &str, e: impl std::fmt::Display) -> std::io::Error {
    log::error!("{}: {}", context, e);
    std::io::Error::other(format!("{context}: {e}"))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = AppConfig::load().map_err(|e| startup_error("Invalid configuration", e))?;

    let classifier_url = config
        .classifier
        .url()
        .map_err(|e| startup_error("Invalid configuration", e))?;
    let sentiment_url = config
        .sentiment
        .url()
        .map_err(|e| startup_error("Invalid configuration", e))?;

    let classifier: Arc<dyn ImageClassifier> = Arc::new(
        RemoteImageClassifier::new(classifier_url.clone(), config.classifier.timeout())
            .map_err(|e| startup_error("Classifier setup failed", e))?,
    );
    let analyzer: Arc<dyn SentimentAnalyzer> = Arc::new(
        RemoteSentimentAnalyzer::new(
            sentiment_url.clone(),
            config.sentiment.timeout(),
            config.sentiment.neutral_band,
        )
        .map_err(|e| startup_error("Sentiment analyzer setup failed", e))?,
    );

    log::info!("Classifier endpoint: {}", classifier_url);
    log::info!("Sentiment endpoint: {}", sentiment_url);

    let classification = ClassificationPipeline::new(classifier, analyzer.clone());
    let sentiment = SentimentPipeline::new(analyzer);
    let upload_limit = UploadLimit(config.server.max_upload_bytes);

    let bind_address = config.bind_address();
    log::info!("Starting server on {}", bind_address);

    // One worker: both pipelines publish state from a single thread.
    HttpServer::new(move || {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allowed_methods(vec!["GET", "POST", "OPTIONS"])
                    .allowed_headers(vec![
                        actix_web::http::header::ACCEPT,
                        actix_web::http::header::CONTENT_TYPE,
                    ])
                    .max_age(3600),
            )
            .app_data(web::Data::new(classification.clone()))
            .app_data(web::Data::new(sentiment.clone()))
            .app_data(web::Data::new(upload_limit))
            .configure(configure_routes)
    })
    .workers(1)
    .bind(&bind_address)?
    .run()
    .await
}
