//! HTTP surface: the transaction form and its JSON API

pub mod error;
pub mod handlers;
pub mod render;

use crate::assembler::Predictor;
use crate::config::FormConfig;
use crate::metrics::PredictionMetrics;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub use error::{ApiError, ApiResult};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub predictor: Predictor,
    pub metrics: Arc<PredictionMetrics>,
    pub form: FormConfig,
}

impl AppState {
    pub fn new(predictor: Predictor, metrics: Arc<PredictionMetrics>, form: FormConfig) -> Self {
        Self {
            predictor,
            metrics,
            form,
        }
    }
}

/// Create the router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/predict", post(handlers::predict_form))
        .route("/api/predict", post(handlers::predict_json))
        .route("/api/fields", get(handlers::fields))
        .route("/api/stats", get(handlers::stats))
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
