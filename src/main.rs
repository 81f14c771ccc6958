//! Credit Card Fraud Verdict - Main Entry Point
//!
//! Loads the classifier once, then serves the transaction form until
//! interrupted.

use anyhow::{Context, Result};
use card_fraud_verdict::{
    config::{AppConfig, LoggingConfig},
    metrics::{MetricsReporter, PredictionMetrics},
    models::inference::OnnxClassifier,
    web::{create_router, AppState},
    Predictor,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load()?;

    init_logging(&config.logging)?;
    info!("Starting Credit Card Fraud Verdict service");
    info!(
        model = %config.model.path.display(),
        decision_threshold = config.model.decision_threshold,
        max_amount = config.form.max_amount,
        "Configuration loaded successfully"
    );

    // A missing or unreadable artifact aborts startup; there is no degraded mode
    let classifier = OnnxClassifier::load(&config.model)
        .context("Classifier unavailable, refusing to start")?;
    let predictor = Predictor::new(Arc::new(classifier));
    info!(classifier = %predictor.classifier_name(), "Predictor initialized");

    let metrics = Arc::new(PredictionMetrics::new());
    if config.metrics.report_interval_secs > 0 {
        let reporter = MetricsReporter::new(metrics.clone(), config.metrics.report_interval_secs);
        tokio::spawn(reporter.start());
    }

    let state = AppState::new(predictor, metrics.clone(), config.form.clone());
    let app = create_router(state);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Serving fraud verdict form on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Service shutting down...");
    metrics.print_summary();

    Ok(())
}

fn init_logging(logging: &LoggingConfig) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(format!(
            "card_fraud_verdict={level},tower_http={level}",
            level = logging.level
        ))
        .context("Invalid logging.level")?,
    };

    if logging.format == "json" {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
