//! End-to-end tests for the HTTP surface with a stub classifier

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use card_fraud_verdict::{
    config::AppConfig,
    metrics::PredictionMetrics,
    types::FeatureSlot,
    web::{create_router, AppState},
    Classifier, FeatureVector, PredictResult, Predictor, Verdict,
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

/// Flags any amount above 10k as fraud.
struct AmountThresholdStub;

impl Classifier for AmountThresholdStub {
    fn name(&self) -> &str {
        "amount-threshold-stub"
    }

    fn predict(&self, features: &FeatureVector) -> PredictResult<Verdict> {
        if features.get(FeatureSlot::AMOUNT) > 10_000.0 {
            Ok(Verdict::Fraudulent)
        } else {
            Ok(Verdict::Legitimate)
        }
    }
}

fn app() -> (Router, Arc<PredictionMetrics>) {
    let metrics = Arc::new(PredictionMetrics::new());
    let state = AppState::new(
        Predictor::new(Arc::new(AmountThresholdStub)),
        metrics.clone(),
        AppConfig::default().form,
    );
    (create_router(state), metrics)
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn form_post(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/predict")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn json_post(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/predict")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_index_renders_form() {
    let (app, _) = app();
    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Credit Card Fraud Detection System"));
    assert!(html.contains("Transaction Velocity (V14)"));
    assert!(html.contains("name=\"account_age\""));
    assert!(html.contains("value=\"100.0\""));
    assert!(!html.contains(Verdict::Fraudulent.message()));
    assert!(!html.contains(Verdict::Legitimate.message()));
}

#[tokio::test]
async fn test_form_renders_fraudulent_verdict() {
    let (app, metrics) = app();
    let response = app
        .oneshot(form_post(
            "amount=15000&velocity=High&deviation=Medium&frequency=Rare&account_age=New",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains(Verdict::Fraudulent.message()));
    assert!(!html.contains(Verdict::Legitimate.message()));
    assert!(html.contains("<option value=\"High\" selected>High</option>"));
    assert_eq!(metrics.snapshot().fraudulent, 1);
}

#[tokio::test]
async fn test_form_renders_legitimate_verdict() {
    let (app, _) = app();
    let response = app
        .oneshot(form_post(
            "amount=5000&velocity=High&deviation=Medium&frequency=Rare&account_age=New",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains(Verdict::Legitimate.message()));
    assert!(!html.contains(Verdict::Fraudulent.message()));
}

#[tokio::test]
async fn test_form_rejects_tampered_selection() {
    let (app, metrics) = app();
    let response = app
        .oneshot(form_post("amount=100&velocity=Extreme"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let html = body_text(response).await;
    assert!(html.contains("Cannot predict"));
    assert!(!html.contains(Verdict::Fraudulent.message()));
    assert!(!html.contains(Verdict::Legitimate.message()));
    assert_eq!(metrics.snapshot().rejected_inputs, 1);
}

#[tokio::test]
async fn test_api_scenario_vector() {
    let (app, _) = app();
    let response = app
        .oneshot(json_post(
            r#"{"amount": 5000.0, "velocity": "High", "deviation": "Medium", "frequency": "Rare", "account_age": "New"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json: Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(json["label"], 0);
    assert_eq!(json["verdict"], "legitimate");

    let features = json["features"].as_object().unwrap();
    assert_eq!(features.len(), 30);
    assert_eq!(features["Amount"], 5000.0);
    assert_eq!(features["V14"], 5.0);
    assert_eq!(features["V12"], 0.0);
    assert_eq!(features["V10"], -5.0);
    assert_eq!(features["V17"], -5.0);

    let non_zero = features
        .values()
        .filter(|v| v.as_f64() != Some(0.0))
        .count();
    assert_eq!(non_zero, 4);
}

#[tokio::test]
async fn test_api_amount_only() {
    let (app, _) = app();
    let response = app.oneshot(json_post(r#"{"amount": 20000}"#)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json: Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(json["label"], 1);
    assert_eq!(json["message"], Verdict::Fraudulent.message());

    let features = json["features"].as_object().unwrap();
    let non_zero: Vec<&String> = features
        .iter()
        .filter(|(_, v)| v.as_f64() != Some(0.0))
        .map(|(k, _)| k)
        .collect();
    assert_eq!(non_zero, vec!["Amount"]);
}

#[tokio::test]
async fn test_api_clamps_amount_to_form_maximum() {
    let (app, _) = app();
    let response = app.oneshot(json_post(r#"{"amount": 250000}"#)).await.unwrap();

    let json: Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(json["features"]["Amount"], 100000.0);
}

#[tokio::test]
async fn test_api_rejects_invalid_amounts() {
    for body in [r#"{"amount": -1}"#, r#"{"amount": "abc"}"#, r#"{"velocity": "Low"}"#] {
        let (app, _) = app();
        let response = app.oneshot(json_post(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", body);
        let json: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert!(json["error"].as_str().unwrap().contains("amount"), "{}", body);
        assert_eq!(json["status"], 400);
    }
}

#[tokio::test]
async fn test_api_rejects_infinite_amounts() {
    for body in [
        r#"{"amount": "inf"}"#,
        r#"{"amount": "infinity"}"#,
        r#"{"amount": "-inf"}"#,
        r#"{"amount": "NaN"}"#,
    ] {
        let (app, metrics) = app();
        let response = app.oneshot(json_post(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", body);
        let json: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert!(json["error"].as_str().unwrap().contains("amount"), "{}", body);
        assert_eq!(metrics.snapshot().predictions_served, 0, "{}", body);
    }
}

#[tokio::test]
async fn test_form_rejects_infinite_amount() {
    let (app, _) = app();
    let response = app.oneshot(form_post("amount=inf&velocity=Low")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let html = body_text(response).await;
    assert!(html.contains("Cannot predict"));
    assert!(!html.contains(Verdict::Fraudulent.message()));
}

#[tokio::test]
async fn test_api_rejects_invalid_category() {
    let (app, _) = app();
    let response = app
        .oneshot(json_post(r#"{"amount": 10, "frequency": "Sometimes"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json: Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert!(json["error"].as_str().unwrap().contains("frequency"));
}

#[tokio::test]
async fn test_fields_catalogue() {
    let (app, _) = app();
    let response = app
        .oneshot(Request::builder().uri("/api/fields").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let json: Value = serde_json::from_str(&body_text(response).await).unwrap();
    let fields = json.as_array().unwrap();
    assert_eq!(fields.len(), 5);
    assert_eq!(fields[0]["key"], "velocity");
    assert_eq!(fields[0]["feature"], "V14");
    assert_eq!(fields[0]["options"][2]["label"], "High");
    assert_eq!(fields[0]["options"][2]["proxy"], 5.0);
    assert_eq!(fields[4]["key"], "amount");
    assert_eq!(fields[4]["range"]["max"], 100000.0);
}

#[tokio::test]
async fn test_fields_range_follows_form_config() {
    let mut form = AppConfig::default().form;
    form.max_amount = 2500.0;
    form.default_amount = 40.0;
    form.amount_step = 5.0;
    let state = AppState::new(
        Predictor::new(Arc::new(AmountThresholdStub)),
        Arc::new(PredictionMetrics::new()),
        form,
    );

    let response = create_router(state)
        .oneshot(Request::builder().uri("/api/fields").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let json: Value = serde_json::from_str(&body_text(response).await).unwrap();
    let range = &json[4]["range"];
    assert_eq!(range["min"], 0.0);
    assert_eq!(range["max"], 2500.0);
    assert_eq!(range["default"], 40.0);
    assert_eq!(range["step"], 5.0);
}

#[tokio::test]
async fn test_stats_and_health() {
    let (app, _) = app();

    let response = app
        .clone()
        .oneshot(json_post(r#"{"amount": 50}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/api/stats").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let json: Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(json["predictions_served"], 1);
    assert_eq!(json["legitimate"], 1);

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let json: Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["model"], "amount-threshold-stub");
}
