//! HTTP handlers

use crate::error::{PredictError, PredictResult};
use crate::metrics::MetricsSnapshot;
use crate::types::input::{FieldKind, NamedField, NamedInput, ProxyOption};
use crate::types::{Prediction, PredictionRecord};
use crate::web::error::{status_for, ApiResult};
use crate::web::render::{self, FormValues, Outcome};
use crate::web::AppState;
use axum::{
    extract::{Form, State},
    http::StatusCode,
    response::Html,
    Json,
};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Amount as submitted: a JSON number or form text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AmountValue {
    Number(f64),
    Text(String),
}

/// Raw request body shared by the form and JSON endpoints
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PredictRequest {
    pub amount: Option<AmountValue>,
    pub velocity: Option<String>,
    pub deviation: Option<String>,
    pub frequency: Option<String>,
    pub account_age: Option<String>,
}

impl PredictRequest {
    fn selection(&self, field: NamedField) -> Option<&str> {
        match field {
            NamedField::Velocity => self.velocity.as_deref(),
            NamedField::AmountDeviation => self.deviation.as_deref(),
            NamedField::Frequency => self.frequency.as_deref(),
            NamedField::AccountAge => self.account_age.as_deref(),
            NamedField::Amount => None,
        }
    }

    /// Convert into a `NamedInput`, clamping the amount to `max_amount`.
    ///
    /// Only the upper bound is clamped; negative amounts reach the assembler
    /// and are rejected there.
    pub fn to_named_input(&self, max_amount: f64) -> PredictResult<NamedInput> {
        let amount = match &self.amount {
            None => return Err(PredictError::InvalidAmount("amount is required".to_string())),
            Some(AmountValue::Number(amount)) => *amount,
            Some(AmountValue::Text(text)) => text.trim().parse::<f64>().map_err(|_| {
                PredictError::InvalidAmount(format!("{:?} is not numeric", text))
            })?,
        };

        // Checked before clamping so infinities never become `max_amount`
        if !amount.is_finite() {
            return Err(PredictError::InvalidAmount(format!("{} is not a number", amount)));
        }

        let amount = if amount > max_amount {
            debug!(amount = amount, max_amount = max_amount, "Clamping amount");
            max_amount
        } else {
            amount
        };

        let input = NamedField::CATEGORICAL
            .into_iter()
            .fold(NamedInput::new(amount), |input, field| match self.selection(field) {
                Some(label) => input.with_label(field, label),
                None => input,
            });

        Ok(input)
    }

    /// Echo the submission back into the form controls
    fn form_values(&self, defaults: FormValues) -> FormValues {
        let values = match &self.amount {
            Some(AmountValue::Number(amount)) => defaults.with_amount(render::format_amount(*amount)),
            Some(AmountValue::Text(text)) => defaults.with_amount(text.clone()),
            None => defaults,
        };

        NamedField::CATEGORICAL
            .into_iter()
            .fold(values, |values, field| match self.selection(field) {
                Some(label) => values.with_selection(field, label),
                None => values,
            })
    }
}

/// Run one prediction and record its metrics
fn run_prediction(state: &AppState, request: &PredictRequest) -> PredictResult<Prediction> {
    let start = Instant::now();
    let result = request
        .to_named_input(state.form.max_amount)
        .and_then(|input| state.predictor.assemble_and_predict(&input));

    match &result {
        Ok(prediction) => {
            let latency = start.elapsed();
            state.metrics.record_prediction(latency, prediction.verdict);
            info!(
                verdict = ?prediction.verdict,
                label = prediction.verdict.label(),
                latency_us = latency.as_micros() as u64,
                "Transaction classified"
            );
        }
        Err(err) if err.is_input_error() => {
            state.metrics.record_rejection();
            warn!(error = %err, "Rejected prediction input");
        }
        Err(_) => state.metrics.record_inference_failure(),
    }

    result
}

/// GET / - fresh form
pub async fn index(State(state): State<AppState>) -> Html<String> {
    let values = FormValues::defaults(&state.form);
    let request = PredictRequest {
        amount: Some(AmountValue::Number(state.form.default_amount)),
        velocity: values.selected(NamedField::Velocity).map(str::to_string),
        deviation: values.selected(NamedField::AmountDeviation).map(str::to_string),
        frequency: values.selected(NamedField::Frequency).map(str::to_string),
        account_age: values.selected(NamedField::AccountAge).map(str::to_string),
    };
    let features = request
        .to_named_input(state.form.max_amount)
        .and_then(|input| state.predictor.assembler().assemble(&input))
        .ok();

    Html(render::page(
        &state.form,
        &values,
        features.as_ref(),
        Outcome::Pending,
        state.predictor.classifier_name(),
    ))
}

/// POST /predict - form submission
pub async fn predict_form(
    State(state): State<AppState>,
    Form(request): Form<PredictRequest>,
) -> (StatusCode, Html<String>) {
    let values = request.form_values(FormValues::defaults(&state.form));
    let model_name = state.predictor.classifier_name();

    match run_prediction(&state, &request) {
        Ok(prediction) => (
            StatusCode::OK,
            Html(render::page(
                &state.form,
                &values,
                Some(&prediction.features),
                Outcome::Verdict(prediction.verdict),
                model_name,
            )),
        ),
        Err(err) => (
            status_for(&err),
            Html(render::page(
                &state.form,
                &values,
                None,
                Outcome::Rejected(&err),
                model_name,
            )),
        ),
    }
}

/// POST /api/predict - JSON prediction
pub async fn predict_json(
    State(state): State<AppState>,
    Json(request): Json<PredictRequest>,
) -> ApiResult<Json<PredictionRecord>> {
    let prediction = run_prediction(&state, &request)?;
    Ok(Json(PredictionRecord::new(&prediction)))
}

/// Amount widget bounds as served to clients
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AmountRange {
    pub min: f64,
    pub max: f64,
    pub default: f64,
    pub step: f64,
}

#[derive(Debug, Serialize)]
pub struct FieldDescription {
    pub key: &'static str,
    pub label: &'static str,
    pub feature: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<AmountRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<&'static [ProxyOption]>,
}

/// GET /api/fields - input catalogue
pub async fn fields(State(state): State<AppState>) -> Json<Vec<FieldDescription>> {
    let catalogue = NamedField::ALL
        .into_iter()
        .map(|field| {
            let (range, options) = match field.kind() {
                FieldKind::DirectNumeric { min } => (
                    Some(AmountRange {
                        min,
                        max: state.form.max_amount,
                        default: state.form.default_amount,
                        step: state.form.amount_step,
                    }),
                    None,
                ),
                FieldKind::CategoricalLookup(table) => (None, Some(table)),
            };
            FieldDescription {
                key: field.key(),
                label: field.label(),
                feature: field.slot().name(),
                range,
                options,
            }
        })
        .collect();

    Json(catalogue)
}

/// GET /api/stats - metrics snapshot
pub async fn stats(State(state): State<AppState>) -> Json<MetricsSnapshot> {
    Json(state.metrics.snapshot())
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    model: String,
    timestamp: i64,
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        model: state.predictor.classifier_name().to_string(),
        timestamp: chrono::Utc::now().timestamp(),
    })
}
