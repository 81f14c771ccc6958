//! HTML rendering for the transaction form

use crate::config::FormConfig;
use crate::error::PredictError;
use crate::types::input::{FieldKind, NamedField};
use crate::types::{FeatureVector, Verdict};
use std::collections::BTreeMap;
use std::fmt::Write;

/// Values shown in the form controls
#[derive(Debug, Clone, PartialEq)]
pub struct FormValues {
    pub amount: String,
    selections: BTreeMap<NamedField, String>,
}

impl FormValues {
    /// Fresh form: configured default amount, first option of every selector.
    pub fn defaults(form: &FormConfig) -> Self {
        let selections = NamedField::CATEGORICAL
            .into_iter()
            .filter_map(|field| match field.kind() {
                FieldKind::CategoricalLookup(table) => {
                    table.first().map(|o| (field, o.label.to_string()))
                }
                FieldKind::DirectNumeric { .. } => None,
            })
            .collect();

        Self {
            amount: format_amount(form.default_amount),
            selections,
        }
    }

    pub fn with_amount(mut self, amount: impl Into<String>) -> Self {
        self.amount = amount.into();
        self
    }

    pub fn with_selection(mut self, field: NamedField, label: impl Into<String>) -> Self {
        self.selections.insert(field, label.into());
        self
    }

    pub fn selected(&self, field: NamedField) -> Option<&str> {
        self.selections.get(&field).map(String::as_str)
    }
}

/// What to show under the form
#[derive(Debug, Clone, Copy)]
pub enum Outcome<'a> {
    Pending,
    Verdict(Verdict),
    Rejected(&'a PredictError),
}

pub fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{:.1}", amount)
    } else {
        amount.to_string()
    }
}

/// Escape text for inclusion in HTML content or attribute values
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

const STYLE: &str = "body{font-family:sans-serif;max-width:960px;margin:2rem auto;padding:0 1rem;display:flex;gap:2rem}\
aside{min-width:260px}main{flex:1;overflow-x:auto}label{display:block;margin-top:1rem;font-weight:bold}\
select,input{width:100%;padding:.3rem;margin-top:.3rem}button{margin-top:1.5rem;padding:.5rem 1rem}\
.fraud{background:#fdecea;color:#a4161a;padding:1rem;border-radius:4px}\
.legit{background:#e9f7ef;color:#1e7b34;padding:1rem;border-radius:4px}\
.rejected{background:#fff4e5;color:#8a5300;padding:1rem;border-radius:4px}\
table{border-collapse:collapse;font-size:12px}td,th{border:1px solid #ddd;padding:2px 6px}\
footer{text-align:center;color:gray;font-size:14px;margin-top:2rem}";

/// Render the full page.
///
/// `features` is the row assembled from the current values, shown in the
/// collapsible input-data section when available.
pub fn page(
    form: &FormConfig,
    values: &FormValues,
    features: Option<&FeatureVector>,
    outcome: Outcome<'_>,
    model_name: &str,
) -> String {
    let mut html = String::with_capacity(8 * 1024);
    html.push_str("<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">");
    html.push_str("<title>Credit Card Fraud Detection</title>");
    let _ = write!(html, "<style>{}</style></head><body>", STYLE);

    html.push_str("<aside><form method=\"post\" action=\"/predict\">");
    html.push_str("<h2>🔧 Input Transaction Features</h2>");
    for field in NamedField::ALL {
        write_field(&mut html, form, values, field);
    }
    html.push_str("<button type=\"submit\">🚀 Predict Transaction</button></form></aside>");

    html.push_str("<main><h1>💳 Credit Card Fraud Detection System</h1>");
    html.push_str(
        "<p>Predict if a transaction is fraudulent using a trained <strong>XGBoost</strong> model. \
         Use the selectors and amount field on the side to input transaction features.</p>",
    );

    html.push_str("<details><summary>🔍 View Input Transaction Data</summary>");
    match features {
        Some(features) => write_feature_table(&mut html, features),
        None => html.push_str("<p>The current input could not be assembled.</p>"),
    }
    html.push_str("</details>");

    match outcome {
        Outcome::Pending => {}
        Outcome::Verdict(verdict) => {
            let class = if verdict.is_fraudulent() { "fraud" } else { "legit" };
            let _ = write!(
                html,
                "<hr><h2>🎯 Prediction Result</h2><div class=\"{}\" role=\"alert\">{}</div>",
                class,
                verdict.message()
            );
        }
        Outcome::Rejected(err) => {
            let _ = write!(
                html,
                "<hr><div class=\"rejected\" role=\"alert\">Cannot predict: {}</div>",
                escape_html(&err.to_string())
            );
        }
    }

    let _ = write!(
        html,
        "<footer>Model: {}</footer></main></body></html>",
        escape_html(model_name)
    );
    html
}

fn write_field(html: &mut String, form: &FormConfig, values: &FormValues, field: NamedField) {
    let _ = write!(
        html,
        "<label for=\"{key}\">{label}</label>",
        key = field.key(),
        label = field.label()
    );

    match field.kind() {
        FieldKind::DirectNumeric { min } => {
            let _ = write!(
                html,
                "<input type=\"number\" id=\"{key}\" name=\"{key}\" min=\"{min}\" max=\"{max}\" step=\"{step}\" value=\"{value}\">",
                key = field.key(),
                min = min,
                max = form.max_amount,
                step = form.amount_step,
                value = escape_html(&values.amount),
            );
        }
        FieldKind::CategoricalLookup(table) => {
            let _ = write!(html, "<select id=\"{key}\" name=\"{key}\">", key = field.key());
            let selected = values.selected(field);
            for option in table {
                let marker = if selected == Some(option.label) { " selected" } else { "" };
                let _ = write!(
                    html,
                    "<option value=\"{label}\"{marker}>{label}</option>",
                    label = option.label,
                    marker = marker
                );
            }
            html.push_str("</select>");
        }
    }
}

fn write_feature_table(html: &mut String, features: &FeatureVector) {
    html.push_str("<table><tr>");
    for (name, _) in features.named_values() {
        let _ = write!(html, "<th>{}</th>", name);
    }
    html.push_str("</tr><tr>");
    for (_, value) in features.named_values() {
        let _ = write!(html, "<td>{}</td>", value);
    }
    html.push_str("</tr></table>");
}
