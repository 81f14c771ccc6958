//! In-process prediction metrics.

use crate::types::Verdict;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};
use tracing::info;

const MAX_LATENCY_SAMPLES: usize = 10_000;

/// Counters and latency samples for served predictions
pub struct PredictionMetrics {
    /// Predictions that produced a verdict
    pub predictions_served: AtomicU64,
    pub fraudulent: AtomicU64,
    pub legitimate: AtomicU64,
    /// Requests rejected for invalid input
    pub rejected_inputs: AtomicU64,
    /// Requests that failed inside the classifier
    pub inference_failures: AtomicU64,
    /// Prediction latencies (in microseconds)
    latencies: RwLock<Vec<u64>>,
    start_time: Instant,
}

impl PredictionMetrics {
    pub fn new() -> Self {
        Self {
            predictions_served: AtomicU64::new(0),
            fraudulent: AtomicU64::new(0),
            legitimate: AtomicU64::new(0),
            rejected_inputs: AtomicU64::new(0),
            inference_failures: AtomicU64::new(0),
            latencies: RwLock::new(Vec::with_capacity(1000)),
            start_time: Instant::now(),
        }
    }

    /// Record a served prediction
    pub fn record_prediction(&self, latency: Duration, verdict: Verdict) {
        self.predictions_served.fetch_add(1, Ordering::Relaxed);
        match verdict {
            Verdict::Fraudulent => self.fraudulent.fetch_add(1, Ordering::Relaxed),
            Verdict::Legitimate => self.legitimate.fetch_add(1, Ordering::Relaxed),
        };

        if let Ok(mut latencies) = self.latencies.write() {
            latencies.push(latency.as_micros() as u64);
            // Keep only the most recent half once full
            if latencies.len() > MAX_LATENCY_SAMPLES {
                latencies.drain(0..MAX_LATENCY_SAMPLES / 2);
            }
        }
    }

    pub fn record_rejection(&self) {
        self.rejected_inputs.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_inference_failure(&self) {
        self.inference_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Latency percentiles over the retained samples
    pub fn latency_stats(&self) -> LatencyStats {
        let mut sorted = match self.latencies.read() {
            Ok(latencies) => latencies.clone(),
            Err(_) => return LatencyStats::default(),
        };
        if sorted.is_empty() {
            return LatencyStats::default();
        }
        sorted.sort_unstable();

        let count = sorted.len();
        let sum: u64 = sorted.iter().sum();
        let percentile = |p: f64| sorted[((count as f64 * p) as usize).min(count - 1)];

        LatencyStats {
            count: count as u64,
            mean_us: sum / count as u64,
            p50_us: sorted[count / 2],
            p95_us: percentile(0.95),
            p99_us: percentile(0.99),
            max_us: sorted[count - 1],
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let served = self.predictions_served.load(Ordering::Relaxed);
        let fraudulent = self.fraudulent.load(Ordering::Relaxed);
        let fraud_rate = if served > 0 {
            fraudulent as f64 / served as f64
        } else {
            0.0
        };

        MetricsSnapshot {
            predictions_served: served,
            fraudulent,
            legitimate: self.legitimate.load(Ordering::Relaxed),
            rejected_inputs: self.rejected_inputs.load(Ordering::Relaxed),
            inference_failures: self.inference_failures.load(Ordering::Relaxed),
            fraud_rate,
            uptime_secs: self.start_time.elapsed().as_secs(),
            latency: self.latency_stats(),
        }
    }

    /// Log a summary of everything recorded so far
    pub fn print_summary(&self) {
        let snapshot = self.snapshot();
        info!(
            served = snapshot.predictions_served,
            fraudulent = snapshot.fraudulent,
            legitimate = snapshot.legitimate,
            rejected = snapshot.rejected_inputs,
            failures = snapshot.inference_failures,
            fraud_rate = format!("{:.1}%", snapshot.fraud_rate * 100.0),
            mean_us = snapshot.latency.mean_us,
            p95_us = snapshot.latency.p95_us,
            p99_us = snapshot.latency.p99_us,
            "Prediction metrics summary"
        );
    }
}

impl Default for PredictionMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Latency statistics in microseconds
#[derive(Debug, Default, Clone, Serialize)]
pub struct LatencyStats {
    pub count: u64,
    pub mean_us: u64,
    pub p50_us: u64,
    pub p95_us: u64,
    pub p99_us: u64,
    pub max_us: u64,
}

/// Point-in-time view served by the stats endpoint
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub predictions_served: u64,
    pub fraudulent: u64,
    pub legitimate: u64,
    pub rejected_inputs: u64,
    pub inference_failures: u64,
    pub fraud_rate: f64,
    pub uptime_secs: u64,
    pub latency: LatencyStats,
}

/// Logs a metrics summary on a fixed interval
pub struct MetricsReporter {
    metrics: Arc<PredictionMetrics>,
    interval_secs: u64,
}

impl MetricsReporter {
    pub fn new(metrics: Arc<PredictionMetrics>, interval_secs: u64) -> Self {
        Self {
            metrics,
            interval_secs,
        }
    }

    /// Start the periodic reporting task
    pub async fn start(self) {
        let mut interval = tokio::time::interval(Duration::from_secs(self.interval_secs));
        // First tick fires immediately
        interval.tick().await;
        loop {
            interval.tick().await;
            self.metrics.print_summary();
        }
    }
}
