//! Request metrics and periodic reporting for the serving process.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::sync::RwLock;
use std::time::{Duration, Instant};
use tracing::info;

/// Counters and latency samples for the prediction API.
pub struct ServiceMetrics {
    /// Predictions served successfully
    pub predictions_total: AtomicU64,
    /// Predictions with a fraud verdict
    pub fraud_flagged: AtomicU64,
    /// Requests rejected before reaching the model
    pub validation_failures: AtomicU64,
    /// Inference latencies (in microseconds)
    latencies_us: RwLock<Vec<u64>>,
    /// Start time for rate calculation
    start_time: Instant,
}

impl ServiceMetrics {
    pub fn new() -> Self {
        Self {
            predictions_total: AtomicU64::new(0),
            fraud_flagged: AtomicU64::new(0),
            validation_failures: AtomicU64::new(0),
            latencies_us: RwLock::new(Vec::with_capacity(1000)),
            start_time: Instant::now(),
        }
    }

    /// Record a served prediction
    pub fn record_prediction(&self, latency: Duration, label: u8) {
        self.predictions_total.fetch_add(1, Ordering::Relaxed);
        if label == 1 {
            self.fraud_flagged.fetch_add(1, Ordering::Relaxed);
        }

        if let Ok(mut latencies) = self.latencies_us.write() {
            latencies.push(latency.as_micros() as u64);
            // Keep only recent samples for memory efficiency
            if latencies.len() > 10000 {
                latencies.drain(0..5000);
            }
        }
    }

    /// Record a request rejected during validation
    pub fn record_validation_failure(&self) {
        self.validation_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Get inference latency statistics
    pub fn get_latency_stats(&self) -> LatencyStats {
        let latencies = self.latencies_us.read().unwrap();
        if latencies.is_empty() {
            return LatencyStats::default();
        }

        let mut sorted: Vec<u64> = latencies.clone();
        sorted.sort();

        let sum: u64 = sorted.iter().sum();
        let count = sorted.len();

        LatencyStats {
            count: count as u64,
            mean_us: sum / count as u64,
            p50_us: sorted[count / 2],
            p95_us: sorted[(count as f64 * 0.95) as usize],
            max_us: *sorted.last().unwrap_or(&0),
        }
    }

    /// Get current throughput (predictions per second)
    pub fn get_throughput(&self) -> f64 {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.predictions_total.load(Ordering::Relaxed) as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Print summary statistics
    pub fn print_summary(&self) {
        let served = self.predictions_total.load(Ordering::Relaxed);
        let flagged = self.fraud_flagged.load(Ordering::Relaxed);
        let rejected = self.validation_failures.load(Ordering::Relaxed);
        let fraud_rate = if served > 0 {
            (flagged as f64 / served as f64) * 100.0
        } else {
            0.0
        };
        let latency = self.get_latency_stats();

        info!(
            served = served,
            fraud_flagged = flagged,
            fraud_rate = format!("{:.1}%", fraud_rate),
            rejected = rejected,
            throughput = format!("{:.2}/s", self.get_throughput()),
            "Prediction service metrics"
        );
        info!(
            mean_us = latency.mean_us,
            p50_us = latency.p50_us,
            p95_us = latency.p95_us,
            max_us = latency.max_us,
            "Inference latency (us)"
        );
    }
}

impl Default for ServiceMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Inference latency statistics
#[derive(Debug, Default)]
pub struct LatencyStats {
    pub count: u64,
    pub mean_us: u64,
    pub p50_us: u64,
    pub p95_us: u64,
    pub max_us: u64,
}

/// Periodic reporter that logs a metrics summary
pub struct MetricsReporter {
    metrics: Arc<ServiceMetrics>,
    interval_secs: u64,
}

impl MetricsReporter {
    pub fn new(metrics: Arc<ServiceMetrics>, interval_secs: u64) -> Self {
        Self {
            metrics,
            interval_secs,
        }
    }

    /// Start the periodic reporting task
    pub async fn start(self) {
        let mut interval = tokio::time::interval(Duration::from_secs(self.interval_secs));
        loop {
            interval.tick().await;
            self.metrics.print_summary();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_recording() {
        let metrics = ServiceMetrics::new();

        metrics.record_prediction(Duration::from_micros(100), 0);
        metrics.record_prediction(Duration::from_micros(300), 1);
        metrics.record_validation_failure();

        assert_eq!(metrics.predictions_total.load(Ordering::Relaxed), 2);
        assert_eq!(metrics.fraud_flagged.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.validation_failures.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_latency_stats() {
        let metrics = ServiceMetrics::new();
        for us in [100u64, 200, 300, 400] {
            metrics.record_prediction(Duration::from_micros(us), 0);
        }

        let stats = metrics.get_latency_stats();
        assert_eq!(stats.count, 4);
        assert_eq!(stats.mean_us, 250);
        assert_eq!(stats.max_us, 400);
    }

    #[test]
    fn test_empty_latency_stats() {
        let metrics = ServiceMetrics::new();
        let stats = metrics.get_latency_stats();
        assert_eq!(stats.count, 0);
        assert_eq!(stats.mean_us, 0);
    }
}
