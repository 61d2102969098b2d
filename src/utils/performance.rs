//! Timing of load and build passes
//!
//! Durations are kept per operation name so the glue can report averages
//! next to the data-quality warnings.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Milliseconds from a monotonic clock
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

/// Milliseconds from a monotonic clock
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    use once_cell::sync::Lazy;
    use std::time::Instant;

    static START: Lazy<Instant> = Lazy::new(Instant::now);
    START.elapsed().as_secs_f64() * 1000.0
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TimingSummary {
    pub operation: String,
    pub count: usize,
    pub average_ms: f64,
    pub last_ms: f64,
}

/// Performance monitor for measuring operation times
#[derive(Debug, Default)]
pub struct PerformanceMonitor {
    measurements: HashMap<String, Vec<f64>>,
}

impl PerformanceMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_measurement(&mut self, operation: &str, duration_ms: f64) {
        self.measurements
            .entry(operation.to_string())
            .or_default()
            .push(duration_ms);
    }

    /// Run `f` and record how long it took under `operation`
    pub fn time<T>(&mut self, operation: &str, f: impl FnOnce() -> T) -> T {
        let start = now_ms();
        let out = f();
        let elapsed = now_ms() - start;
        log::debug!("{} took {:.2}ms", operation, elapsed);
        self.record_measurement(operation, elapsed);
        out
    }

    pub fn get_average_time(&self, operation: &str) -> Option<f64> {
        self.measurements.get(operation).map(|times| {
            if times.is_empty() {
                0.0
            } else {
                times.iter().sum::<f64>() / times.len() as f64
            }
        })
    }

    /// One line per operation, sorted by name
    pub fn summary(&self) -> Vec<TimingSummary> {
        let mut out: Vec<TimingSummary> = self
            .measurements
            .iter()
            .map(|(operation, times)| TimingSummary {
                operation: operation.clone(),
                count: times.len(),
                average_ms: self.get_average_time(operation).unwrap_or(0.0),
                last_ms: times.last().copied().unwrap_or(0.0),
            })
            .collect();
        out.sort_by(|a, b| a.operation.cmp(&b.operation));
        out
    }
}
