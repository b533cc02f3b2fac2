use std::sync::Mutex;

/// Counts evaluations across concurrently running sweep tasks.
pub struct MetricsRecorder {
    inner: Mutex<Metrics>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub evaluated: usize,
    pub failed: usize,
}

struct Metrics {
    evaluated: usize,
    failed: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Metrics {
                evaluated: 0,
                failed: 0,
            }),
        }
    }

    pub fn record_evaluated(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.evaluated += 1;
        }
    }

    pub fn record_failure(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.failed += 1;
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        if let Ok(metrics) = self.inner.lock() {
            MetricsSnapshot {
                evaluated: metrics.evaluated,
                failed: metrics.failed,
            }
        } else {
            MetricsSnapshot::default()
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}
