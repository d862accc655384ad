use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Wall-clock instrumentation for debug logging
///
/// Each `mark` logs the time since the previous mark and since the start.
/// A disabled timer does nothing.
#[derive(Debug)]
pub struct StepTimer {
    enabled: bool,
    start: Instant,
    last: Mutex<Instant>,
}

impl StepTimer {
    pub fn new(enabled: bool) -> Self {
        let now = Instant::now();
        Self {
            enabled,
            start: now,
            last: Mutex::new(now),
        }
    }

    /// Logs the elapsed time for `step` and returns (since last, since start)
    pub fn mark(&self, step: &str) -> Option<(Duration, Duration)> {
        if !self.enabled {
            return None;
        }

        let now = Instant::now();
        let since_last = {
            let mut last = self.last.lock().unwrap_or_else(|e| e.into_inner());
            let since_last = now.duration_since(*last);
            *last = now;
            since_last
        };
        let since_start = now.duration_since(self.start);

        tracing::debug!(
            source = "driver",
            "[{}] Time lapsed: {:.2}s / {:.2}s",
            step,
            since_last.as_secs_f64(),
            since_start.as_secs_f64()
        );

        Some((since_last, since_start))
    }
}
