use std::time::Duration;
use tokio::time::Instant;

/// Monotonic time source for execution timing.
pub trait Clock: Send + Sync + 'static {
    /// Milliseconds elapsed since the clock's origin. Always greater than zero,
    /// since `0.0` marks an idle action.
    fn now(&self) -> f64;
}

/// Clock backed by `tokio::time::Instant`, so it follows paused test time.
#[derive(Debug, Clone, Copy)]
pub struct TokioClock {
    origin: Instant,
}

impl TokioClock {
    pub fn new() -> Self {
        let now = Instant::now();
        // Start one millisecond in the past so the first reading is non-zero.
        let origin = now.checked_sub(Duration::from_millis(1)).unwrap_or(now);
        TokioClock { origin }
    }
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TokioClock {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}
