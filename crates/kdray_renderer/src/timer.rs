//! Wall-clock timing that logs when it goes out of scope.

use std::time::{Duration, Instant};

/// Logs the elapsed time for `label` at `info` level when dropped.
pub struct RenderTimer {
    label: String,
    start: Instant,
}

impl RenderTimer {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for RenderTimer {
    fn drop(&mut self) {
        log::info!("{} took {:.2?}", self.label, self.elapsed());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elapsed_is_monotonic() {
        let timer = RenderTimer::new("test");
        let first = timer.elapsed();
        std::thread::sleep(Duration::from_millis(2));
        assert!(timer.elapsed() > first);
    }
}
