//! Timing helpers for the debug panel

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Tracks timing samples over a sliding window
#[derive(Debug, Clone)]
pub struct TimingTracker {
    samples: VecDeque<Duration>,
    max_samples: usize,
}

impl Default for TimingTracker {
    fn default() -> Self {
        Self::new(60)
    }
}

impl TimingTracker {
    pub fn new(max_samples: usize) -> Self {
        let max_samples = max_samples.max(1);
        Self {
            samples: VecDeque::with_capacity(max_samples),
            max_samples,
        }
    }

    pub fn record(&mut self, duration: Duration) {
        if self.samples.len() >= self.max_samples {
            self.samples.pop_front();
        }
        self.samples.push_back(duration);
    }

    pub fn average(&self) -> Duration {
        if self.samples.is_empty() {
            return Duration::ZERO;
        }
        let total: Duration = self.samples.iter().sum();
        total / self.samples.len() as u32
    }

    pub fn percentile_95(&self) -> Duration {
        let mut sorted: Vec<_> = self.samples.iter().copied().collect();
        sorted.sort();
        let idx = (sorted.len() as f32 * 0.95) as usize;
        sorted
            .get(idx.min(sorted.len().saturating_sub(1)))
            .copied()
            .unwrap_or(Duration::ZERO)
    }

    pub fn count(&self) -> usize {
        self.samples.len()
    }

    /// `avg 12ms / p95 30ms`, or `n/a` before the first sample
    pub fn summary(&self) -> String {
        if self.samples.is_empty() {
            return "n/a".to_string();
        }
        format!(
            "avg {}ms / p95 {}ms",
            self.average().as_millis(),
            self.percentile_95().as_millis()
        )
    }
}

/// Exponentially smoothed frame rate
#[derive(Debug, Clone)]
pub struct FpsCounter {
    last_frame: Instant,
    fps: f32,
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl FpsCounter {
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            fps: 0.0,
        }
    }

    /// Register a frame drawn at `now` and return the smoothed rate.
    pub fn tick(&mut self, now: Instant) -> f32 {
        let delta = now.saturating_duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        if delta > 0.0 {
            let instant = 1.0 / delta;
            self.fps = if self.fps == 0.0 {
                instant
            } else {
                self.fps * 0.9 + instant * 0.1
            };
        }
        self.fps
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timing_tracker() {
        let mut tracker = TimingTracker::new(10);
        for i in 1..=5 {
            tracker.record(Duration::from_millis(i * 10));
        }

        assert_eq!(tracker.count(), 5);
        assert_eq!(tracker.average(), Duration::from_millis(30));
        assert_eq!(tracker.percentile_95(), Duration::from_millis(50));
        assert_eq!(tracker.summary(), "avg 30ms / p95 50ms");
    }

    #[test]
    fn test_timing_tracker_window() {
        let mut tracker = TimingTracker::new(3);
        for i in 1..=5 {
            tracker.record(Duration::from_millis(i * 10));
        }
        assert_eq!(tracker.count(), 3);
        assert_eq!(tracker.average(), Duration::from_millis(40));
    }

    #[test]
    fn test_empty_tracker() {
        let tracker = TimingTracker::default();
        assert_eq!(tracker.percentile_95(), Duration::ZERO);
        assert_eq!(tracker.summary(), "n/a");
    }

    #[test]
    fn test_fps_counter() {
        let mut counter = FpsCounter::new();
        let start = Instant::now();
        let fps = counter.tick(start + Duration::from_millis(100));
        assert!((fps - 10.0).abs() < 0.5);
    }
}
