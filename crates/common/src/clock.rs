//! Clock and throughput utilities for frame processing runs.
//!
//! A run is anchored to a monotonic epoch recorded when the first frame is
//! requested. This module provides utilities for:
//! - Capturing the epoch together with its wall-clock time
//! - Measuring frame throughput
//! - Estimating the time remaining in a run

use std::time::Instant;

/// A run clock that provides monotonic timestamps relative to a fixed
/// epoch (the moment processing started).
#[derive(Debug, Clone)]
pub struct RunClock {
    /// The instant processing started.
    epoch: Instant,

    /// Wall-clock time at epoch (RFC 3339 string).
    epoch_wall: String,
}

impl RunClock {
    /// Create a new run clock anchored to now.
    pub fn start() -> Self {
        Self {
            epoch: Instant::now(),
            epoch_wall: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Get seconds elapsed since the run started.
    pub fn elapsed_secs(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }

    /// Wall-clock time at run start.
    pub fn epoch_wall(&self) -> &str {
        &self.epoch_wall
    }
}

/// Frame throughput measurement over a whole run.
#[derive(Debug, Clone, Copy)]
pub struct Throughput {
    /// Frames completed so far.
    pub frames_done: u64,
    /// Frames expected in total (0 when unknown).
    pub frames_total: u64,
    /// Seconds spent so far.
    pub elapsed_secs: f64,
}

impl Throughput {
    /// Frames per second processed so far.
    pub fn fps(&self) -> f64 {
        if self.elapsed_secs <= 0.0 {
            return 0.0;
        }
        self.frames_done as f64 / self.elapsed_secs
    }

    /// Completed fraction in `[0.0, 1.0]`.
    pub fn progress(&self) -> f64 {
        if self.frames_total == 0 {
            return 0.0;
        }
        (self.frames_done as f64 / self.frames_total as f64).clamp(0.0, 1.0)
    }

    /// Estimated seconds remaining, assuming the current rate holds.
    pub fn eta_secs(&self) -> f64 {
        let fps = self.fps();
        if fps <= 0.0 || self.frames_total <= self.frames_done {
            return 0.0;
        }
        (self.frames_total - self.frames_done) as f64 / fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_elapsed() {
        let clock = RunClock::start();
        assert!(clock.elapsed_secs() < 1.0);
        assert!(!clock.epoch_wall().is_empty());
    }

    #[test]
    fn test_throughput_rates() {
        let t = Throughput {
            frames_done: 50,
            frames_total: 200,
            elapsed_secs: 2.0,
        };
        assert!((t.fps() - 25.0).abs() < 1e-9);
        assert!((t.progress() - 0.25).abs() < 1e-9);
        assert!((t.eta_secs() - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_throughput_unknown_total() {
        let t = Throughput {
            frames_done: 10,
            frames_total: 0,
            elapsed_secs: 1.0,
        };
        assert_eq!(t.progress(), 0.0);
        assert_eq!(t.eta_secs(), 0.0);
    }

    #[test]
    fn test_throughput_before_first_frame() {
        let t = Throughput {
            frames_done: 0,
            frames_total: 10,
            elapsed_secs: 0.0,
        };
        assert_eq!(t.fps(), 0.0);
        assert_eq!(t.eta_secs(), 0.0);
    }
}
