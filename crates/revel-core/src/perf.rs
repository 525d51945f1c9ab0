//! Frame-rate health tracking.
//!
//! Certifies that the reveal pipeline stays inside a 60-updates-per-second
//! budget. Callers use [`PerformanceMonitor::meets_target`] to decide whether
//! to simplify per-frame work; what to simplify is the caller's policy.

/// Instantaneous rate below which a frame counts as dropped.
const DROPPED_FRAME_FPS: f64 = 55.0;

/// Average rate the pipeline must sustain.
const TARGET_AVG_FPS: f64 = 58.0;

/// Maximum tolerated share of dropped frames.
const MAX_DROPPED_RATIO: f64 = 0.10;

/// Exponentially-weighted moving average of frame rate.
///
/// Session-scoped and never persisted.
#[derive(Debug, Clone)]
pub struct PerformanceMonitor {
    frame_count: u64,
    dropped_frames: u64,
    last_frame_time: Option<f64>,
    avg_fps: f64,
}

impl PerformanceMonitor {
    pub fn new() -> Self {
        Self {
            frame_count: 0,
            dropped_frames: 0,
            last_frame_time: None,
            // Optimistic start so one slow frame doesn't fail the target.
            avg_fps: 60.0,
        }
    }

    /// Record a frame timestamp (seconds, monotonic clock).
    pub fn record_frame(&mut self, timestamp: f64) {
        if let Some(last) = self.last_frame_time {
            let dt = timestamp - last;
            if dt > 0.0 {
                let inst_fps = 1.0 / dt;
                if inst_fps < DROPPED_FRAME_FPS {
                    self.dropped_frames += 1;
                }
                self.avg_fps = self.avg_fps * 0.9 + inst_fps * 0.1;
            }
        }
        self.last_frame_time = Some(timestamp);
        self.frame_count += 1;
    }

    pub fn avg_fps(&self) -> f64 {
        self.avg_fps
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn dropped_frames(&self) -> u64 {
        self.dropped_frames
    }

    /// Pass/fail health signal: sustained average at or above 58 fps with
    /// fewer than 10% dropped frames.
    pub fn meets_target(&self) -> bool {
        if self.frame_count == 0 {
            return true;
        }
        let dropped_ratio = self.dropped_frames as f64 / self.frame_count as f64;
        self.avg_fps >= TARGET_AVG_FPS && dropped_ratio < MAX_DROPPED_RATIO
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for PerformanceMonitor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_frames(monitor: &mut PerformanceMonitor, count: usize, dt: f64) {
        let mut t = monitor.last_frame_time.unwrap_or(0.0);
        if monitor.frame_count == 0 {
            monitor.record_frame(t);
        }
        for _ in 0..count {
            t += dt;
            monitor.record_frame(t);
        }
    }

    #[test]
    fn test_meets_target_with_steady_60fps() {
        let mut monitor = PerformanceMonitor::new();
        feed_frames(&mut monitor, 120, 1.0 / 60.0);
        assert!(monitor.avg_fps() > 59.0);
        assert_eq!(monitor.dropped_frames(), 0);
        assert!(monitor.meets_target());
    }

    #[test]
    fn test_fails_target_at_30fps() {
        let mut monitor = PerformanceMonitor::new();
        feed_frames(&mut monitor, 60, 1.0 / 30.0);
        assert!(monitor.avg_fps() < TARGET_AVG_FPS);
        assert!(!monitor.meets_target());
    }

    #[test]
    fn test_dropped_frame_counting() {
        let mut monitor = PerformanceMonitor::new();
        feed_frames(&mut monitor, 10, 1.0 / 60.0);
        feed_frames(&mut monitor, 3, 1.0 / 40.0); // below the 55fps floor
        assert_eq!(monitor.dropped_frames(), 3);
    }

    #[test]
    fn test_dropped_ratio_fails_target_despite_average() {
        let mut monitor = PerformanceMonitor::new();
        // Alternate very fast and slow frames: EWMA recovers but the dropped
        // share stays well above 10%.
        let mut t = 0.0;
        monitor.record_frame(t);
        for _ in 0..30 {
            t += 1.0 / 40.0;
            monitor.record_frame(t);
            for _ in 0..2 {
                t += 1.0 / 240.0;
                monitor.record_frame(t);
            }
        }
        assert!(monitor.dropped_frames() as f64 / monitor.frame_count() as f64 >= 0.10);
        assert!(!monitor.meets_target());
    }

    #[test]
    fn test_empty_monitor_meets_target() {
        let monitor = PerformanceMonitor::new();
        assert!(monitor.meets_target());
    }

    #[test]
    fn test_reset() {
        let mut monitor = PerformanceMonitor::new();
        feed_frames(&mut monitor, 20, 1.0 / 30.0);
        monitor.reset();
        assert_eq!(monitor.frame_count(), 0);
        assert_eq!(monitor.dropped_frames(), 0);
        assert!(monitor.meets_target());
    }
}
