//! Scroll signal monitoring.
//!
//! Converts the host's raw per-frame scroll-offset samples into offset,
//! velocity, direction, and a one-shot engagement latch. The host UI layer
//! samples scroll position once per rendered frame and feeds it here; this
//! module has no dependency on any rendering framework.

use serde::{Deserialize, Serialize};

/// Offset (in scroll units) past which the user counts as engaged.
pub const DEFAULT_ENGAGEMENT_THRESHOLD: f64 = 300.0;

/// Velocity band (units/sec) inside which direction reads as idle.
/// Avoids direction flicker while the view is at rest.
const DIRECTION_HYSTERESIS: f64 = 1.0;

/// Direction of the most recent scroll movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollDirection {
    #[default]
    Idle,
    Up,
    Down,
}

/// Current scroll state, updated once per incoming sample.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ScrollState {
    /// Current scroll offset (y-axis, host units).
    pub offset: f64,
    /// Instantaneous velocity in units per second.
    pub velocity: f64,
    /// Direction derived from velocity with a hysteresis band.
    pub direction: ScrollDirection,
    /// Latches true the first time `|offset|` exceeds the engagement
    /// threshold; never resets within a session.
    pub has_engaged: bool,
}

/// Tracks scroll position across frames.
///
/// Session-scoped: [`reset`](ScrollMonitor::reset) restores defaults.
#[derive(Debug, Clone)]
pub struct ScrollMonitor {
    state: ScrollState,
    engagement_threshold: f64,
    last_sample_time: Option<f64>,
}

impl ScrollMonitor {
    pub fn new() -> Self {
        Self::with_engagement_threshold(DEFAULT_ENGAGEMENT_THRESHOLD)
    }

    pub fn with_engagement_threshold(threshold: f64) -> Self {
        Self {
            state: ScrollState::default(),
            engagement_threshold: threshold,
            last_sample_time: None,
        }
    }

    /// Record one offset sample. `timestamp` is seconds from the host's
    /// monotonic clock; the caller delivers at most one sample per frame.
    pub fn record(&mut self, offset: f64, timestamp: f64) {
        if let Some(last) = self.last_sample_time {
            let dt = timestamp - last;
            if dt > 0.0 {
                self.state.velocity = (offset - self.state.offset) / dt;
            }
        }

        self.state.offset = offset;
        self.last_sample_time = Some(timestamp);

        self.state.direction = if self.state.velocity > DIRECTION_HYSTERESIS {
            ScrollDirection::Down
        } else if self.state.velocity < -DIRECTION_HYSTERESIS {
            ScrollDirection::Up
        } else {
            ScrollDirection::Idle
        };

        if !self.state.has_engaged && offset.abs() > self.engagement_threshold {
            self.state.has_engaged = true;
        }
    }

    pub fn state(&self) -> &ScrollState {
        &self.state
    }

    pub fn offset(&self) -> f64 {
        self.state.offset
    }

    pub fn velocity(&self) -> f64 {
        self.state.velocity
    }

    pub fn direction(&self) -> ScrollDirection {
        self.state.direction
    }

    pub fn has_engaged(&self) -> bool {
        self.state.has_engaged
    }

    /// Whether the view is actively moving.
    pub fn is_scrolling(&self) -> bool {
        self.state.velocity.abs() > 0.1
    }

    /// Clear all scroll state (e.g. when navigating away).
    pub fn reset(&mut self) {
        self.state = ScrollState::default();
        self.last_sample_time = None;
    }
}

impl Default for ScrollMonitor {
    fn default() -> Self {
        Self::new()
    }
}
