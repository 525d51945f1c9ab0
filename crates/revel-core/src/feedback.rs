//! Haptic/notification sink.
//!
//! The engine fires a single fire-and-forget `notify` call on reveal,
//! tier-unlock, and milestone events. Dispatching to an actual platform
//! haptic or notification API (including any async hop) is the host's
//! concern; implementations here are invoked synchronously inline.

/// Feedback strength for an engagement event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackIntensity {
    /// A content item was revealed.
    Light,
    /// A tier was unlocked.
    Medium,
    /// A milestone was achieved.
    Success,
}

/// Receives engagement feedback events. No contract on effect.
pub trait FeedbackSink {
    fn notify(&self, intensity: FeedbackIntensity);
}

/// Sink that discards all feedback.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl FeedbackSink for NullSink {
    fn notify(&self, _intensity: FeedbackIntensity) {}
}
