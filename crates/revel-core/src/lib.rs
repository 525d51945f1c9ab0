//! # Revel Core Library
//!
//! This library provides the progressive engagement and rewards engine for
//! Revel. It converts a continuous per-frame scroll signal into discrete
//! content-reveal events, derives a points/streak economy from those events,
//! and gates feature tiers and milestones behind accumulated engagement,
//! all within an interactive 60-updates-per-second budget.
//!
//! ## Architecture
//!
//! - **Engine**: [`EngagementEngine`] is a frame-synchronous adapter that
//!   owns the component state machines, mirrors durable state to an
//!   injected [`PersistenceGateway`] on every mutation, and fires a
//!   [`FeedbackSink`] on reveal, tier, and milestone events
//! - **Pipeline**: scroll samples update [`ScrollMonitor`] and
//!   [`PerformanceMonitor`]; reveal queries run against the precomputed
//!   thresholds in [`RevealTracker`]
//! - **Economy**: [`PointsLedger`], [`StreakTracker`], [`TierUnlockEngine`],
//!   and [`MilestoneTracker`] are pure state machines, unit-testable
//!   without a storage backend
//!
//! The host UI layer is an external collaborator: it samples scroll
//! position once per rendered frame, drains the pending-reward queue, and
//! dispatches haptics. This crate has no dependency on any rendering
//! framework.

pub mod engine;
pub mod error;
pub mod feedback;
pub mod milestones;
pub mod perf;
pub mod points;
pub mod reveal;
pub mod scroll;
pub mod storage;
pub mod streak;
pub mod tiers;

pub use engine::EngagementEngine;
pub use error::StorageError;
pub use feedback::{FeedbackIntensity, FeedbackSink, NullSink};
pub use milestones::{Milestone, MilestoneTracker};
pub use perf::PerformanceMonitor;
pub use points::{PointAction, PointsLedger, Reward, RewardKind, StreakMultiplier, VelocityBonus};
pub use reveal::{CardLayout, ContentId, ContentItem, RevealThreshold, RevealTracker};
pub use scroll::{ScrollDirection, ScrollMonitor, ScrollState};
pub use storage::{MemoryStore, PersistenceGateway, StoredValue};
pub use streak::{StreakState, StreakTracker, VisitOutcome};
pub use tiers::{ProgressStats, Tier, TierUnlockEngine, UnlockRequirement};
