//! The engagement engine: wires the scroll/reveal pipeline to the points,
//! streak, tier, and milestone state machines.
//!
//! All mutation is frame-synchronous and single-threaded: the host delivers
//! scroll samples and user actions one event at a time, so no internal
//! locking exists. In-memory state is authoritative; every durable mutation
//! is mirrored best-effort to the injected [`PersistenceGateway`]
//! immediately afterward, and a failed write is logged, never propagated.

use std::collections::HashSet;

use chrono::{NaiveDate, Utc};
use tracing::warn;

use crate::feedback::{FeedbackIntensity, FeedbackSink, NullSink};
use crate::milestones::{Milestone, MilestoneTracker};
use crate::perf::PerformanceMonitor;
use crate::points::{PointAction, PointsLedger, Reward, StreakMultiplier};
use crate::reveal::{CardLayout, ContentId, ContentItem, RevealTracker};
use crate::scroll::{ScrollMonitor, ScrollState};
use crate::storage::{keys, PersistenceGateway, StoredValue};
use crate::streak::{StreakState, StreakTracker, VisitOutcome};
use crate::tiers::{ProgressStats, Tier, TierUnlockEngine};

/// Frame-synchronous engagement and rewards engine.
///
/// Construction rehydrates durable state from the gateway (missing or
/// corrupt values fall back to field defaults). The streak update does not
/// run implicitly; call [`start_session`](Self::start_session) once per
/// session start.
pub struct EngagementEngine {
    scroll: ScrollMonitor,
    perf: PerformanceMonitor,
    reveals: RevealTracker,
    ledger: PointsLedger,
    streak: StreakTracker,
    tiers: TierUnlockEngine,
    milestones: MilestoneTracker,
    store: Box<dyn PersistenceGateway>,
    sink: Box<dyn FeedbackSink>,
}

impl EngagementEngine {
    pub fn new(store: Box<dyn PersistenceGateway>, sink: Box<dyn FeedbackSink>) -> Self {
        Self::with_layout(store, sink, CardLayout::default())
    }

    pub fn with_layout(
        store: Box<dyn PersistenceGateway>,
        sink: Box<dyn FeedbackSink>,
        layout: CardLayout,
    ) -> Self {
        let ledger = PointsLedger::with_total(load_int(&*store, keys::TOTAL_POINTS).unwrap_or(0));
        let streak = StreakTracker::from_state(load_streak_state(&*store));
        let tiers = TierUnlockEngine::from_unlocked(load_tiers(&*store));
        let milestones = MilestoneTracker::from_achieved(load_milestones(&*store));

        Self {
            scroll: ScrollMonitor::new(),
            perf: PerformanceMonitor::new(),
            reveals: RevealTracker::with_layout(layout),
            ledger,
            streak,
            tiers,
            milestones,
            store,
            sink,
        }
    }

    /// Engine backed by a fresh in-memory store and no feedback sink.
    pub fn in_memory() -> Self {
        Self::new(
            Box::new(crate::storage::MemoryStore::new()),
            Box::new(NullSink),
        )
    }

    // ---- content supply ----

    /// Replace the tracked content set; thresholds are recomputed wholesale.
    pub fn setup(&mut self, items: &[ContentItem]) {
        self.reveals.setup(items);
    }

    // ---- scroll feed ----

    /// Feed one scroll-offset sample (at most once per rendered frame).
    /// `timestamp` is seconds on the host's monotonic clock.
    pub fn on_scroll(&mut self, offset: f64, timestamp: f64) {
        self.scroll.record(offset, timestamp);
        self.perf.record_frame(timestamp);
    }

    // ---- queries ----

    /// Reveal progress in [0, 1] for an item at the current scroll offset.
    /// A first crossing of full reveal triggers the reward chain. Unknown
    /// ids yield 0.0 with no side effect.
    pub fn progress(&mut self, id: ContentId) -> f64 {
        let (progress, newly_revealed) = self.reveals.progress(id, self.scroll.offset());
        if newly_revealed {
            self.handle_reveal();
        }
        progress
    }

    pub fn is_revealed(&self, id: ContentId) -> bool {
        self.reveals.is_revealed(id)
    }

    pub fn revealed_count(&self) -> usize {
        self.reveals.revealed_count()
    }

    pub fn overall_reveal_progress(&self) -> f64 {
        self.reveals.overall_progress()
    }

    pub fn meets_performance_target(&self) -> bool {
        self.perf.meets_target()
    }

    pub fn avg_fps(&self) -> f64 {
        self.perf.avg_fps()
    }

    pub fn scroll_state(&self) -> &ScrollState {
        self.scroll.state()
    }

    pub fn has_engaged(&self) -> bool {
        self.scroll.has_engaged()
    }

    pub fn total_points(&self) -> i64 {
        self.ledger.total_points()
    }

    pub fn current_streak(&self) -> u32 {
        self.streak.current_streak()
    }

    pub fn streak_multiplier(&self) -> f64 {
        StreakMultiplier(self.streak.current_streak()).multiplier()
    }

    pub fn streak_icon(&self) -> &'static str {
        self.streak.streak_icon()
    }

    pub fn is_tier_unlocked(&self, tier: Tier) -> bool {
        self.tiers.is_unlocked(tier)
    }

    pub fn unlocked_tiers(&self) -> &HashSet<Tier> {
        self.tiers.unlocked()
    }

    pub fn next_milestone(&self) -> Option<&Milestone> {
        self.milestones.next_milestone()
    }

    pub fn progress_to_next_milestone(&self) -> f64 {
        self.milestones.progress_to_next(self.reveals.revealed_count())
    }

    // ---- actions ----

    /// Award an earning action at the current streak multiplier. Returns
    /// the points granted.
    pub fn award(&mut self, action: PointAction) -> i64 {
        let granted = self.ledger.award(action, self.streak.current_streak());
        self.persist_points();
        self.evaluate_tiers();
        granted
    }

    /// Award plus a bonus keyed to the current scroll velocity.
    pub fn award_with_velocity_bonus(&mut self, action: PointAction) -> i64 {
        let (granted, bonus) = self.ledger.award_with_velocity_bonus(
            action,
            self.streak.current_streak(),
            self.scroll.velocity(),
        );
        self.persist_points();
        self.evaluate_tiers();
        granted + bonus
    }

    /// Spend points on a premium action. Returns false (no mutation) when
    /// the balance is insufficient.
    pub fn spend(&mut self, action: PointAction) -> bool {
        if !self.ledger.spend(action) {
            return false;
        }
        self.persist_points();
        true
    }

    pub fn consume_pending_reward(&mut self) -> Option<Reward> {
        self.ledger.consume_pending_reward()
    }

    pub fn clear_pending_rewards(&mut self) {
        self.ledger.clear_pending_rewards();
    }

    pub fn pending_reward_count(&self) -> usize {
        self.ledger.pending_count()
    }

    // ---- session lifecycle ----

    /// Run the daily streak update for today (UTC). Call once per session
    /// start.
    pub fn start_session(&mut self) -> VisitOutcome {
        self.start_session_on(Utc::now().date_naive())
    }

    /// Streak update with an explicit date, for hosts with their own clock.
    pub fn start_session_on(&mut self, today: NaiveDate) -> VisitOutcome {
        let outcome = self.streak.observe_visit(today);
        self.persist_streak();

        if outcome.awards_daily_login() {
            self.ledger
                .award(PointAction::DailyLogin, self.streak.current_streak());
            self.persist_points();
        }
        self.evaluate_tiers();
        outcome
    }

    /// Clear all in-memory state to defaults and remove every namespaced
    /// persistence key.
    pub fn reset_all_progress(&mut self) {
        self.scroll.reset();
        self.perf.reset();
        self.reveals.reset();
        self.ledger.reset();
        self.streak.reset();
        self.tiers.reset();
        self.milestones.reset();

        for key in keys::ALL {
            if let Err(err) = self.store.remove(key) {
                warn!(key, error = %err, "failed to remove persisted key during reset");
            }
        }
    }

    // ---- reveal side-effect chain ----

    fn handle_reveal(&mut self) {
        self.ledger.award_with_velocity_bonus(
            PointAction::ScrollReveal,
            self.streak.current_streak(),
            self.scroll.velocity(),
        );
        self.persist_points();

        self.evaluate_tiers();
        self.check_milestones();

        self.sink.notify(FeedbackIntensity::Light);
    }

    fn evaluate_tiers(&mut self) {
        let stats = self.progress_stats();
        let newly = self.tiers.evaluate(&stats);
        if newly.is_empty() {
            return;
        }

        for tier in newly {
            self.ledger
                .enqueue(Reward::badge(format!("{} Tier Unlocked!", tier.display_name())));
            self.sink.notify(FeedbackIntensity::Medium);
        }
        self.persist_tiers();
    }

    fn check_milestones(&mut self) {
        let newly = self.milestones.check(self.reveals.revealed_count());
        if newly.is_empty() {
            return;
        }

        for milestone in newly {
            self.ledger.grant(milestone.reward.clone());
            self.sink.notify(FeedbackIntensity::Success);
        }
        self.persist_milestones();
        self.persist_points();
        // Milestone points can tip a tier requirement.
        self.evaluate_tiers();
    }

    fn progress_stats(&self) -> ProgressStats {
        ProgressStats {
            revealed_count: self.reveals.revealed_count(),
            points: self.ledger.total_points(),
            streak: self.streak.current_streak(),
        }
    }

    // ---- persistence mirroring (best-effort) ----

    fn best_effort_set(&self, key: &'static str, value: StoredValue) {
        if let Err(err) = self.store.set(key, value) {
            warn!(key, error = %err, "best-effort persistence write failed");
        }
    }

    fn best_effort_remove(&self, key: &'static str) {
        if let Err(err) = self.store.remove(key) {
            warn!(key, error = %err, "best-effort persistence remove failed");
        }
    }

    fn persist_points(&self) {
        self.best_effort_set(keys::TOTAL_POINTS, StoredValue::Int(self.ledger.total_points()));
    }

    fn persist_streak(&self) {
        let state = self.streak.state();
        self.best_effort_set(
            keys::CURRENT_STREAK,
            StoredValue::Int(state.current_streak as i64),
        );
        self.best_effort_set(keys::FREEZE_USED, StoredValue::Bool(state.freeze_used));
        match state.last_visit {
            Some(date) => {
                self.best_effort_set(keys::LAST_VISIT_DATE, StoredValue::Text(date.to_string()))
            }
            None => self.best_effort_remove(keys::LAST_VISIT_DATE),
        }
        match state.freeze_reset {
            Some(date) => {
                self.best_effort_set(keys::FREEZE_RESET_DATE, StoredValue::Text(date.to_string()))
            }
            None => self.best_effort_remove(keys::FREEZE_RESET_DATE),
        }
    }

    fn persist_tiers(&self) {
        match serde_json::to_vec(self.tiers.unlocked()) {
            Ok(blob) => self.best_effort_set(keys::UNLOCKED_TIERS, StoredValue::Blob(blob)),
            Err(err) => warn!(error = %err, "failed to encode unlocked tiers"),
        }
    }

    fn persist_milestones(&self) {
        let ids: Vec<&String> = self.milestones.achieved().iter().collect();
        match serde_json::to_vec(&ids) {
            Ok(blob) => self.best_effort_set(keys::ACHIEVED_MILESTONES, StoredValue::Blob(blob)),
            Err(err) => warn!(error = %err, "failed to encode achieved milestones"),
        }
    }
}

// ---- rehydration (corrupt or missing values decode to defaults) ----

fn load_int(store: &dyn PersistenceGateway, key: &str) -> Option<i64> {
    match store.get(key) {
        Ok(value) => value.and_then(|v| v.as_int()),
        Err(err) => {
            warn!(key, error = %err, "failed to read persisted value; using default");
            None
        }
    }
}

fn load_bool(store: &dyn PersistenceGateway, key: &str) -> Option<bool> {
    match store.get(key) {
        Ok(value) => value.and_then(|v| v.as_bool()),
        Err(err) => {
            warn!(key, error = %err, "failed to read persisted value; using default");
            None
        }
    }
}

fn load_date(store: &dyn PersistenceGateway, key: &str) -> Option<NaiveDate> {
    match store.get(key) {
        Ok(value) => value
            .as_ref()
            .and_then(|v| v.as_text())
            .and_then(|text| text.parse().ok()),
        Err(err) => {
            warn!(key, error = %err, "failed to read persisted value; using default");
            None
        }
    }
}

fn load_streak_state(store: &dyn PersistenceGateway) -> StreakState {
    StreakState {
        current_streak: load_int(store, keys::CURRENT_STREAK)
            .and_then(|v| u32::try_from(v).ok())
            .unwrap_or(0),
        last_visit: load_date(store, keys::LAST_VISIT_DATE),
        freeze_used: load_bool(store, keys::FREEZE_USED).unwrap_or(false),
        freeze_reset: load_date(store, keys::FREEZE_RESET_DATE),
    }
}

fn load_tiers(store: &dyn PersistenceGateway) -> HashSet<Tier> {
    let blob = match store.get(keys::UNLOCKED_TIERS) {
        Ok(Some(StoredValue::Blob(blob))) => blob,
        Ok(_) => return HashSet::from([Tier::Bronze]),
        Err(err) => {
            warn!(error = %err, "failed to read unlocked tiers; using default");
            return HashSet::from([Tier::Bronze]);
        }
    };
    serde_json::from_slice(&blob).unwrap_or_else(|err| {
        warn!(error = %err, "corrupt unlocked-tier blob; using default");
        HashSet::from([Tier::Bronze])
    })
}

fn load_milestones(store: &dyn PersistenceGateway) -> HashSet<String> {
    let blob = match store.get(keys::ACHIEVED_MILESTONES) {
        Ok(Some(StoredValue::Blob(blob))) => blob,
        Ok(_) => return HashSet::new(),
        Err(err) => {
            warn!(error = %err, "failed to read achieved milestones; using default");
            return HashSet::new();
        }
    };
    let ids: Vec<String> = serde_json::from_slice(&blob).unwrap_or_else(|err| {
        warn!(error = %err, "corrupt milestone blob; using default");
        Vec::new()
    });
    ids.into_iter().collect()
}
