//! End-to-end engine scenarios: a simulated session from first launch
//! through reveals, unlocks, milestones, and a later-day return, driving
//! the engine exclusively through its public API.

use std::rc::Rc;

use chrono::{Days, NaiveDate};
use revel_core::{
    ContentItem, EngagementEngine, FeedbackIntensity, FeedbackSink, MemoryStore, NullSink,
    PointAction, RewardKind, Tier, VisitOutcome,
};
use uuid::Uuid;

fn content(n: usize) -> Vec<ContentItem> {
    (0..n)
        .map(|index| ContentItem {
            id: Uuid::new_v4(),
            index,
        })
        .collect()
}

fn day(offset: u64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 6, 1).unwrap() + Days::new(offset)
}

/// Drive the scroll feed frame by frame down to `target` offset at 60fps,
/// querying progress for every item each frame, as a host UI would.
fn scroll_session(engine: &mut EngagementEngine, items: &[ContentItem], target: f64) {
    let frames = 120;
    let dt = 1.0 / 60.0;
    for frame in 0..=frames {
        let t = frame as f64 * dt;
        let offset = target * frame as f64 / frames as f64;
        engine.on_scroll(offset, t);
        for item in items {
            engine.progress(item.id);
        }
    }
}

#[test]
fn first_session_full_journey() {
    let store = Rc::new(MemoryStore::new());
    let mut engine = EngagementEngine::new(Box::new(Rc::clone(&store)), Box::new(NullSink));

    let outcome = engine.start_session_on(day(0));
    assert_eq!(outcome, VisitOutcome::FirstVisit);
    assert_eq!(engine.current_streak(), 1);
    assert_eq!(engine.total_points(), 200);

    let items = content(12);
    engine.setup(&items);
    scroll_session(&mut engine, &items, 3000.0);

    // All twelve cards sit above offset 3000 (last starts at 11*216 = 2376,
    // +150 reveal distance), so everything reveals.
    assert_eq!(engine.revealed_count(), 12);
    assert!(engine.has_engaged());
    assert!(engine.meets_performance_target());

    // Economy: login 200 + 12 reveals (some with velocity bonuses, all at
    // 1x) + explorer milestone 100.
    assert!(engine.total_points() >= 200 + 120 + 100);
    assert!(engine.is_tier_unlocked(Tier::Silver));
    assert!(engine.is_tier_unlocked(Tier::Gold));
    assert!(engine.is_tier_unlocked(Tier::Platinum));
    assert_eq!(engine.next_milestone().unwrap().id, "connoisseur");
    assert_eq!(engine.progress_to_next_milestone(), 12.0 / 50.0);

    // The reward queue drains FIFO and ends empty.
    let mut kinds = Vec::new();
    while let Some(reward) = engine.consume_pending_reward() {
        kinds.push(reward.kind);
    }
    assert!(kinds.contains(&RewardKind::Points));
    assert!(kinds.contains(&RewardKind::Badge));
    assert_eq!(engine.consume_pending_reward(), None);
}

#[test]
fn returning_user_streak_and_freeze_across_sessions() {
    let store = Rc::new(MemoryStore::new());

    // Day 0: first session.
    {
        let mut engine = EngagementEngine::new(Box::new(Rc::clone(&store)), Box::new(NullSink));
        assert_eq!(engine.start_session_on(day(0)), VisitOutcome::FirstVisit);
    }
    // Day 1: streak extends.
    {
        let mut engine = EngagementEngine::new(Box::new(Rc::clone(&store)), Box::new(NullSink));
        assert_eq!(engine.start_session_on(day(1)), VisitOutcome::Extended);
        assert_eq!(engine.current_streak(), 2);
    }
    // Day 3: one missed day, absorbed by the freeze.
    {
        let mut engine = EngagementEngine::new(Box::new(Rc::clone(&store)), Box::new(NullSink));
        assert_eq!(engine.start_session_on(day(3)), VisitOutcome::FreezeConsumed);
        assert_eq!(engine.current_streak(), 2);
    }
    // Day 5: another two-day gap with the freeze spent resets the streak.
    {
        let mut engine = EngagementEngine::new(Box::new(Rc::clone(&store)), Box::new(NullSink));
        assert_eq!(engine.start_session_on(day(5)), VisitOutcome::Reset);
        assert_eq!(engine.current_streak(), 1);
    }
    // Points survived every restart: four awarded logins at 1x.
    {
        let engine = EngagementEngine::new(Box::new(Rc::clone(&store)), Box::new(NullSink));
        assert_eq!(engine.total_points(), 800);
    }
}

#[test]
fn premium_spend_cycle() {
    let mut engine = EngagementEngine::in_memory();
    engine.start_session_on(day(0));

    // 200 from login; not enough for regeneration (300).
    assert!(!engine.spend(PointAction::RegenerateVariant));

    engine.award(PointAction::GenerateContent); // +100
    assert!(engine.spend(PointAction::RegenerateVariant));
    assert_eq!(engine.total_points(), 0);
}

struct CountingSink(std::cell::Cell<usize>);

impl FeedbackSink for CountingSink {
    fn notify(&self, _intensity: FeedbackIntensity) {
        self.0.set(self.0.get() + 1);
    }
}

#[test]
fn reset_wipes_store_and_feedback_stops() {
    let store = Rc::new(MemoryStore::new());
    let mut engine = EngagementEngine::new(
        Box::new(Rc::clone(&store)),
        Box::new(CountingSink(std::cell::Cell::new(0))),
    );

    engine.start_session_on(day(0));
    let items = content(5);
    engine.setup(&items);
    scroll_session(&mut engine, &items, 2000.0);
    assert!(engine.revealed_count() > 0);
    assert!(!store.is_empty());

    engine.reset_all_progress();
    assert!(store.is_empty());
    assert_eq!(engine.total_points(), 0);
    assert_eq!(engine.revealed_count(), 0);

    // Thresholds were cleared too: old ids no longer reveal.
    engine.on_scroll(10_000.0, 1000.0);
    assert_eq!(engine.progress(items[0].id), 0.0);
}
