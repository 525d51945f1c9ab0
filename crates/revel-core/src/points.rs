//! Points economy: earning/spending actions, streak multiplier, velocity
//! bonuses, and the pending-reward queue drained by the presentation layer.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// User actions that earn or spend points. The sign of the base value is
/// fixed per action: positive values earn, negative values spend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointAction {
    ScrollReveal,
    CopyContent,
    RateContent,
    GenerateContent,
    DailyLogin,
    UnlockPremium,
    RegenerateVariant,
    ExtraAlternatives,
    PriorityAnalysis,
}

impl PointAction {
    /// Base point value; negative for spending actions.
    pub fn base_value(&self) -> i64 {
        match self {
            PointAction::ScrollReveal => 10,
            PointAction::CopyContent => 25,
            PointAction::RateContent => 50,
            PointAction::GenerateContent => 100,
            PointAction::DailyLogin => 200,
            PointAction::UnlockPremium => -500,
            PointAction::RegenerateVariant => -300,
            PointAction::ExtraAlternatives => -400,
            PointAction::PriorityAnalysis => -1000,
        }
    }

    pub fn is_earning(&self) -> bool {
        self.base_value() > 0
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PointAction::ScrollReveal => "Scroll Reveal",
            PointAction::CopyContent => "Copy",
            PointAction::RateContent => "Rate",
            PointAction::GenerateContent => "Generate",
            PointAction::DailyLogin => "Daily Login",
            PointAction::UnlockPremium => "Unlock Premium",
            PointAction::RegenerateVariant => "Regenerate",
            PointAction::ExtraAlternatives => "Extra Alternatives",
            PointAction::PriorityAnalysis => "Priority Processing",
        }
    }
}

/// Earning multiplier derived from the current daily streak.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakMultiplier(pub u32);

impl StreakMultiplier {
    pub fn multiplier(&self) -> f64 {
        match self.0 {
            0..=2 => 1.0,
            3..=6 => 2.0,
            _ => 3.0,
        }
    }

    pub fn display_text(&self) -> &'static str {
        match self.0 {
            0..=2 => "",
            3..=6 => "2x Multiplier!",
            _ => "3x Multiplier!",
        }
    }
}

/// Extra points keyed to the scroll speed that completed a reveal: fast
/// flicks earn a small bonus, slow deliberate reading a larger one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VelocityBonus {
    None,
    Speed,
    Thoughtful,
}

impl VelocityBonus {
    /// Classify a scroll velocity (units/sec, sign ignored).
    pub fn for_velocity(velocity: f64) -> Self {
        let speed = velocity.abs();
        if speed > 500.0 {
            VelocityBonus::Speed
        } else if speed > 0.0 && speed < 100.0 {
            VelocityBonus::Thoughtful
        } else {
            VelocityBonus::None
        }
    }

    pub fn points(&self) -> i64 {
        match self {
            VelocityBonus::None => 0,
            VelocityBonus::Speed => 5,
            VelocityBonus::Thoughtful => 10,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            VelocityBonus::None => "",
            VelocityBonus::Speed => "Speed Bonus",
            VelocityBonus::Thoughtful => "Thoughtful Bonus",
        }
    }
}

/// Kind of a queued reward notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardKind {
    Points,
    Badge,
    Theme,
    /// Multiple rewards bundled into one grant.
    Combo,
}

/// An immutable, UI-consumable notification describing a grant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reward {
    pub kind: RewardKind,
    /// Points amount, or 0 for pure badge/theme grants.
    pub value: i64,
    pub display_name: String,
}

impl Reward {
    pub fn points(value: i64, display_name: impl Into<String>) -> Self {
        Self {
            kind: RewardKind::Points,
            value,
            display_name: display_name.into(),
        }
    }

    pub fn badge(display_name: impl Into<String>) -> Self {
        Self {
            kind: RewardKind::Badge,
            value: 0,
            display_name: display_name.into(),
        }
    }
}

/// The points ledger: total balance plus the FIFO pending-reward queue.
///
/// `total_points` never goes negative; a spend that would overdraw is
/// rejected without mutation.
#[derive(Debug, Clone, Default)]
pub struct PointsLedger {
    total_points: i64,
    pending_rewards: VecDeque<Reward>,
}

impl PointsLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rehydrate from a persisted balance. Negative persisted values are
    /// treated as corrupt and default to zero.
    pub fn with_total(total_points: i64) -> Self {
        Self {
            total_points: total_points.max(0),
            pending_rewards: VecDeque::new(),
        }
    }

    pub fn total_points(&self) -> i64 {
        self.total_points
    }

    /// Award an earning action at the given streak. Returns the points
    /// actually granted after the multiplier.
    pub fn award(&mut self, action: PointAction, streak: u32) -> i64 {
        let base = action.base_value();
        let final_points = (base as f64 * StreakMultiplier(streak).multiplier()).round() as i64;

        self.total_points += final_points;
        self.pending_rewards
            .push_back(Reward::points(final_points, format!("+{final_points} points")));
        final_points
    }

    /// Award plus a velocity bonus enqueued as a separate reward when
    /// nonzero. Returns (awarded, bonus).
    pub fn award_with_velocity_bonus(
        &mut self,
        action: PointAction,
        streak: u32,
        velocity: f64,
    ) -> (i64, i64) {
        let awarded = self.award(action, streak);

        let bonus = VelocityBonus::for_velocity(velocity);
        let bonus_points = bonus.points();
        if bonus_points > 0 {
            self.total_points += bonus_points;
            self.pending_rewards.push_back(Reward::points(
                bonus_points,
                format!("{} +{bonus_points}", bonus.display_name()),
            ));
        }
        (awarded, bonus_points)
    }

    /// Deduct the action's cost. Returns false (no mutation) when the
    /// balance is insufficient.
    pub fn spend(&mut self, action: PointAction) -> bool {
        let cost = action.base_value().abs();
        if self.total_points < cost {
            return false;
        }
        self.total_points -= cost;
        true
    }

    /// Credit milestone points directly (no multiplier) and queue the
    /// milestone's own reward.
    pub fn grant(&mut self, reward: Reward) {
        self.total_points += reward.value;
        self.pending_rewards.push_back(reward);
    }

    /// Queue a reward that carries no point value (badges, themes).
    pub fn enqueue(&mut self, reward: Reward) {
        self.pending_rewards.push_back(reward);
    }

    /// Dequeue the oldest pending reward, if any.
    pub fn consume_pending_reward(&mut self) -> Option<Reward> {
        self.pending_rewards.pop_front()
    }

    pub fn clear_pending_rewards(&mut self) {
        self.pending_rewards.clear();
    }

    pub fn pending_count(&self) -> usize {
        self.pending_rewards.len()
    }

    pub fn reset(&mut self) {
        self.total_points = 0;
        self.pending_rewards.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_values() {
        assert_eq!(PointAction::ScrollReveal.base_value(), 10);
        assert_eq!(PointAction::DailyLogin.base_value(), 200);
        assert_eq!(PointAction::PriorityAnalysis.base_value(), -1000);
        assert!(PointAction::RateContent.is_earning());
        assert!(!PointAction::UnlockPremium.is_earning());
    }

    #[test]
    fn test_multiplier_table() {
        assert_eq!(StreakMultiplier(0).multiplier(), 1.0);
        assert_eq!(StreakMultiplier(2).multiplier(), 1.0);
        assert_eq!(StreakMultiplier(3).multiplier(), 2.0);
        assert_eq!(StreakMultiplier(5).multiplier(), 2.0);
        assert_eq!(StreakMultiplier(7).multiplier(), 3.0);
        assert_eq!(StreakMultiplier(10).multiplier(), 3.0);
    }

    #[test]
    fn test_award_applies_multiplier() {
        let mut ledger = PointsLedger::new();
        let granted = ledger.award(PointAction::ScrollReveal, 5);
        assert_eq!(granted, 20); // 10 * 2x
        assert_eq!(ledger.total_points(), 20);

        let reward = ledger.consume_pending_reward().unwrap();
        assert_eq!(reward.kind, RewardKind::Points);
        assert_eq!(reward.value, 20);
    }

    #[test]
    fn test_velocity_bonus_table() {
        assert_eq!(VelocityBonus::for_velocity(600.0).points(), 5);
        assert_eq!(VelocityBonus::for_velocity(-600.0).points(), 5);
        assert_eq!(VelocityBonus::for_velocity(50.0).points(), 10);
        assert_eq!(VelocityBonus::for_velocity(300.0).points(), 0);
        assert_eq!(VelocityBonus::for_velocity(0.0).points(), 0);
    }

    #[test]
    fn test_award_with_velocity_bonus_queues_separately() {
        let mut ledger = PointsLedger::new();
        let (awarded, bonus) = ledger.award_with_velocity_bonus(PointAction::ScrollReveal, 0, 50.0);
        assert_eq!(awarded, 10);
        assert_eq!(bonus, 10);
        assert_eq!(ledger.total_points(), 20);
        assert_eq!(ledger.pending_count(), 2);

        let first = ledger.consume_pending_reward().unwrap();
        assert_eq!(first.value, 10);
        let second = ledger.consume_pending_reward().unwrap();
        assert!(second.display_name.contains("Thoughtful"));
    }

    #[test]
    fn test_no_bonus_reward_when_zero() {
        let mut ledger = PointsLedger::new();
        ledger.award_with_velocity_bonus(PointAction::ScrollReveal, 0, 300.0);
        assert_eq!(ledger.pending_count(), 1);
        assert_eq!(ledger.total_points(), 10);
    }

    #[test]
    fn test_spend_guard() {
        let mut ledger = PointsLedger::with_total(400);
        assert!(!ledger.spend(PointAction::UnlockPremium)); // costs 500
        assert_eq!(ledger.total_points(), 400);

        assert!(ledger.spend(PointAction::RegenerateVariant)); // costs 300
        assert_eq!(ledger.total_points(), 100);
    }

    #[test]
    fn test_rewards_are_fifo() {
        let mut ledger = PointsLedger::new();
        ledger.award(PointAction::ScrollReveal, 0);
        ledger.award(PointAction::CopyContent, 0);
        assert_eq!(ledger.consume_pending_reward().unwrap().value, 10);
        assert_eq!(ledger.consume_pending_reward().unwrap().value, 25);
        assert!(ledger.consume_pending_reward().is_none());
    }

    #[test]
    fn test_corrupt_negative_balance_defaults_to_zero() {
        let ledger = PointsLedger::with_total(-50);
        assert_eq!(ledger.total_points(), 0);
    }
}
