//! Feature-tier unlocks gated by a boolean requirement tree.
//!
//! Tiers are monotonic: once unlocked they are never revoked, even if the
//! stats that triggered the unlock later regress.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// A named, irrevocable feature-unlock level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Bronze,
    Silver,
    Gold,
    Platinum,
}

impl Tier {
    pub const ALL: [Tier; 4] = [Tier::Bronze, Tier::Silver, Tier::Gold, Tier::Platinum];

    pub fn display_name(&self) -> &'static str {
        match self {
            Tier::Bronze => "Bronze",
            Tier::Silver => "Silver",
            Tier::Gold => "Gold",
            Tier::Platinum => "Platinum",
        }
    }

    pub fn unlock_requirement(&self) -> UnlockRequirement {
        match self {
            Tier::Bronze => UnlockRequirement::None,
            Tier::Silver => UnlockRequirement::ItemsRevealed(3),
            Tier::Gold => UnlockRequirement::either(
                UnlockRequirement::ItemsRevealed(6),
                UnlockRequirement::Points(500),
            ),
            Tier::Platinum => UnlockRequirement::either(
                UnlockRequirement::ItemsRevealed(10),
                UnlockRequirement::Streak(3),
            ),
        }
    }
}

/// Engagement stats a requirement tree is evaluated against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressStats {
    pub revealed_count: usize,
    pub points: i64,
    pub streak: u32,
}

/// Recursive boolean requirement: leaf predicates over [`ProgressStats`]
/// combined with `Either` (OR) and `Both` (AND). Requirement trees are
/// static configuration, not persisted state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnlockRequirement {
    None,
    ItemsRevealed(usize),
    Points(i64),
    Streak(u32),
    Either(Box<UnlockRequirement>, Box<UnlockRequirement>),
    Both(Box<UnlockRequirement>, Box<UnlockRequirement>),
}

impl UnlockRequirement {
    pub fn either(a: UnlockRequirement, b: UnlockRequirement) -> Self {
        UnlockRequirement::Either(Box::new(a), Box::new(b))
    }

    pub fn both(a: UnlockRequirement, b: UnlockRequirement) -> Self {
        UnlockRequirement::Both(Box::new(a), Box::new(b))
    }

    /// Pure fold over the requirement tree.
    pub fn is_met(&self, stats: &ProgressStats) -> bool {
        match self {
            UnlockRequirement::None => true,
            UnlockRequirement::ItemsRevealed(n) => stats.revealed_count >= *n,
            UnlockRequirement::Points(n) => stats.points >= *n,
            UnlockRequirement::Streak(n) => stats.streak >= *n,
            UnlockRequirement::Either(a, b) => a.is_met(stats) || b.is_met(stats),
            UnlockRequirement::Both(a, b) => a.is_met(stats) && b.is_met(stats),
        }
    }

    /// Human-readable requirement description.
    pub fn description(&self) -> String {
        match self {
            UnlockRequirement::None => "Always available".to_string(),
            UnlockRequirement::ItemsRevealed(n) => format!("Reveal {n} items"),
            UnlockRequirement::Points(n) => format!("{n} points"),
            UnlockRequirement::Streak(n) => format!("{n}-day streak"),
            UnlockRequirement::Either(a, b) => {
                format!("{} OR {}", a.description(), b.description())
            }
            UnlockRequirement::Both(a, b) => {
                format!("{} AND {}", a.description(), b.description())
            }
        }
    }
}

/// Evaluates tier requirements and holds the unlocked set.
#[derive(Debug, Clone)]
pub struct TierUnlockEngine {
    unlocked: HashSet<Tier>,
}

impl TierUnlockEngine {
    /// Fresh engine; bronze is always unlocked.
    pub fn new() -> Self {
        Self {
            unlocked: HashSet::from([Tier::Bronze]),
        }
    }

    /// Rehydrate from a persisted set. Bronze is re-inserted if the stored
    /// set was corrupt enough to omit it.
    pub fn from_unlocked(mut unlocked: HashSet<Tier>) -> Self {
        unlocked.insert(Tier::Bronze);
        Self { unlocked }
    }

    pub fn is_unlocked(&self, tier: Tier) -> bool {
        self.unlocked.contains(&tier)
    }

    pub fn unlocked(&self) -> &HashSet<Tier> {
        &self.unlocked
    }

    /// Evaluate all still-locked tiers against the stats; returns the tiers
    /// newly unlocked by this call, in tier order.
    pub fn evaluate(&mut self, stats: &ProgressStats) -> Vec<Tier> {
        let mut newly = Vec::new();
        for tier in Tier::ALL {
            if !self.unlocked.contains(&tier) && tier.unlock_requirement().is_met(stats) {
                self.unlocked.insert(tier);
                newly.push(tier);
            }
        }
        newly
    }

    pub fn reset(&mut self) {
        self.unlocked = HashSet::from([Tier::Bronze]);
    }
}

impl Default for TierUnlockEngine {
    fn default() -> Self {
        Self::new()
    }
}
