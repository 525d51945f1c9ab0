//! One-time cumulative achievements at fixed reveal-count thresholds.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::points::{Reward, RewardKind};

/// A one-time achievement granting a fixed reward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Revealed-item count that triggers the milestone.
    pub requirement: usize,
    pub reward: Reward,
    pub icon: String,
}

/// The fixed milestone table, ascending by requirement.
pub fn all_milestones() -> Vec<Milestone> {
    vec![
        Milestone {
            id: "explorer".to_string(),
            title: "Explorer".to_string(),
            description: "Revealed 10 items".to_string(),
            requirement: 10,
            reward: Reward::points(100, "+100 points"),
            icon: "map".to_string(),
        },
        Milestone {
            id: "connoisseur".to_string(),
            title: "Connoisseur".to_string(),
            description: "Revealed 50 items".to_string(),
            requirement: 50,
            reward: Reward::points(500, "+500 points"),
            icon: "sparkles".to_string(),
        },
        Milestone {
            id: "master".to_string(),
            title: "Master".to_string(),
            description: "Revealed 100 items".to_string(),
            requirement: 100,
            reward: Reward {
                kind: RewardKind::Combo,
                value: 1500,
                display_name: "+1500 points + Exclusive Theme".to_string(),
            },
            icon: "trophy".to_string(),
        },
    ]
}

/// Tracks which milestones have been achieved. Monotonic growth only.
#[derive(Debug, Clone)]
pub struct MilestoneTracker {
    milestones: Vec<Milestone>,
    achieved: HashSet<String>,
}

impl MilestoneTracker {
    pub fn new() -> Self {
        Self {
            milestones: all_milestones(),
            achieved: HashSet::new(),
        }
    }

    /// Rehydrate from persisted achieved ids. Unknown ids are kept; they are
    /// harmless and preserve forward compatibility with retired milestones.
    pub fn from_achieved(achieved: HashSet<String>) -> Self {
        Self {
            milestones: all_milestones(),
            achieved,
        }
    }

    pub fn achieved(&self) -> &HashSet<String> {
        &self.achieved
    }

    pub fn is_achieved(&self, id: &str) -> bool {
        self.achieved.contains(id)
    }

    /// Mark every unachieved milestone whose requirement is now met.
    /// Returns the newly achieved milestones in ascending requirement
    /// order, each exactly once across the session.
    pub fn check(&mut self, revealed_count: usize) -> Vec<Milestone> {
        let mut newly = Vec::new();
        for milestone in &self.milestones {
            if revealed_count >= milestone.requirement && !self.achieved.contains(&milestone.id) {
                self.achieved.insert(milestone.id.clone());
                newly.push(milestone.clone());
            }
        }
        newly
    }

    /// The unachieved milestone with the smallest requirement.
    pub fn next_milestone(&self) -> Option<&Milestone> {
        self.milestones
            .iter()
            .filter(|m| !self.achieved.contains(&m.id))
            .min_by_key(|m| m.requirement)
    }

    /// Fractional progress toward the next milestone; 1.0 once all are
    /// achieved.
    pub fn progress_to_next(&self, revealed_count: usize) -> f64 {
        match self.next_milestone() {
            Some(next) => (revealed_count as f64 / next.requirement as f64).min(1.0),
            None => 1.0,
        }
    }

    pub fn reset(&mut self) {
        self.achieved.clear();
    }
}

impl Default for MilestoneTracker {
    fn default() -> Self {
        Self::new()
    }
}
