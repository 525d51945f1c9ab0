//! Daily streak continuation with a weekly-replenished freeze.
//!
//! Runs once per session start. The freeze covers exactly one missed day
//! (a 2-day gap); larger gaps reset the streak regardless of freeze
//! availability, matching the established economy behavior.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::points::StreakMultiplier;

/// Days between freeze replenishments.
const FREEZE_REPLENISH_DAYS: i64 = 7;

/// Persisted streak state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakState {
    pub current_streak: u32,
    pub last_visit: Option<NaiveDate>,
    pub freeze_used: bool,
    pub freeze_reset: Option<NaiveDate>,
}

/// What a visit observation did, so the adapter knows which fields to
/// mirror and whether to award the daily-login action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitOutcome {
    /// First visit ever recorded.
    FirstVisit,
    /// Same calendar day; nothing changed.
    SameDay,
    /// Consecutive day; streak incremented.
    Extended,
    /// One missed day absorbed by the freeze; streak held.
    FreezeConsumed,
    /// Gap too large (or freeze spent); streak restarted at 1.
    Reset,
}

impl VisitOutcome {
    /// Every outcome except a same-day revisit grants the daily login.
    pub fn awards_daily_login(&self) -> bool {
        !matches!(self, VisitOutcome::SameDay)
    }
}

/// Computes day-over-day streak transitions.
#[derive(Debug, Clone, Default)]
pub struct StreakTracker {
    state: StreakState,
}

impl StreakTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_state(state: StreakState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &StreakState {
        &self.state
    }

    pub fn current_streak(&self) -> u32 {
        self.state.current_streak
    }

    pub fn multiplier(&self) -> f64 {
        StreakMultiplier(self.state.current_streak).multiplier()
    }

    /// Flame icon for the presentation layer.
    pub fn streak_icon(&self) -> &'static str {
        match self.state.current_streak {
            3..=6 => "\u{1F525}\u{1F525}",
            7.. => "\u{1F525}\u{1F525}\u{1F525}",
            _ => "\u{1F525}",
        }
    }

    /// Apply the streak table for a visit on `today`, then replenish the
    /// freeze if a week has passed since the last replenishment.
    pub fn observe_visit(&mut self, today: NaiveDate) -> VisitOutcome {
        let outcome = match self.state.last_visit {
            None => {
                self.state.current_streak = 1;
                self.state.last_visit = Some(today);
                VisitOutcome::FirstVisit
            }
            Some(last) => {
                let days_since = (today - last).num_days();
                match days_since {
                    0 => VisitOutcome::SameDay,
                    1 => {
                        self.state.current_streak += 1;
                        self.state.last_visit = Some(today);
                        VisitOutcome::Extended
                    }
                    2 if !self.state.freeze_used => {
                        // Streak held; freeze spent.
                        self.state.freeze_used = true;
                        self.state.last_visit = Some(today);
                        VisitOutcome::FreezeConsumed
                    }
                    _ => {
                        self.state.current_streak = 1;
                        self.state.freeze_used = false;
                        self.state.last_visit = Some(today);
                        VisitOutcome::Reset
                    }
                }
            }
        };

        self.replenish_freeze_if_due(today);
        outcome
    }

    fn replenish_freeze_if_due(&mut self, today: NaiveDate) {
        let due = match self.state.freeze_reset {
            None => true,
            Some(last_reset) => (today - last_reset).num_days() >= FREEZE_REPLENISH_DAYS,
        };
        if due {
            self.state.freeze_used = false;
            self.state.freeze_reset = Some(today);
        }
    }

    pub fn reset(&mut self) {
        self.state = StreakState::default();
    }
}
