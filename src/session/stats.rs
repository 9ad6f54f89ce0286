use serde::{Deserialize, Serialize};

use crate::engine::answer::ScoreDelta;

/// Cumulative counters for the current run. Persisted as
/// `{correct, wrong, streak, rounds}`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub correct: u32,
    pub wrong: u32,
    pub streak: u32,
    #[serde(rename = "rounds", alias = "roundsPlayed")]
    pub rounds_played: u32,
}

impl SessionStats {
    pub fn apply(&mut self, delta: &ScoreDelta) {
        self.correct += delta.correct;
        self.wrong += delta.wrong;
        if delta.reset_streak {
            self.streak = 0;
        } else {
            self.streak += delta.correct;
        }
        self.rounds_played += 1;
    }

    pub fn accuracy(&self) -> f64 {
        if self.rounds_played == 0 {
            return 0.0;
        }
        self.correct as f64 / self.rounds_played as f64 * 100.0
    }
}
