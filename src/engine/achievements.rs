use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::mode::Mode;
use crate::session::stats::SessionStats;

const MODE_COMPLETE_ROUNDS: u32 = 10;

pub struct Achievement {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    predicate: fn(&SessionStats, Mode) -> bool,
}

impl Achievement {
    pub fn is_met(&self, stats: &SessionStats, mode: Mode) -> bool {
        (self.predicate)(stats, mode)
    }
}

pub const ACHIEVEMENTS: &[Achievement] = &[
    Achievement {
        id: "streak_10",
        name: "Streak Master",
        description: "Achieve a streak of 10 correct answers",
        predicate: |stats, _| stats.streak >= 10,
    },
    Achievement {
        id: "timed_complete",
        name: "Timed Champion",
        description: "Complete a game in Timed mode",
        predicate: |stats, mode| mode == Mode::Timed && stats.rounds_played >= MODE_COMPLETE_ROUNDS,
    },
    Achievement {
        id: "classic_complete",
        name: "Classic Finisher",
        description: "Complete a game in Classic mode",
        predicate: |stats, mode| {
            mode == Mode::Classic && stats.rounds_played >= MODE_COMPLETE_ROUNDS
        },
    },
    Achievement {
        id: "multiple_choice_complete",
        name: "Choice Conqueror",
        description: "Complete a game in Multiple Choice mode",
        predicate: |stats, mode| {
            mode == Mode::MultipleChoice && stats.rounds_played >= MODE_COMPLETE_ROUNDS
        },
    },
    Achievement {
        id: "correct_20",
        name: "Sharp Eye",
        description: "Get 20 correct answers",
        predicate: |stats, _| stats.correct >= 20,
    },
];

pub fn find(id: &str) -> Option<&'static Achievement> {
    ACHIEVEMENTS.iter().find(|a| a.id == id)
}

/// Persisted record of an unlock. Older saves may carry only `unlocked`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlockedAchievement {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub unlocked: DateTime<Utc>,
}

pub type AchievementLog = BTreeMap<String, UnlockedAchievement>;

/// Return `prior` plus every achievement newly satisfied by `(stats, mode)`,
/// stamped with `now`. Existing entries are never touched.
pub fn check_achievements(
    stats: &SessionStats,
    mode: Mode,
    prior: &AchievementLog,
    now: DateTime<Utc>,
) -> AchievementLog {
    let mut updated = prior.clone();
    for achievement in ACHIEVEMENTS {
        if updated.contains_key(achievement.id) || !achievement.is_met(stats, mode) {
            continue;
        }
        updated.insert(
            achievement.id.to_string(),
            UnlockedAchievement {
                id: achievement.id.to_string(),
                name: achievement.name.to_string(),
                description: achievement.description.to_string(),
                unlocked: now,
            },
        );
    }
    updated
}

/// Entries present in `updated` but not in `prior`.
pub fn newly_unlocked(prior: &AchievementLog, updated: &AchievementLog) -> Vec<UnlockedAchievement> {
    updated
        .iter()
        .filter(|(id, _)| !prior.contains_key(*id))
        .map(|(_, entry)| entry.clone())
        .collect()
}
