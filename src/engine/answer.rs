use serde::{Deserialize, Serialize};

use crate::session::mode::Mode;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Win,
    Fail,
}

/// Trim surrounding whitespace and lowercase ASCII letters. Internal
/// whitespace and non-ASCII characters are left as-is.
pub fn normalize(s: &str) -> String {
    s.trim().to_ascii_lowercase()
}

/// True when the input carries nothing to evaluate.
pub fn is_blank(input: &str) -> bool {
    input.trim().is_empty()
}

/// Classify `input` against the accepted answers of a round. Callers must
/// reject blank input beforehand; an empty answer set always fails.
pub fn evaluate<S: AsRef<str>>(answers: &[S], input: &str) -> Verdict {
    let guess = normalize(input);
    if answers.iter().any(|a| normalize(a.as_ref()) == guess) {
        Verdict::Win
    } else {
        Verdict::Fail
    }
}

/// Changes one verdict applies to the session counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScoreDelta {
    pub correct: u32,
    pub wrong: u32,
    pub reset_streak: bool,
    pub lives_lost: u32,
}

pub fn score(verdict: Verdict, mode: Mode) -> ScoreDelta {
    match verdict {
        Verdict::Win => ScoreDelta {
            correct: 1,
            ..ScoreDelta::default()
        },
        Verdict::Fail => ScoreDelta {
            wrong: 1,
            reset_streak: true,
            lives_lost: u32::from(mode.tracks_lives()),
            ..ScoreDelta::default()
        },
    }
}
