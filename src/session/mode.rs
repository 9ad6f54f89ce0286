use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    #[default]
    Timed,
    Classic,
    MultipleChoice,
    Survival,
}

impl Mode {
    pub const ALL: [Mode; 4] = [Mode::Timed, Mode::Classic, Mode::MultipleChoice, Mode::Survival];

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Timed => "timed",
            Mode::Classic => "classic",
            Mode::MultipleChoice => "multiple-choice",
            Mode::Survival => "survival",
        }
    }

    pub fn from_key(key: &str) -> Option<Mode> {
        Mode::ALL.into_iter().find(|m| m.as_str() == key)
    }

    pub fn label(self) -> &'static str {
        match self {
            Mode::Timed => "Timed",
            Mode::Classic => "Classic",
            Mode::MultipleChoice => "Multiple Choice",
            Mode::Survival => "Survival",
        }
    }

    /// Modes that run a per-round countdown.
    pub fn is_timed(self) -> bool {
        matches!(self, Mode::Timed | Mode::MultipleChoice)
    }

    pub fn tracks_lives(self) -> bool {
        matches!(self, Mode::Survival)
    }

    pub fn uses_choices(self) -> bool {
        matches!(self, Mode::MultipleChoice)
    }

    /// Order used by the in-game mode switch.
    pub fn next(self) -> Mode {
        match self {
            Mode::Timed => Mode::Classic,
            Mode::Classic => Mode::MultipleChoice,
            Mode::MultipleChoice => Mode::Survival,
            Mode::Survival => Mode::Timed,
        }
    }
}
