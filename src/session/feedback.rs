use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

pub const WIN_PHRASES: &[&str] = &[
    "Bingo!",
    "Nailed it!",
    "Chef's kiss!",
    "Correctamundo!",
    "You got it!",
    "Boom!",
    "On the money!",
    "Well done!",
    "Spot on!",
    "Fantastic!",
    "Way to go!",
    "Awesome!",
    "Perfect!",
    "Great job!",
    "You're a star!",
];

pub const FAIL_PHRASES: &[&str] = &[
    "Oops, try again!",
    "Not quite!",
    "Missed it!",
    "Better luck next time!",
    "Close, but no cigar!",
    "Oh no!",
    "Swing and a miss!",
    "Try another guess!",
    "Not that one!",
    "Keep trying!",
    "Almost there!",
    "Nope, wrong one!",
    "Give it another shot!",
    "Better luck next round!",
    "That's not it!",
];

pub const TIMEOUT_MESSAGE: &str = "Time's up!";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeedbackKind {
    Win,
    Fail,
}

/// The overlay shown between a verdict and the following transition.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Feedback {
    pub visible: bool,
    pub kind: Option<FeedbackKind>,
    pub message: String,
}

impl Feedback {
    pub fn hidden() -> Self {
        Self::default()
    }

    pub fn show(kind: FeedbackKind, message: impl Into<String>) -> Self {
        Self {
            visible: true,
            kind: Some(kind),
            message: message.into(),
        }
    }
}

pub fn pick_phrase(kind: FeedbackKind, rng: &mut SmallRng) -> &'static str {
    let phrases = match kind {
        FeedbackKind::Win => WIN_PHRASES,
        FeedbackKind::Fail => FAIL_PHRASES,
    };
    phrases.choose(rng).copied().unwrap_or_default()
}
