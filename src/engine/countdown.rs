use std::time::Instant;

pub const DEFAULT_COUNTDOWN_SECS: u32 = 5;

/// Identifies one activation of a [`CountdownTimer`]. An expiry carrying a
/// token from an earlier activation must be ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerToken(u64);

struct Activation {
    token: TimerToken,
    started_at: Instant,
}

/// Per-round countdown driven by elapsed-time sampling. Each activation
/// expires at most once, and starting again always restarts from the full
/// duration.
pub struct CountdownTimer {
    duration_secs: u32,
    generation: u64,
    active: Option<Activation>,
    remaining: u32,
}

impl CountdownTimer {
    pub fn new(duration_secs: u32) -> Self {
        Self {
            duration_secs,
            generation: 0,
            active: None,
            remaining: duration_secs,
        }
    }

    /// Cancel any running activation and start a fresh one.
    pub fn start(&mut self, now: Instant) -> TimerToken {
        self.generation += 1;
        let token = TimerToken(self.generation);
        self.active = Some(Activation {
            token,
            started_at: now,
        });
        self.remaining = self.duration_secs;
        token
    }

    /// Returns true if an activation was running.
    pub fn cancel(&mut self) -> bool {
        self.active.take().is_some()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn token(&self) -> Option<TimerToken> {
        self.active.as_ref().map(|a| a.token)
    }

    /// Whole seconds left as of the last poll.
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Sample the clock. Returns the activation's token exactly once, on the
    /// poll that observes zero; the timer is inactive afterwards.
    pub fn poll(&mut self, now: Instant) -> Option<TimerToken> {
        let activation = self.active.as_ref()?;
        let elapsed = now.saturating_duration_since(activation.started_at).as_secs();
        let left = u64::from(self.duration_secs).saturating_sub(elapsed) as u32;
        self.remaining = self.remaining.min(left);
        if self.remaining == 0 {
            self.active.take().map(|a| a.token)
        } else {
            None
        }
    }
}

impl Default for CountdownTimer {
    fn default() -> Self {
        Self::new(DEFAULT_COUNTDOWN_SECS)
    }
}
