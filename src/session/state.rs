use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use rand::rngs::SmallRng;

use crate::catalog::{RoundCatalog, RoundRecord};
use crate::config::Config;
use crate::engine::achievements::{AchievementLog, UnlockedAchievement, check_achievements, newly_unlocked};
use crate::engine::answer::{self, Verdict};
use crate::engine::choices::generate_choices;
use crate::engine::countdown::{CountdownTimer, DEFAULT_COUNTDOWN_SECS, TimerToken};
use crate::session::feedback::{Feedback, FeedbackKind, TIMEOUT_MESSAGE, pick_phrase};
use crate::session::mode::Mode;
use crate::session::stats::SessionStats;

pub const STARTING_LIVES: u32 = 3;

/// Timing and lives constants a session is played with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionRules {
    pub countdown_secs: u32,
    pub win_delay: Duration,
    pub fail_delay: Duration,
    pub starting_lives: u32,
}

impl Default for SessionRules {
    fn default() -> Self {
        Self {
            countdown_secs: DEFAULT_COUNTDOWN_SECS,
            win_delay: Duration::from_millis(900),
            fail_delay: Duration::from_millis(1000),
            starting_lives: STARTING_LIVES,
        }
    }
}

impl From<&Config> for SessionRules {
    fn from(config: &Config) -> Self {
        Self {
            countdown_secs: config.countdown_secs,
            win_delay: Duration::from_millis(config.win_delay_ms),
            fail_delay: Duration::from_millis(config.fail_delay_ms),
            starting_lives: config.starting_lives,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// The catalog is empty; nothing is playable.
    AwaitingContent,
    AwaitingInput,
    Feedback(FeedbackKind),
    Complete,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailCause {
    Wrong,
    Timeout,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Transition {
    Advance,
    Retry,
    End,
}

struct PendingTransition {
    epoch: u64,
    due: Instant,
    transition: Transition,
}

/// What a scored round changed, for the caller to persist and present.
#[derive(Clone, Debug, PartialEq)]
pub struct RoundReport {
    pub verdict: Verdict,
    pub cause: Option<FailCause>,
    pub stats: SessionStats,
    pub lives: u32,
    pub unlocked: Vec<UnlockedAchievement>,
}

/// The round/session state machine.
///
/// All mutation goes through the methods below, each taking the current
/// instant so timing stays deterministic under test. Every transition bumps
/// an epoch; scheduled transitions and countdown expiries from an earlier
/// epoch are ignored when they fire.
pub struct SessionState {
    rules: SessionRules,
    catalog: RoundCatalog,
    mode: Mode,
    round_index: usize,
    stats: SessionStats,
    lives: u32,
    phase: Phase,
    feedback: Feedback,
    content_ready: bool,
    choices: Vec<String>,
    timer: CountdownTimer,
    armed: Option<TimerToken>,
    pending: Option<PendingTransition>,
    epoch: u64,
    achievements: AchievementLog,
    rng: SmallRng,
}

impl SessionState {
    pub fn new(catalog: RoundCatalog, mode: Mode, rules: SessionRules, rng: SmallRng) -> Self {
        let phase = if catalog.is_empty() {
            Phase::AwaitingContent
        } else {
            Phase::AwaitingInput
        };
        let mut state = Self {
            rules,
            catalog,
            mode,
            round_index: 0,
            stats: SessionStats::default(),
            lives: rules.starting_lives,
            phase,
            feedback: Feedback::hidden(),
            content_ready: false,
            choices: Vec::new(),
            timer: CountdownTimer::new(rules.countdown_secs),
            armed: None,
            pending: None,
            epoch: 0,
            achievements: AchievementLog::new(),
            rng,
        };
        state.refresh_choices();
        state
    }

    /// Seed cumulative stats and unlocks loaded from storage.
    pub fn restore(&mut self, stats: SessionStats, achievements: AchievementLog) {
        self.stats = stats;
        self.achievements = achievements;
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn round_index(&self) -> usize {
        self.round_index
    }

    pub fn current_round(&self) -> Option<&RoundRecord> {
        self.catalog.get(self.round_index)
    }

    pub fn catalog(&self) -> &RoundCatalog {
        &self.catalog
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn feedback(&self) -> &Feedback {
        &self.feedback
    }

    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    pub fn achievements(&self) -> &AchievementLog {
        &self.achievements
    }

    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Complete
    }

    pub fn is_timer_active(&self) -> bool {
        self.timer.is_active()
    }

    /// Seconds shown on the countdown display.
    pub fn countdown(&self) -> u32 {
        self.timer.remaining()
    }

    /// The presentation layer finished loading the current round's image.
    pub fn mark_content_ready(&mut self, now: Instant) {
        if self.phase != Phase::AwaitingInput {
            return;
        }
        self.content_ready = true;
        self.sync_timer(now);
    }

    pub fn submit_guess(&mut self, text: &str, now: Instant) -> Option<RoundReport> {
        self.submit(text, now)
    }

    pub fn submit_choice(&mut self, choice: &str, now: Instant) -> Option<RoundReport> {
        self.submit(choice, now)
    }

    fn submit(&mut self, input: &str, now: Instant) -> Option<RoundReport> {
        if self.phase != Phase::AwaitingInput || answer::is_blank(input) {
            return None;
        }
        let verdict = match self.current_round() {
            Some(round) => answer::evaluate(&round.answers, input),
            None => return None,
        };
        let cause = match verdict {
            Verdict::Win => None,
            Verdict::Fail => Some(FailCause::Wrong),
        };
        Some(self.resolve(verdict, cause, now, Utc::now()))
    }

    /// Advance the countdown and fire any due scheduled transition.
    pub fn tick(&mut self, now: Instant) -> Option<RoundReport> {
        let report = match self.timer.poll(now) {
            Some(token) => self.on_timer_expired(token, now),
            None => None,
        };
        self.fire_pending(now);
        report
    }

    /// Handle a countdown expiry. Tokens from cancelled or superseded
    /// activations are ignored.
    pub fn on_timer_expired(&mut self, token: TimerToken, now: Instant) -> Option<RoundReport> {
        if self.armed != Some(token) || self.phase != Phase::AwaitingInput {
            tracing::debug!(?token, "ignoring stale countdown expiry");
            return None;
        }
        self.armed = None;
        self.timer.cancel();
        Some(self.resolve(Verdict::Fail, Some(FailCause::Timeout), now, Utc::now()))
    }

    /// Run the scheduled transition now instead of waiting out the delay.
    pub fn dismiss_feedback(&mut self, now: Instant) {
        if let Some(pending) = self.pending.take() {
            self.apply_transition(pending, now);
        }
    }

    /// Move on without scoring the current round.
    pub fn skip(&mut self, now: Instant) {
        if matches!(self.phase, Phase::AwaitingContent | Phase::Complete) {
            return;
        }
        self.advance(now);
    }

    /// Zero the stats, refill lives and go back to the first round.
    /// Unlocked achievements are kept. Content stays ready when the first
    /// round was already on screen.
    pub fn reset(&mut self, now: Instant) {
        let same_round = self.round_index == 0 && self.phase != Phase::Complete;
        self.begin_transition();
        self.stats = SessionStats::default();
        self.lives = self.rules.starting_lives;
        self.round_index = 0;
        self.phase = if self.catalog.is_empty() {
            Phase::AwaitingContent
        } else {
            Phase::AwaitingInput
        };
        self.content_ready = self.content_ready && same_round;
        self.refresh_choices();
        self.sync_timer(now);
    }

    pub fn set_mode(&mut self, mode: Mode, now: Instant) {
        if mode == self.mode {
            return;
        }
        self.cancel_timer();
        self.mode = mode;
        if self.phase == Phase::AwaitingInput {
            self.refresh_choices();
        }
        self.sync_timer(now);
    }

    /// Cancel the countdown and drop any scheduled transition.
    pub fn teardown(&mut self) {
        self.cancel_timer();
        self.pending = None;
        self.epoch += 1;
    }

    fn resolve(
        &mut self,
        verdict: Verdict,
        cause: Option<FailCause>,
        now: Instant,
        stamp: DateTime<Utc>,
    ) -> RoundReport {
        self.cancel_timer();

        let delta = answer::score(verdict, self.mode);
        self.stats.apply(&delta);
        self.lives = self.lives.saturating_sub(delta.lives_lost);

        let (kind, delay, transition) = match (verdict, cause) {
            (Verdict::Win, _) => (FeedbackKind::Win, self.rules.win_delay, Transition::Advance),
            (Verdict::Fail, _) if self.mode.tracks_lives() && self.lives == 0 => {
                (FeedbackKind::Fail, self.rules.fail_delay, Transition::End)
            }
            (Verdict::Fail, Some(FailCause::Timeout)) => {
                (FeedbackKind::Fail, self.rules.fail_delay, Transition::Advance)
            }
            (Verdict::Fail, _) => (FeedbackKind::Fail, self.rules.fail_delay, Transition::Retry),
        };
        let message = match cause {
            Some(FailCause::Timeout) => TIMEOUT_MESSAGE,
            _ => pick_phrase(kind, &mut self.rng),
        };
        self.feedback = Feedback::show(kind, message);
        self.phase = Phase::Feedback(kind);
        self.pending = Some(PendingTransition {
            epoch: self.epoch,
            due: now + delay,
            transition,
        });

        let updated = check_achievements(&self.stats, self.mode, &self.achievements, stamp);
        let unlocked = newly_unlocked(&self.achievements, &updated);
        self.achievements = updated;

        tracing::debug!(
            ?verdict,
            ?cause,
            ?transition,
            round = self.round_index,
            "round resolved"
        );

        RoundReport {
            verdict,
            cause,
            stats: self.stats,
            lives: self.lives,
            unlocked,
        }
    }

    fn fire_pending(&mut self, now: Instant) {
        let due = matches!(&self.pending, Some(p) if now >= p.due);
        if !due {
            return;
        }
        if let Some(pending) = self.pending.take() {
            self.apply_transition(pending, now);
        }
    }

    fn apply_transition(&mut self, pending: PendingTransition, now: Instant) {
        if pending.epoch != self.epoch {
            tracing::debug!("dropping stale scheduled transition");
            return;
        }
        match pending.transition {
            Transition::Advance => self.advance(now),
            Transition::Retry => self.retry(now),
            Transition::End => self.finish(),
        }
    }

    /// Invalidate in-flight timers and scheduled transitions, clear the overlay.
    fn begin_transition(&mut self) {
        self.epoch += 1;
        self.pending = None;
        self.cancel_timer();
        self.feedback = Feedback::hidden();
    }

    fn session_over(&self) -> bool {
        if self.mode.tracks_lives() {
            self.lives == 0
        } else {
            self.round_index + 1 >= self.catalog.len()
        }
    }

    fn advance(&mut self, now: Instant) {
        self.begin_transition();
        if self.session_over() {
            self.finish();
            return;
        }
        self.round_index += 1;
        self.phase = Phase::AwaitingInput;
        self.content_ready = false;
        self.refresh_choices();
        self.sync_timer(now);
    }

    fn retry(&mut self, now: Instant) {
        self.begin_transition();
        self.phase = Phase::AwaitingInput;
        // The mode may have changed while the overlay was up.
        if self.mode.uses_choices() == self.choices.is_empty() {
            self.refresh_choices();
        }
        self.sync_timer(now);
    }

    fn finish(&mut self) {
        self.begin_transition();
        self.phase = Phase::Complete;
        self.choices.clear();
        tracing::info!(
            correct = self.stats.correct,
            wrong = self.stats.wrong,
            rounds = self.stats.rounds_played,
            mode = self.mode.as_str(),
            "session complete"
        );
    }

    fn refresh_choices(&mut self) {
        self.choices = if self.mode.uses_choices() && self.phase == Phase::AwaitingInput {
            generate_choices(self.catalog.rounds(), self.round_index, &mut self.rng)
        } else {
            Vec::new()
        };
    }

    fn cancel_timer(&mut self) {
        self.timer.cancel();
        self.armed = None;
    }

    /// Start or stop the countdown so it runs exactly when the mode is timed,
    /// input is awaited, the overlay is hidden and the round content is ready.
    fn sync_timer(&mut self, now: Instant) {
        let should_run = self.mode.is_timed()
            && self.phase == Phase::AwaitingInput
            && self.content_ready
            && !self.feedback.visible;
        if should_run && !self.timer.is_active() {
            self.armed = Some(self.timer.start(now));
        } else if !should_run {
            self.cancel_timer();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn record(id: u64, answers: &[&str]) -> RoundRecord {
        RoundRecord {
            id,
            image: format!("image{id}.jpg"),
            answers: answers.iter().map(|a| a.to_string()).collect(),
            clue: format!("clue {id}"),
        }
    }

    fn animals() -> RoundCatalog {
        RoundCatalog::new(vec![
            record(1, &["cat", "kitten"]),
            record(2, &["dog", "puppy"]),
            record(3, &["bird", "parrot"]),
        ])
    }

    fn session(mode: Mode) -> SessionState {
        SessionState::new(animals(), mode, SessionRules::default(), SmallRng::seed_from_u64(42))
    }

    fn ms(t0: Instant, ms: u64) -> Instant {
        t0 + Duration::from_millis(ms)
    }

    #[test]
    fn test_starts_awaiting_input_on_round_zero() {
        let s = session(Mode::Classic);
        assert_eq!(s.phase(), Phase::AwaitingInput);
        assert_eq!(s.round_index(), 0);
        assert_eq!(s.lives(), STARTING_LIVES);
        assert!(!s.feedback().visible);
    }

    #[test]
    fn test_empty_catalog_blocks_everything() {
        let t0 = Instant::now();
        let mut s = SessionState::new(
            RoundCatalog::default(),
            Mode::Timed,
            SessionRules::default(),
            SmallRng::seed_from_u64(1),
        );
        assert_eq!(s.phase(), Phase::AwaitingContent);
        assert!(s.current_round().is_none());
        assert!(s.submit_guess("cat", t0).is_none());
        s.mark_content_ready(t0);
        assert!(!s.is_timer_active());
        s.skip(t0);
        assert_eq!(s.round_index(), 0);
        assert!(s.tick(ms(t0, 10_000)).is_none());
        s.reset(t0);
        assert_eq!(s.phase(), Phase::AwaitingContent);
    }

    #[test]
    fn test_blank_guess_is_ignored() {
        let t0 = Instant::now();
        let mut s = session(Mode::Classic);
        assert!(s.submit_guess("", t0).is_none());
        assert!(s.submit_guess("   ", t0).is_none());
        assert_eq!(*s.stats(), SessionStats::default());
        assert_eq!(s.phase(), Phase::AwaitingInput);
    }

    #[test]
    fn test_win_shows_feedback_then_advances() {
        let t0 = Instant::now();
        let mut s = session(Mode::Classic);
        let report = s.submit_guess(" KITTEN ", t0).unwrap();
        assert_eq!(report.verdict, Verdict::Win);
        assert_eq!(report.stats.correct, 1);
        assert_eq!(report.stats.streak, 1);
        assert_eq!(s.phase(), Phase::Feedback(FeedbackKind::Win));
        assert!(s.feedback().visible);

        s.tick(ms(t0, 899));
        assert_eq!(s.round_index(), 0);
        s.tick(ms(t0, 900));
        assert_eq!(s.round_index(), 1);
        assert_eq!(s.phase(), Phase::AwaitingInput);
        assert!(!s.feedback().visible);
    }

    #[test]
    fn test_wrong_guess_retries_same_round() {
        let t0 = Instant::now();
        let mut s = session(Mode::Classic);
        let report = s.submit_guess("dog", t0).unwrap();
        assert_eq!(report.cause, Some(FailCause::Wrong));
        s.tick(ms(t0, 1000));
        assert_eq!(s.round_index(), 0);
        assert_eq!(s.phase(), Phase::AwaitingInput);

        s.submit_guess("horse", ms(t0, 1100)).unwrap();
        s.tick(ms(t0, 2100));
        assert_eq!(s.round_index(), 0);
        assert_eq!(s.stats().wrong, 2);
        assert_eq!(s.stats().streak, 0);
    }

    #[test]
    fn test_guess_during_feedback_is_ignored() {
        let t0 = Instant::now();
        let mut s = session(Mode::Classic);
        s.submit_guess("cat", t0).unwrap();
        assert!(s.submit_guess("cat", ms(t0, 100)).is_none());
        assert_eq!(s.stats().correct, 1);
    }

    #[test]
    fn test_timeout_fails_and_advances() {
        let t0 = Instant::now();
        let mut s = session(Mode::Timed);
        s.mark_content_ready(t0);
        assert!(s.is_timer_active());
        assert_eq!(s.countdown(), 5);

        assert!(s.tick(ms(t0, 4999)).is_none());
        let report = s.tick(ms(t0, 5000)).unwrap();
        assert_eq!(report.cause, Some(FailCause::Timeout));
        assert_eq!(s.feedback().message, TIMEOUT_MESSAGE);
        assert!(!s.is_timer_active());

        // no second expiry for the same activation
        assert!(s.tick(ms(t0, 5500)).is_none());
        s.tick(ms(t0, 6000));
        assert_eq!(s.round_index(), 1);
        assert_eq!(s.stats().wrong, 1);
    }

    #[test]
    fn test_timer_waits_for_content() {
        let t0 = Instant::now();
        let mut s = session(Mode::Timed);
        assert!(!s.is_timer_active());
        assert!(s.tick(ms(t0, 60_000)).is_none());
        assert_eq!(s.stats().rounds_played, 0);
    }

    #[test]
    fn test_no_timer_in_untimed_modes() {
        let t0 = Instant::now();
        for mode in [Mode::Classic, Mode::Survival] {
            let mut s = session(mode);
            s.mark_content_ready(t0);
            assert!(!s.is_timer_active());
        }
        let mut s = session(Mode::MultipleChoice);
        s.mark_content_ready(t0);
        assert!(s.is_timer_active());
    }

    #[test]
    fn test_timer_cancelled_while_feedback_visible() {
        let t0 = Instant::now();
        let mut s = session(Mode::Timed);
        s.mark_content_ready(t0);
        s.submit_guess("wrong", ms(t0, 4000)).unwrap();
        assert!(!s.is_timer_active());
        // original activation would have expired at 5000
        assert!(s.tick(ms(t0, 5000)).is_none());
        assert_eq!(s.stats().wrong, 1);
    }

    #[test]
    fn test_retry_restarts_countdown_from_full() {
        let t0 = Instant::now();
        let mut s = session(Mode::Timed);
        s.mark_content_ready(t0);
        s.submit_guess("wrong", ms(t0, 3000)).unwrap();
        s.tick(ms(t0, 4000));
        assert!(s.is_timer_active());
        assert_eq!(s.countdown(), 5);
        assert!(s.tick(ms(t0, 8999)).is_none());
        let report = s.tick(ms(t0, 9000)).unwrap();
        assert_eq!(report.cause, Some(FailCause::Timeout));
    }

    #[test]
    fn test_advance_waits_for_new_content() {
        let t0 = Instant::now();
        let mut s = session(Mode::Timed);
        s.mark_content_ready(t0);
        s.submit_guess("cat", ms(t0, 1000)).unwrap();
        s.tick(ms(t0, 1900));
        assert_eq!(s.round_index(), 1);
        assert!(!s.is_timer_active());
        s.mark_content_ready(ms(t0, 2000));
        assert!(s.is_timer_active());
    }

    #[test]
    fn test_stale_expiry_token_is_ignored() {
        let t0 = Instant::now();
        let mut s = session(Mode::Timed);
        s.mark_content_ready(t0);
        let stale = s.timer.token().unwrap();
        s.set_mode(Mode::Classic, ms(t0, 100));
        s.set_mode(Mode::Timed, ms(t0, 200));
        assert!(s.on_timer_expired(stale, ms(t0, 5000)).is_none());
        assert_eq!(s.stats().rounds_played, 0);
    }

    #[test]
    fn test_last_round_win_completes_session() {
        let t0 = Instant::now();
        let mut s = session(Mode::Timed);
        s.skip(t0);
        s.skip(t0);
        assert_eq!(s.round_index(), 2);
        let report = s.submit_guess("bird", t0).unwrap();
        assert_eq!(report.verdict, Verdict::Win);
        assert_eq!(report.stats.correct, 1);
        s.tick(ms(t0, 900));
        assert!(s.is_complete());
        assert_eq!(s.round_index(), 2);
    }

    #[test]
    fn test_survival_last_life_ends_session() {
        let t0 = Instant::now();
        let mut s = session(Mode::Survival);
        s.submit_guess("nope", t0).unwrap();
        s.tick(ms(t0, 1000));
        s.submit_guess("nope", ms(t0, 1000)).unwrap();
        s.tick(ms(t0, 2000));
        assert_eq!(s.lives(), 1);
        assert_eq!(s.round_index(), 0);

        let report = s.submit_guess("nope", ms(t0, 2000)).unwrap();
        assert_eq!(report.lives, 0);
        s.tick(ms(t0, 3000));
        assert!(s.is_complete());
        assert_eq!(s.round_index(), 0);
    }

    #[test]
    fn test_survival_wraps_past_catalog_end() {
        let t0 = Instant::now();
        let mut s = session(Mode::Survival);
        for _ in 0..4 {
            s.skip(t0);
        }
        assert_eq!(s.round_index(), 4);
        assert_eq!(s.current_round().unwrap().id, 2);
        assert!(!s.is_complete());
    }

    #[test]
    fn test_lives_inert_outside_survival() {
        let t0 = Instant::now();
        let mut s = session(Mode::Classic);
        for i in 0..5 {
            s.submit_guess("nope", ms(t0, i * 1000)).unwrap();
            s.tick(ms(t0, i * 1000 + 1000));
        }
        assert_eq!(s.lives(), STARTING_LIVES);
        assert!(!s.is_complete());
    }

    #[test]
    fn test_skip_cancels_pending_transition() {
        let t0 = Instant::now();
        let mut s = session(Mode::Classic);
        s.submit_guess("cat", t0).unwrap();
        s.skip(ms(t0, 100));
        assert_eq!(s.round_index(), 1);
        assert!(!s.feedback().visible);
        s.tick(ms(t0, 900));
        assert_eq!(s.round_index(), 1);
    }

    #[test]
    fn test_reset_cancels_pending_transition() {
        let t0 = Instant::now();
        let mut s = session(Mode::Survival);
        s.skip(t0);
        s.submit_guess("puppy", t0).unwrap();
        s.reset(ms(t0, 100));
        assert_eq!(*s.stats(), SessionStats::default());
        assert_eq!(s.lives(), STARTING_LIVES);
        assert_eq!(s.round_index(), 0);
        assert!(!s.feedback().visible);
        s.tick(ms(t0, 2000));
        assert_eq!(s.round_index(), 0);
    }

    #[test]
    fn test_reset_on_first_round_restarts_countdown() {
        let t0 = Instant::now();
        let mut s = session(Mode::Timed);
        s.mark_content_ready(t0);
        s.submit_guess("dog", ms(t0, 1000)).unwrap();
        s.reset(ms(t0, 1200));
        assert_eq!(s.round_index(), 0);
        assert!(s.is_timer_active());
        assert_eq!(s.countdown(), DEFAULT_COUNTDOWN_SECS);
    }

    #[test]
    fn test_reset_from_later_round_waits_for_content() {
        let t0 = Instant::now();
        let mut s = session(Mode::Timed);
        s.skip(t0);
        s.mark_content_ready(t0);
        assert!(s.is_timer_active());
        s.reset(ms(t0, 100));
        assert_eq!(s.round_index(), 0);
        assert!(!s.is_timer_active());
    }

    #[test]
    fn test_reset_reopens_completed_session() {
        let t0 = Instant::now();
        let mut s = session(Mode::Classic);
        s.skip(t0);
        s.skip(t0);
        s.skip(t0);
        assert!(s.is_complete());
        s.skip(t0);
        assert!(s.is_complete());
        s.reset(t0);
        assert_eq!(s.phase(), Phase::AwaitingInput);
    }

    #[test]
    fn test_dismiss_feedback_fires_transition_once() {
        let t0 = Instant::now();
        let mut s = session(Mode::Classic);
        s.submit_guess("cat", t0).unwrap();
        s.dismiss_feedback(ms(t0, 10));
        assert_eq!(s.round_index(), 1);
        s.tick(ms(t0, 900));
        assert_eq!(s.round_index(), 1);
    }

    #[test]
    fn test_dismiss_after_wrong_keeps_round() {
        let t0 = Instant::now();
        let mut s = session(Mode::Classic);
        s.submit_guess("dog", t0).unwrap();
        s.dismiss_feedback(ms(t0, 10));
        assert_eq!(s.round_index(), 0);
        assert_eq!(s.phase(), Phase::AwaitingInput);
    }

    #[test]
    fn test_multiple_choice_generates_options_each_round() {
        let t0 = Instant::now();
        let mut s = session(Mode::MultipleChoice);
        assert_eq!(s.choices().len(), 4);
        let correct = s
            .choices()
            .iter()
            .find(|c| ["cat", "kitten"].contains(&c.as_str()))
            .cloned()
            .unwrap();
        let report = s.submit_choice(&correct, t0).unwrap();
        assert_eq!(report.verdict, Verdict::Win);
        s.tick(ms(t0, 900));
        assert_eq!(s.round_index(), 1);
        assert!(
            s.choices()
                .iter()
                .any(|c| ["dog", "puppy"].contains(&c.as_str()))
        );
    }

    #[test]
    fn test_choice_on_round_without_answers_fails() {
        let t0 = Instant::now();
        let catalog = RoundCatalog::new(vec![record(1, &[]), record(2, &["dog"])]);
        let mut s = SessionState::new(
            catalog,
            Mode::MultipleChoice,
            SessionRules::default(),
            SmallRng::seed_from_u64(5),
        );
        assert_eq!(s.choices(), &["dog".to_string()]);
        let report = s.submit_choice("dog", t0).unwrap();
        assert_eq!(report.verdict, Verdict::Fail);
    }

    #[test]
    fn test_switching_modes_keeps_progress() {
        let t0 = Instant::now();
        let mut s = session(Mode::Timed);
        s.mark_content_ready(t0);
        s.submit_guess("cat", t0).unwrap();
        s.tick(ms(t0, 900));
        s.mark_content_ready(ms(t0, 1000));
        s.set_mode(Mode::MultipleChoice, ms(t0, 1000));
        assert_eq!(s.round_index(), 1);
        assert_eq!(s.stats().correct, 1);
        assert_eq!(s.choices().len(), 4);
        assert!(s.is_timer_active());

        s.set_mode(Mode::Classic, ms(t0, 1100));
        assert!(s.choices().is_empty());
        assert!(!s.is_timer_active());
    }

    #[test]
    fn test_entering_multiple_choice_during_fail_overlay_builds_options() {
        let t0 = Instant::now();
        let mut s = session(Mode::Classic);
        s.submit_guess("nope", t0).unwrap();
        s.set_mode(Mode::MultipleChoice, ms(t0, 100));
        s.tick(ms(t0, 1000));

        assert_eq!(s.phase(), Phase::AwaitingInput);
        assert_eq!(s.round_index(), 0);
        let answers = &s.current_round().unwrap().answers;
        assert!(!s.choices().is_empty());
        assert!(s.choices().iter().any(|c| answers.contains(c)));
    }

    #[test]
    fn test_leaving_multiple_choice_during_fail_overlay_clears_options() {
        let t0 = Instant::now();
        let mut s = session(Mode::MultipleChoice);
        s.submit_choice("definitely wrong", t0).unwrap();
        s.set_mode(Mode::Classic, ms(t0, 100));
        s.tick(ms(t0, 1000));

        assert_eq!(s.phase(), Phase::AwaitingInput);
        assert!(s.choices().is_empty());
    }

    #[test]
    fn test_retry_keeps_multiple_choice_options() {
        let t0 = Instant::now();
        let mut s = session(Mode::MultipleChoice);
        let before = s.choices().to_vec();
        s.submit_choice("definitely wrong", t0).unwrap();
        s.tick(ms(t0, 1000));
        assert_eq!(s.choices(), before.as_slice());
    }

    #[test]
    fn test_streak_achievement_reported_once() {
        let rounds = (0..12).map(|i| record(i, &["x"])).collect();
        let mut s = SessionState::new(
            RoundCatalog::new(rounds),
            Mode::Classic,
            SessionRules::default(),
            SmallRng::seed_from_u64(3),
        );
        let t0 = Instant::now();
        let mut unlocked = Vec::new();
        for i in 0..11 {
            let report = s.submit_guess("x", ms(t0, i * 1000)).unwrap();
            unlocked.extend(report.unlocked.into_iter().map(|a| a.id));
            s.tick(ms(t0, i * 1000 + 900));
        }
        assert_eq!(unlocked, vec!["classic_complete", "streak_10"]);
        assert!(s.achievements().contains_key("streak_10"));
    }

    #[test]
    fn test_restore_seeds_stats() {
        let t0 = Instant::now();
        let mut s = session(Mode::Classic);
        s.restore(
            SessionStats {
                correct: 19,
                wrong: 0,
                streak: 0,
                rounds_played: 19,
            },
            AchievementLog::new(),
        );
        let report = s.submit_guess("cat", t0).unwrap();
        assert_eq!(report.stats.correct, 20);
        assert!(report.unlocked.iter().any(|a| a.id == "correct_20"));
    }

    #[test]
    fn test_teardown_stops_everything() {
        let t0 = Instant::now();
        let mut s = session(Mode::Timed);
        s.mark_content_ready(t0);
        s.teardown();
        assert!(!s.is_timer_active());
        assert!(s.tick(ms(t0, 10_000)).is_none());
    }
}
