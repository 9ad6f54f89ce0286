use std::path::PathBuf;
use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::catalog::fallback::FallbackSource;
use crate::catalog::remote::{FileSource, HttpSource};
use crate::catalog::{RoundCatalog, RoundSource};
use crate::config::Config;
use crate::engine::achievements::UnlockedAchievement;
use crate::engine::answer::Verdict;
use crate::event::{EventHandler, GameEvent};
use crate::session::state::{RoundReport, SessionRules, SessionState};
use crate::sound::{SilentSink, SoundCue, SoundSink};
use crate::store::json_store::JsonStore;
use crate::store::schema;
use crate::store::{KeyValueStore, MemoryStore};

pub struct App {
    pub config: Config,
    pub session: SessionState,
    pub show_clue: bool,
    pub should_quit: bool,
    store: Box<dyn KeyValueStore>,
    sound: Box<dyn SoundSink>,
    last_unlocked: Vec<UnlockedAchievement>,
}

impl App {
    pub fn new() -> Self {
        let config = Config::load().unwrap_or_else(|err| {
            tracing::warn!(error = %err, "unreadable config, using defaults");
            Config::default()
        });

        let source = catalog_source(&config);
        let catalog = RoundCatalog::load(source.as_ref());

        let store: Box<dyn KeyValueStore> =
            match JsonStore::with_base_dir(PathBuf::from(&config.data_dir)) {
                Ok(store) => Box::new(store),
                Err(err) => {
                    tracing::warn!(error = %err, "data directory unavailable, progress will not persist");
                    Box::new(MemoryStore::new())
                }
            };

        Self::with_parts(
            config,
            catalog,
            store,
            Box::new(SilentSink),
            SmallRng::from_entropy(),
        )
    }

    /// Assemble an app from explicit collaborators. The catalog is shuffled
    /// once with `rng` before the first round.
    pub fn with_parts(
        config: Config,
        mut catalog: RoundCatalog,
        store: Box<dyn KeyValueStore>,
        sound: Box<dyn SoundSink>,
        mut rng: SmallRng,
    ) -> Self {
        catalog.shuffle(&mut rng);
        let mut session = SessionState::new(catalog, config.mode, SessionRules::from(&config), rng);
        session.restore(
            schema::load_stats(store.as_ref()),
            schema::load_achievements(store.as_ref()),
        );

        Self {
            show_clue: config.show_clue,
            config,
            session,
            should_quit: false,
            store,
            sound,
            last_unlocked: Vec::new(),
        }
    }

    /// Event pump ticking at the configured rate, for use with [`App::run`].
    pub fn event_handler(&self) -> EventHandler {
        EventHandler::new(Duration::from_millis(self.config.tick_rate_ms))
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    /// Achievements unlocked by the most recent round that unlocked any.
    pub fn last_unlocked(&self) -> &[UnlockedAchievement] {
        &self.last_unlocked
    }

    /// The current round's clue, when clues are shown.
    pub fn clue(&self) -> Option<&str> {
        if !self.show_clue {
            return None;
        }
        self.session
            .current_round()
            .map(|round| round.clue.as_str())
            .filter(|clue| !clue.is_empty())
    }

    pub fn handle_event(&mut self, event: GameEvent, now: Instant) {
        let round_before = self.session.round_index();

        match event {
            GameEvent::Tick => {
                if let Some(report) = self.session.tick(now) {
                    self.on_report(report);
                }
            }
            GameEvent::Guess(text) => {
                if let Some(report) = self.session.submit_guess(&text, now) {
                    self.play(SoundCue::Click);
                    self.on_report(report);
                }
            }
            GameEvent::Choice(choice) => {
                if let Some(report) = self.session.submit_choice(&choice, now) {
                    self.play(SoundCue::Click);
                    self.on_report(report);
                }
            }
            GameEvent::Skip => self.session.skip(now),
            GameEvent::Reset | GameEvent::PlayAgain => self.play_again(now),
            GameEvent::ContentReady => self.session.mark_content_ready(now),
            GameEvent::DismissFeedback => self.session.dismiss_feedback(now),
            GameEvent::SetMode(mode) => self.session.set_mode(mode, now),
            GameEvent::CycleMode => {
                let next = self.session.mode().next();
                self.session.set_mode(next, now);
            }
            GameEvent::ToggleClue => self.show_clue = !self.show_clue,
            GameEvent::Quit => self.should_quit = true,
        }

        if self.session.round_index() > round_before {
            self.play(SoundCue::RoundTransition);
        }
    }

    /// Start over from the first round with zeroed stats.
    pub fn play_again(&mut self, now: Instant) {
        self.session.reset(now);
        self.last_unlocked.clear();
        self.persist();
    }

    /// Pump events until `Quit`, then tear the session down.
    pub fn run(&mut self, events: &EventHandler) -> anyhow::Result<()> {
        let result = loop {
            match events.next() {
                Ok(event) => {
                    self.handle_event(event, Instant::now());
                    if self.should_quit {
                        break Ok(());
                    }
                }
                Err(err) => break Err(err),
            }
        };
        self.session.teardown();
        result
    }

    fn on_report(&mut self, report: RoundReport) {
        match report.verdict {
            Verdict::Win => self.play(SoundCue::Win),
            Verdict::Fail => self.play(SoundCue::Fail),
        }
        for achievement in &report.unlocked {
            tracing::info!(id = %achievement.id, name = %achievement.name, "achievement unlocked");
        }
        if !report.unlocked.is_empty() {
            self.last_unlocked = report.unlocked;
        }
        self.persist();
    }

    fn persist(&mut self) {
        let stats = *self.session.stats();
        if let Err(err) = schema::save_stats(self.store.as_mut(), &stats) {
            tracing::warn!(error = %err, "failed to save stats");
        }
        if let Err(err) = schema::save_achievements(self.store.as_mut(), self.session.achievements()) {
            tracing::warn!(error = %err, "failed to save achievements");
        }
    }

    fn play(&self, cue: SoundCue) {
        if self.config.sound_enabled() {
            self.sound.play(cue, self.config.sound_volume);
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

fn catalog_source(config: &Config) -> Box<dyn RoundSource> {
    if let Some(url) = &config.catalog_url {
        Box::new(HttpSource::new(url.clone()))
    } else if let Some(path) = &config.catalog_path {
        Box::new(FileSource::new(path.clone()))
    } else {
        Box::new(FallbackSource)
    }
}
