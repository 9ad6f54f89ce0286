use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crate::session::mode::Mode;

#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    Tick,
    Guess(String),
    Choice(String),
    Skip,
    Reset,
    PlayAgain,
    ContentReady,
    DismissFeedback,
    SetMode(Mode),
    CycleMode,
    ToggleClue,
    Quit,
}

/// Ticks on a background thread; frontends push input through `sender()`.
pub struct EventHandler {
    rx: mpsc::Receiver<GameEvent>,
    tx: mpsc::Sender<GameEvent>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::channel();
        let tick_tx = tx.clone();

        thread::spawn(move || {
            loop {
                thread::sleep(tick_rate);
                if tick_tx.send(GameEvent::Tick).is_err() {
                    return;
                }
            }
        });

        Self { rx, tx }
    }

    pub fn sender(&self) -> mpsc::Sender<GameEvent> {
        self.tx.clone()
    }

    pub fn next(&self) -> anyhow::Result<GameEvent> {
        Ok(self.rx.recv()?)
    }
}
