use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::session::mode::Mode;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub mode: Mode,
    #[serde(default = "default_show_clue")]
    pub show_clue: bool,
    #[serde(default = "default_sound_volume")]
    pub sound_volume: f32,
    #[serde(default)]
    pub catalog_url: Option<String>,
    #[serde(default)]
    pub catalog_path: Option<String>,
    #[serde(default = "default_countdown_secs")]
    pub countdown_secs: u32,
    #[serde(default = "default_win_delay_ms")]
    pub win_delay_ms: u64,
    #[serde(default = "default_fail_delay_ms")]
    pub fail_delay_ms: u64,
    #[serde(default = "default_starting_lives")]
    pub starting_lives: u32,
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

fn default_show_clue() -> bool {
    true
}
fn default_sound_volume() -> f32 {
    0.5
}
fn default_countdown_secs() -> u32 {
    5
}
fn default_win_delay_ms() -> u64 {
    900
}
fn default_fail_delay_ms() -> u64 {
    1000
}
fn default_starting_lives() -> u32 {
    3
}
fn default_tick_rate_ms() -> u64 {
    100
}
fn default_data_dir() -> String {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("guessit")
        .to_string_lossy()
        .to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            show_clue: default_show_clue(),
            sound_volume: default_sound_volume(),
            catalog_url: None,
            catalog_path: None,
            countdown_secs: default_countdown_secs(),
            win_delay_ms: default_win_delay_ms(),
            fail_delay_ms: default_fail_delay_ms(),
            starting_lives: default_starting_lives(),
            tick_rate_ms: default_tick_rate_ms(),
            data_dir: default_data_dir(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.validate();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("guessit")
            .join("config.toml")
    }

    /// Clamp numeric settings into playable ranges.
    pub fn validate(&mut self) {
        self.countdown_secs = self.countdown_secs.clamp(1, 60);
        self.win_delay_ms = self.win_delay_ms.clamp(100, 10_000);
        self.fail_delay_ms = self.fail_delay_ms.clamp(100, 10_000);
        self.starting_lives = self.starting_lives.clamp(1, 99);
        self.tick_rate_ms = self.tick_rate_ms.clamp(10, 1000);
        self.sound_volume = if self.sound_volume.is_finite() {
            self.sound_volume.clamp(0.0, 1.0)
        } else {
            default_sound_volume()
        };
        if self.catalog_url.as_deref().is_some_and(|u| u.trim().is_empty()) {
            self.catalog_url = None;
        }
        if self.catalog_path.as_deref().is_some_and(|p| p.trim().is_empty()) {
            self.catalog_path = None;
        }
    }

    pub fn sound_enabled(&self) -> bool {
        self.sound_volume > 0.0
    }
}
