use anyhow::Result;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::engine::achievements::AchievementLog;
use crate::session::stats::SessionStats;
use crate::store::KeyValueStore;

pub const STATS_KEY: &str = "gameStats";
pub const ACHIEVEMENTS_KEY: &str = "achievements";

/// Missing or malformed values come back as `T::default()`.
fn load<T: DeserializeOwned + Default>(store: &dyn KeyValueStore, key: &str) -> T {
    let Some(content) = store.get(key) else {
        return T::default();
    };
    serde_json::from_str(&content).unwrap_or_else(|err| {
        tracing::debug!(key, error = %err, "discarding malformed stored value");
        T::default()
    })
}

fn save<T: Serialize>(store: &mut dyn KeyValueStore, key: &str, data: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(data)?;
    store.set(key, &json)
}

pub fn load_stats(store: &dyn KeyValueStore) -> SessionStats {
    load(store, STATS_KEY)
}

pub fn save_stats(store: &mut dyn KeyValueStore, stats: &SessionStats) -> Result<()> {
    save(store, STATS_KEY, stats)
}

pub fn load_achievements(store: &dyn KeyValueStore) -> AchievementLog {
    load(store, ACHIEVEMENTS_KEY)
}

pub fn save_achievements(store: &mut dyn KeyValueStore, log: &AchievementLog) -> Result<()> {
    save(store, ACHIEVEMENTS_KEY, log)
}
