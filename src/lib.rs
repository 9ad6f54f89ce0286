//! Picture-guessing quiz sessions: rounds, modes, countdowns, scoring,
//! achievements and persisted progress. Rendering is left to the embedding
//! frontend, which drives an [`app::App`] with [`event::GameEvent`]s.

pub mod app;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod event;
pub mod session;
pub mod sound;
pub mod store;
