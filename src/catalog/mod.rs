pub mod fallback;
pub mod remote;

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::fallback::fallback_rounds;

/// One image to guess. Immutable once loaded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRecord {
    pub id: u64,
    pub image: String,
    pub answers: Vec<String>,
    #[serde(default)]
    pub clue: String,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog request failed: {0}")]
    Request(String),
    #[error("catalog request returned status {0}")]
    Status(u16),
    #[error("catalog payload is not a valid round list: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("catalog contains no playable rounds")]
    Empty,
    #[error("catalog could not be read: {0}")]
    Io(#[from] std::io::Error),
    #[error("catalog source is unavailable")]
    Unavailable,
}

pub trait RoundSource {
    fn fetch(&self) -> Result<Vec<RoundRecord>, CatalogError>;
}

/// Parse a JSON array of round records, dropping records without answers.
pub fn parse_rounds(json: &str) -> Result<Vec<RoundRecord>, CatalogError> {
    let rounds: Vec<RoundRecord> = serde_json::from_str(json)?;
    let total = rounds.len();
    let rounds: Vec<RoundRecord> = rounds
        .into_iter()
        .filter(|r| !r.answers.is_empty())
        .collect();
    if rounds.len() < total {
        tracing::debug!(
            dropped = total - rounds.len(),
            "skipping catalog records without accepted answers"
        );
    }
    if rounds.is_empty() {
        return Err(CatalogError::Empty);
    }
    Ok(rounds)
}

/// Ordered rounds for one session. Read-only after construction apart
/// from the caller-side shuffle.
#[derive(Clone, Debug, Default)]
pub struct RoundCatalog {
    rounds: Vec<RoundRecord>,
}

impl RoundCatalog {
    pub fn new(rounds: Vec<RoundRecord>) -> Self {
        Self { rounds }
    }

    /// Fetch from `source`, falling back to the embedded catalog on any failure.
    pub fn load(source: &dyn RoundSource) -> Self {
        match source.fetch() {
            Ok(rounds) => Self::new(rounds),
            Err(err) => {
                tracing::warn!(error = %err, "failed to fetch rounds, using fallback catalog");
                Self::new(fallback_rounds())
            }
        }
    }

    pub fn shuffle(&mut self, rng: &mut SmallRng) {
        self.rounds.shuffle(rng);
    }

    pub fn len(&self) -> usize {
        self.rounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }

    /// Round at `index` modulo the catalog length.
    pub fn get(&self, index: usize) -> Option<&RoundRecord> {
        if self.rounds.is_empty() {
            return None;
        }
        self.rounds.get(index % self.rounds.len())
    }

    pub fn rounds(&self) -> &[RoundRecord] {
        &self.rounds
    }
}
