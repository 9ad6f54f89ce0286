use rust_embed::Embed;

use crate::catalog::{CatalogError, RoundRecord, RoundSource, parse_rounds};

#[derive(Embed)]
#[folder = "assets/rounds/"]
struct RoundAssets;

const FALLBACK_FILE: &str = "fallback.json";

/// The fixed catalog bundled into the binary. Empty only if the bundled
/// asset is broken, which leaves the session waiting for content.
pub fn fallback_rounds() -> Vec<RoundRecord> {
    let Some(file) = RoundAssets::get(FALLBACK_FILE) else {
        tracing::warn!("bundled fallback catalog is missing");
        return Vec::new();
    };
    match std::str::from_utf8(file.data.as_ref()) {
        Ok(content) => parse_rounds(content).unwrap_or_else(|err| {
            tracing::warn!(error = %err, "bundled fallback catalog is invalid");
            Vec::new()
        }),
        Err(_) => Vec::new(),
    }
}

pub struct FallbackSource;

impl RoundSource for FallbackSource {
    fn fetch(&self) -> Result<Vec<RoundRecord>, CatalogError> {
        let rounds = fallback_rounds();
        if rounds.is_empty() {
            Err(CatalogError::Empty)
        } else {
            Ok(rounds)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_has_three_rounds() {
        let rounds = fallback_rounds();
        assert_eq!(rounds.len(), 3);
        assert!(rounds.iter().all(|r| !r.answers.is_empty()));
        assert!(rounds.iter().all(|r| !r.clue.is_empty()));
    }

    #[test]
    fn test_fallback_first_round_is_cat() {
        let rounds = fallback_rounds();
        assert_eq!(rounds[0].id, 1);
        assert!(rounds[0].answers.contains(&"kitten".to_string()));
    }
}
