use std::fs;
use std::path::PathBuf;

use crate::catalog::{CatalogError, RoundRecord, RoundSource, parse_rounds};

/// Reads the round list from a JSON endpoint.
pub struct HttpSource {
    url: String,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl RoundSource for HttpSource {
    fn fetch(&self) -> Result<Vec<RoundRecord>, CatalogError> {
        let body = fetch_url(&self.url)?;
        parse_rounds(&body)
    }
}

#[cfg(feature = "network")]
fn fetch_url(url: &str) -> Result<String, CatalogError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(10))
        .build()
        .map_err(|e| CatalogError::Request(e.to_string()))?;
    let response = client
        .get(url)
        .send()
        .map_err(|e| CatalogError::Request(e.to_string()))?;
    let status = response.status();
    if !status.is_success() {
        return Err(CatalogError::Status(status.as_u16()));
    }
    response
        .text()
        .map_err(|e| CatalogError::Request(e.to_string()))
}

#[cfg(not(feature = "network"))]
fn fetch_url(_url: &str) -> Result<String, CatalogError> {
    Err(CatalogError::Unavailable)
}

/// Reads the round list from a local `rounds.json`.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RoundSource for FileSource {
    fn fetch(&self) -> Result<Vec<RoundRecord>, CatalogError> {
        let content = fs::read_to_string(&self.path)?;
        parse_rounds(&content)
    }
}
