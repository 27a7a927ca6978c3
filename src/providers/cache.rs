use std::path::PathBuf;

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};

/// On-disk store of GET response bodies, keyed by the SHA-256 of the URL.
#[derive(Debug, Clone)]
pub struct ResponseCache {
    root: PathBuf,
}

impl ResponseCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, url: &str) -> PathBuf {
        let digest = Sha256::digest(url.as_bytes());
        self.root.join(hex::encode(digest))
    }

    /// Cached body and next-page link for `url`, if present.
    pub fn get(&self, url: &str) -> Option<CachedPage> {
        let contents = std::fs::read_to_string(self.path_for(url)).ok()?;
        serde_json::from_str(&contents).ok()
    }

    pub fn set(&self, url: &str, page: &CachedPage) -> Result<()> {
        std::fs::create_dir_all(&self.root)
            .with_context(|| format!("Failed to create cache dir {}", self.root.display()))?;
        let path = self.path_for(url);
        let json = serde_json::to_string(page)?;
        std::fs::write(&path, json)
            .with_context(|| format!("Failed to write cache file {}", path.display()))?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CachedPage {
    pub body: String,
    #[serde(default)]
    pub next: Option<String>,
}
