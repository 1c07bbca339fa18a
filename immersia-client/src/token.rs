// immersia-client/src/token.rs
// Admin token cache - JSON file storage

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default cache file name
pub const TOKEN_FILE: &str = "admin_token.json";

/// Cached admin login
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedToken {
    pub username: String,
    pub token: String,
    pub saved_at: DateTime<Utc>,
}

impl CachedToken {
    pub fn new(username: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            token: token.into(),
            saved_at: Utc::now(),
        }
    }
}

/// Token storage
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(base_path: impl Into<PathBuf>, filename: &str) -> Self {
        let path = base_path.into().join(filename);
        Self { path }
    }

    /// Store under `base_path` with the default file name
    pub fn in_dir(base_path: impl Into<PathBuf>) -> Self {
        Self::new(base_path, TOKEN_FILE)
    }

    fn ensure_dir(&self) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    pub fn save(&self, token: &CachedToken) -> std::io::Result<()> {
        self.ensure_dir()?;
        let json = serde_json::to_string_pretty(token)?;
        fs::write(&self.path, json)
    }

    /// Load the cached token; a missing or unreadable file is treated as absent
    pub fn load(&self) -> Option<CachedToken> {
        if !self.path.exists() {
            return None;
        }
        let json = fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&json) {
            Ok(token) => Some(token),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "Ignoring corrupt token cache: {}", e);
                None
            }
        }
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    pub fn delete(&self) -> std::io::Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
