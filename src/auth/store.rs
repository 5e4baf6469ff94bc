/// File-backed session token store
///
/// One JSON file under the app data dir holds the current session. Reads
/// answer None for a missing or unreadable file so callers can treat
/// "no session" and "corrupt session" the same way: sign in again.
use super::types::SessionTokens;
use crate::logger::{self, LogTag};
use anyhow::{Context, Result};
use std::path::PathBuf;

pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Store at the default location (~/.trackchat/session.json)
    pub fn at_default_path() -> Self {
        Self::new(crate::paths::get_session_path())
    }

    /// Load the stored session, if any
    pub fn load(&self) -> Option<SessionTokens> {
        let content = std::fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&content) {
            Ok(tokens) => Some(tokens),
            Err(e) => {
                logger::warning(
                    LogTag::Auth,
                    &format!("Discarding unreadable session file: {}", e),
                );
                None
            }
        }
    }

    /// Persist the session, replacing any previous one
    pub fn save(&self, tokens: &SessionTokens) -> Result<()> {
        let content =
            serde_json::to_string_pretty(tokens).context("Failed to serialize session tokens")?;
        std::fs::write(&self.path, content)
            .with_context(|| format!("Failed to write session file: {}", self.path.display()))?;
        Ok(())
    }

    /// Delete the stored session (logout)
    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path).with_context(|| {
                format!("Failed to remove session file: {}", self.path.display())
            })?;
        }
        Ok(())
    }

    /// Whether a session file exists on disk
    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in_tempdir() -> (tempfile::TempDir, TokenStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("session.json"));
        (dir, store)
    }

    #[test]
    fn test_round_trip() {
        let (_dir, store) = store_in_tempdir();
        let tokens = SessionTokens::from_expires_in("acc".to_string(), "ref".to_string(), 3600);

        store.save(&tokens).unwrap();

        assert!(store.exists());
        assert_eq!(store.load(), Some(tokens));
    }

    #[test]
    fn test_missing_file_loads_none() {
        let (_dir, store) = store_in_tempdir();
        assert_eq!(store.load(), None);
        assert!(!store.exists());
    }

    #[test]
    fn test_corrupt_file_loads_none() {
        let (_dir, store) = store_in_tempdir();
        std::fs::write(store.path.clone(), "not json").unwrap();

        assert_eq!(store.load(), None);
    }

    #[test]
    fn test_clear_removes_file() {
        let (_dir, store) = store_in_tempdir();
        let tokens = SessionTokens::from_expires_in("acc".to_string(), "ref".to_string(), 3600);
        store.save(&tokens).unwrap();

        store.clear().unwrap();

        assert!(!store.exists());
        // Clearing an already-missing session is fine
        store.clear().unwrap();
    }
}
