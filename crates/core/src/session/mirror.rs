//! Durable storage for the logged-in user.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use parking_lot::Mutex;

use crate::models::UserRecord;

/// Durable copy of the session that survives restarts.
pub trait SessionMirror: Send + Sync {
    /// Read the stored user, if any.
    fn load(&self) -> Result<Option<UserRecord>>;

    /// Replace the stored user.
    fn store(&self, user: &UserRecord) -> Result<()>;

    /// Remove the stored user. Clearing an empty mirror is not an error.
    fn clear(&self) -> Result<()>;
}

/// Mirror backed by a single JSON file named after the session key.
#[derive(Debug, Clone)]
pub struct FileMirror {
    path: PathBuf,
}

impl FileMirror {
    /// Mirror stored at `<dir>/<key>.json`.
    pub fn new(dir: impl AsRef<Path>, key: &str) -> Self {
        Self {
            path: dir.as_ref().join(format!("{}.json", sanitize_key(key))),
        }
    }

    /// File backing this mirror.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionMirror for FileMirror {
    fn load(&self) -> Result<Option<UserRecord>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        let user = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse {}", self.path.display()))?;
        Ok(Some(user))
    }

    fn store(&self, user: &UserRecord) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let serialised = serde_json::to_vec_pretty(user)?;
        fs::write(&self.path, serialised)
            .with_context(|| format!("failed to write {}", self.path.display()))
    }

    fn clear(&self) -> Result<()> {
        if !self.path.exists() {
            return Ok(());
        }
        fs::remove_file(&self.path)
            .with_context(|| format!("failed to remove {}", self.path.display()))
    }
}

/// Process-local mirror, mostly for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryMirror {
    stored: Mutex<Option<String>>,
}

impl MemoryMirror {
    /// Empty mirror.
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw JSON currently held, if any.
    pub fn raw(&self) -> Option<String> {
        self.stored.lock().clone()
    }
}

impl SessionMirror for MemoryMirror {
    fn load(&self) -> Result<Option<UserRecord>> {
        match self.stored.lock().as_deref() {
            Some(json) => Ok(Some(
                serde_json::from_str(json).context("failed to parse mirrored session")?,
            )),
            None => Ok(None),
        }
    }

    fn store(&self, user: &UserRecord) -> Result<()> {
        let json = serde_json::to_string(user)?;
        *self.stored.lock() = Some(json);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.stored.lock().take();
        Ok(())
    }
}

fn sanitize_key(input: &str) -> String {
    let result: String = input
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_'))
        .collect();
    if result.is_empty() {
        "session".to_string()
    } else {
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use tempfile::tempdir;

    fn sample_user() -> UserRecord {
        UserRecord {
            id: "ST12345".to_string(),
            first_name: "Alex".to_string(),
            last_name: "Johnson".to_string(),
            email: "alex.johnson@example.com".to_string(),
            password_hash: "sha256$aa$bb".to_string(),
            role: Role::Student,
            parent_id: Some("PAR12345".to_string()),
            child_id: None,
        }
    }

    #[test]
    fn file_mirror_round_trip() -> Result<()> {
        let dir = tempdir()?;
        let mirror = FileMirror::new(dir.path().join("state"), "currentUser");
        assert_eq!(mirror.path().file_name().unwrap(), "currentUser.json");
        assert!(mirror.load()?.is_none());

        let user = sample_user();
        mirror.store(&user)?;
        assert!(mirror.path().exists());
        assert_eq!(mirror.load()?, Some(user));

        mirror.clear()?;
        assert!(!mirror.path().exists());
        assert!(mirror.load()?.is_none());
        mirror.clear()?;
        Ok(())
    }

    #[test]
    fn file_mirror_reports_corrupt_payload() -> Result<()> {
        let dir = tempdir()?;
        let mirror = FileMirror::new(dir.path(), "currentUser");
        fs::write(mirror.path(), "{not json")?;
        assert!(mirror.load().is_err());
        Ok(())
    }

    #[test]
    fn memory_mirror_round_trip() -> Result<()> {
        let mirror = MemoryMirror::new();
        let user = sample_user();
        mirror.store(&user)?;
        assert!(mirror.raw().unwrap().contains("\"parentId\":\"PAR12345\""));
        assert_eq!(mirror.load()?, Some(user));
        mirror.clear()?;
        assert!(mirror.load()?.is_none());
        Ok(())
    }

    #[test]
    fn sanitize_strips_path_characters() {
        assert_eq!(sanitize_key("../current User"), "currentUser");
        assert_eq!(sanitize_key("///"), "session");
    }
}
