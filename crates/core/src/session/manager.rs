use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::models::UserRecord;

use super::mirror::SessionMirror;

/// Holds the single "who is logged in" fact and keeps its durable mirror in step.
///
/// Clones share the same slot and mirror.
#[derive(Clone)]
pub struct SessionManager {
    slot: Arc<RwLock<Option<UserRecord>>>,
    mirror: Arc<dyn SessionMirror>,
}

impl SessionManager {
    /// Empty session backed by `mirror`.
    pub fn new(mirror: Arc<dyn SessionMirror>) -> Self {
        Self {
            slot: Arc::new(RwLock::new(None)),
            mirror,
        }
    }

    /// Fill the in-memory slot from the mirror and return the restored user.
    pub fn init(&self) -> Option<UserRecord> {
        self.current()
    }

    /// Current user: the in-memory slot, else whatever the mirror holds.
    ///
    /// A value read from the mirror is cached in memory; later mirror changes
    /// are not picked up until [`SessionManager::clear`] empties the slot.
    pub fn current(&self) -> Option<UserRecord> {
        if let Some(user) = self.slot.read().clone() {
            return Some(user);
        }

        let restored = match self.mirror.load() {
            Ok(restored) => restored?,
            Err(err) => {
                warn!(?err, "Failed to read mirrored session");
                return None;
            }
        };

        debug!(user_id = %restored.id, "Session rehydrated from mirror");
        let mut slot = self.slot.write();
        Some(slot.get_or_insert(restored).clone())
    }

    /// Make `user` the current session, in memory and in the mirror.
    pub fn establish(&self, user: UserRecord) {
        if let Err(err) = self.mirror.store(&user) {
            warn!(?err, user_id = %user.id, "Failed to mirror session");
        }
        *self.slot.write() = Some(user);
    }

    /// Forget the current session in memory and in the mirror.
    pub fn clear(&self) {
        self.slot.write().take();
        if let Err(err) = self.mirror.clear() {
            warn!(?err, "Failed to clear mirrored session");
        }
    }

    /// Whether the in-memory slot is populated (the mirror is not consulted).
    pub fn is_active(&self) -> bool {
        self.slot.read().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::Role,
        session::mirror::{FileMirror, MemoryMirror},
    };
    use anyhow::Result;
    use tempfile::tempdir;

    fn user(id: &str, role: Role) -> UserRecord {
        UserRecord {
            id: id.to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            email: format!("{}@example.com", id.to_lowercase()),
            password_hash: "sha256$00$00".to_string(),
            role,
            parent_id: None,
            child_id: None,
        }
    }

    #[test]
    fn establish_then_clear() {
        let mirror = Arc::new(MemoryMirror::new());
        let session = SessionManager::new(mirror.clone());
        assert!(session.current().is_none());

        session.establish(user("FAC12345", Role::Faculty));
        assert!(session.is_active());
        assert_eq!(session.current().unwrap().id, "FAC12345");
        assert!(mirror.raw().is_some());

        session.clear();
        assert!(!session.is_active());
        assert!(session.current().is_none());
        assert!(mirror.raw().is_none());
        session.clear();
    }

    #[test]
    fn rehydrates_from_file_across_managers() -> Result<()> {
        let dir = tempdir()?;
        let first = SessionManager::new(Arc::new(FileMirror::new(dir.path(), "currentUser")));
        first.establish(user("ADM12345", Role::Admin));

        let second = SessionManager::new(Arc::new(FileMirror::new(dir.path(), "currentUser")));
        assert!(!second.is_active());
        let restored = second.init().expect("mirror holds a session");
        assert_eq!(restored.id, "ADM12345");
        assert!(second.is_active());
        Ok(())
    }

    #[test]
    fn cached_slot_wins_over_later_mirror_writes() -> Result<()> {
        let dir = tempdir()?;
        let mirror = Arc::new(FileMirror::new(dir.path(), "currentUser"));
        let tab_a = SessionManager::new(mirror.clone());
        let tab_b = SessionManager::new(mirror.clone());

        tab_a.establish(user("ST12345", Role::Student));
        assert_eq!(tab_b.current().unwrap().id, "ST12345");

        tab_a.establish(user("PAR12345", Role::Parent));
        assert_eq!(tab_b.current().unwrap().id, "ST12345");
        assert_eq!(mirror.load()?.unwrap().id, "PAR12345");
        Ok(())
    }

    #[test]
    fn corrupt_mirror_reads_as_no_session() -> Result<()> {
        let dir = tempdir()?;
        let mirror = FileMirror::new(dir.path(), "currentUser");
        std::fs::write(mirror.path(), "garbage")?;
        let session = SessionManager::new(Arc::new(mirror));
        assert!(session.current().is_none());
        Ok(())
    }
}
