//! Session registry: holds the live transfer sessions for concurrent
//! frontends. The registry is an explicit value callers own and pass around,
//! not a process-wide static, so tests and embedders can run isolated
//! instances side by side.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use tracing::info;
use uuid::Uuid;

use crate::models::Formation;
use crate::squad::TransferSession;

/// Shared handle to one live session.
pub type SessionHandle = Arc<Mutex<TransferSession>>;

/// Thread-safe map of session id to session.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<Uuid, SessionHandle>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fresh session and return its id with a handle to it.
    pub fn create(&self, formation: Formation) -> (Uuid, SessionHandle) {
        let id = Uuid::new_v4();
        let handle: SessionHandle = Arc::new(Mutex::new(TransferSession::new(formation)));
        // Lock poisoning means another thread panicked mid-write; the map
        // itself is still a valid HashMap, so recover the guard.
        let mut sessions = self.sessions.write().unwrap_or_else(|e| e.into_inner());
        sessions.insert(id, Arc::clone(&handle));
        info!(session = %id, %formation, "session created");
        (id, handle)
    }

    /// Look up a session by id.
    pub fn get(&self, id: &Uuid) -> Option<SessionHandle> {
        let sessions = self.sessions.read().unwrap_or_else(|e| e.into_inner());
        sessions.get(id).map(Arc::clone)
    }

    /// Drop a session. Returns the handle if it existed; outstanding clones
    /// keep the session alive until they are released.
    pub fn remove(&self, id: &Uuid) -> Option<SessionHandle> {
        let mut sessions = self.sessions.write().unwrap_or_else(|e| e.into_inner());
        let removed = sessions.remove(id);
        if removed.is_some() {
            info!(session = %id, "session removed");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.sessions.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_get_remove_roundtrip() {
        let registry = SessionRegistry::new();
        assert!(registry.is_empty());

        let (id, handle) = registry.create(Formation::F433);
        assert_eq!(registry.len(), 1);

        let looked_up = registry.get(&id).expect("session should exist");
        assert!(Arc::ptr_eq(&handle, &looked_up));

        assert!(registry.remove(&id).is_some());
        assert!(registry.get(&id).is_none());
        assert!(registry.remove(&id).is_none());
    }

    #[test]
    fn test_sessions_are_independent() {
        let registry = SessionRegistry::new();
        let (a, handle_a) = registry.create(Formation::F433);
        let (b, _handle_b) = registry.create(Formation::F442);
        assert_ne!(a, b);

        handle_a.lock().unwrap().set_formation(Formation::F352);
        let b_formation = registry.get(&b).unwrap().lock().unwrap().roster().formation();
        assert_eq!(b_formation, Formation::F442);
    }

    #[test]
    fn test_handle_survives_removal() {
        let registry = SessionRegistry::new();
        let (id, handle) = registry.create(Formation::F433);
        let removed = registry.remove(&id).unwrap();
        assert!(Arc::ptr_eq(&handle, &removed));
        // Still usable through the retained handle.
        assert_eq!(handle.lock().unwrap().roster().len(), 0);
    }
}
