//! Per-session selection state
//!
//! The dataset and layout are shared read-only between all connected
//! clients; only the [`Selection`](crate::binder::Selection) is per-session.
//! Sessions live in a bounded registry and the least recently used one is
//! evicted when the registry is full.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

use crate::binder::Session;
use crate::view::DashboardLayout;

/// Opaque session handle handed to clients
pub type SessionId = u64;

/// A live session and the tick of its last use
#[derive(Debug)]
struct Entry {
    session: Session,
    last_used: u64,
}

/// Bounded map of live sessions
#[derive(Debug)]
pub struct SessionRegistry {
    next_id: AtomicU64,
    // Monotonic use counter; only touched under the sessions lock
    clock: AtomicU64,
    max_sessions: usize,
    sessions: Mutex<BTreeMap<SessionId, Entry>>,
}

impl SessionRegistry {
    pub fn new(max_sessions: usize) -> Self {
        Self {
            next_id: AtomicU64::new(1),
            clock: AtomicU64::new(0),
            max_sessions: max_sessions.max(1),
            sessions: Mutex::new(BTreeMap::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<SessionId, Entry>> {
        // Sessions hold plain data; a panic elsewhere cannot leave one half-updated
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn tick(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::Relaxed)
    }

    /// Start a new session with the layout's default selection
    pub fn create(&self, layout: &DashboardLayout) -> (SessionId, Session) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let session = Session::new(layout);

        let mut sessions = self.lock();
        while sessions.len() >= self.max_sessions {
            let Some(evicted) = sessions
                .iter()
                .min_by_key(|(_, entry)| entry.last_used)
                .map(|(id, _)| *id)
            else {
                break;
            };
            sessions.remove(&evicted);
            warn!(
                session = evicted,
                "session limit reached, evicting least recently used session"
            );
        }
        let last_used = self.tick();
        sessions.insert(
            id,
            Entry {
                session: session.clone(),
                last_used,
            },
        );
        debug!(session = id, live = sessions.len(), "session created");

        (id, session)
    }

    /// Run `f` against a session and mark it used; `None` if the id is unknown
    pub fn with_session<T>(&self, id: SessionId, f: impl FnOnce(&mut Session) -> T) -> Option<T> {
        let mut sessions = self.lock();
        let entry = sessions.get_mut(&id)?;
        entry.last_used = self.tick();
        Some(f(&mut entry.session))
    }

    /// Drop a session; returns whether it existed
    pub fn remove(&self, id: SessionId) -> bool {
        let removed = self.lock().remove(&id).is_some();
        if removed {
            debug!(session = id, "session closed");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
