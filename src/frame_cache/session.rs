/*
This file is part of the OpenMap tools library.
Created: 17/10/2026
Last Modified: 19/10/2026
License: MIT

Notes: Per-client session table. Each client id maps to a single record
holding its cache, its view attributes and its last-access time, so that
creation and every kind of eviction update all three at once.
*/
use super::clock::Clock;
use super::view_attributes::ViewAttributes;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, warn};

/// Builds a client's cache. Returns `None` when there is no data source.
pub type CacheFactory<C> = Box<dyn Fn() -> Option<C> + Send + Sync>;

struct ClientSession<C> {
    cache: Option<Arc<Mutex<C>>>,
    view_attributes: Option<ViewAttributes>,
    last_access_ms: i64,
}

pub struct ClientCacheTable<C> {
    sessions: Mutex<HashMap<String, ClientSession<C>>>,
    max_users: usize,
    factory: CacheFactory<C>,
    clock: Arc<dyn Clock>,
}

impl<C> ClientCacheTable<C> {
    pub fn new(max_users: usize, factory: CacheFactory<C>, clock: Arc<dyn Clock>) -> ClientCacheTable<C> {
        ClientCacheTable {
            sessions: Mutex::new(HashMap::new()),
            max_users: max_users,
            factory: factory,
            clock: clock,
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, ClientSession<C>>> {
        self.sessions.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn max_users(&self) -> usize {
        self.max_users
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn contains(&self, client_id: &str) -> bool {
        self.lock().contains_key(client_id)
    }

    pub fn last_access(&self, client_id: &str) -> Option<i64> {
        self.lock().get(client_id).map(|s| s.last_access_ms)
    }

    /// Returns the client's cache, creating it on first use. The client's
    /// last-access time is refreshed on every call, including calls that
    /// return `None` because no data source is configured.
    pub fn get_current_cache(&self, client_id: &str) -> Option<Arc<Mutex<C>>> {
        self.get_current_session(client_id).0
    }

    /// Like `get_current_cache`, but also returns the client's view
    /// attributes read under the same lock, so a concurrent flush cannot
    /// separate the two.
    pub fn get_current_session(&self, client_id: &str) -> (Option<Arc<Mutex<C>>>, ViewAttributes) {
        let now = self.clock.now_ms();
        let mut sessions = self.lock();
        if !sessions.contains_key(client_id) {
            // make room before adding the new client
            self.evict_while_full(&mut sessions);
        }
        let session = sessions.entry(client_id.to_string()).or_insert_with(|| ClientSession {
            cache: None,
            view_attributes: None,
            last_access_ms: now,
        });
        session.last_access_ms = now;
        if session.cache.is_none() {
            session.cache = (self.factory)().map(|c| Arc::new(Mutex::new(c)));
            if session.cache.is_some() {
                debug!(client = client_id, "created frame cache");
            }
        }
        let view = session
            .view_attributes
            .get_or_insert_with(ViewAttributes::default)
            .clone();
        (session.cache.clone(), view)
    }

    /// Evicts the least recently used client while the population is at or
    /// above the bound. Returns the last client evicted, if any.
    pub fn sweep_caches(&self) -> Option<String> {
        let mut sessions = self.lock();
        self.evict_while_full(&mut sessions)
    }

    fn evict_while_full(&self, sessions: &mut HashMap<String, ClientSession<C>>) -> Option<String> {
        let mut evicted = None;
        while !sessions.is_empty() && sessions.len() >= self.max_users {
            let oldest = sessions
                .iter()
                .min_by_key(|(_, s)| s.last_access_ms)
                .map(|(id, _)| id.clone());
            match oldest {
                Some(id) => {
                    sessions.remove(&id);
                    info!(client = %id, population = sessions.len(), "evicted least recently used client");
                    evicted = Some(id);
                }
                None => break,
            }
        }
        evicted
    }

    /// Drops every client idle for at least `time_window_ms` and returns
    /// their ids.
    pub fn clean_cache(&self, time_window_ms: u64) -> Vec<String> {
        let now = self.clock.now_ms();
        let mut sessions = self.lock();
        let expired: Vec<String> = sessions
            .iter()
            .filter(|(_, s)| idle_ms(now, s.last_access_ms) >= time_window_ms)
            .map(|(id, _)| id.clone())
            .collect();
        for id in &expired {
            sessions.remove(id);
        }
        if !expired.is_empty() {
            info!(removed = expired.len(), remaining = sessions.len(), "idle sweep");
        }
        expired
    }

    /// Removes a client that is disconnecting. Returns false for unknown ids.
    pub fn signoff(&self, client_id: &str) -> bool {
        let removed = self.lock().remove(client_id).is_some();
        if removed {
            debug!(client = client_id, "signed off");
        }
        removed
    }

    /// Drops every client's state. Returns the number of clients cleared.
    pub fn handle_memory_shortage(&self) -> usize {
        let mut sessions = self.lock();
        let cleared = sessions.len();
        sessions.clear();
        warn!(cleared = cleared, "memory shortage, all client caches flushed");
        cleared
    }

    /// The client's view attributes, or the defaults for a client that has
    /// none yet. Reading does not register the client.
    pub fn view_attributes(&self, client_id: &str) -> ViewAttributes {
        self.lock()
            .get(client_id)
            .and_then(|s| s.view_attributes.clone())
            .unwrap_or_default()
    }

    pub fn set_view_attributes(&self, client_id: &str, view_attributes: ViewAttributes) {
        let now = self.clock.now_ms();
        let mut sessions = self.lock();
        if !sessions.contains_key(client_id) {
            self.evict_while_full(&mut sessions);
        }
        let session = sessions.entry(client_id.to_string()).or_insert_with(|| ClientSession {
            cache: None,
            view_attributes: None,
            last_access_ms: now,
        });
        session.view_attributes = Some(view_attributes);
    }
}

/// Milliseconds since `last_access_ms`. A clock that stepped backwards
/// counts as no idle time.
fn idle_ms(now: i64, last_access_ms: i64) -> u64 {
    now.saturating_sub(last_access_ms).max(0) as u64
}
