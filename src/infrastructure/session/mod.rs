pub mod flash;

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;
use uuid::Uuid;

use crate::core::errors::AppError;
use flash::{FLASH_KEY, Flash, FlashLevel};

pub const SESSION_COOKIE: &str = "sid";

struct SessionData {
    values: HashMap<String, Value>,
    last_seen: DateTime<Utc>,
}

impl SessionData {
    fn new() -> Self {
        SessionData {
            values: HashMap::new(),
            last_seen: Utc::now(),
        }
    }
}

/// Server-side session map keyed by the id in the `sid` cookie.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, SessionData>>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        SessionStore {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Resumes the session named by `id` or opens a new one.
    ///
    /// The flag is `true` when a new session was opened and the client has
    /// to be told its id.
    pub async fn resume(&self, id: Option<&str>) -> (Session, bool) {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;

        if let Some(id) = id {
            if let Some(data) = sessions.get_mut(id) {
                if now - data.last_seen <= self.ttl {
                    data.last_seen = now;
                    return (self.handle(id.to_string()), false);
                }
                debug!(session_id = %id, "Session expired");
            }
        }

        self.expire(&mut sessions, now);

        let id = Uuid::new_v4().simple().to_string();
        sessions.insert(id.clone(), SessionData::new());
        debug!(session_id = %id, active = sessions.len(), "Session opened");
        (self.handle(id), true)
    }

    /// Drops sessions idle longer than the TTL and returns how many went.
    pub async fn prune(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let removed = self.expire(&mut sessions, Utc::now());
        if removed > 0 {
            debug!(removed, active = sessions.len(), "Pruned idle sessions");
        }
        removed
    }

    /// Prunes on a fixed period until the runtime shuts down.
    pub fn spawn_pruner(&self, every: std::time::Duration) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                store.prune().await;
            }
        })
    }

    fn expire(&self, sessions: &mut HashMap<String, SessionData>, now: DateTime<Utc>) -> usize {
        let before = sessions.len();
        let ttl = self.ttl;
        sessions.retain(|_, data| now - data.last_seen <= ttl);
        before - sessions.len()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    fn handle(&self, id: String) -> Session {
        Session {
            id,
            store: self.clone(),
        }
    }
}

/// Handle to one client's session, valid for the current request.
#[derive(Clone)]
pub struct Session {
    id: String,
    store: SessionStore,
}

impl Session {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// `Set-Cookie` value that hands the session id to the client.
    pub fn cookie(&self) -> String {
        format!("{}={}; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE, self.id)
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, AppError> {
        let sessions = self.store.sessions.read().await;
        match sessions.get(&self.id).and_then(|data| data.values.get(key)) {
            Some(value) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(|e| AppError::Session(format!("Corrupt session value `{}`: {}", key, e))),
            None => Ok(None),
        }
    }

    pub async fn insert<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), AppError> {
        let value = serde_json::to_value(value).map_err(|e| AppError::Session(e.to_string()))?;
        let mut sessions = self.store.sessions.write().await;
        sessions
            .entry(self.id.clone())
            .or_insert_with(SessionData::new)
            .values
            .insert(key.to_string(), value);
        Ok(())
    }

    pub async fn remove(&self, key: &str) {
        if let Some(data) = self.store.sessions.write().await.get_mut(&self.id) {
            data.values.remove(key);
        }
    }

    /// Queues a message for the next rendered page.
    pub async fn flash(&self, level: FlashLevel, message: impl Into<String>) -> Result<(), AppError> {
        let mut pending: Flash = self.get(FLASH_KEY).await?.unwrap_or_default();
        pending.push(level, message);
        self.insert(FLASH_KEY, &pending).await
    }

    /// Returns the pending messages and clears them.
    pub async fn take_flash(&self) -> Result<Flash, AppError> {
        let pending: Flash = self.get(FLASH_KEY).await?.unwrap_or_default();
        self.remove(FLASH_KEY).await;
        Ok(pending)
    }
}
