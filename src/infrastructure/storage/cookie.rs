use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use tracing::{debug, warn};

use crate::core::errors::AppError;
use crate::core::models::{NewUser, User, UserChanges};
use crate::infrastructure::storage::UserStore;
use crate::infrastructure::storage::collection::UserCollection;

pub const USERS_COOKIE: &str = "users";

/// Round-trips the collection through a client cookie: decoded from the
/// request, re-encoded in full after each mutation.
pub struct CookieUserStore {
    users: UserCollection,
    outgoing: Option<String>,
}

impl CookieUserStore {
    pub fn new(users: UserCollection) -> Self {
        CookieUserStore {
            users,
            outgoing: None,
        }
    }

    /// Decodes the raw `users` cookie value. A missing or undecodable value
    /// yields an empty collection.
    pub fn from_cookie(value: Option<&str>) -> Self {
        let users = match value {
            Some(raw) if !raw.is_empty() => decode(raw).unwrap_or_else(|e| {
                warn!(error = %e, "Discarding undecodable users cookie");
                UserCollection::default()
            }),
            _ => UserCollection::default(),
        };
        CookieUserStore::new(users)
    }

    fn persist(&mut self) -> Result<(), AppError> {
        let encoded = encode(&self.users)?;
        debug!(count = self.users.len(), bytes = encoded.len(), "Encoded users cookie");
        self.outgoing = Some(format!("{}={}; Path=/; HttpOnly; SameSite=Lax", USERS_COOKIE, encoded));
        Ok(())
    }
}

pub fn encode(users: &UserCollection) -> Result<String, AppError> {
    let json = serde_json::to_vec(users)?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

pub fn decode(raw: &str) -> Result<UserCollection, AppError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(raw)
        .map_err(|e| AppError::Storage(format!("Invalid users cookie: {}", e)))?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[async_trait]
impl UserStore for CookieUserStore {
    async fn find(&self, id: &str) -> Result<User, AppError> {
        self.users.find(id)
    }

    async fn all(&self) -> Result<Vec<User>, AppError> {
        Ok(self.users.all())
    }

    async fn create(&mut self, new_user: NewUser) -> Result<User, AppError> {
        let user = self.users.create(new_user);
        self.persist()?;
        Ok(user)
    }

    async fn update(&mut self, id: &str, changes: UserChanges) -> Result<User, AppError> {
        let user = self.users.update(id, changes)?;
        self.persist()?;
        Ok(user)
    }

    async fn delete(&mut self, id: &str) -> Result<(), AppError> {
        self.users.delete(id);
        self.persist()
    }

    fn response_cookie(&self) -> Option<String> {
        self.outgoing.clone()
    }
}
