use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::errors::AppError;
use crate::core::models::{NewUser, User, UserChanges};
use crate::infrastructure::session::Session;
use crate::infrastructure::storage::UserStore;
use crate::infrastructure::storage::collection::UserCollection;

/// Session key the records are stored under.
pub const USERS_KEY: &str = "users";

/// A record as kept in the session map, with its place in the list.
#[derive(Debug, Serialize, Deserialize)]
struct StoredUser {
    position: usize,
    user: User,
}

type UsersById = HashMap<String, StoredUser>;

/// Keeps the records in the server-side session as a map keyed by id.
pub struct SessionUserStore {
    session: Session,
}

impl SessionUserStore {
    pub fn new(session: Session) -> Self {
        SessionUserStore { session }
    }

    async fn load_map(&self) -> Result<UsersById, AppError> {
        Ok(self.session.get(USERS_KEY).await?.unwrap_or_default())
    }

    async fn load(&self) -> Result<UserCollection, AppError> {
        let mut stored: Vec<StoredUser> = self.load_map().await?.into_values().collect();
        stored.sort_by_key(|s| s.position);
        Ok(UserCollection::new(stored.into_iter().map(|s| s.user).collect()))
    }

    async fn save(&self, users: &UserCollection) -> Result<(), AppError> {
        let by_id: UsersById = users
            .all()
            .into_iter()
            .enumerate()
            .map(|(position, user)| (user.id.clone(), StoredUser { position, user }))
            .collect();
        self.session.insert(USERS_KEY, &by_id).await?;
        debug!(session_id = %self.session.id(), count = users.len(), "Persisted users to session");
        Ok(())
    }
}

#[async_trait]
impl UserStore for SessionUserStore {
    async fn find(&self, id: &str) -> Result<User, AppError> {
        self.load_map()
            .await?
            .remove(id)
            .map(|s| s.user)
            .ok_or_else(|| AppError::UserNotFound(id.to_string()))
    }

    async fn all(&self) -> Result<Vec<User>, AppError> {
        Ok(self.load().await?.all())
    }

    async fn create(&mut self, new_user: NewUser) -> Result<User, AppError> {
        let mut users = self.load().await?;
        let user = users.create(new_user);
        self.save(&users).await?;
        Ok(user)
    }

    async fn update(&mut self, id: &str, changes: UserChanges) -> Result<User, AppError> {
        let mut users = self.load().await?;
        let user = users.update(id, changes)?;
        self.save(&users).await?;
        Ok(user)
    }

    async fn delete(&mut self, id: &str) -> Result<(), AppError> {
        let mut users = self.load().await?;
        if users.delete(id) {
            self.save(&users).await?;
        }
        Ok(())
    }
}
