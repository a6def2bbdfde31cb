use serde::{Deserialize, Serialize};

use crate::core::errors::AppError;
use crate::core::models::user::generate_id;
use crate::core::models::{NewUser, User, UserChanges};

/// The full user list in insertion order. Both store backends persist it
/// as a whole after every mutation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserCollection(Vec<User>);

impl UserCollection {
    pub fn new(users: Vec<User>) -> Self {
        UserCollection(users)
    }

    pub fn find(&self, id: &str) -> Result<User, AppError> {
        self.0
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or_else(|| AppError::UserNotFound(id.to_string()))
    }

    pub fn all(&self) -> Vec<User> {
        self.0.clone()
    }

    pub fn create(&mut self, new_user: NewUser) -> User {
        let mut user = User::from_new(new_user);
        while self.0.iter().any(|u| u.id == user.id) {
            user.id = generate_id();
        }
        self.0.push(user.clone());
        user
    }

    pub fn update(&mut self, id: &str, changes: UserChanges) -> Result<User, AppError> {
        let user = self
            .0
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| AppError::UserNotFound(id.to_string()))?;
        user.apply(changes);
        Ok(user.clone())
    }

    /// Returns whether a record was removed. Unknown ids are not an error.
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|u| u.id != id);
        self.0.len() != before
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
