pub mod collection;
pub mod cookie;
pub mod session;

use std::str::FromStr;

use async_trait::async_trait;

use crate::core::errors::AppError;
use crate::core::models::{NewUser, User, UserChanges};
use crate::infrastructure::session::Session;
use cookie::CookieUserStore;
use session::SessionUserStore;

/// CRUD over the user records of one client.
///
/// Every mutating call has persisted the whole collection to the backing
/// medium by the time it returns.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find(&self, id: &str) -> Result<User, AppError>;
    async fn all(&self) -> Result<Vec<User>, AppError>;
    async fn create(&mut self, new_user: NewUser) -> Result<User, AppError>;
    async fn update(&mut self, id: &str, changes: UserChanges) -> Result<User, AppError>;
    async fn delete(&mut self, id: &str) -> Result<(), AppError>;

    /// `Set-Cookie` value the client must receive for the last mutation to
    /// stick. `None` for server-side media.
    fn response_cookie(&self) -> Option<String> {
        None
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StoreBackend {
    #[default]
    Session,
    Cookie,
}

impl StoreBackend {
    /// Opens the store for one request. `users_cookie` is the raw value of
    /// the incoming `users` cookie, if any.
    pub fn open(self, session: Session, users_cookie: Option<&str>) -> Box<dyn UserStore> {
        match self {
            StoreBackend::Session => Box::new(SessionUserStore::new(session)),
            StoreBackend::Cookie => Box::new(CookieUserStore::from_cookie(users_cookie)),
        }
    }
}

impl FromStr for StoreBackend {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "session" => Ok(StoreBackend::Session),
            "cookie" => Ok(StoreBackend::Cookie),
            other => Err(AppError::Storage(format!("Unknown user store `{}`", other))),
        }
    }
}
