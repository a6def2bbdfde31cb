pub mod api;
pub mod config;
pub mod core;
pub mod infrastructure;

pub use api::{AppState, app};
pub use crate::core::errors::AppError;
pub use crate::core::validator::validate;
pub use infrastructure::session::SessionStore;
pub use infrastructure::storage::{StoreBackend, UserStore};

#[cfg(test)]
mod tests; // Include integration tests
