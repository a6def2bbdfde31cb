pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod state;
pub mod templates;

pub use handlers::{app, routes};
pub use state::AppState;
