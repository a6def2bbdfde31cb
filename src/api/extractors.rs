use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use headers::{Cookie, HeaderMapExt};

use crate::api::models::ApiError;
use crate::api::state::AppState;
use crate::core::errors::AppError;
use crate::infrastructure::session::Session;
use crate::infrastructure::storage::UserStore;
use crate::infrastructure::storage::cookie::USERS_COOKIE;

impl<S: Send + Sync> FromRequestParts<S> for Session {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::Session("session middleware is not installed".to_string()).into())
    }
}

/// The user store for the current request, opened on the configured backend.
pub struct Users(pub Box<dyn UserStore>);

impl FromRequestParts<AppState> for Users {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state).await?;
        let cookies = parts.headers.typed_get::<Cookie>();
        let users_cookie = cookies.as_ref().and_then(|c| c.get(USERS_COOKIE));
        Ok(Users(state.backend.open(session, users_cookie)))
    }
}
