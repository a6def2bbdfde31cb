use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::{debug, error};

use crate::core::errors::AppError;
use crate::core::models::{NewUser, UserChanges};

pub const NOT_FOUND_BODY: &str = "404 Not found";
pub const INTERNAL_ERROR_BODY: &str = "500 Internal server error";

// Form bodies use the bracketed names HTML forms submit, e.g. `user[name]`.
#[derive(Debug, Default, Deserialize)]
pub struct CreateUserForm {
    #[serde(rename = "user[name]", default)]
    pub name: String,
    #[serde(rename = "user[email]", default)]
    pub email: String,
    #[serde(rename = "user[password]", default)]
    pub password: String,
    #[serde(rename = "user[password_confirmation]", default)]
    pub password_confirmation: String,
}

impl From<CreateUserForm> for NewUser {
    fn from(form: CreateUserForm) -> Self {
        NewUser {
            name: form.name,
            email: form.email,
            password: form.password,
            password_confirmation: form.password_confirmation,
        }
    }
}

// Missing or blank fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserForm {
    #[serde(rename = "user[name]", default)]
    pub name: Option<String>,
    #[serde(rename = "user[email]", default)]
    pub email: Option<String>,
}

impl From<UpdateUserForm> for UserChanges {
    fn from(form: UpdateUserForm) -> Self {
        UserChanges {
            name: form.name.filter(|v| !v.is_empty()),
            email: form.email.filter(|v| !v.is_empty()),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub name: String,
}

// Newtype wrapper for AppError to implement IntoResponse
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.0 {
            AppError::UserNotFound(id) => {
                debug!(user_id = %id, "User not found");
                (StatusCode::NOT_FOUND, NOT_FOUND_BODY).into_response()
            }
            err => {
                error!(error = %err, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_BODY).into_response()
            }
        }
    }
}
