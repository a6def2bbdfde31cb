use askama::Template;
use axum::response::Html;

use crate::api::models::ApiError;
use crate::core::errors::{AppError, ValidationErrors};
use crate::core::models::User;
use crate::infrastructure::session::flash::Flash;

#[derive(Template)]
#[template(path = "users/index.html")]
pub struct IndexTemplate {
    pub term: String,
    pub users: Vec<User>,
    pub messages: Flash,
}

#[derive(Template)]
#[template(path = "users/show.html")]
pub struct ShowTemplate {
    pub user: User,
}

/// Values a user form is filled with. Password inputs are never pre-filled,
/// so only name and email are carried.
#[derive(Clone, Debug, Default)]
pub struct UserFields {
    pub name: String,
    pub email: String,
}

impl From<&User> for UserFields {
    fn from(user: &User) -> Self {
        UserFields {
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

#[derive(Template)]
#[template(path = "users/new.html")]
pub struct NewUserTemplate {
    pub user: UserFields,
    pub errors: ValidationErrors,
    pub messages: Flash,
}

#[derive(Template)]
#[template(path = "users/edit.html")]
pub struct EditUserTemplate {
    pub id: String,
    pub user: UserFields,
    pub errors: ValidationErrors,
    pub messages: Flash,
}

pub fn render<T: Template>(template: &T) -> Result<Html<String>, ApiError> {
    let html = template.render().map_err(AppError::from)?;
    Ok(Html(html))
}
