use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Anything carrying the two validated fields of a user.
pub trait Profile {
    fn name(&self) -> &str;
    fn email(&self) -> &str;
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub password_confirmation: String,
}

/// Opaque record id: 32 lowercase hex characters.
pub fn generate_id() -> String {
    Uuid::new_v4().simple().to_string()
}

impl User {
    /// Stamps a submission with a freshly generated id.
    pub fn from_new(new_user: NewUser) -> Self {
        User {
            id: generate_id(),
            name: new_user.name,
            email: new_user.email,
            password: new_user.password,
            password_confirmation: new_user.password_confirmation,
        }
    }

    /// Applies an edit. Only the submitted fields change; password fields
    /// and the id are left alone.
    pub fn apply(&mut self, changes: UserChanges) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(email) = changes.email {
            self.email = email;
        }
    }
}

/// A creation form submission.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
}

/// An edit submission. `None` leaves the stored value as it is.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl Profile for User {
    fn name(&self) -> &str {
        &self.name
    }

    fn email(&self) -> &str {
        &self.email
    }
}

impl Profile for NewUser {
    fn name(&self) -> &str {
        &self.name
    }

    fn email(&self) -> &str {
        &self.email
    }
}
