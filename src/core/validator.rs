use std::sync::LazyLock;

use regex::Regex;

use crate::core::errors::ValidationErrors;
use crate::core::models::user::Profile;

pub const NAME_MIN_LENGTH: usize = 2;
pub const NAME_MAX_LENGTH: usize = 10;

pub const NAME_LENGTH_MESSAGE: &str = "name should be from 2 to 10 characters";
pub const EMAIL_FORMAT_MESSAGE: &str = "email should be like example@mail.com";

// Searched, not anchored: any substring shaped like an address passes.
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[a-zA-Z0-9._-]+@[a-zA-Z0-9._-]+\.[a-zA-Z0-9_-]+").expect("valid email pattern")
});

/// Checks the name length and email shape of a record or submission.
///
/// An empty result means the record is valid. Name errors come before email
/// errors.
pub fn validate<P: Profile + ?Sized>(record: &P) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    let name_length = record.name().chars().count();
    if !(NAME_MIN_LENGTH..=NAME_MAX_LENGTH).contains(&name_length) {
        errors.add("name", NAME_LENGTH_MESSAGE);
    }
    if !EMAIL_PATTERN.is_match(record.email()) {
        errors.add("email", EMAIL_FORMAT_MESSAGE);
    }

    errors
}
