pub mod user;

pub use user::{NewUser, Profile, User, UserChanges};
