//! `campusgate-identity` — user entity and registration rules.

pub mod registration;
pub mod user;

pub use registration::{AdminRegistration, RegistrationPolicy, StudentRegistration};
pub use user::{Profile, PublicUser, User};
