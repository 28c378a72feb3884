//! `campusgate-auth` — authentication/authorization boundary.
//!
//! Claims validation is pure and transport-agnostic; the HS256 codec and the
//! bcrypt helpers are the only pieces touching external crates.

pub mod claims;
pub mod password;
pub mod roles;
pub mod token;

pub use claims::{AccessClaims, TokenValidationError, validate_claims};
pub use password::{PasswordError, hash_password, verify_password};
pub use roles::Role;
pub use token::{Hs256TokenCodec, TOKEN_TTL_HOURS, TokenError};
