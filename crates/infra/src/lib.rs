//! `campusgate-infra` — storage adapters.
//!
//! In-memory implementations backed by `RwLock<HashMap>`. Uniqueness checks
//! and command execution run under the write guard, so concurrent callers
//! observe check-and-set atomically.

pub mod pass_store;
pub mod user_store;

pub use pass_store::{GatePassStore, InMemoryGatePassStore};
pub use user_store::{InMemoryUserStore, UserStore};
