//! Domain event contract.

use chrono::{DateTime, Utc};

/// Minimal interface every domain event implements.
///
/// `event_type` is a stable, dot-separated name used for structured logging
/// and auditing.
pub trait Event: Clone + core::fmt::Debug {
    fn event_type(&self) -> &'static str;

    fn occurred_at(&self) -> DateTime<Utc>;
}
