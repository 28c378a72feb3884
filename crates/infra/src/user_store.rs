use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};

use campusgate_core::{DomainError, DomainResult, UserId};
use campusgate_identity::User;

/// User persistence abstraction.
pub trait UserStore: Send + Sync {
    /// Insert a new user, enforcing email / roll-number / admin-ID uniqueness.
    fn insert(&self, user: User) -> DomainResult<()>;
    fn get(&self, id: UserId) -> Option<User>;
    /// Case-insensitive email lookup.
    fn find_by_email(&self, email: &str) -> Option<User>;
    fn record_login(&self, id: UserId, at: DateTime<Utc>) -> DomainResult<()>;
}

impl<S> UserStore for Arc<S>
where
    S: UserStore + ?Sized,
{
    fn insert(&self, user: User) -> DomainResult<()> {
        (**self).insert(user)
    }

    fn get(&self, id: UserId) -> Option<User> {
        (**self).get(id)
    }

    fn find_by_email(&self, email: &str) -> Option<User> {
        (**self).find_by_email(email)
    }

    fn record_login(&self, id: UserId, at: DateTime<Utc>) -> DomainResult<()> {
        (**self).record_login(id, at)
    }
}

/// In-memory user store.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    inner: RwLock<HashMap<UserId, User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_poisoned() -> DomainError {
    DomainError::internal("user store lock poisoned")
}

impl UserStore for InMemoryUserStore {
    fn insert(&self, user: User) -> DomainResult<()> {
        let mut map = self.inner.write().map_err(|_| lock_poisoned())?;

        if map.values().any(|u| u.email == user.email) {
            return Err(DomainError::validation("User already exists"));
        }

        if let Some(roll) = user.roll_number() {
            if map.values().any(|u| u.roll_number() == Some(roll)) {
                return Err(DomainError::validation("Roll number already registered"));
            }
        }

        if let Some(admin_id) = user.admin_id() {
            if map.values().any(|u| u.admin_id() == Some(admin_id)) {
                return Err(DomainError::validation("Admin ID already registered"));
            }
        }

        map.insert(user.id, user);
        Ok(())
    }

    fn get(&self, id: UserId) -> Option<User> {
        let map = self.inner.read().ok()?;
        map.get(&id).cloned()
    }

    fn find_by_email(&self, email: &str) -> Option<User> {
        let needle = email.trim().to_lowercase();
        let map = self.inner.read().ok()?;
        map.values().find(|u| u.email == needle).cloned()
    }

    fn record_login(&self, id: UserId, at: DateTime<Utc>) -> DomainResult<()> {
        let mut map = self.inner.write().map_err(|_| lock_poisoned())?;
        let user = map
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found("User not found"))?;
        user.last_login = Some(at);
        Ok(())
    }
}
