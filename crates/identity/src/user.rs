//! User entity.
//!
//! Role-specific fields live in a tagged [`Profile`] variant rather than
//! conditionally-required nullable columns, so a student record cannot carry
//! an admin ID (and vice versa) by construction.

use chrono::{DateTime, Utc};
use serde::Serialize;

use campusgate_auth::Role;
use campusgate_core::UserId;

/// Role-specific portion of a user record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Profile {
    Student {
        roll_number: String,
        /// Reference to the uploaded ID-card image (storage is out of scope).
        id_card_image_ref: String,
    },
    Admin {
        admin_id: String,
    },
}

/// A registered user (student or admin).
///
/// # Lifecycle
/// Created at registration; the role/profile is immutable afterwards. Only
/// `last_login` and `is_active` are ever updated. Never deleted in scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub profile: Profile,
    pub is_active: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new_student(
        name: &str,
        email: &str,
        password_hash: String,
        roll_number: &str,
        id_card_image_ref: &str,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: UserId::new(),
            name: name.trim().to_string(),
            email: email.trim().to_lowercase(),
            password_hash,
            profile: Profile::Student {
                roll_number: roll_number.trim().to_uppercase(),
                id_card_image_ref: id_card_image_ref.trim().to_string(),
            },
            is_active: true,
            last_login: None,
            created_at: now,
        }
    }

    pub fn new_admin(
        name: &str,
        email: &str,
        password_hash: String,
        admin_id: &str,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: UserId::new(),
            name: name.trim().to_string(),
            email: email.trim().to_lowercase(),
            password_hash,
            profile: Profile::Admin {
                admin_id: admin_id.trim().to_uppercase(),
            },
            is_active: true,
            last_login: None,
            created_at: now,
        }
    }

    pub fn role(&self) -> Role {
        match self.profile {
            Profile::Student { .. } => Role::Student,
            Profile::Admin { .. } => Role::Admin,
        }
    }

    pub fn roll_number(&self) -> Option<&str> {
        match &self.profile {
            Profile::Student { roll_number, .. } => Some(roll_number),
            Profile::Admin { .. } => None,
        }
    }

    pub fn admin_id(&self) -> Option<&str> {
        match &self.profile {
            Profile::Student { .. } => None,
            Profile::Admin { admin_id } => Some(admin_id),
        }
    }

    /// Sanitized projection for API responses; never includes the hash.
    pub fn public_profile(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            name: self.name.clone(),
            role: self.role(),
            roll_number: self.roll_number().map(str::to_string),
            admin_id: self.admin_id().map(str::to_string),
        }
    }
}

/// What the API is allowed to say about a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: UserId,
    pub name: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roll_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn student_normalizes_email_and_roll() {
        let user = User::new_student(
            "  Alice ",
            "Alice@VNIT.ac.in",
            "hash".into(),
            "bt20mec001",
            "uploads/alice.png",
            Utc::now(),
        );

        assert_eq!(user.name, "Alice");
        assert_eq!(user.email, "alice@vnit.ac.in");
        assert_eq!(user.roll_number(), Some("BT20MEC001"));
        assert_eq!(user.admin_id(), None);
        assert_eq!(user.role(), Role::Student);
    }

    #[test]
    fn public_profile_omits_hash_and_foreign_fields() {
        let user = User::new_admin("Ward", "ward@vnit.ac.in", "hash".into(), "GTVNIT001", Utc::now());
        let public = user.public_profile();

        assert_eq!(public.role, Role::Admin);
        assert_eq!(public.admin_id.as_deref(), Some("GTVNIT001"));
        assert_eq!(public.roll_number, None);

        let json = serde_json::to_value(&public).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("rollNumber").is_none());
        assert_eq!(json["adminId"], "GTVNIT001");
    }
}
