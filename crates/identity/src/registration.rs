//! Registration input validation.
//!
//! The admin-ID allow-list and the student email domain are injected
//! configuration, not literals inside the checks.

use campusgate_core::{DomainError, DomainResult};

/// Institution-specific registration rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationPolicy {
    /// Domain students must register with (e.g. `vnit.ac.in`).
    pub student_email_domain: String,

    /// The fixed set of recognized admin identifiers.
    pub admin_allowlist: Vec<String>,
}

impl Default for RegistrationPolicy {
    fn default() -> Self {
        Self {
            student_email_domain: "vnit.ac.in".to_string(),
            admin_allowlist: (1..=5).map(|n| format!("GTVNIT{n:03}")).collect(),
        }
    }
}

/// Raw student registration input.
#[derive(Debug, Clone)]
pub struct StudentRegistration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub roll_number: String,
    pub id_card_image_ref: String,
}

/// Raw admin registration input.
#[derive(Debug, Clone)]
pub struct AdminRegistration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub admin_id: String,
}

impl RegistrationPolicy {
    pub fn validate_student(&self, reg: &StudentRegistration) -> DomainResult<()> {
        let all_present = [
            &reg.name,
            &reg.email,
            &reg.password,
            &reg.roll_number,
            &reg.id_card_image_ref,
        ]
        .iter()
        .all(|f| !f.trim().is_empty());

        if !all_present {
            return Err(DomainError::validation("All fields are required"));
        }

        if !is_student_email(reg.email.trim(), &self.student_email_domain) {
            return Err(DomainError::validation(format!(
                "Please use your institute email (@{})",
                self.student_email_domain
            )));
        }

        if !is_roll_number(reg.roll_number.trim()) {
            return Err(DomainError::validation(
                "Invalid roll number format. Use format like BT20MEC001",
            ));
        }

        Ok(())
    }

    pub fn validate_admin(&self, reg: &AdminRegistration) -> DomainResult<()> {
        let all_present = [&reg.name, &reg.email, &reg.password, &reg.admin_id]
            .iter()
            .all(|f| !f.trim().is_empty());

        if !all_present {
            return Err(DomainError::validation("All fields are required"));
        }

        let admin_id = reg.admin_id.trim().to_uppercase();
        if !self.admin_allowlist.iter().any(|id| *id == admin_id) {
            return Err(DomainError::validation("Invalid Admin ID"));
        }

        Ok(())
    }
}

/// `<local-part>@<domain>`, local part restricted to the usual email chars.
fn is_student_email(email: &str, domain: &str) -> bool {
    let Some((local, dom)) = email.rsplit_once('@') else {
        return false;
    };

    !local.is_empty()
        && local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "._%+-".contains(c))
        && dom.eq_ignore_ascii_case(domain)
}

/// `BT` + 2 digits + 3 uppercase letters + 3 digits (e.g. `BT20MEC001`).
fn is_roll_number(roll: &str) -> bool {
    let b = roll.as_bytes();
    b.len() == 10
        && &b[..2] == b"BT"
        && b[2..4].iter().all(u8::is_ascii_digit)
        && b[4..7].iter().all(u8::is_ascii_uppercase)
        && b[7..].iter().all(u8::is_ascii_digit)
}
