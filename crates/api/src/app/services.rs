//! Application services: registration, login, and the gate-pass workflows.
//!
//! Routes stay thin; every business decision funnels through here so the
//! HTTP layer only translates between JSON and domain types.

use std::sync::Arc;

use chrono::Utc;

use campusgate_auth::{hash_password, verify_password, Hs256TokenCodec, Role};
use campusgate_core::{DomainError, DomainResult, GatePassId, UserId};
use campusgate_identity::{
    AdminRegistration, PublicUser, RegistrationPolicy, StudentRegistration, User,
};
use campusgate_infra::{GatePassStore, InMemoryGatePassStore, InMemoryUserStore, UserStore};
use campusgate_passes::{
    ApprovePass, GatePass, GatePassCommand, GuardVerify, PassDetails, PassStatus, RecordTransport,
    RejectPass, RequestPass, TransportDetails, UpdateTransport,
};

pub struct AppServices {
    users: InMemoryUserStore,
    passes: InMemoryGatePassStore,
    policy: RegistrationPolicy,
    tokens: Arc<Hs256TokenCodec>,
}

impl AppServices {
    pub fn new(policy: RegistrationPolicy, tokens: Arc<Hs256TokenCodec>) -> Self {
        Self {
            users: InMemoryUserStore::new(),
            passes: InMemoryGatePassStore::new(),
            policy,
            tokens,
        }
    }

    pub fn register_student(&self, reg: StudentRegistration) -> DomainResult<PublicUser> {
        self.policy.validate_student(&reg)?;

        let hash = hash_password(&reg.password)
            .map_err(|_| DomainError::internal("failed to hash password"))?;
        let user = User::new_student(
            &reg.name,
            &reg.email,
            hash,
            &reg.roll_number,
            &reg.id_card_image_ref,
            Utc::now(),
        );
        let public = user.public_profile();

        self.users.insert(user)?;
        tracing::info!(user_id = %public.id, role = "student", "user registered");
        Ok(public)
    }

    pub fn register_admin(&self, reg: AdminRegistration) -> DomainResult<PublicUser> {
        self.policy.validate_admin(&reg)?;

        let hash = hash_password(&reg.password)
            .map_err(|_| DomainError::internal("failed to hash password"))?;
        let user = User::new_admin(&reg.name, &reg.email, hash, &reg.admin_id, Utc::now());
        let public = user.public_profile();

        self.users.insert(user)?;
        tracing::info!(user_id = %public.id, role = "admin", "user registered");
        Ok(public)
    }

    /// Authenticate and issue a bearer token.
    ///
    /// Unknown email and wrong password produce the same message, so the
    /// endpoint cannot be used to probe which addresses are registered.
    pub fn login(&self, email: &str, password: &str) -> DomainResult<(String, PublicUser)> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(DomainError::validation("Email and password are required"));
        }

        let user = self
            .users
            .find_by_email(email)
            .ok_or_else(|| DomainError::validation("Invalid credentials"))?;

        if !verify_password(password, &user.password_hash) {
            return Err(DomainError::validation("Invalid credentials"));
        }

        let now = Utc::now();
        let token = self
            .tokens
            .issue(user.id, user.role(), now)
            .map_err(|_| DomainError::internal("failed to sign token"))?;

        self.users.record_login(user.id, now)?;
        tracing::info!(user_id = %user.id, "user logged in");
        Ok((token, user.public_profile()))
    }

    pub fn create_pass(&self, student_id: UserId, details: PassDetails) -> DomainResult<GatePass> {
        let pass = self.passes.create(RequestPass {
            pass_id: GatePassId::new(),
            student_id,
            details,
            occurred_at: Utc::now(),
        })?;

        tracing::info!(pass_id = %pass.id_typed(), student_id = %student_id, "gate pass requested");
        Ok(pass)
    }

    pub fn approve_pass(&self, id: GatePassId, admin_id: UserId) -> DomainResult<GatePass> {
        let pass = self.passes.execute(
            id,
            GatePassCommand::Approve(ApprovePass {
                pass_id: id,
                approved_by: admin_id,
                occurred_at: Utc::now(),
            }),
        )?;

        tracing::info!(pass_id = %id, admin_id = %admin_id, "gate pass approved");
        Ok(pass)
    }

    pub fn reject_pass(
        &self,
        id: GatePassId,
        admin_id: UserId,
        rejection_reason: String,
    ) -> DomainResult<GatePass> {
        let pass = self.passes.execute(
            id,
            GatePassCommand::Reject(RejectPass {
                pass_id: id,
                rejected_by: admin_id,
                rejection_reason,
                occurred_at: Utc::now(),
            }),
        )?;

        tracing::info!(pass_id = %id, admin_id = %admin_id, "gate pass rejected");
        Ok(pass)
    }

    /// Owner-only transport update, allowed once approved.
    pub fn update_transport(
        &self,
        id: GatePassId,
        caller: UserId,
        transport: TransportDetails,
    ) -> DomainResult<GatePass> {
        self.passes.execute(
            id,
            GatePassCommand::UpdateTransport(UpdateTransport {
                pass_id: id,
                student_id: caller,
                transport,
                occurred_at: Utc::now(),
            }),
        )
    }

    /// Guard-entered transport details; no status requirement.
    pub fn record_transport(
        &self,
        id: GatePassId,
        transport: TransportDetails,
    ) -> DomainResult<GatePass> {
        self.passes.execute(
            id,
            GatePassCommand::RecordTransport(RecordTransport {
                pass_id: id,
                transport,
                occurred_at: Utc::now(),
            }),
        )
    }

    pub fn guard_verify(&self, id: GatePassId) -> DomainResult<GatePass> {
        let pass = self.passes.execute(
            id,
            GatePassCommand::GuardVerify(GuardVerify {
                pass_id: id,
                occurred_at: Utc::now(),
            }),
        )?;

        tracing::info!(pass_id = %id, "gate pass verified at the gate");
        Ok(pass)
    }

    /// Fetch a single pass; students may only read their own.
    pub fn pass_for(&self, id: GatePassId, caller: UserId, role: Role) -> DomainResult<GatePass> {
        let pass = self
            .passes
            .get(id)
            .ok_or_else(|| DomainError::not_found("Gate pass not found"))?;

        if role == Role::Student && pass.student_id() != Some(caller) {
            return Err(DomainError::forbidden("Access denied"));
        }

        Ok(pass)
    }

    pub fn my_passes(&self, student_id: UserId) -> Vec<GatePass> {
        let mut passes: Vec<_> = self
            .passes
            .list()
            .into_iter()
            .filter(|p| p.student_id() == Some(student_id))
            .collect();
        passes.sort_by(|a, b| b.request_date().cmp(&a.request_date()));
        passes
    }

    pub fn pending_passes(&self) -> Vec<GatePass> {
        let mut passes: Vec<_> = self
            .passes
            .list()
            .into_iter()
            .filter(|p| p.status() == PassStatus::Pending)
            .collect();
        passes.sort_by(|a, b| b.request_date().cmp(&a.request_date()));
        passes
    }

    pub fn all_passes(&self, status: Option<PassStatus>) -> Vec<GatePass> {
        let mut passes: Vec<_> = self
            .passes
            .list()
            .into_iter()
            .filter(|p| status.is_none_or(|s| p.status() == s))
            .collect();
        passes.sort_by(|a, b| b.request_date().cmp(&a.request_date()));
        passes
    }

    /// Approved passes, most recently decided first.
    pub fn approved_passes(&self) -> Vec<GatePass> {
        let mut passes: Vec<_> = self
            .passes
            .list()
            .into_iter()
            .filter(|p| p.status() == PassStatus::Approved)
            .collect();
        passes.sort_by(|a, b| b.approved_date().cmp(&a.approved_date()));
        passes
    }

    /// Approved passes ordered by journey date, earliest departure first.
    pub fn approved_by_journey_date(&self) -> Vec<GatePass> {
        let mut passes: Vec<_> = self
            .passes
            .list()
            .into_iter()
            .filter(|p| p.status() == PassStatus::Approved)
            .collect();
        passes.sort_by(|a, b| a.details().journey_date.cmp(&b.details().journey_date));
        passes
    }

    /// The unauthenticated noticeboard view: every pass, newest request first.
    pub fn public_passes(&self) -> Vec<GatePass> {
        self.all_passes(None)
    }

    pub fn user(&self, id: UserId) -> Option<User> {
        self.users.get(id)
    }

    /// JSON projection of a pass with student/approver names populated.
    pub fn render(&self, pass: &GatePass) -> serde_json::Value {
        let student = pass.student_id().and_then(|id| self.users.get(id));
        let approver = pass.approved_by().and_then(|id| self.users.get(id));
        super::dto::gate_pass_to_json(pass, student.as_ref(), approver.as_ref())
    }
}
