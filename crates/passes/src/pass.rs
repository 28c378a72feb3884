use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use campusgate_core::{Aggregate, AggregateRoot, DomainError, Event, GatePassId, UserId};

/// Gate-pass status lifecycle.
///
/// `Pending` is initial; `Approved`/`Rejected` are terminal for the status
/// field. An approved pass additionally admits a one-way `guard_verified`
/// sub-state flip at the physical gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PassStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

/// Descriptive fields a student supplies when requesting a pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassDetails {
    pub name: String,
    pub hostel_block: String,
    pub journey_date: NaiveDate,
    pub leaving_time: String,
    pub destination: String,
    pub reason: String,
    pub luggage_details: String,
}

impl PassDetails {
    fn normalized(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            hostel_block: self.hostel_block.trim().to_string(),
            journey_date: self.journey_date,
            leaving_time: self.leaving_time.trim().to_string(),
            destination: self.destination.trim().to_string(),
            reason: self.reason.trim().to_string(),
            luggage_details: self.luggage_details.trim().to_string(),
        }
    }

    fn is_complete(&self) -> bool {
        [
            &self.name,
            &self.hostel_block,
            &self.leaving_time,
            &self.destination,
            &self.reason,
            &self.luggage_details,
        ]
        .iter()
        .all(|f| !f.trim().is_empty())
    }
}

/// Transport audit fields (cab / mode / ticket), free text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportDetails {
    pub cab_number: String,
    pub transport_mode: String,
    pub ticket_number: String,
}

impl TransportDetails {
    fn normalized(&self) -> Self {
        Self {
            cab_number: self.cab_number.trim().to_string(),
            transport_mode: self.transport_mode.trim().to_string(),
            ticket_number: self.ticket_number.trim().to_string(),
        }
    }
}

/// Aggregate root: GatePass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatePass {
    id: GatePassId,
    student_id: Option<UserId>,
    details: PassDetails,
    status: PassStatus,
    request_date: DateTime<Utc>,
    approved_by: Option<UserId>,
    approved_date: Option<DateTime<Utc>>,
    rejection_reason: Option<String>,
    transport: TransportDetails,
    guard_verified: bool,
    version: u64,
    created: bool,
}

impl GatePass {
    /// Create an empty, not-yet-requested aggregate instance for rehydration.
    pub fn empty(id: GatePassId) -> Self {
        Self {
            id,
            student_id: None,
            details: PassDetails::default(),
            status: PassStatus::Pending,
            request_date: DateTime::<Utc>::UNIX_EPOCH,
            approved_by: None,
            approved_date: None,
            rejection_reason: None,
            transport: TransportDetails::default(),
            guard_verified: false,
            version: 0,
            created: false,
        }
    }

    pub fn id_typed(&self) -> GatePassId {
        self.id
    }

    pub fn student_id(&self) -> Option<UserId> {
        self.student_id
    }

    pub fn details(&self) -> &PassDetails {
        &self.details
    }

    pub fn status(&self) -> PassStatus {
        self.status
    }

    pub fn request_date(&self) -> DateTime<Utc> {
        self.request_date
    }

    pub fn approved_by(&self) -> Option<UserId> {
        self.approved_by
    }

    pub fn approved_date(&self) -> Option<DateTime<Utc>> {
        self.approved_date
    }

    pub fn rejection_reason(&self) -> Option<&str> {
        self.rejection_reason.as_deref()
    }

    pub fn transport(&self) -> &TransportDetails {
        &self.transport
    }

    pub fn guard_verified(&self) -> bool {
        self.guard_verified
    }

    /// A pass is decided once a warden has approved or rejected it.
    pub fn is_decided(&self) -> bool {
        self.status != PassStatus::Pending
    }
}

impl AggregateRoot for GatePass {
    type Id = GatePassId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: student requests a new pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestPass {
    pub pass_id: GatePassId,
    pub student_id: UserId,
    pub details: PassDetails,
    pub occurred_at: DateTime<Utc>,
}

/// Command: admin approves a pending pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovePass {
    pub pass_id: GatePassId,
    pub approved_by: UserId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: admin rejects a pending pass with a reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectPass {
    pub pass_id: GatePassId,
    pub rejected_by: UserId,
    pub rejection_reason: String,
    pub occurred_at: DateTime<Utc>,
}

/// Command: the owning student records transport details after approval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTransport {
    pub pass_id: GatePassId,
    /// Caller identity, checked against the pass owner.
    pub student_id: UserId,
    pub transport: TransportDetails,
    pub occurred_at: DateTime<Utc>,
}

/// Command: guard/admin records transport details at the gate (no status gate).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordTransport {
    pub pass_id: GatePassId,
    pub transport: TransportDetails,
    pub occurred_at: DateTime<Utc>,
}

/// Command: guard ticks the final verification checkbox at the exit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardVerify {
    pub pass_id: GatePassId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GatePassCommand {
    Request(RequestPass),
    Approve(ApprovePass),
    Reject(RejectPass),
    UpdateTransport(UpdateTransport),
    RecordTransport(RecordTransport),
    GuardVerify(GuardVerify),
}

/// Event: PassRequested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassRequested {
    pub pass_id: GatePassId,
    pub student_id: UserId,
    pub details: PassDetails,
    pub occurred_at: DateTime<Utc>,
}

/// Event: PassApproved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassApproved {
    pub pass_id: GatePassId,
    pub approved_by: UserId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: PassRejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassRejected {
    pub pass_id: GatePassId,
    pub rejected_by: UserId,
    pub rejection_reason: String,
    pub occurred_at: DateTime<Utc>,
}

/// Event: TransportRecorded (student- or guard-entered).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportRecorded {
    pub pass_id: GatePassId,
    pub transport: TransportDetails,
    pub occurred_at: DateTime<Utc>,
}

/// Event: GuardVerified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardVerified {
    pub pass_id: GatePassId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GatePassEvent {
    Requested(PassRequested),
    Approved(PassApproved),
    Rejected(PassRejected),
    TransportRecorded(TransportRecorded),
    GuardVerified(GuardVerified),
}

impl Event for GatePassEvent {
    fn event_type(&self) -> &'static str {
        match self {
            GatePassEvent::Requested(_) => "gatepass.requested",
            GatePassEvent::Approved(_) => "gatepass.approved",
            GatePassEvent::Rejected(_) => "gatepass.rejected",
            GatePassEvent::TransportRecorded(_) => "gatepass.transport_recorded",
            GatePassEvent::GuardVerified(_) => "gatepass.guard_verified",
        }
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            GatePassEvent::Requested(e) => e.occurred_at,
            GatePassEvent::Approved(e) => e.occurred_at,
            GatePassEvent::Rejected(e) => e.occurred_at,
            GatePassEvent::TransportRecorded(e) => e.occurred_at,
            GatePassEvent::GuardVerified(e) => e.occurred_at,
        }
    }
}

impl Aggregate for GatePass {
    type Command = GatePassCommand;
    type Event = GatePassEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            GatePassEvent::Requested(e) => {
                self.id = e.pass_id;
                self.student_id = Some(e.student_id);
                self.details = e.details.clone();
                self.status = PassStatus::Pending;
                self.request_date = e.occurred_at;
                self.created = true;
            }
            GatePassEvent::Approved(e) => {
                self.status = PassStatus::Approved;
                self.approved_by = Some(e.approved_by);
                self.approved_date = Some(e.occurred_at);
            }
            GatePassEvent::Rejected(e) => {
                self.status = PassStatus::Rejected;
                self.approved_by = Some(e.rejected_by);
                self.approved_date = Some(e.occurred_at);
                self.rejection_reason = Some(e.rejection_reason.clone());
            }
            GatePassEvent::TransportRecorded(e) => {
                self.transport = e.transport.clone();
            }
            GatePassEvent::GuardVerified(_) => {
                self.guard_verified = true;
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            GatePassCommand::Request(cmd) => self.handle_request(cmd),
            GatePassCommand::Approve(cmd) => self.handle_approve(cmd),
            GatePassCommand::Reject(cmd) => self.handle_reject(cmd),
            GatePassCommand::UpdateTransport(cmd) => self.handle_update_transport(cmd),
            GatePassCommand::RecordTransport(cmd) => self.handle_record_transport(cmd),
            GatePassCommand::GuardVerify(cmd) => self.handle_guard_verify(cmd),
        }
    }
}

impl GatePass {
    fn ensure_exists(&self) -> Result<(), DomainError> {
        if !self.created {
            return Err(DomainError::not_found("Gate pass not found"));
        }
        Ok(())
    }

    fn ensure_pass_id(&self, pass_id: GatePassId) -> Result<(), DomainError> {
        if self.id != pass_id {
            return Err(DomainError::conflict("pass_id mismatch"));
        }
        Ok(())
    }

    fn ensure_pending(&self) -> Result<(), DomainError> {
        if self.is_decided() {
            return Err(DomainError::conflict("Gate pass already processed"));
        }
        Ok(())
    }

    fn handle_request(&self, cmd: &RequestPass) -> Result<Vec<GatePassEvent>, DomainError> {
        if self.created {
            return Err(DomainError::conflict("Gate pass already exists"));
        }

        if !cmd.details.is_complete() {
            return Err(DomainError::validation("All fields are required!"));
        }

        Ok(vec![GatePassEvent::Requested(PassRequested {
            pass_id: cmd.pass_id,
            student_id: cmd.student_id,
            details: cmd.details.normalized(),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_approve(&self, cmd: &ApprovePass) -> Result<Vec<GatePassEvent>, DomainError> {
        self.ensure_exists()?;
        self.ensure_pass_id(cmd.pass_id)?;
        self.ensure_pending()?;

        Ok(vec![GatePassEvent::Approved(PassApproved {
            pass_id: cmd.pass_id,
            approved_by: cmd.approved_by,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_reject(&self, cmd: &RejectPass) -> Result<Vec<GatePassEvent>, DomainError> {
        self.ensure_exists()?;
        self.ensure_pass_id(cmd.pass_id)?;
        self.ensure_pending()?;

        if cmd.rejection_reason.trim().is_empty() {
            return Err(DomainError::validation("Rejection reason is required"));
        }

        Ok(vec![GatePassEvent::Rejected(PassRejected {
            pass_id: cmd.pass_id,
            rejected_by: cmd.rejected_by,
            rejection_reason: cmd.rejection_reason.trim().to_string(),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_update_transport(
        &self,
        cmd: &UpdateTransport,
    ) -> Result<Vec<GatePassEvent>, DomainError> {
        self.ensure_exists()?;
        self.ensure_pass_id(cmd.pass_id)?;

        if self.student_id != Some(cmd.student_id) {
            return Err(DomainError::forbidden("Not allowed"));
        }

        if self.status != PassStatus::Approved {
            return Err(DomainError::conflict(
                "Transport details can be filled only after approval",
            ));
        }

        Ok(vec![GatePassEvent::TransportRecorded(TransportRecorded {
            pass_id: cmd.pass_id,
            transport: cmd.transport.normalized(),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_record_transport(
        &self,
        cmd: &RecordTransport,
    ) -> Result<Vec<GatePassEvent>, DomainError> {
        self.ensure_exists()?;
        self.ensure_pass_id(cmd.pass_id)?;

        Ok(vec![GatePassEvent::TransportRecorded(TransportRecorded {
            pass_id: cmd.pass_id,
            transport: cmd.transport.normalized(),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_guard_verify(&self, cmd: &GuardVerify) -> Result<Vec<GatePassEvent>, DomainError> {
        self.ensure_exists()?;
        self.ensure_pass_id(cmd.pass_id)?;

        if self.status != PassStatus::Approved {
            return Err(DomainError::conflict(
                "Gate pass can be verified only after approval",
            ));
        }

        if self.guard_verified {
            return Err(DomainError::conflict("Gate pass already verified"));
        }

        Ok(vec![GatePassEvent::GuardVerified(GuardVerified {
            pass_id: cmd.pass_id,
            occurred_at: cmd.occurred_at,
        })])
    }
}
