//! Request DTOs and JSON mapping helpers.
//!
//! Optional/missing string fields default to empty so the validation layer
//! can answer with its own messages instead of a deserializer rejection.

use serde::Deserialize;
use serde_json::{json, Value};

use campusgate_identity::User;
use campusgate_passes::{GatePass, TransportDetails};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterStudentRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub roll_number: String,
    #[serde(default)]
    pub id_card_image_ref: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterAdminRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub admin_id: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGatePassRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub hostel_block: String,
    /// `None` when absent; surfaces as the usual missing-fields error.
    #[serde(default)]
    pub journey_date: Option<chrono::NaiveDate>,
    #[serde(default)]
    pub leaving_time: String,
    #[serde(default)]
    pub destination: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub luggage_details: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportRequest {
    #[serde(default)]
    pub cab_number: String,
    #[serde(default)]
    pub transport_mode: String,
    #[serde(default)]
    pub ticket_number: String,
}

impl From<TransportRequest> for TransportDetails {
    fn from(req: TransportRequest) -> Self {
        Self {
            cab_number: req.cab_number,
            transport_mode: req.transport_mode,
            ticket_number: req.ticket_number,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectRequest {
    #[serde(default)]
    pub rejection_reason: String,
}

/// Flattened pass projection with the student and approver populated.
pub fn gate_pass_to_json(
    pass: &GatePass,
    student: Option<&User>,
    approver: Option<&User>,
) -> Value {
    let student_ref = match student {
        Some(u) => json!({
            "id": u.id,
            "name": u.name,
            "rollNumber": u.roll_number(),
            "email": u.email,
        }),
        None => json!(pass.student_id()),
    };

    let approver_ref = match (pass.approved_by(), approver) {
        (Some(_), Some(u)) => json!({ "id": u.id, "name": u.name }),
        (Some(id), None) => json!(id),
        (None, _) => Value::Null,
    };

    json!({
        "id": pass.id_typed(),
        "studentId": student_ref,
        "name": pass.details().name,
        "hostelBlock": pass.details().hostel_block,
        "journeyDate": pass.details().journey_date,
        "leavingTime": pass.details().leaving_time,
        "destination": pass.details().destination,
        "reason": pass.details().reason,
        "luggageDetails": pass.details().luggage_details,
        "status": pass.status(),
        "requestDate": pass.request_date(),
        "approvedBy": approver_ref,
        "approvedDate": pass.approved_date(),
        "rejectionReason": pass.rejection_reason(),
        "cabNumber": pass.transport().cab_number,
        "transportMode": pass.transport().transport_mode,
        "ticketNumber": pass.transport().ticket_number,
        "guardVerified": pass.guard_verified(),
    })
}
