//! `campusgate-passes` — the gate-pass lifecycle state machine.

pub mod pass;

pub use pass::{
    ApprovePass, GatePass, GatePassCommand, GatePassEvent, GuardVerify, PassDetails, PassStatus,
    RecordTransport, RejectPass, RequestPass, TransportDetails, UpdateTransport,
};
