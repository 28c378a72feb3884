//! `campusgate-api` — HTTP surface for the gate-pass service.

pub mod app;
pub mod context;
pub mod middleware;
