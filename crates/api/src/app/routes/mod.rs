pub mod auth;
pub mod passes;
pub mod system;
