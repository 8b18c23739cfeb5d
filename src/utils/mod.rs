pub mod config;
pub mod readiness;
