//! eduprivacy-admin library
//!
//! Command implementations for the EduPrivacy admin CLI: the organization
//! schema migration orchestrator and the configuration verifier.

pub mod commands;
pub mod config;
pub mod error;
