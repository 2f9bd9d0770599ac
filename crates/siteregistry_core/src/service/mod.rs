//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into the site lifecycle API.
//! - Keep callers decoupled from storage details and failure subtypes.

pub mod site_service;
