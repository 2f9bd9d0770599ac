//! Core domain logic for the site registry.
//! Owns site validation rules and the site lifecycle over SQLite storage.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod validation;

pub use logging::{default_log_level, flush_logging, init_logging, logging_status};
pub use model::site::{FieldError, NewSite, Site, SiteUpdate, ValidationMode};
pub use repo::memory_site_repo::MemorySiteRepository;
pub use repo::site_repo::{RepoError, RepoResult, SiteRepository, SqliteSiteRepository};
pub use service::site_service::{SiteError, SiteResult, SiteService};
pub use validation::check_site;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
