//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the `SiteRepository` data access contract.
//! - Isolate SQLite query details from the site service.
//!
//! # Invariants
//! - Repository APIs return storage-level results; mapping to domain
//!   outcomes (`NotFound`, duplicate names) happens in the service.

pub mod memory_site_repo;
pub mod site_repo;
