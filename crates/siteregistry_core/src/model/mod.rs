//! Domain model for registered sites.
//!
//! # Responsibility
//! - Define the read model (`Site`) and the write payloads (`NewSite`,
//!   `SiteUpdate`) exchanged with repositories.
//! - Define field-tagged validation results.
//!
//! # Invariants
//! - A site is identified by its `name`, which never changes after creation.

pub mod site;
