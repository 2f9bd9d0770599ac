//! Site use-case service.
//!
//! # Responsibility
//! - Provide list/get/validate/add/update/delete entry points for callers.
//! - Map repository results to domain outcomes (`NotFound`,
//!   `NameAlreadyExists`, `Storage`).
//! - Log every storage failure before returning it.
//!
//! # Invariants
//! - `add`/`update` never re-validate; callers compose `validate` first.
//! - `update`/`delete` matching zero rows still succeed.
//! - Service layer remains storage-agnostic.

use crate::model::site::{FieldError, NewSite, Site, SiteUpdate, ValidationMode};
use crate::repo::site_repo::{RepoError, SiteRepository};
use crate::validation::{candidate_name, check_site, FIELD_NAME, MSG_NAME_EXISTS};
use log::{debug, error};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type SiteResult<T> = Result<T, SiteError>;

/// Domain-level failure of a site operation.
#[derive(Debug)]
pub enum SiteError {
    /// No site with the requested name.
    NotFound(String),
    /// Storage rejected the insert because the name is taken.
    NameAlreadyExists(String),
    /// Any other storage failure.
    Storage(RepoError),
}

impl Display for SiteError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(name) => write!(f, "site not found: {name}"),
            Self::NameAlreadyExists(name) => write!(f, "site name already exists: {name}"),
            Self::Storage(err) => write!(f, "site storage error: {err}"),
        }
    }
}

impl Error for SiteError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for SiteError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::DuplicateName(name) => Self::NameAlreadyExists(name),
            other => Self::Storage(other),
        }
    }
}

/// Site service facade over repository implementations.
pub struct SiteService<R: SiteRepository> {
    repo: R,
}

impl<R: SiteRepository> SiteService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Returns the wrapped repository, e.g. to inspect affected row counts.
    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Lists all sites in storage order.
    pub fn list(&self) -> SiteResult<Vec<Site>> {
        self.repo
            .list_sites()
            .map_err(|err| storage_failure("site_list", None, err))
    }

    /// Gets one site by name.
    ///
    /// # Errors
    /// - `NotFound` when no row matches `name`.
    /// - `Storage` when the query fails.
    pub fn get(&self, name: &str) -> SiteResult<Site> {
        match self.repo.get_site(name) {
            Ok(Some(site)) => Ok(site),
            Ok(None) => Err(SiteError::NotFound(name.to_string())),
            Err(err) => Err(storage_failure("site_get", Some(name), err)),
        }
    }

    /// Validates a JSON candidate and returns every field error found.
    ///
    /// In `Create` mode this also reads storage to reject an existing name,
    /// so calling it twice issues the lookup twice. A failed lookup is logged
    /// and the duplicate check is skipped; `add` still rejects duplicates.
    pub fn validate(&self, candidate: &Value, mode: ValidationMode) -> Vec<FieldError> {
        let structural = check_site(candidate, mode);
        if mode != ValidationMode::Create {
            return structural;
        }

        let Some(name) = candidate_name(candidate) else {
            return structural;
        };

        let mut errors = Vec::with_capacity(structural.len() + 1);
        match self.repo.site_exists(name) {
            Ok(true) => errors.push(FieldError::new(FIELD_NAME, MSG_NAME_EXISTS)),
            Ok(false) => {}
            Err(err) => {
                error!(
                    "event=site_validate module=site_service status=error name={name} error={err}"
                );
            }
        }
        errors.extend(structural);
        errors
    }

    /// Persists a site that passed `Create` validation.
    ///
    /// # Errors
    /// - `NameAlreadyExists` when storage already holds the name.
    /// - `Storage` for any other failure.
    pub fn add(&self, site: &NewSite) -> SiteResult<()> {
        self.repo.create_site(site).map_err(|err| match err {
            RepoError::DuplicateName(name) => {
                debug!("event=site_add module=site_service status=conflict name={name}");
                SiteError::NameAlreadyExists(name)
            }
            other => storage_failure("site_add", Some(site.name.as_str()), other),
        })
    }

    /// Overwrites the description of `name`.
    ///
    /// Succeeds even when no site matches; use `get` first when existence
    /// matters.
    pub fn update(&self, name: &str, update: &SiteUpdate) -> SiteResult<()> {
        let matched = self
            .repo
            .update_site(name, update)
            .map_err(|err| storage_failure("site_update", Some(name), err))?;
        debug!("event=site_update module=site_service status=ok name={name} matched={matched}");
        Ok(())
    }

    /// Deletes `name`. Deleting a missing site succeeds.
    pub fn delete(&self, name: &str) -> SiteResult<()> {
        let removed = self
            .repo
            .delete_site(name)
            .map_err(|err| storage_failure("site_delete", Some(name), err))?;
        debug!("event=site_delete module=site_service status=ok name={name} matched={removed}");
        Ok(())
    }
}

fn storage_failure(event: &'static str, name: Option<&str>, err: RepoError) -> SiteError {
    match name {
        Some(name) => error!(
            "event={event} module=site_service status=error name={name} error={err}"
        ),
        None => error!("event={event} module=site_service status=error error={err}"),
    }
    SiteError::Storage(err)
}
