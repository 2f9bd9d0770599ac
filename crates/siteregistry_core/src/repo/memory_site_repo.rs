//! In-memory site repository.
//!
//! # Responsibility
//! - Provide a storage-free `SiteRepository` for tests and embedding hosts.
//! - Simulate storage failures on demand.
//!
//! # Invariants
//! - Rows keep insertion order, matching SQLite `rowid` order.
//! - Names are unique; a colliding insert yields `RepoError::DuplicateName`.
//! - Length limits match the `sites` table CHECKs: names of 1..=128 and
//!   descriptions of at most 512 characters, otherwise `RepoError::Db`.
//! - While failing, every operation returns a `RepoError::Db` without touching rows.

use crate::db::DbError;
use crate::model::site::{NewSite, Site, SiteUpdate, DESCRIPTION_MAX_CHARS, NAME_MAX_CHARS};
use crate::repo::site_repo::{RepoError, RepoResult, SiteRepository};
use rusqlite::ffi;
use std::cell::{Cell, RefCell};

#[derive(Debug, Clone)]
struct SiteRow {
    name: String,
    description: Option<String>,
}

/// Single-threaded in-memory site store.
#[derive(Debug, Default)]
pub struct MemorySiteRepository {
    rows: RefCell<Vec<SiteRow>>,
    failing: Cell<bool>,
}

impl MemorySiteRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following operation fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.set(failing);
    }

    fn check_available(&self) -> RepoResult<()> {
        if self.failing.get() {
            return Err(storage_failure(
                ffi::SQLITE_IOERR,
                "simulated storage failure",
            ));
        }
        Ok(())
    }
}

fn storage_failure(code: i32, message: &str) -> RepoError {
    RepoError::Db(DbError::Sqlite(rusqlite::Error::SqliteFailure(
        ffi::Error::new(code),
        Some(message.to_string()),
    )))
}

fn check_name_length(name: &str) -> RepoResult<()> {
    if !(1..=NAME_MAX_CHARS).contains(&name.chars().count()) {
        return Err(storage_failure(
            ffi::SQLITE_CONSTRAINT_CHECK,
            "CHECK constraint failed: sites.name length",
        ));
    }
    Ok(())
}

fn check_description_length(description: Option<&str>) -> RepoResult<()> {
    if description.is_some_and(|text| text.chars().count() > DESCRIPTION_MAX_CHARS) {
        return Err(storage_failure(
            ffi::SQLITE_CONSTRAINT_CHECK,
            "CHECK constraint failed: sites.description length",
        ));
    }
    Ok(())
}

impl SiteRepository for MemorySiteRepository {
    fn list_sites(&self) -> RepoResult<Vec<Site>> {
        self.check_available()?;
        Ok(self.rows.borrow().iter().map(to_site).collect())
    }

    fn get_site(&self, name: &str) -> RepoResult<Option<Site>> {
        self.check_available()?;
        Ok(self
            .rows
            .borrow()
            .iter()
            .find(|row| row.name == name)
            .map(to_site))
    }

    fn site_exists(&self, name: &str) -> RepoResult<bool> {
        self.check_available()?;
        Ok(self.rows.borrow().iter().any(|row| row.name == name))
    }

    fn create_site(&self, site: &NewSite) -> RepoResult<()> {
        self.check_available()?;
        check_name_length(&site.name)?;
        check_description_length(site.description.as_deref())?;
        let mut rows = self.rows.borrow_mut();
        if rows.iter().any(|row| row.name == site.name) {
            return Err(RepoError::DuplicateName(site.name.clone()));
        }
        rows.push(SiteRow {
            name: site.name.clone(),
            description: site.description.clone(),
        });
        Ok(())
    }

    fn update_site(&self, name: &str, update: &SiteUpdate) -> RepoResult<usize> {
        self.check_available()?;
        let mut rows = self.rows.borrow_mut();
        // Like SQLite, the CHECK only fires when a row is actually rewritten.
        if rows.iter().any(|row| row.name == name) {
            check_description_length(Some(update.description_or_empty()))?;
        }
        let mut changed = 0;
        for row in rows.iter_mut().filter(|row| row.name == name) {
            row.description = Some(update.description_or_empty().to_string());
            changed += 1;
        }
        Ok(changed)
    }

    fn delete_site(&self, name: &str) -> RepoResult<usize> {
        self.check_available()?;
        let mut rows = self.rows.borrow_mut();
        let before = rows.len();
        rows.retain(|row| row.name != name);
        Ok(before - rows.len())
    }
}

fn to_site(row: &SiteRow) -> Site {
    Site {
        name: row.name.clone(),
        description: row.description.clone().unwrap_or_default(),
    }
}
