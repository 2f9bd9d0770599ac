//! Site repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide list/get/exists/create/update/delete over the `sites` table.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Writes do not validate; callers run validation first.
//! - `update_site`/`delete_site` report affected rows and never treat zero
//!   matches as an error.
//! - A primary-key violation on insert surfaces as `RepoError::DuplicateName`.

use crate::db::migrations::{latest_version, schema_version};
use crate::db::DbError;
use crate::model::site::{NewSite, Site, SiteUpdate};
use rusqlite::{ffi, params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const SITES_TABLE: &str = "sites";
const SITES_REQUIRED_COLUMNS: &[&str] = &["name", "description"];

const SITE_SELECT_SQL: &str = "SELECT
    name,
    description
FROM sites";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for site persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Insert collided with an existing site of the same name.
    DuplicateName(String),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::DuplicateName(name) => write!(f, "site already exists: {name}"),
            Self::InvalidData(message) => write!(f, "invalid persisted site data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} is behind required {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for site CRUD operations.
pub trait SiteRepository {
    /// Returns all sites in storage order.
    fn list_sites(&self) -> RepoResult<Vec<Site>>;
    /// Returns the first site whose name matches, if any.
    fn get_site(&self, name: &str) -> RepoResult<Option<Site>>;
    /// Uniqueness pre-check used by `Create` validation.
    fn site_exists(&self, name: &str) -> RepoResult<bool>;
    fn create_site(&self, site: &NewSite) -> RepoResult<()>;
    /// Overwrites the description; returns the number of matched rows.
    fn update_site(&self, name: &str, update: &SiteUpdate) -> RepoResult<usize>;
    /// Deletes by name; returns the number of removed rows.
    fn delete_site(&self, name: &str) -> RepoResult<usize>;
}

impl<R: SiteRepository + ?Sized> SiteRepository for &R {
    fn list_sites(&self) -> RepoResult<Vec<Site>> {
        (**self).list_sites()
    }

    fn get_site(&self, name: &str) -> RepoResult<Option<Site>> {
        (**self).get_site(name)
    }

    fn site_exists(&self, name: &str) -> RepoResult<bool> {
        (**self).site_exists(name)
    }

    fn create_site(&self, site: &NewSite) -> RepoResult<()> {
        (**self).create_site(site)
    }

    fn update_site(&self, name: &str, update: &SiteUpdate) -> RepoResult<usize> {
        (**self).update_site(name, update)
    }

    fn delete_site(&self, name: &str) -> RepoResult<usize> {
        (**self).delete_site(name)
    }
}

/// SQLite-backed site repository borrowing a caller-owned connection.
pub struct SqliteSiteRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSiteRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations have not been applied.
    /// - `MissingRequiredTable`/`MissingRequiredColumn` when the `sites`
    ///   schema does not match.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl SiteRepository for SqliteSiteRepository<'_> {
    fn list_sites(&self) -> RepoResult<Vec<Site>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SITE_SELECT_SQL} ORDER BY rowid ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut sites = Vec::new();

        while let Some(row) = rows.next()? {
            sites.push(parse_site_row(row)?);
        }

        Ok(sites)
    }

    fn get_site(&self, name: &str) -> RepoResult<Option<Site>> {
        let mut stmt = self.conn.prepare(&format!(
            "{SITE_SELECT_SQL}
             WHERE name = ?1
             LIMIT 1;"
        ))?;

        let mut rows = stmt.query([name])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_site_row(row)?));
        }

        Ok(None)
    }

    fn site_exists(&self, name: &str) -> RepoResult<bool> {
        let found = self
            .conn
            .query_row(
                "SELECT 1 FROM sites WHERE name = ?1 LIMIT 1;",
                [name],
                |row| row.get::<_, i64>(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    fn create_site(&self, site: &NewSite) -> RepoResult<()> {
        let result = self.conn.execute(
            "INSERT INTO sites (name, description) VALUES (?1, ?2);",
            params![site.name.as_str(), site.description.as_deref()],
        );

        match result {
            Ok(_) => Ok(()),
            Err(err) if is_primary_key_violation(&err) => {
                Err(RepoError::DuplicateName(site.name.clone()))
            }
            Err(err) => Err(err.into()),
        }
    }

    fn update_site(&self, name: &str, update: &SiteUpdate) -> RepoResult<usize> {
        let changed = self.conn.execute(
            "UPDATE sites
             SET description = ?1
             WHERE name = ?2;",
            params![update.description_or_empty(), name],
        )?;
        Ok(changed)
    }

    fn delete_site(&self, name: &str) -> RepoResult<usize> {
        let changed = self
            .conn
            .execute("DELETE FROM sites WHERE name = ?1;", [name])?;
        Ok(changed)
    }
}

fn parse_site_row(row: &Row<'_>) -> RepoResult<Site> {
    let name: String = row.get("name")?;
    if name.is_empty() {
        return Err(RepoError::InvalidData(
            "empty value in sites.name".to_string(),
        ));
    }

    Ok(Site {
        name,
        description: row
            .get::<_, Option<String>>("description")?
            .unwrap_or_default(),
    })
}

fn is_primary_key_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(inner, _)
            if inner.extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                || inner.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = schema_version(conn)?;
    if actual_version < expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let table_exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [SITES_TABLE],
        |row| row.get(0),
    )?;
    if table_exists == 0 {
        return Err(RepoError::MissingRequiredTable(SITES_TABLE));
    }

    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1);")?;
    let columns = stmt
        .query_map([SITES_TABLE], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    for &column in SITES_REQUIRED_COLUMNS {
        if !columns.iter().any(|existing| existing == column) {
            return Err(RepoError::MissingRequiredColumn {
                table: SITES_TABLE,
                column,
            });
        }
    }

    Ok(())
}
