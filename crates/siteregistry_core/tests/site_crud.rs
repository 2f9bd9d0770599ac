use rusqlite::Connection;
use siteregistry_core::db::migrations::latest_version;
use siteregistry_core::db::open_db_in_memory;
use siteregistry_core::{
    NewSite, RepoError, Site, SiteRepository, SiteUpdate, SqliteSiteRepository,
};

#[test]
fn create_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSiteRepository::try_new(&conn).unwrap();

    repo.create_site(&NewSite::new("my-site").with_description("A test site"))
        .unwrap();

    let loaded = repo.get_site("my-site").unwrap().unwrap();
    assert_eq!(loaded, Site::new("my-site", "A test site"));
}

#[test]
fn missing_description_is_stored_null_and_read_as_empty() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSiteRepository::try_new(&conn).unwrap();

    repo.create_site(&NewSite::new("bare")).unwrap();

    let is_null: i64 = conn
        .query_row(
            "SELECT description IS NULL FROM sites WHERE name = 'bare';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(is_null, 1);
    assert_eq!(repo.get_site("bare").unwrap().unwrap().description, "");
}

#[test]
fn get_missing_returns_none() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSiteRepository::try_new(&conn).unwrap();

    assert!(repo.get_site("nowhere").unwrap().is_none());
}

#[test]
fn list_returns_insertion_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSiteRepository::try_new(&conn).unwrap();
    assert!(repo.list_sites().unwrap().is_empty());

    for name in ["zeta", "alpha", "mid"] {
        repo.create_site(&NewSite::new(name)).unwrap();
    }

    let names: Vec<_> = repo
        .list_sites()
        .unwrap()
        .into_iter()
        .map(|site| site.name)
        .collect();
    assert_eq!(names, vec!["zeta", "alpha", "mid"]);
}

#[test]
fn duplicate_insert_maps_to_duplicate_name() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSiteRepository::try_new(&conn).unwrap();

    repo.create_site(&NewSite::new("dup")).unwrap();
    let err = repo.create_site(&NewSite::new("dup")).unwrap_err();
    assert!(matches!(err, RepoError::DuplicateName(name) if name == "dup"));
}

#[test]
fn overlong_description_is_a_storage_error_not_a_duplicate() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSiteRepository::try_new(&conn).unwrap();

    let err = repo
        .create_site(&NewSite::new("long").with_description("d".repeat(513)))
        .unwrap_err();
    assert!(matches!(err, RepoError::Db(_)));
}

#[test]
fn site_exists_tracks_lifecycle() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSiteRepository::try_new(&conn).unwrap();

    assert!(!repo.site_exists("cycle").unwrap());
    repo.create_site(&NewSite::new("cycle")).unwrap();
    assert!(repo.site_exists("cycle").unwrap());
    repo.delete_site("cycle").unwrap();
    assert!(!repo.site_exists("cycle").unwrap());
}

#[test]
fn update_overwrites_description_and_reports_matches() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSiteRepository::try_new(&conn).unwrap();
    repo.create_site(&NewSite::new("edit").with_description("before"))
        .unwrap();

    assert_eq!(repo.update_site("edit", &SiteUpdate::new("after")).unwrap(), 1);
    assert_eq!(repo.get_site("edit").unwrap().unwrap().description, "after");

    assert_eq!(repo.update_site("edit", &SiteUpdate::default()).unwrap(), 1);
    let is_empty_text: i64 = conn
        .query_row(
            "SELECT description = '' FROM sites WHERE name = 'edit';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(is_empty_text, 1);

    assert_eq!(
        repo.update_site("missing-site", &SiteUpdate::new("x")).unwrap(),
        0
    );
}

#[test]
fn delete_is_idempotent() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSiteRepository::try_new(&conn).unwrap();
    repo.create_site(&NewSite::new("gone")).unwrap();

    assert_eq!(repo.delete_site("gone").unwrap(), 1);
    assert_eq!(repo.delete_site("gone").unwrap(), 0);
    assert!(repo.get_site("gone").unwrap().is_none());
}

#[test]
fn names_are_matched_exactly() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSiteRepository::try_new(&conn).unwrap();
    repo.create_site(&NewSite::new("Case")).unwrap();

    assert!(repo.get_site("case").unwrap().is_none());
    assert_eq!(repo.delete_site("case").unwrap(), 0);
    assert!(repo.get_site("Case").unwrap().is_some());
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteSiteRepository::try_new(&conn) {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert_eq!(expected_version, latest_version()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_sites_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteSiteRepository::try_new(&conn);
    assert!(matches!(result, Err(RepoError::MissingRequiredTable("sites"))));
}

#[test]
fn repository_rejects_sites_table_missing_description_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch("CREATE TABLE sites (name TEXT PRIMARY KEY NOT NULL);")
        .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteSiteRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredColumn {
            table: "sites",
            column: "description"
        })
    ));
}
