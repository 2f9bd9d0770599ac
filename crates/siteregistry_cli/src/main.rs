//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `siteregistry_core` linkage with deterministic output.
//! - Optionally open a site database and dump its sites as JSON lines.
//!
//! Usage: `siteregistry_cli [DB_PATH]`, falling back to `SITEREGISTRY_DB`.
//! Logs go to `SITEREGISTRY_LOG_DIR` (absolute), or `siteregistry-logs` under
//! the system temp directory.

use siteregistry_core::db::open_db;
use siteregistry_core::{
    default_log_level, flush_logging, init_logging, SiteService, SqliteSiteRepository,
};
use std::path::PathBuf;
use std::process::ExitCode;

const DB_PATH_ENV: &str = "SITEREGISTRY_DB";
const LOG_DIR_ENV: &str = "SITEREGISTRY_LOG_DIR";
const DEFAULT_LOG_DIR_NAME: &str = "siteregistry-logs";

fn main() -> ExitCode {
    println!("siteregistry_core ping={}", siteregistry_core::ping());
    println!("siteregistry_core version={}", siteregistry_core::core_version());

    let Some(db_path) = std::env::args()
        .nth(1)
        .or_else(|| std::env::var(DB_PATH_ENV).ok())
    else {
        return ExitCode::SUCCESS;
    };

    let log_dir = log_dir();
    if let Err(err) = init_logging(default_log_level(), &log_dir.to_string_lossy()) {
        eprintln!("siteregistry_cli: logging disabled: {err}");
    }

    let code = match dump_sites(&db_path) {
        Ok(count) => {
            println!("siteregistry_core sites={count}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("siteregistry_cli: {err}");
            ExitCode::FAILURE
        }
    };
    flush_logging();
    code
}

fn log_dir() -> PathBuf {
    std::env::var_os(LOG_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_LOG_DIR_NAME))
}

fn dump_sites(db_path: &str) -> Result<usize, Box<dyn std::error::Error>> {
    let conn = open_db(db_path)?;
    let service = SiteService::new(SqliteSiteRepository::try_new(&conn)?);
    let sites = service.list()?;
    for site in &sites {
        println!("{}", serde_json::to_string(site)?);
    }
    Ok(sites.len())
}
