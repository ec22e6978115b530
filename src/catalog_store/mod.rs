//! Persistent catalog of collected releases.
//!
//! Seven tables: albums, tracks and artists, plus the artist genres and the
//! album/track/artist relations between them.

mod models;
mod schema;

pub use models::*;
pub use schema::CATALOG_SCHEMA;

use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::Path;
use tracing::info;

/// Open the catalog database, creating the file and its tables if it does not exist.
///
/// An existing file is reused as-is: its tables are validated but never migrated.
pub fn open_catalog_db<P: AsRef<Path>>(path: P) -> Result<Connection> {
    let path = path.as_ref();
    let is_new = !path.exists();

    let conn = Connection::open(path)
        .with_context(|| format!("Failed to open catalog database: {:?}", path))?;
    conn.pragma_update(None, "foreign_keys", "ON")?;

    if is_new {
        info!("Creating catalog database at {:?}", path);
        CATALOG_SCHEMA
            .create(&conn)
            .context("Failed to create catalog schema")?;
    } else {
        info!("Opening existing catalog database at {:?}", path);
        CATALOG_SCHEMA
            .validate(&conn)
            .with_context(|| format!("Catalog database {:?} has an unexpected schema", path))?;
    }

    Ok(conn)
}

/// Create an in-memory catalog database.
pub fn open_in_memory_catalog_db() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    conn.pragma_update(None, "foreign_keys", "ON")?;
    CATALOG_SCHEMA.create(&conn)?;
    Ok(conn)
}
