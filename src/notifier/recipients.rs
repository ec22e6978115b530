//! Recipient list, read from the configuration database.
//!
//! The configuration database is maintained by hand; it is never created here.

use super::NotifierError;
use rusqlite::{Connection, OpenFlags};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipient {
    pub email_address: String,
    pub name: Option<String>,
}

pub fn load_recipients(config_db_path: &Path) -> Result<Vec<Recipient>, NotifierError> {
    if !config_db_path.exists() {
        return Err(NotifierError::MissingConfigStore(config_db_path.to_path_buf()));
    }

    let conn = Connection::open_with_flags(config_db_path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
    let mut stmt = conn.prepare("SELECT EmailAddress, Name FROM Notification_Recipients")?;
    let recipients = stmt
        .query_map([], |row| {
            Ok(Recipient {
                email_address: row.get(0)?,
                name: row.get(1)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(recipients)
}
