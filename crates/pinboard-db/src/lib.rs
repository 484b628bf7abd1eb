pub mod migrations;
pub mod models;
pub mod queries;

pub use queries::BoardResolution;

use anyhow::Result;
use rusqlite::Connection;
use std::path::Path;
use std::sync::Mutex;
use tracing::info;

pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;

        let db = Self::from_connection(conn)?;
        info!("Database opened at {}", path.display());
        Ok(db)
    }

    /// Private in-memory database, used by tests and throwaway tooling.
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        // Deleting a board must leave its pins in place; reads repair them.
        conn.pragma_update(None, "foreign_keys", "OFF")?;

        migrations::run(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run `f` with the connection held. Everything inside `f` is serialized
    /// against every other caller of this database.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|e| anyhow::anyhow!("DB lock poisoned: {}", e))?;
        f(&conn)
    }
}

/// If `err` is a SQLite UNIQUE/PRIMARY KEY violation, return the offending
/// `table.column` as reported by SQLite.
pub fn unique_violation(err: &anyhow::Error) -> Option<&str> {
    match err.downcast_ref::<rusqlite::Error>()? {
        rusqlite::Error::SqliteFailure(e, Some(msg))
            if e.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            msg.strip_prefix("UNIQUE constraint failed: ")
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_violation_names_the_column() {
        let db = Database::open_in_memory().unwrap();
        db.create_board("travel", "trips").unwrap();
        db.create_pin("p1", "travel", "http://img/1", "").unwrap();

        let err = db.create_pin("p2", "travel", "http://img/1", "").unwrap_err();
        assert_eq!(unique_violation(&err), Some("pins.img_url"));

        let err = db.create_pin("p1", "travel", "http://img/2", "").unwrap_err();
        assert_eq!(unique_violation(&err), Some("pins.name"));
    }

    #[test]
    fn other_errors_are_not_unique_violations() {
        let err = anyhow::anyhow!("something else");
        assert_eq!(unique_violation(&err), None);
    }
}
