use anyhow::Result;
use rusqlite::Connection;
use std::path::Path;
use tracing::info;

/// Create the tables if they are missing. Safe to run on every startup.
pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id          TEXT PRIMARY KEY,
            email       TEXT NOT NULL UNIQUE,
            password    TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS boards (
            title       TEXT PRIMARY KEY,
            comment     TEXT NOT NULL,
            created_at  TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS pins (
            name        TEXT PRIMARY KEY,
            board       TEXT NOT NULL REFERENCES boards(title),
            img_url     TEXT NOT NULL UNIQUE,
            description TEXT NOT NULL DEFAULT '',
            created_at  TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_pins_board
            ON pins(board);
        ",
    )?;

    info!("Database schema ready");
    Ok(())
}

/// Open the database at `path`, create any missing tables, and close it again.
pub fn initialize(path: &Path) -> Result<()> {
    let conn = Connection::open(path)?;
    run(&conn)?;
    conn.close().map_err(|(_, e)| e)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_names(conn: &Connection) -> Vec<String> {
        let mut stmt = conn
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
            .unwrap();
        let names = stmt
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap();
        names
    }

    #[test]
    fn initialize_is_idempotent_and_keeps_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pinboard.db");

        initialize(&path).unwrap();
        {
            let conn = Connection::open(&path).unwrap();
            conn.execute(
                "INSERT INTO boards (title, comment, created_at) VALUES ('a', 'b', 'c')",
                [],
            )
            .unwrap();
        }
        initialize(&path).unwrap();

        let conn = Connection::open(&path).unwrap();
        assert_eq!(table_names(&conn), vec!["boards", "pins", "users"]);
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM boards", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }
}
