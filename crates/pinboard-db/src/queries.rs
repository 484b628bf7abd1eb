use crate::Database;
use crate::models::{BoardRow, PinRow, UserRow};
use anyhow::Result;
use pinboard_types::DEFAULT_BOARD;
use rusqlite::{Connection, OptionalExtension, Row, params};
use tracing::warn;

/// Outcome of resolving a pin's board reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardResolution {
    /// The referenced board exists.
    Resolved(String),
    /// The referenced board was gone; the pin now points at the default board.
    Repaired,
}

impl BoardResolution {
    pub fn title(&self) -> &str {
        match self {
            Self::Resolved(title) => title,
            Self::Repaired => DEFAULT_BOARD,
        }
    }

    pub fn into_title(self) -> String {
        match self {
            Self::Resolved(title) => title,
            Self::Repaired => DEFAULT_BOARD.to_string(),
        }
    }
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

impl Database {
    // -- Users --

    pub fn create_user(&self, id: &str, email: &str, password_hash: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (id, email, password) VALUES (?1, ?2, ?3)",
                params![id, email, password_hash],
            )?;
            Ok(())
        })
    }

    pub fn get_user_by_id(&self, id: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| {
            query_user(conn, "SELECT id, email, password FROM users WHERE id = ?1", id)
        })
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| {
            query_user(conn, "SELECT id, email, password FROM users WHERE email = ?1", email)
        })
    }

    /// Any user holding either this id or this email.
    pub fn find_user_conflict(&self, id: &str, email: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    "SELECT id, email, password FROM users WHERE id = ?1 OR email = ?2 LIMIT 1",
                    params![id, email],
                    user_from_row,
                )
                .optional()?;
            Ok(row)
        })
    }

    // -- Boards --

    pub fn create_board(&self, title: &str, comment: &str) -> Result<BoardRow> {
        let created_at = now();
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO boards (title, comment, created_at) VALUES (?1, ?2, ?3)",
                params![title, comment, created_at],
            )?;
            Ok(BoardRow {
                title: title.to_string(),
                comment: comment.to_string(),
                created_at,
            })
        })
    }

    pub fn get_board(&self, title: &str) -> Result<Option<BoardRow>> {
        self.with_conn(|conn| query_board(conn, title))
    }

    pub fn board_exists(&self, title: &str) -> Result<bool> {
        self.with_conn(|conn| board_exists(conn, title))
    }

    /// Returns the number of rows changed (0 when the board is absent).
    pub fn update_board_comment(&self, title: &str, comment: &str) -> Result<usize> {
        self.with_conn(|conn| {
            let n = conn.execute(
                "UPDATE boards SET comment = ?2 WHERE title = ?1",
                params![title, comment],
            )?;
            Ok(n)
        })
    }

    /// Pins that referenced the board are left as they are.
    pub fn delete_board(&self, title: &str) -> Result<usize> {
        self.with_conn(|conn| {
            let n = conn.execute("DELETE FROM boards WHERE title = ?1", [title])?;
            Ok(n)
        })
    }

    pub fn list_boards(&self) -> Result<Vec<BoardRow>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT title, comment, created_at FROM boards ORDER BY title")?;
            let rows = stmt
                .query_map([], board_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Create the default board if missing. Returns true if it was created.
    pub fn ensure_default_board(&self) -> Result<bool> {
        self.with_conn(ensure_default_board)
    }

    // -- Pins --

    pub fn create_pin(
        &self,
        name: &str,
        board: &str,
        img_url: &str,
        description: &str,
    ) -> Result<PinRow> {
        let created_at = now();
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO pins (name, board, img_url, description, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![name, board, img_url, description, created_at],
            )?;
            Ok(PinRow {
                name: name.to_string(),
                board: board.to_string(),
                img_url: img_url.to_string(),
                description: description.to_string(),
                created_at,
            })
        })
    }

    pub fn get_pin(&self, name: &str) -> Result<Option<PinRow>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    "SELECT name, board, img_url, description, created_at
                     FROM pins WHERE name = ?1",
                    [name],
                    pin_from_row,
                )
                .optional()?;
            Ok(row)
        })
    }

    /// Name of the pin using `img_url`, if any.
    pub fn pin_name_by_img_url(&self, img_url: &str) -> Result<Option<String>> {
        self.with_conn(|conn| {
            let name = conn
                .query_row("SELECT name FROM pins WHERE img_url = ?1", [img_url], |row| {
                    row.get(0)
                })
                .optional()?;
            Ok(name)
        })
    }

    /// `None` fields keep their stored value. Returns the number of rows changed.
    pub fn update_pin(
        &self,
        name: &str,
        img_url: Option<&str>,
        description: Option<&str>,
    ) -> Result<usize> {
        self.with_conn(|conn| {
            let n = conn.execute(
                "UPDATE pins
                 SET img_url = COALESCE(?2, img_url),
                     description = COALESCE(?3, description)
                 WHERE name = ?1",
                params![name, img_url, description],
            )?;
            Ok(n)
        })
    }

    pub fn delete_pin(&self, name: &str) -> Result<usize> {
        self.with_conn(|conn| {
            let n = conn.execute("DELETE FROM pins WHERE name = ?1", [name])?;
            Ok(n)
        })
    }

    pub fn list_pins(&self) -> Result<Vec<PinRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT name, board, img_url, description, created_at FROM pins ORDER BY name",
            )?;
            let rows = stmt
                .query_map([], pin_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    // -- Self-heal --

    /// Resolve the board a pin points at. If that board no longer exists the
    /// pin is re-pointed at the default board (created first if needed), all
    /// under a single hold of the connection.
    pub fn resolve_board(&self, pin_name: &str, board: &str) -> Result<BoardResolution> {
        self.with_conn(|conn| {
            if board_exists(conn, board)? {
                return Ok(BoardResolution::Resolved(board.to_string()));
            }

            ensure_default_board(conn)?;
            conn.execute(
                "UPDATE pins SET board = ?2 WHERE name = ?1",
                params![pin_name, DEFAULT_BOARD],
            )?;
            warn!(pin = pin_name, stale_board = board, "Pin board missing, moved to default");
            Ok(BoardResolution::Repaired)
        })
    }
}

fn ensure_default_board(conn: &Connection) -> Result<bool> {
    let n = conn.execute(
        "INSERT OR IGNORE INTO boards (title, comment, created_at) VALUES (?1, ?1, ?2)",
        params![DEFAULT_BOARD, now()],
    )?;
    Ok(n > 0)
}

fn board_exists(conn: &Connection, title: &str) -> Result<bool> {
    let found: Option<i64> = conn
        .query_row("SELECT 1 FROM boards WHERE title = ?1", [title], |row| row.get(0))
        .optional()?;
    Ok(found.is_some())
}

fn query_board(conn: &Connection, title: &str) -> Result<Option<BoardRow>> {
    let row = conn
        .query_row(
            "SELECT title, comment, created_at FROM boards WHERE title = ?1",
            [title],
            board_from_row,
        )
        .optional()?;
    Ok(row)
}

fn query_user(conn: &Connection, sql: &str, key: &str) -> Result<Option<UserRow>> {
    let mut stmt = conn.prepare(sql)?;
    let row = stmt.query_row([key], user_from_row).optional()?;
    Ok(row)
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        email: row.get(1)?,
        password: row.get(2)?,
    })
}

fn board_from_row(row: &Row<'_>) -> rusqlite::Result<BoardRow> {
    Ok(BoardRow {
        title: row.get(0)?,
        comment: row.get(1)?,
        created_at: row.get(2)?,
    })
}

fn pin_from_row(row: &Row<'_>) -> rusqlite::Result<PinRow> {
    Ok(PinRow {
        name: row.get(0)?,
        board: row.get(1)?,
        img_url: row.get(2)?,
        description: row.get(3)?,
        created_at: row.get(4)?,
    })
}
