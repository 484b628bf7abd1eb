/// Database row types. These map directly to SQLite rows and stay separate
/// from the pinboard-types payloads so the storage layer owns its own shape.

#[derive(Debug)]
pub struct UserRow {
    pub id: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug)]
pub struct BoardRow {
    pub title: String,
    pub comment: String,
    pub created_at: String,
}

/// A pin as stored. `board` may name a board that no longer exists; run it
/// through `Database::resolve_board` before surfacing it.
#[derive(Debug)]
pub struct PinRow {
    pub name: String,
    pub board: String,
    pub img_url: String,
    pub description: String,
    pub created_at: String,
}
