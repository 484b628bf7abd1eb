pub mod api;
pub mod models;

/// Reserved board title that owns pins whose board was deleted.
pub const DEFAULT_BOARD: &str = "default";
