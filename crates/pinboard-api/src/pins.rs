use std::sync::Arc;

use pinboard_db::Database;
use pinboard_db::models::PinRow;
use pinboard_types::api::{PinResponse, StatusResponse};
use pinboard_types::models::{MAX_PIN_NAME_LEN, PinPatch};
use tracing::debug;

use crate::error::{RepoError, RepoResult, check_len};

const ENTITY: &str = "pin";

pub struct PinRepository {
    db: Arc<Database>,
}

impl PinRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Create a pin on an existing board. The default board is provisioned
    /// first so orphaned pins always have somewhere to go.
    pub fn create(
        &self,
        name: &str,
        img_url: &str,
        description: &str,
        board: &str,
    ) -> RepoResult<PinResponse> {
        check_len("name", name, MAX_PIN_NAME_LEN)?;

        if self.db.ensure_default_board()? {
            debug!("Provisioned default board");
        }

        if !self.db.board_exists(board)? {
            return Err(RepoError::BoardNotFound(board.to_string()));
        }
        if self.db.get_pin(name)?.is_some() {
            return Err(RepoError::DuplicateName(name.to_string()));
        }
        if self.db.pin_name_by_img_url(img_url)?.is_some() {
            return Err(RepoError::DuplicateImgUrl(img_url.to_string()));
        }

        let row = self
            .db
            .create_pin(name, board, img_url, description)
            .map_err(|e| match pinboard_db::unique_violation(&e) {
                Some("pins.img_url") => RepoError::DuplicateImgUrl(img_url.to_string()),
                Some(_) => RepoError::DuplicateName(name.to_string()),
                None => e.into(),
            })?;

        debug!(pin = name, board, "Created pin");
        Ok(to_response(row, board.to_string()))
    }

    pub fn get(&self, name: &str) -> RepoResult<PinResponse> {
        let row = self
            .db
            .get_pin(name)?
            .ok_or_else(|| RepoError::not_found(ENTITY, name))?;
        self.resolve(row)
    }

    /// Apply `patch` and return the pin as stored afterwards.
    pub fn update(&self, name: &str, patch: &PinPatch) -> RepoResult<PinResponse> {
        if self.db.get_pin(name)?.is_none() {
            return Err(RepoError::not_found(ENTITY, name));
        }

        if let Some(img_url) = patch.img_url.as_deref() {
            match self.db.pin_name_by_img_url(img_url)? {
                Some(owner) if owner != name => {
                    return Err(RepoError::DuplicateImgUrl(img_url.to_string()));
                }
                _ => {}
            }
        }

        if !patch.is_empty() {
            self.db
                .update_pin(name, patch.img_url.as_deref(), patch.description.as_deref())
                .map_err(|e| match pinboard_db::unique_violation(&e) {
                    Some(_) => RepoError::DuplicateImgUrl(
                        patch.img_url.clone().unwrap_or_default(),
                    ),
                    None => e.into(),
                })?;
            debug!(pin = name, "Updated pin");
        }

        self.get(name)
    }

    pub fn delete(&self, name: &str) -> RepoResult<StatusResponse> {
        if self.db.delete_pin(name)? == 0 {
            return Err(RepoError::not_found(ENTITY, name));
        }
        debug!(pin = name, "Deleted pin");
        Ok(StatusResponse::success())
    }

    pub fn list(&self) -> RepoResult<Vec<PinResponse>> {
        self.db
            .list_pins()?
            .into_iter()
            .map(|row| self.resolve(row))
            .collect()
    }

    /// Pins that belong to `board` once dangling references are repaired.
    pub fn list_by_board(&self, board: &str) -> RepoResult<Vec<PinResponse>> {
        // Resolve first: repairs may recreate the default board.
        let pins = self.list()?;
        if !self.db.board_exists(board)? {
            return Err(RepoError::not_found("board", board));
        }
        Ok(pins.into_iter().filter(|pin| pin.board == board).collect())
    }

    fn resolve(&self, row: PinRow) -> RepoResult<PinResponse> {
        let board = self.db.resolve_board(&row.name, &row.board)?.into_title();
        Ok(to_response(row, board))
    }
}

fn to_response(row: PinRow, board: String) -> PinResponse {
    PinResponse {
        name: row.name,
        img_url: row.img_url,
        description: row.description,
        board,
        created_at: row.created_at,
    }
}
