use std::sync::Arc;

use pinboard_db::Database;
use pinboard_db::models::BoardRow;
use pinboard_types::api::{BoardResponse, StatusResponse};
use pinboard_types::models::{MAX_BOARD_COMMENT_LEN, MAX_BOARD_TITLE_LEN};
use tracing::debug;

use crate::error::{RepoError, RepoResult, check_len, check_max_len};

const ENTITY: &str = "board";

pub struct BoardRepository {
    db: Arc<Database>,
}

impl BoardRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub fn create(&self, title: &str, comment: &str) -> RepoResult<BoardResponse> {
        check_len("title", title, MAX_BOARD_TITLE_LEN)?;
        check_max_len("comment", comment, MAX_BOARD_COMMENT_LEN)?;

        let row = self.db.create_board(title, comment).map_err(|e| {
            if pinboard_db::unique_violation(&e).is_some() {
                RepoError::already_exists(ENTITY, title)
            } else {
                e.into()
            }
        })?;

        debug!(board = title, "Created board");
        Ok(to_response(row))
    }

    pub fn get(&self, title: &str) -> RepoResult<BoardResponse> {
        self.db
            .get_board(title)?
            .map(to_response)
            .ok_or_else(|| RepoError::not_found(ENTITY, title))
    }

    /// Replace the comment and return the refreshed board.
    pub fn update(&self, title: &str, comment: &str) -> RepoResult<BoardResponse> {
        check_max_len("comment", comment, MAX_BOARD_COMMENT_LEN)?;

        if self.db.update_board_comment(title, comment)? == 0 {
            return Err(RepoError::not_found(ENTITY, title));
        }
        debug!(board = title, "Updated board");
        self.get(title)
    }

    /// Remove a board. Its pins stay and are moved to the default board the
    /// next time they are read.
    pub fn delete(&self, title: &str) -> RepoResult<StatusResponse> {
        if self.db.delete_board(title)? == 0 {
            return Err(RepoError::not_found(ENTITY, title));
        }
        debug!(board = title, "Deleted board");
        Ok(StatusResponse::success())
    }

    pub fn list(&self) -> RepoResult<Vec<BoardResponse>> {
        Ok(self.db.list_boards()?.into_iter().map(to_response).collect())
    }
}

fn to_response(row: BoardRow) -> BoardResponse {
    BoardResponse {
        title: row.title,
        comment: row.comment,
        created_at: row.created_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pinboard_types::api::ErrorKind;

    fn repo() -> BoardRepository {
        BoardRepository::new(Arc::new(Database::open_in_memory().unwrap()))
    }

    #[test]
    fn create_get_update_delete() {
        let boards = repo();

        let created = boards.create("travel", "trips").unwrap();
        assert_eq!(created.title, "travel");
        assert!(!created.created_at.is_empty());
        assert_eq!(boards.get("travel").unwrap(), created);

        let updated = boards.update("travel", "road trips").unwrap();
        assert_eq!(updated.comment, "road trips");
        assert_eq!(updated.created_at, created.created_at);

        assert_eq!(boards.delete("travel").unwrap(), StatusResponse::success());
        assert_eq!(boards.get("travel").unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[test]
    fn missing_board_is_not_found() {
        let boards = repo();
        assert_eq!(boards.get("nope").unwrap_err().kind(), ErrorKind::NotFound);
        assert_eq!(boards.update("nope", "x").unwrap_err().kind(), ErrorKind::NotFound);
        assert_eq!(boards.delete("nope").unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[test]
    fn duplicate_title_is_rejected() {
        let boards = repo();
        boards.create("travel", "a").unwrap();
        let err = boards.create("travel", "b").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyExists);
        assert_eq!(boards.get("travel").unwrap().comment, "a");
    }

    #[test]
    fn length_limits() {
        let boards = repo();
        let long_title = "t".repeat(MAX_BOARD_TITLE_LEN + 1);
        let long_comment = "c".repeat(MAX_BOARD_COMMENT_LEN + 1);

        assert_eq!(boards.create(&long_title, "").unwrap_err().kind(), ErrorKind::InvalidInput);
        assert_eq!(boards.create("", "").unwrap_err().kind(), ErrorKind::InvalidInput);
        assert_eq!(
            boards.create("ok", &long_comment).unwrap_err().kind(),
            ErrorKind::InvalidInput
        );

        boards.create("ok", "").unwrap();
        assert_eq!(
            boards.update("ok", &long_comment).unwrap_err().kind(),
            ErrorKind::InvalidInput
        );
    }

    #[test]
    fn list_reflects_surviving_boards() {
        let boards = repo();
        for title in ["c", "a", "b"] {
            boards.create(title, "").unwrap();
        }
        boards.delete("b").unwrap();
        boards.create("d", "").unwrap();

        let titles: Vec<_> = boards.list().unwrap().into_iter().map(|b| b.title).collect();
        assert_eq!(titles, vec!["a", "c", "d"]);
    }
}
