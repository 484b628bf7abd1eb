pub mod boards;
pub mod error;
pub mod pins;
pub mod users;

use std::sync::Arc;

use pinboard_crypto::TokenSigner;
use pinboard_db::Database;
use pinboard_types::api::{ErrorBody, ErrorKind, ErrorResponse};
use serde::Serialize;

pub use boards::BoardRepository;
pub use error::{RepoError, RepoResult};
pub use pins::PinRepository;
pub use users::UserRepository;

/// All repositories, sharing one database handle and one token signer.
pub struct Pinboard {
    pub users: UserRepository,
    pub boards: BoardRepository,
    pub pins: PinRepository,
}

impl Pinboard {
    pub fn new(db: Arc<Database>, signer: Arc<TokenSigner>) -> Self {
        Self {
            users: UserRepository::new(db.clone(), signer),
            boards: BoardRepository::new(db.clone()),
            pins: PinRepository::new(db),
        }
    }
}

/// Flatten a repository result into the plain JSON mapping handed to callers:
/// the payload on success, `{"error": {"kind", "message"}}` on failure.
pub fn reply<T: Serialize>(result: RepoResult<T>) -> serde_json::Value {
    let body = match result {
        Ok(value) => match serde_json::to_value(value) {
            Ok(json) => return json,
            Err(e) => ErrorBody {
                kind: ErrorKind::Internal,
                message: format!("internal error: {}", e),
            },
        },
        Err(e) => e.to_body(),
    };

    match serde_json::to_value(ErrorResponse { error: body }) {
        Ok(json) => json,
        Err(e) => {
            tracing::error!("Failed to serialize error reply: {}", e);
            serde_json::Value::Null
        }
    }
}
