use std::sync::Arc;

use pinboard_crypto::{TokenSigner, hash_password, verify_password};
use pinboard_db::Database;
use pinboard_db::models::UserRow;
use pinboard_types::api::UserResponse;
use tracing::{debug, warn};

use crate::error::{RepoError, RepoResult};

const ENTITY: &str = "user";

pub struct UserRepository {
    db: Arc<Database>,
    signer: Arc<TokenSigner>,
}

impl UserRepository {
    pub fn new(db: Arc<Database>, signer: Arc<TokenSigner>) -> Self {
        Self { db, signer }
    }

    pub fn create_user(&self, id: &str, email: &str, password: &str) -> RepoResult<UserResponse> {
        if id.is_empty() || email.trim().is_empty() {
            return Err(RepoError::InvalidInput("id and email are required".into()));
        }
        let email = normalize_email(email);

        if let Some(existing) = self.db.find_user_conflict(id, &email)? {
            let key = if existing.id == id { id } else { email.as_str() };
            return Err(RepoError::already_exists(ENTITY, key));
        }

        let password_hash = hash_password(password)?;

        // The unique constraints catch anyone who slipped in since the check.
        if let Err(e) = self.db.create_user(id, &email, &password_hash) {
            return Err(match pinboard_db::unique_violation(&e) {
                Some("users.email") => RepoError::already_exists(ENTITY, &email),
                Some(_) => RepoError::already_exists(ENTITY, id),
                None => e.into(),
            });
        }

        debug!(user = id, "Created user");
        Ok(UserResponse {
            id: id.to_string(),
            email,
        })
    }

    /// Check a password. Returns only the public fields on success.
    pub fn authenticate(&self, id: &str, password: &str) -> RepoResult<UserResponse> {
        let user = self
            .db
            .get_user_by_id(id)?
            .ok_or_else(|| RepoError::not_found(ENTITY, id))?;

        if !verify_password(&user.password, password) {
            warn!(user = id, "Password mismatch");
            return Err(RepoError::WrongPassword);
        }

        Ok(to_response(user))
    }

    pub fn get_user(&self, id: &str) -> RepoResult<UserResponse> {
        self.db
            .get_user_by_id(id)?
            .map(to_response)
            .ok_or_else(|| RepoError::not_found(ENTITY, id))
    }

    pub fn find_by_email(&self, email: &str) -> RepoResult<UserResponse> {
        let email = normalize_email(email);
        self.db
            .get_user_by_email(&email)?
            .map(to_response)
            .ok_or_else(|| RepoError::not_found(ENTITY, &email))
    }

    pub fn issue_token(&self, id: &str, ttl_secs: u64) -> RepoResult<String> {
        if self.db.get_user_by_id(id)?.is_none() {
            return Err(RepoError::not_found(ENTITY, id));
        }
        Ok(self.signer.issue(id, ttl_secs)?)
    }

    /// The user a token was issued to. `None` if the token is invalid,
    /// expired, or its user no longer exists.
    pub fn verify_token(&self, token: &str) -> RepoResult<Option<UserResponse>> {
        let Some(claims) = self.signer.decode(token) else {
            return Ok(None);
        };
        Ok(self.db.get_user_by_id(&claims.id)?.map(to_response))
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn to_response(row: UserRow) -> UserResponse {
    UserResponse {
        id: row.id,
        email: row.email,
    }
}
