use pinboard_types::api::{ErrorBody, ErrorKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("{entity} '{key}' does not exist")]
    NotFound { entity: &'static str, key: String },

    #[error("{entity} '{key}' already exists")]
    AlreadyExists { entity: &'static str, key: String },

    #[error("board '{0}' does not exist")]
    BoardNotFound(String),

    #[error("a pin named '{0}' already exists")]
    DuplicateName(String),

    #[error("img_url '{0}' is already used by another pin")]
    DuplicateImgUrl(String),

    #[error("password does not match")]
    WrongPassword,

    #[error("{0}")]
    InvalidInput(String),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

pub type RepoResult<T> = Result<T, RepoError>;

impl RepoError {
    pub(crate) fn not_found(entity: &'static str, key: &str) -> Self {
        Self::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    pub(crate) fn already_exists(entity: &'static str, key: &str) -> Self {
        Self::AlreadyExists {
            entity,
            key: key.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            Self::BoardNotFound(_) => ErrorKind::BoardNotFound,
            Self::DuplicateName(_) => ErrorKind::DuplicateName,
            Self::DuplicateImgUrl(_) => ErrorKind::DuplicateImgUrl,
            Self::WrongPassword => ErrorKind::WrongPassword,
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    pub fn to_body(&self) -> ErrorBody {
        ErrorBody {
            kind: self.kind(),
            message: self.to_string(),
        }
    }
}

/// Reject empty values and values longer than `max` characters.
pub(crate) fn check_len(field: &str, value: &str, max: usize) -> RepoResult<()> {
    if value.is_empty() {
        return Err(RepoError::InvalidInput(format!("{} must not be empty", field)));
    }
    check_max_len(field, value, max)
}

pub(crate) fn check_max_len(field: &str, value: &str, max: usize) -> RepoResult<()> {
    if value.chars().count() > max {
        return Err(RepoError::InvalidInput(format!(
            "{} must be at most {} characters",
            field, max
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_carries_kind_and_message() {
        let body = RepoError::not_found("board", "travel").to_body();
        assert_eq!(body.kind, ErrorKind::NotFound);
        assert_eq!(body.message, "board 'travel' does not exist");
    }

    #[test]
    fn anyhow_errors_become_internal() {
        let err: RepoError = anyhow::anyhow!("disk on fire").into();
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert!(err.to_string().contains("disk on fire"));
    }

    #[test]
    fn length_checks_count_characters() {
        assert!(check_len("title", "", 20).is_err());
        assert!(check_len("title", "ééééééééééééééééééé", 20).is_ok());
        assert!(check_max_len("comment", &"x".repeat(201), 200).is_err());
        assert!(check_max_len("comment", "", 200).is_ok());
    }
}
