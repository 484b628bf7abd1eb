/// Pinboard credential helpers.
///
/// - Password hashing: Argon2id, PHC-encoded, random salt per hash.
/// - Auth tokens: HS256 JWTs carrying the user id, signed with a
///   process-wide secret and expiring after a fixed TTL.
pub mod password;
pub mod token;

pub use password::{hash_password, verify_password};
pub use token::{DEFAULT_TOKEN_TTL_SECS, TokenSigner};
