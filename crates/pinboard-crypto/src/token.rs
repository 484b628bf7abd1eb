use anyhow::Result;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use pinboard_types::api::Claims;

pub const DEFAULT_TOKEN_TTL_SECS: u64 = 3600;

/// Issues and checks auth tokens with one process-wide secret.
/// Build it once at startup and share it.
pub struct TokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenSigner {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is exact; no grace window.
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Token for `user_id` expiring `ttl_secs` from now.
    pub fn issue(&self, user_id: &str, ttl_secs: u64) -> Result<String> {
        self.issue_at(user_id, unix_now(), ttl_secs)
    }

    /// Token for `user_id` as if issued at `issued_at` (unix seconds).
    pub fn issue_at(&self, user_id: &str, issued_at: u64, ttl_secs: u64) -> Result<String> {
        let claims = Claims {
            id: user_id.to_string(),
            iat: issued_at,
            exp: issued_at.saturating_add(ttl_secs),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;
        Ok(token)
    }

    /// Claims of a valid, unexpired token. Bad signatures, malformed tokens
    /// and expired tokens all come back as `None`.
    pub fn decode(&self, token: &str) -> Option<Claims> {
        match decode::<Claims>(token, &self.decoding, &self.validation) {
            Ok(data) => Some(data.claims),
            Err(e) => {
                tracing::debug!("Rejected token: {}", e);
                None
            }
        }
    }
}

fn unix_now() -> u64 {
    chrono::Utc::now().timestamp().max(0) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_decodes_to_user_id() {
        let signer = TokenSigner::new("test-secret");
        let token = signer.issue("alice", DEFAULT_TOKEN_TTL_SECS).unwrap();

        let claims = signer.decode(&token).unwrap();
        assert_eq!(claims.id, "alice");
        assert_eq!(claims.exp - claims.iat, DEFAULT_TOKEN_TTL_SECS);
    }

    #[test]
    fn expired_token_is_rejected() {
        let signer = TokenSigner::new("test-secret");
        let two_hours_ago = unix_now() - 7200;
        let token = signer.issue_at("alice", two_hours_ago, 3600).unwrap();
        assert!(signer.decode(&token).is_none());
    }

    #[test]
    fn token_from_other_secret_is_rejected() {
        let ours = TokenSigner::new("secret-a");
        let theirs = TokenSigner::new("secret-b");
        let token = theirs.issue("alice", 3600).unwrap();
        assert!(ours.decode(&token).is_none());
    }

    #[test]
    fn tampered_signature_is_rejected() {
        let signer = TokenSigner::new("test-secret");
        let token = signer.issue("alice", 3600).unwrap();

        let (head, sig) = token.rsplit_once('.').unwrap();
        let flipped = if sig.starts_with('A') { "B" } else { "A" };
        let tampered = format!("{}.{}{}", head, flipped, &sig[1..]);
        assert!(signer.decode(&tampered).is_none());
    }

    #[test]
    fn garbage_is_rejected() {
        let signer = TokenSigner::new("test-secret");
        assert!(signer.decode("").is_none());
        assert!(signer.decode("not.a.jwt").is_none());
    }
}
