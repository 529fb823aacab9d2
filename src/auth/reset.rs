//! Single-use password reset tokens.
//!
//! The raw token only ever leaves the process inside the reset email; the
//! database keeps its SHA-256 digest and an expiry.

use rand::Rng;
use sha2::{Digest, Sha256};
use time::{Duration, OffsetDateTime};

pub const RESET_TOKEN_TTL: Duration = Duration::minutes(15);

#[derive(Debug, Clone)]
pub struct ResetToken {
    pub raw: String,
    pub hash: String,
    pub expires_at: OffsetDateTime,
}

impl ResetToken {
    pub fn generate(now: OffsetDateTime) -> Self {
        let mut bytes = [0u8; 20];
        rand::thread_rng().fill(&mut bytes);
        let raw = hex::encode(bytes);
        Self {
            hash: hash_reset_token(&raw),
            raw,
            expires_at: now + RESET_TOKEN_TTL,
        }
    }
}

pub fn hash_reset_token(raw: &str) -> String {
    hex::encode(Sha256::digest(raw.as_bytes()))
}

/// Whether `raw` proves ownership of the stored reset state at `now`.
pub fn reset_token_matches(
    raw: &str,
    stored_hash: Option<&str>,
    expires_at: Option<OffsetDateTime>,
    now: OffsetDateTime,
) -> bool {
    match (stored_hash, expires_at) {
        (Some(hash), Some(expires_at)) => expires_at > now && hash == hash_reset_token(raw),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_token_hashes_to_stored_value() {
        let now = OffsetDateTime::now_utc();
        let token = ResetToken::generate(now);
        assert_eq!(token.raw.len(), 40);
        assert!(token
            .raw
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
        assert_eq!(token.hash, hash_reset_token(&token.raw));
        assert_ne!(token.raw, token.hash);
        assert_eq!(token.expires_at - now, Duration::minutes(15));
    }

    #[test]
    fn tokens_are_unique() {
        let now = OffsetDateTime::now_utc();
        assert_ne!(ResetToken::generate(now).raw, ResetToken::generate(now).raw);
    }

    #[test]
    fn sha256_hex_digest() {
        assert_eq!(
            hash_reset_token("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn matches_only_unexpired_matching_hash() {
        let now = OffsetDateTime::now_utc();
        let token = ResetToken::generate(now);
        let hash = Some(token.hash.as_str());

        assert!(reset_token_matches(&token.raw, hash, Some(token.expires_at), now));
        assert!(!reset_token_matches("other", hash, Some(token.expires_at), now));
        assert!(!reset_token_matches(
            &token.raw,
            hash,
            Some(token.expires_at),
            token.expires_at + Duration::seconds(1)
        ));
    }

    #[test]
    fn cleared_state_never_matches() {
        let now = OffsetDateTime::now_utc();
        let token = ResetToken::generate(now);
        assert!(!reset_token_matches(&token.raw, None, None, now));
        assert!(!reset_token_matches(&token.raw, Some(&token.hash), None, now));
    }
}
