/// Invitation token utilities
///
/// Invitation tokens grant a single signup-or-join action against one owner
/// entity. These work with the `models::invitation` module for database
/// operations.
///
/// # Security
///
/// - **Format**: `rfinv_{32_chars}` (prefix + 32 random alphanumeric chars)
/// - **Storage**: Tokens are hashed with SHA-256 before storage; the
///   plaintext is only ever returned once, at creation
/// - **Lookup**: Presented tokens are hashed and matched against the stored
///   hash column, so the plaintext never participates in a comparison
/// - **Lifetime**: Enforced by the `expires_at` column, not encoded here
///
/// # Example
///
/// ```
/// use rentfolio_shared::auth::token::{generate_invitation_token, hash_token, validate_token_format};
///
/// let (token, hash) = generate_invitation_token();
/// assert!(token.starts_with("rfinv_"));
/// assert!(validate_token_format(&token));
/// assert_eq!(hash, hash_token(&token));
/// ```

use rand::Rng;
use sha2::{Digest, Sha256};

/// Length of the random part of an invitation token (characters)
const TOKEN_RANDOM_LENGTH: usize = 32;

/// Invitation token prefix
const TOKEN_PREFIX: &str = "rfinv_";

/// Total length of an invitation token (prefix + random)
pub const INVITATION_TOKEN_LENGTH: usize = TOKEN_PREFIX.len() + TOKEN_RANDOM_LENGTH;

/// Generates a new invitation token
///
/// Returns the plaintext token alongside its SHA-256 hash. Only the hash is
/// stored; the plaintext goes into the invitation link handed to the invitee.
///
/// Key space is 62^32, roughly 2^190 combinations.
pub fn generate_invitation_token() -> (String, String) {
    let random_part = generate_random_string(TOKEN_RANDOM_LENGTH);
    let token = format!("{}{}", TOKEN_PREFIX, random_part);
    let hash = hash_token(&token);

    (token, hash)
}

/// Generates a random alphanumeric string
///
/// Base62 (A-Z, a-z, 0-9) so tokens are URL-safe.
fn generate_random_string(length: usize) -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::thread_rng();

    (0..length)
        .map(|_| {
            let idx = rng.gen_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// Hashes a token using SHA-256
///
/// Returns the hex-encoded hash (64 characters), which is what the
/// `invitations.token_hash` column stores.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Validates invitation token format
///
/// Checks the `rfinv_` prefix, total length, and that the random part is
/// alphanumeric. Rejecting malformed tokens up front avoids a database
/// round-trip for garbage input.
pub fn validate_token_format(token: &str) -> bool {
    if token.len() != INVITATION_TOKEN_LENGTH {
        return false;
    }

    if !token.starts_with(TOKEN_PREFIX) {
        return false;
    }

    let random_part = &token[TOKEN_PREFIX.len()..];
    random_part.chars().all(|c| c.is_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_invitation_token() {
        let (token1, hash1) = generate_invitation_token();
        let (token2, hash2) = generate_invitation_token();

        assert!(token1.starts_with("rfinv_"));
        assert_eq!(token1.len(), INVITATION_TOKEN_LENGTH);

        assert_ne!(token1, token2);
        assert_ne!(hash1, hash2);

        // SHA-256 hex
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_hash_token_deterministic() {
        let hash = hash_token("rfinv_test123");

        assert_eq!(hash.len(), 64);
        assert_eq!(hash, hash_token("rfinv_test123"));
        assert_ne!(hash, hash_token("rfinv_different"));
    }

    #[test]
    fn test_validate_token_format() {
        assert!(validate_token_format(
            "rfinv_abcdefghijklmnopqrstuvwxyz123456"
        ));
        assert!(validate_token_format(
            "rfinv_ABCDEFGHIJKLMNOPQRSTUVWXYZ123456"
        ));

        // Wrong prefix
        assert!(!validate_token_format(
            "wrong_abcdefghijklmnopqrstuvwxyz123456"
        ));

        // Too short
        assert!(!validate_token_format("rfinv_short"));

        // Too long
        assert!(!validate_token_format(
            "rfinv_abcdefghijklmnopqrstuvwxyz1234567890"
        ));

        // Special characters in random part
        assert!(!validate_token_format(
            "rfinv_abc!@#$%^&*()_+={}[]|:;'<>?,./~`"
        ));
    }

    #[test]
    fn test_full_token_workflow() {
        let (plaintext, hash) = generate_invitation_token();

        assert!(validate_token_format(&plaintext));
        assert_eq!(hash_token(&plaintext), hash);

        let (other_token, _) = generate_invitation_token();
        assert_ne!(hash_token(&other_token), hash);
    }
}
