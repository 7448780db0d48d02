use std::sync::OnceLock;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::rand_core::RngCore;
use chrono::Duration;

use crate::jwt::TokenCodec;
use crate::jwt::TokenError;
use crate::jwt::VerifiedToken;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Lifetime of issued access tokens unless configured otherwise.
pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 30;

/// Length of a generated signing secret in bytes.
pub const GENERATED_SECRET_LEN: usize = 32;

const DECOY_PASSWORD: &str = "decoy password for unknown accounts";

/// Authentication coordinator combining password verification and token issuance.
///
/// Owns the process-wide signing secret (through its codec). Share it behind
/// an `Arc`; nothing in it is mutated after construction.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    token_codec: TokenCodec,
    token_ttl: Duration,
    decoy_hash: OnceLock<Option<String>>,
}

/// Result of successful authentication.
#[derive(Debug, Clone)]
pub struct AuthenticationResult {
    /// Signed access token
    pub access_token: String,
}

/// Authentication operation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("Token error: {0}")]
    TokenError(#[from] TokenError),
}

impl Authenticator {
    /// Create an authenticator with HS256, default hashing cost and a 30 minute TTL.
    ///
    /// # Arguments
    /// * `secret` - Secret key for token signing
    pub fn new(secret: &[u8]) -> Self {
        Self::with_parts(
            PasswordHasher::new(),
            TokenCodec::new(secret),
            Duration::minutes(DEFAULT_TOKEN_TTL_MINUTES),
        )
    }

    /// Create an authenticator from configured parts.
    pub fn with_parts(
        password_hasher: PasswordHasher,
        token_codec: TokenCodec,
        token_ttl: Duration,
    ) -> Self {
        Self {
            password_hasher,
            token_codec,
            token_ttl,
            decoy_hash: OnceLock::new(),
        }
    }

    /// Generate a random signing secret.
    ///
    /// Tokens signed with a generated secret stop verifying once the process
    /// restarts.
    pub fn generate_secret() -> Vec<u8> {
        let mut secret = vec![0u8; GENERATED_SECRET_LEN];
        OsRng.fill_bytes(&mut secret);
        secret
    }

    pub fn token_ttl(&self) -> Duration {
        self.token_ttl
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Check a password against a stored hash.
    ///
    /// # Errors
    /// * `MalformedHash` - Stored hash cannot be parsed
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> Result<bool, PasswordError> {
        self.password_hasher.verify(password, stored_hash)
    }

    /// Run a full password verification against a decoy hash.
    ///
    /// Call this when no account matches a login attempt, so the rejection
    /// costs the same Argon2 work as a wrong password. The decoy is hashed
    /// with the configured cost on first use.
    pub fn verify_against_decoy(&self, password: &str) {
        let decoy = self
            .decoy_hash
            .get_or_init(|| self.password_hasher.hash(DECOY_PASSWORD).ok());

        if let Some(decoy) = decoy {
            let _ = self.password_hasher.verify(password, decoy);
        }
    }

    /// Verify credentials and issue a token for `subject`.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Stored hash cannot be parsed
    /// * `TokenError` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        subject: &str,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        if !self.verify_password(password, stored_hash)? {
            return Err(AuthenticationError::InvalidCredentials);
        }

        let access_token = self.issue_token(subject)?;

        Ok(AuthenticationResult { access_token })
    }

    /// Issue a token for `subject` with the configured TTL, without checking a password.
    pub fn issue_token(&self, subject: &str) -> Result<String, TokenError> {
        self.token_codec.issue(subject, self.token_ttl)
    }

    /// Issue a token for `subject` with an explicit TTL.
    pub fn issue_token_with_ttl(&self, subject: &str, ttl: Duration) -> Result<String, TokenError> {
        self.token_codec.issue(subject, ttl)
    }

    /// Validate a token and return its subject and expiry.
    ///
    /// # Errors
    /// * `TokenError` - Token validation failed; the variant names the reason
    pub fn validate_token(&self, token: &str) -> Result<VerifiedToken, TokenError> {
        self.token_codec.verify(token)
    }
}
