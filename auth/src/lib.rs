//! Authentication core for the bookmark service
//!
//! Provides the credential and token primitives the service builds on:
//! - Password hashing (Argon2id with a configurable work factor)
//! - Signed access tokens (HS256, algorithm pinned at construction)
//! - Authentication coordination (verify a password, issue a token)
//!
//! Nothing here touches storage. Looking principals up by username and
//! rejecting tokens for deleted or inactive accounts is the service's job.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## Access Tokens
//! ```
//! use auth::TokenCodec;
//! use chrono::Duration;
//!
//! let codec = TokenCodec::new(b"secret_key_at_least_32_bytes_long!");
//! let token = codec.issue("alice", Duration::minutes(30)).unwrap();
//! let verified = codec.verify(&token).unwrap();
//! assert_eq!(verified.subject, "alice");
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::Authenticator;
//!
//! let auth = Authenticator::new(b"secret_key_at_least_32_bytes_long!");
//!
//! // Register: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and issue token
//! let result = auth.authenticate("password123", &hash, "alice").unwrap();
//!
//! // Validate token
//! let verified = auth.validate_token(&result.access_token).unwrap();
//! assert_eq!(verified.subject, "alice");
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use authenticator::DEFAULT_TOKEN_TTL_MINUTES;
pub use jwt::Claims;
pub use jwt::TokenCodec;
pub use jwt::TokenError;
pub use jwt::VerifiedToken;
pub use password::HashingCost;
pub use password::PasswordError;
pub use password::PasswordHasher;
