use std::str::FromStr;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::crypto;
use jsonwebtoken::decode;
use jsonwebtoken::decode_header;
use jsonwebtoken::encode;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::errors::TokenError;

/// Claims of a token whose signature and shape have been checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken {
    pub subject: String,
    pub expiry: DateTime<Utc>,
}

/// Signs and verifies compact `header.payload.signature` access tokens.
///
/// The signing algorithm is pinned at construction. Tokens whose header
/// declares anything else are rejected before the signature is looked at.
/// Verification is pure computation and never touches storage.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
}

impl TokenCodec {
    /// Create a codec using HS256 (HMAC with SHA-256).
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens (at least 32 bytes for HS256)
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
        }
    }

    /// Create a codec pinned to a named symmetric algorithm.
    ///
    /// # Errors
    /// * `UnsupportedAlgorithm` - Name is unknown or not an HMAC algorithm
    pub fn with_algorithm(secret: &[u8], algorithm: &str) -> Result<Self, TokenError> {
        let parsed = Algorithm::from_str(algorithm)
            .map_err(|_| TokenError::UnsupportedAlgorithm(algorithm.to_string()))?;

        if !matches!(
            parsed,
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
        ) {
            return Err(TokenError::UnsupportedAlgorithm(algorithm.to_string()));
        }

        Ok(Self {
            algorithm: parsed,
            ..Self::new(secret)
        })
    }

    /// Issue a signed token for `subject` valid for `ttl`.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn issue(&self, subject: &str, ttl: Duration) -> Result<String, TokenError> {
        self.encode(&Claims::for_subject(subject, ttl))
    }

    /// Sign arbitrary claims.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn encode(&self, claims: &Claims) -> Result<String, TokenError> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))
    }

    /// Verify a token against the current time.
    ///
    /// # Errors
    /// * `Malformed` - Not a three-segment token, or header/payload undecodable
    /// * `UnsupportedAlgorithm` - Header declares a different algorithm
    /// * `BadSignature` - Signature does not match the payload
    /// * `MissingSubject` / `MissingExpiry` - Required claim absent
    /// * `Expired` - Current time is past the expiry
    pub fn verify(&self, token: &str) -> Result<VerifiedToken, TokenError> {
        self.verify_at(token, Utc::now().timestamp())
    }

    /// Verify a token as of `now` (Unix timestamp).
    pub fn verify_at(&self, token: &str, now: i64) -> Result<VerifiedToken, TokenError> {
        if token.split('.').count() != 3 {
            return Err(TokenError::Malformed(
                "expected three dot-separated segments".to_string(),
            ));
        }

        let header = decode_header(token).map_err(|e| TokenError::Malformed(e.to_string()))?;
        if header.alg != self.algorithm {
            return Err(TokenError::UnsupportedAlgorithm(format!("{:?}", header.alg)));
        }

        // Split is safe: three segments were checked above.
        let (message, signature) = token
            .rsplit_once('.')
            .ok_or_else(|| TokenError::Malformed("missing signature segment".to_string()))?;

        let signature_valid = crypto::verify(
            signature,
            message.as_bytes(),
            &self.decoding_key,
            self.algorithm,
        )
        .unwrap_or(false);
        if !signature_valid {
            return Err(TokenError::BadSignature);
        }

        let claims = self.decode_claims(token)?;

        let subject = claims.sub.clone().ok_or(TokenError::MissingSubject)?;
        let exp = claims.exp.ok_or(TokenError::MissingExpiry)?;

        if claims.is_expired(now) {
            return Err(TokenError::Expired);
        }

        let expiry = DateTime::from_timestamp(exp, 0)
            .ok_or_else(|| TokenError::Malformed(format!("expiry out of range: {}", exp)))?;

        Ok(VerifiedToken { subject, expiry })
    }

    /// Deserialize the payload of a token whose signature is already checked.
    ///
    /// Claim presence and expiry are checked by the caller so that each
    /// failure keeps its own reason.
    fn decode_claims(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        validation.required_spec_claims.clear();
        validation.validate_exp = false;
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| TokenError::Malformed(e.to_string()))
    }
}
