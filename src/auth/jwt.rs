//! JWT Token Handler
//! Mission: Generate and validate signed, time-bound access tokens

use crate::auth::errors::TokenError;
use crate::auth::models::Claims;
use crate::config::DEFAULT_JWT_EXPIRATION_SECS;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tracing::debug;

/// JWT Handler for token operations. Built once at startup and shared read-only.
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    expiration: Duration,
}

impl JwtHandler {
    /// Create a new JWT handler with secret key and the default lifetime
    pub fn new(secret: &str) -> Self {
        Self::with_expiration(secret, DEFAULT_JWT_EXPIRATION_SECS)
    }

    pub fn with_expiration(secret: &str, expiration_secs: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is exact: a token is dead from the second its exp is reached.
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            expiration: Duration::seconds(expiration_secs),
        }
    }

    /// Token lifetime in seconds
    pub fn expires_in(&self) -> i64 {
        self.expiration.num_seconds()
    }

    /// Generate a JWT token for a username
    pub fn generate_token(&self, username: &str) -> Result<String, TokenError> {
        self.generate_token_at(username, Utc::now())
    }

    /// Generate a token as if it had been issued at `issued_at`.
    pub fn generate_token_at(
        &self,
        username: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let expiration = issued_at + self.expiration;

        let claims = Claims {
            sub: username.to_string(),
            iat: issued_at.timestamp().max(0) as usize,
            exp: expiration.timestamp().max(0) as usize,
        };

        debug!(
            "Generating JWT for user {}, expires in {}s",
            username,
            self.expires_in()
        );

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &self.encoding_key,
        )
        .map_err(TokenError::Signing)
    }

    /// Validate a JWT token and extract claims
    pub fn validate_token(&self, token: &str) -> Result<Claims, TokenError> {
        let decoded = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(
            |e| {
                debug!("Rejected JWT: {}", e);
                TokenError::Invalid
            },
        )?;

        // jsonwebtoken accepts exp == now; a token is only live strictly before exp.
        if decoded.claims.exp <= Utc::now().timestamp().max(0) as usize {
            debug!("Rejected JWT: expired at {}", decoded.claims.exp);
            return Err(TokenError::Invalid);
        }

        if decoded.claims.sub.trim().is_empty() {
            debug!("Rejected JWT: empty subject");
            return Err(TokenError::Invalid);
        }

        Ok(decoded.claims)
    }

    /// Validate a token and return the username it was issued for
    pub fn decode_username(&self, token: &str) -> Result<String, TokenError> {
        self.validate_token(token).map(|claims| claims.sub)
    }
}

/// Flip one character inside the signature segment of a compact JWT.
#[cfg(test)]
pub(crate) fn tamper_signature(token: &str) -> String {
    let sig_start = token.rfind('.').unwrap() + 1;
    // Mid-signature characters carry only data bits, so a swap always changes bytes.
    let idx = sig_start + 5;
    let original = token.as_bytes()[idx];
    let replacement = if original == b'A' { 'B' } else { 'A' };
    let mut tampered = token.to_string();
    tampered.replace_range(idx..idx + 1, &replacement.to_string());
    tampered
}
