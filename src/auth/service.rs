//! Authentication Service
//! Mission: The three operations every other part of the backend relies on:
//! verify credentials, issue a token, authorize a request header

use crate::auth::authenticator::{Authenticator, CredentialStore};
use crate::auth::errors::{AuthError, AuthFailure, TokenError};
use crate::auth::jwt::JwtHandler;
use crate::auth::models::{AuthenticatedIdentity, VerifiedUser};
use std::sync::Arc;
use tracing::{debug, info, warn};

const BEARER_SCHEME: &str = "Bearer";

pub struct AuthService {
    authenticator: Authenticator,
    jwt: JwtHandler,
}

impl AuthService {
    pub fn new(store: Arc<dyn CredentialStore>, jwt: JwtHandler) -> Self {
        Self {
            authenticator: Authenticator::new(store),
            jwt,
        }
    }

    pub fn token_ttl_secs(&self) -> i64 {
        self.jwt.expires_in()
    }

    /// Verify a username/password pair. Blocking: runs a store lookup and bcrypt.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<VerifiedUser, AuthError> {
        match self.authenticator.authenticate(username, password) {
            Ok(user) => {
                info!("✅ Login successful: {}", user.username);
                Ok(user)
            }
            Err(AuthError::Failure(failure)) => {
                warn!(
                    username = %username,
                    kind = failure.kind(),
                    "❌ Failed login attempt"
                );
                Err(failure.into())
            }
            Err(AuthError::Internal(e)) => {
                warn!(username = %username, "Login aborted: {:#}", e);
                Err(AuthError::Internal(e))
            }
        }
    }

    pub fn issue_token(&self, user: &VerifiedUser) -> Result<String, TokenError> {
        self.jwt.generate_token(&user.username)
    }

    /// Run the authorization filter over a raw `Authorization` header value.
    ///
    /// `Ok(None)` means no header: the request continues unauthenticated and
    /// handlers that need an identity reject it themselves.
    pub fn authorize_request(
        &self,
        raw_header: Option<&str>,
    ) -> Result<Option<AuthenticatedIdentity>, AuthFailure> {
        let Some(raw) = raw_header else {
            return Ok(None);
        };

        let token = parse_bearer_token(raw)?;

        let username = self.jwt.decode_username(token).map_err(|_| {
            debug!("Bearer token rejected");
            AuthFailure::InvalidToken
        })?;

        Ok(Some(AuthenticatedIdentity { username }))
    }
}

/// Extract the token from `Bearer <token>`. The scheme is case-insensitive.
pub fn parse_bearer_token(raw: &str) -> Result<&str, AuthFailure> {
    let (scheme, token) = raw
        .trim()
        .split_once(' ')
        .ok_or(AuthFailure::MalformedHeader)?;

    if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) {
        return Err(AuthFailure::MalformedHeader);
    }

    let token = token.trim();
    if token.is_empty() || token.contains(char::is_whitespace) {
        return Err(AuthFailure::MalformedHeader);
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::authenticator::tests::MapStore;
    use crate::auth::jwt::tamper_signature;
    use chrono::{Duration, Utc};

    const SECRET: &str = "service-test-secret";

    fn service() -> AuthService {
        let store = MapStore::default()
            .with_user("alice", "alice-password", true)
            .with_user("carol", "carol-password", false);
        AuthService::new(Arc::new(store), JwtHandler::new(SECRET))
    }

    #[test]
    fn test_parse_bearer_token() {
        assert_eq!(parse_bearer_token("Bearer abc.def.ghi"), Ok("abc.def.ghi"));
        assert_eq!(parse_bearer_token("bearer abc"), Ok("abc"));
        assert_eq!(
            parse_bearer_token("Basic abc"),
            Err(AuthFailure::MalformedHeader)
        );
        assert_eq!(parse_bearer_token("Bearer"), Err(AuthFailure::MalformedHeader));
        assert_eq!(parse_bearer_token("Bearer   "), Err(AuthFailure::MalformedHeader));
        assert_eq!(
            parse_bearer_token("abc.def.ghi"),
            Err(AuthFailure::MalformedHeader)
        );
        assert_eq!(
            parse_bearer_token("Bearer a b"),
            Err(AuthFailure::MalformedHeader)
        );
    }

    #[test]
    fn test_login_token_authorize_round_trip() {
        let auth = service();

        let user = auth.authenticate("alice", "alice-password").unwrap();
        let token = auth.issue_token(&user).unwrap();

        let identity = auth
            .authorize_request(Some(&format!("Bearer {}", token)))
            .unwrap()
            .unwrap();
        assert_eq!(identity.username, "alice");
    }

    #[test]
    fn test_missing_header_passes_through() {
        assert_eq!(service().authorize_request(None), Ok(None));
    }

    #[test]
    fn test_wrong_scheme_is_malformed() {
        assert_eq!(
            service().authorize_request(Some("Basic abc")),
            Err(AuthFailure::MalformedHeader)
        );
    }

    #[test]
    fn test_garbage_and_tampered_tokens_are_invalid() {
        let auth = service();
        assert_eq!(
            auth.authorize_request(Some("Bearer not-a-jwt")),
            Err(AuthFailure::InvalidToken)
        );

        let user = auth.authenticate("alice", "alice-password").unwrap();
        let token = auth.issue_token(&user).unwrap();
        let header = format!("Bearer {}", tamper_signature(&token));
        assert_eq!(
            auth.authorize_request(Some(&header)),
            Err(AuthFailure::InvalidToken)
        );
    }

    #[test]
    fn test_expired_token_for_alice_is_invalid() {
        let auth = service();
        let stale = JwtHandler::new(SECRET)
            .generate_token_at("alice", Utc::now() - Duration::hours(6))
            .unwrap();

        assert_eq!(
            auth.authorize_request(Some(&format!("Bearer {}", stale))),
            Err(AuthFailure::InvalidToken)
        );
    }

    #[test]
    fn test_failure_kinds_survive_service_layer() {
        let auth = service();

        let err = auth.authenticate("alice", "nope-nope").unwrap_err();
        assert!(matches!(
            err,
            AuthError::Failure(AuthFailure::InvalidCredentials)
        ));

        let err = auth.authenticate("carol", "carol-password").unwrap_err();
        assert!(matches!(err, AuthError::Failure(AuthFailure::AccountDisabled)));
    }
}
