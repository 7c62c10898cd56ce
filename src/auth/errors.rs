//! Authentication Errors
//! Mission: Classify every way a caller can fail to prove who they are

use thiserror::Error;

/// Terminal authentication outcome for the current request. All map to 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthFailure {
    #[error("account disabled")]
    AccountDisabled,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("malformed authorization header")]
    MalformedHeader,
    #[error("invalid or expired token")]
    InvalidToken,
    #[error("authentication required")]
    Unauthenticated,
}

impl AuthFailure {
    /// Stable tag used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            AuthFailure::AccountDisabled => "ACCOUNT_DISABLED",
            AuthFailure::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthFailure::MalformedHeader => "MALFORMED_HEADER",
            AuthFailure::InvalidToken => "INVALID_TOKEN",
            AuthFailure::Unauthenticated => "UNAUTHENTICATED",
        }
    }

    /// Message shown to clients. Credential failures share one message so the
    /// response never reveals whether the account or the password was wrong.
    pub fn public_message(&self) -> &'static str {
        match self {
            AuthFailure::AccountDisabled | AuthFailure::InvalidCredentials => {
                "Authentication failed"
            }
            AuthFailure::MalformedHeader => "Invalid authorization format. Use: Bearer {token}",
            AuthFailure::InvalidToken => "Invalid or expired token",
            AuthFailure::Unauthenticated => "Authentication required",
        }
    }
}

/// Result of a login attempt that did not produce a verified user.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Failure(#[from] AuthFailure),
    /// Credential store or hash verification broke; not the caller's fault.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Token codec errors.
#[derive(Debug, Error)]
pub enum TokenError {
    /// Bad signature, malformed payload or expired.
    #[error("invalid or expired token")]
    Invalid,
    #[error("failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
}
