//! Authentication Module
//! Mission: Verify credentials, issue JWT tokens, and authorize every protected request

pub mod api;
pub mod authenticator;
pub mod errors;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod service;
pub mod user_store;

pub use authenticator::{Authenticator, CredentialStore};
pub use errors::{AuthError, AuthFailure, TokenError};
pub use jwt::JwtHandler;
pub use middleware::auth_middleware;
pub use models::{AuthenticatedIdentity, VerifiedUser};
pub use service::AuthService;
pub use user_store::UserStore;
