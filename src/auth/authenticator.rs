//! Credential Verification
//! Mission: Decide whether a username/password pair belongs to an active account

use crate::auth::errors::{AuthError, AuthFailure};
use crate::auth::models::{User, VerifiedUser};
use anyhow::{Context, Result};
use bcrypt::{hash, verify};
use std::sync::Arc;

/// Where credentials come from. The SQLite user store is the production implementation.
pub trait CredentialStore: Send + Sync {
    fn find_credential(&self, username: &str) -> Result<Option<User>>;

    /// bcrypt cost of the hashes this store writes.
    fn hash_cost(&self) -> u32;
}

/// Stateless verifier over a credential store.
#[derive(Clone)]
pub struct Authenticator {
    store: Arc<dyn CredentialStore>,
}

impl Authenticator {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    /// Look the user up and check the password hash.
    ///
    /// Unknown and disabled accounts both fail with `AccountDisabled`, whatever
    /// the password; every path runs one bcrypt round. Store failures are
    /// returned as `AuthError::Internal` and never retried.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<VerifiedUser, AuthError> {
        let Some(user) = self
            .store
            .find_credential(username)
            .context("Credential lookup failed")?
        else {
            // Unknown users cost one bcrypt round, same as a wrong password.
            let _ = hash(password, self.store.hash_cost());
            return Err(AuthFailure::AccountDisabled.into());
        };

        if !user.enabled {
            let _ = verify(password, &user.password_hash);
            return Err(AuthFailure::AccountDisabled.into());
        }

        let matches = verify(password, &user.password_hash).context("Failed to verify password")?;
        if !matches {
            return Err(AuthFailure::InvalidCredentials.into());
        }

        Ok(VerifiedUser::from_user(&user))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::Utc;
    use std::collections::HashMap;
    use std::time::Instant;
    use uuid::Uuid;

    /// Lowest cost bcrypt accepts; keeps tests fast.
    pub(crate) const TEST_COST: u32 = 4;

    /// In-memory credential store for tests.
    pub(crate) struct MapStore {
        users: HashMap<String, User>,
        broken: bool,
        cost: u32,
    }

    impl Default for MapStore {
        fn default() -> Self {
            Self::with_cost(TEST_COST)
        }
    }

    impl MapStore {
        pub(crate) fn with_cost(cost: u32) -> Self {
            Self {
                users: HashMap::new(),
                broken: false,
                cost,
            }
        }

        pub(crate) fn with_user(mut self, username: &str, password: &str, enabled: bool) -> Self {
            let user = User {
                id: Uuid::new_v4(),
                username: username.to_string(),
                password_hash: hash(password, self.cost).unwrap(),
                email: None,
                git_addr: None,
                enabled,
                created_at: Utc::now().to_rfc3339(),
            };
            self.users.insert(username.to_string(), user);
            self
        }

        pub(crate) fn broken() -> Self {
            Self {
                broken: true,
                ..Self::default()
            }
        }
    }

    impl CredentialStore for MapStore {
        fn find_credential(&self, username: &str) -> Result<Option<User>> {
            if self.broken {
                anyhow::bail!("database is locked");
            }
            Ok(self.users.get(username).cloned())
        }

        fn hash_cost(&self) -> u32 {
            self.cost
        }
    }

    fn authenticator(store: MapStore) -> Authenticator {
        Authenticator::new(Arc::new(store))
    }

    #[test]
    fn test_valid_credentials_verify() {
        let auth = authenticator(MapStore::default().with_user("alice", "correct horse", true));

        let user = auth.authenticate("alice", "correct horse").unwrap();
        assert_eq!(user.username, "alice");
    }

    #[test]
    fn test_wrong_password_is_invalid_credentials() {
        let auth = authenticator(MapStore::default().with_user("alice", "correct horse", true));

        let err = auth.authenticate("alice", "battery staple").unwrap_err();
        assert!(matches!(
            err,
            AuthError::Failure(AuthFailure::InvalidCredentials)
        ));
    }

    #[test]
    fn test_disabled_account_with_correct_password() {
        let auth = authenticator(MapStore::default().with_user("bob", "correct horse", false));

        let err = auth.authenticate("bob", "correct horse").unwrap_err();
        assert!(matches!(err, AuthError::Failure(AuthFailure::AccountDisabled)));
    }

    #[test]
    fn test_unknown_user_is_account_disabled() {
        let auth = authenticator(MapStore::default());

        let err = auth.authenticate("ghost", "whatever1").unwrap_err();
        assert!(matches!(err, AuthError::Failure(AuthFailure::AccountDisabled)));
    }

    #[test]
    fn test_store_failure_is_internal() {
        let auth = authenticator(MapStore::broken());

        let err = auth.authenticate("alice", "correct horse").unwrap_err();
        assert!(matches!(err, AuthError::Internal(_)));
    }

    #[test]
    fn test_unknown_user_costs_a_bcrypt_round() {
        let auth = authenticator(MapStore::with_cost(8).with_user("alice", "correct horse", true));

        let start = Instant::now();
        let wrong = auth.authenticate("alice", "battery staple");
        let wrong_password_time = start.elapsed();

        let start = Instant::now();
        let unknown = auth.authenticate("ghost", "battery staple");
        let unknown_user_time = start.elapsed();

        assert!(wrong.is_err());
        assert!(matches!(
            unknown,
            Err(AuthError::Failure(AuthFailure::AccountDisabled))
        ));
        assert!(
            unknown_user_time * 4 >= wrong_password_time,
            "unknown user answered in {:?}, wrong password in {:?}",
            unknown_user_time,
            wrong_password_time
        );
    }
}
