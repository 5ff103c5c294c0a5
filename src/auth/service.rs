use crate::auth::jwt::TokenIssuer;
use crate::db::{CredentialStore, TokenBlacklist, User};
use crate::types::{AppError, LoginResponse, RegisterResponse, Result};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Registration, login, token authentication and logout.
///
/// Tokens are stateless JWTs; revocation is tracked in a [`TokenBlacklist`]
/// consulted on every [`authenticate`](Self::authenticate) call.
pub struct AuthService {
    issuer: TokenIssuer,
    users: Arc<dyn CredentialStore>,
    blacklist: Arc<dyn TokenBlacklist>,
}

impl AuthService {
    pub fn new(
        issuer: TokenIssuer,
        users: Arc<dyn CredentialStore>,
        blacklist: Arc<dyn TokenBlacklist>,
    ) -> Self {
        Self {
            issuer,
            users,
            blacklist,
        }
    }

    pub fn issuer(&self) -> &TokenIssuer {
        &self.issuer
    }

    /// Creates a user. Username uniqueness is checked before email.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<RegisterResponse> {
        if username.trim().is_empty() || email.trim().is_empty() || password.is_empty() {
            return Err(AppError::InvalidInput(
                "Username, email and password are required".to_string(),
            ));
        }

        if self.users.get_user_by_username(username).await?.is_some() {
            return Err(AppError::DuplicateUsername);
        }

        if self.users.get_user_by_email(email).await?.is_some() {
            return Err(AppError::DuplicateEmail);
        }

        let password_hash = self.issuer.hash_password(password)?;

        // The store's UNIQUE constraints still catch concurrent registrations
        let user = self
            .users
            .create_user(username, email, &password_hash)
            .await?;

        info!(user_id = user.id, username = %user.username, "registered user");

        Ok(RegisterResponse {
            username: user.username,
            email: user.email,
        })
    }

    /// Checks credentials and issues a token. Unknown users and wrong
    /// passwords produce the same error.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse> {
        let user = match self.users.get_user_by_username(username).await? {
            Some(user) => user,
            None => {
                debug!(username, "login for unknown user");
                return Err(AppError::InvalidCredentials);
            }
        };

        if !self
            .issuer
            .verify_password(password, &user.password_hash)?
        {
            debug!(user_id = user.id, "login with wrong password");
            return Err(AppError::InvalidCredentials);
        }

        let token = self.issuer.issue_token(user.id)?;

        info!(user_id = user.id, "user logged in");

        Ok(LoginResponse {
            username: user.username,
            email: user.email,
            token,
        })
    }

    /// Resolves a bearer token to its user.
    ///
    /// Returns `None` for bad signatures, expired or revoked tokens, and
    /// tokens whose user no longer exists. Store failures are logged and
    /// also yield `None`.
    pub async fn authenticate(&self, token: &str) -> Option<User> {
        let claims = self.issuer.verify_token(token).ok()?;

        match self.blacklist.contains(&self.issuer.hash_token(token)).await {
            Ok(false) => {}
            Ok(true) => {
                debug!(user_id = claims.user_id, "rejected revoked token");
                return None;
            }
            Err(e) => {
                warn!(error = %e, "blacklist lookup failed");
                return None;
            }
        }

        match self.users.get_user_by_id(claims.user_id).await {
            Ok(user) => user,
            Err(e) => {
                warn!(error = %e, user_id = claims.user_id, "user lookup failed");
                None
            }
        }
    }

    /// Revokes a token. Calling it again for the same token is harmless.
    pub async fn logout(&self, token: &str) -> Result<()> {
        // Keep the entry at least as long as the token could still verify
        let expires_at = self
            .issuer
            .expires_at(token)
            .unwrap_or_else(|_| {
                Utc::now()
                    .timestamp()
                    .saturating_add(self.issuer.token_expiry())
            });

        self.blacklist
            .insert(&self.issuer.hash_token(token), expires_at)
            .await?;

        info!("token revoked");
        Ok(())
    }

    /// Removes blacklist entries for tokens that expired at or before `now`.
    pub async fn prune_blacklist(&self, now: i64) -> Result<u64> {
        let removed = self.blacklist.prune_expired(now).await?;
        if removed > 0 {
            info!(removed, "pruned expired blacklist entries");
        }
        Ok(removed)
    }

    /// Start a background task that periodically prunes the blacklist.
    ///
    /// The task runs until the returned handle is aborted or the runtime
    /// shuts down.
    pub fn start_blacklist_cleanup(
        self: &Arc<Self>,
        interval: Duration,
    ) -> tokio::task::JoinHandle<()> {
        let service = Arc::clone(self);

        tokio::spawn(async move {
            let mut interval_timer = tokio::time::interval(interval);
            loop {
                interval_timer.tick().await;

                if let Err(e) = service.prune_blacklist(Utc::now().timestamp()).await {
                    warn!(error = %e, "blacklist cleanup failed");
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::traits::{MockCredentialStore, MockTokenBlacklist};

    const SECRET: &str = "unit-test-secret-that-is-32-chars-long";

    fn user(id: i64, username: &str, email: &str, password_hash: &str) -> User {
        User {
            id,
            username: username.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: 0,
        }
    }

    fn service(users: MockCredentialStore, blacklist: MockTokenBlacklist) -> AuthService {
        AuthService::new(
            TokenIssuer::new(SECRET.to_string(), 3600),
            Arc::new(users),
            Arc::new(blacklist),
        )
    }

    #[tokio::test]
    async fn test_register_checks_username_before_email() {
        let mut users = MockCredentialStore::new();
        users
            .expect_get_user_by_username()
            .returning(|_| Ok(Some(user(1, "alice", "a@x.com", "h"))));
        users.expect_get_user_by_email().never();
        users.expect_create_user().never();

        let result = service(users, MockTokenBlacklist::new())
            .register("alice", "a@x.com", "pw1")
            .await;

        assert!(matches!(result, Err(AppError::DuplicateUsername)));
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let mut users = MockCredentialStore::new();
        users.expect_get_user_by_username().returning(|_| Ok(None));
        users
            .expect_get_user_by_email()
            .returning(|_| Ok(Some(user(1, "alice", "a@x.com", "h"))));
        users.expect_create_user().never();

        let result = service(users, MockTokenBlacklist::new())
            .register("bob", "a@x.com", "pw2")
            .await;

        assert!(matches!(result, Err(AppError::DuplicateEmail)));
    }

    #[tokio::test]
    async fn test_register_stores_hash_not_password() {
        let mut users = MockCredentialStore::new();
        users.expect_get_user_by_username().returning(|_| Ok(None));
        users.expect_get_user_by_email().returning(|_| Ok(None));
        users
            .expect_create_user()
            .withf(|_, _, hash| hash.starts_with("$argon2") && hash != "pw1")
            .times(1)
            .returning(|username, email, hash| Ok(user(1, username, email, hash)));

        let response = service(users, MockTokenBlacklist::new())
            .register("alice", "a@x.com", "pw1")
            .await
            .expect("registration should succeed");

        assert_eq!(response.username, "alice");
        assert_eq!(response.email, "a@x.com");
    }

    #[tokio::test]
    async fn test_register_rejects_blank_fields() {
        let result = service(MockCredentialStore::new(), MockTokenBlacklist::new())
            .register("  ", "a@x.com", "pw")
            .await;

        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_login_unknown_user_is_invalid_credentials() {
        let mut users = MockCredentialStore::new();
        users.expect_get_user_by_username().returning(|_| Ok(None));

        let result = service(users, MockTokenBlacklist::new())
            .login("ghost", "pw")
            .await;

        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_authenticate_swallows_store_errors() {
        let issuer = TokenIssuer::new(SECRET.to_string(), 3600);
        let token = issuer.issue_token(1).expect("should issue");

        let mut blacklist = MockTokenBlacklist::new();
        blacklist
            .expect_contains()
            .returning(|_| Err(AppError::Database("disk I/O error".to_string())));

        let result = service(MockCredentialStore::new(), blacklist)
            .authenticate(&token)
            .await;

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_authenticate_rejects_blacklisted_token() {
        let issuer = TokenIssuer::new(SECRET.to_string(), 3600);
        let token = issuer.issue_token(1).expect("should issue");
        let digest = issuer.hash_token(&token);

        let mut blacklist = MockTokenBlacklist::new();
        blacklist
            .expect_contains()
            .withf(move |hash| hash == digest)
            .returning(|_| Ok(true));
        let mut users = MockCredentialStore::new();
        users.expect_get_user_by_id().never();

        assert!(service(users, blacklist).authenticate(&token).await.is_none());
    }

    #[tokio::test]
    async fn test_authenticate_unknown_user() {
        let issuer = TokenIssuer::new(SECRET.to_string(), 3600);
        let token = issuer.issue_token(99).expect("should issue");

        let mut blacklist = MockTokenBlacklist::new();
        blacklist.expect_contains().returning(|_| Ok(false));
        let mut users = MockCredentialStore::new();
        users
            .expect_get_user_by_id()
            .withf(|id| *id == 99)
            .returning(|_| Ok(None));

        assert!(service(users, blacklist).authenticate(&token).await.is_none());
    }

    #[tokio::test]
    async fn test_logout_records_token_expiry() {
        let issuer = TokenIssuer::new(SECRET.to_string(), 3600);
        let token = issuer.issue_token(1).expect("should issue");
        let expected_exp = issuer.expires_at(&token).expect("should decode");
        let digest = issuer.hash_token(&token);

        let mut blacklist = MockTokenBlacklist::new();
        blacklist
            .expect_insert()
            .withf(move |hash, exp| hash == digest && *exp == expected_exp)
            .times(1)
            .returning(|_, _| Ok(()));

        service(MockCredentialStore::new(), blacklist)
            .logout(&token)
            .await
            .expect("logout should succeed");
    }

    #[tokio::test]
    async fn test_logout_undecodable_token_uses_max_lifetime() {
        let before = Utc::now().timestamp() + 3600;

        let mut blacklist = MockTokenBlacklist::new();
        blacklist
            .expect_insert()
            .withf(move |_, exp| *exp >= before)
            .times(1)
            .returning(|_, _| Ok(()));

        service(MockCredentialStore::new(), blacklist)
            .logout("garbage")
            .await
            .expect("logout should succeed");
    }

    #[tokio::test]
    async fn test_logout_fallback_saturates_on_huge_expiry() {
        let mut blacklist = MockTokenBlacklist::new();
        blacklist
            .expect_insert()
            .withf(|_, exp| *exp == i64::MAX)
            .times(1)
            .returning(|_, _| Ok(()));

        let service = AuthService::new(
            TokenIssuer::new(SECRET.to_string(), i64::MAX),
            Arc::new(MockCredentialStore::new()),
            Arc::new(blacklist),
        );

        service
            .logout("garbage")
            .await
            .expect("logout should succeed");
    }
}
