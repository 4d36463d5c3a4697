use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};

use super::domain::{LoginInput, RegisterInput, ServiceResponse, User, UserId};
use super::errors::AuthError;
use super::password::{HashParams, PasswordDigest, PasswordKdf};
use super::repository::CredentialStore;

/// Message used for both login failure kinds when `hardened_login` is on.
pub const GENERIC_LOGIN_FAILURE: &str = "Invalid username or password";

/// Longest accepted username, in characters.
pub const USERNAME_MAX_LEN: usize = models::app_user::USERNAME_MAX_LEN;

/// Auth service configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Hide whether a login failed on the username or the password.
    pub hardened_login: bool,
    pub min_password_len: usize,
    pub hash_params: HashParams,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self { hardened_login: false, min_password_len: 1, hash_params: HashParams::default() }
    }
}

/// Capability set the web adapter depends on.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn register(&self, input: RegisterInput) -> Result<ServiceResponse<UserId>, AuthError>;
    async fn login(&self, input: LoginInput) -> Result<ServiceResponse<UserId>, AuthError>;
    async fn get_user(&self, id: UserId) -> Result<Option<User>, AuthError>;
}

/// Auth business service independent of web framework
pub struct AuthService<S: CredentialStore> {
    store: Arc<S>,
    kdf: Arc<PasswordKdf>,
    cfg: AuthConfig,
}

/// Fold expected failures into the envelope; pass fatal ones through.
fn envelope<T>(outcome: Result<T, AuthError>) -> Result<ServiceResponse<T>, AuthError> {
    match outcome {
        Ok(data) => Ok(ServiceResponse::Ok(data)),
        Err(e) if e.is_recoverable() => Ok(ServiceResponse::Err(e.to_string())),
        Err(e) => Err(e),
    }
}

impl<S: CredentialStore> AuthService<S> {
    pub fn new(store: Arc<S>, cfg: AuthConfig) -> Result<Self, AuthError> {
        let kdf = Arc::new(PasswordKdf::new(cfg.hash_params)?);
        Ok(Self { store, kdf, cfg })
    }

    /// Register a new user with a salted Argon2id hash.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockCredentialStore};
    /// use service::auth::domain::RegisterInput;
    /// use std::sync::Arc;
    /// let svc = AuthService::new(Arc::new(MockCredentialStore::default()), AuthConfig::default()).unwrap();
    /// let input = RegisterInput { username: "alice".into(), password: "Secret123!".into() };
    /// let resp = tokio_test::block_on(svc.register(input)).unwrap();
    /// assert_eq!(resp.data(), Some(&1));
    /// ```
    #[instrument(skip(self, input), fields(username = %input.username))]
    pub async fn register(&self, input: RegisterInput) -> Result<ServiceResponse<UserId>, AuthError> {
        let outcome = self.try_register(input).await;
        match &outcome {
            Ok(id) => info!(user_id = id, "user_registered"),
            Err(e) => warn!(code = e.code(), error = %e, "register_failed"),
        }
        envelope(outcome)
    }

    /// Check credentials and return the user's id.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockCredentialStore};
    /// use service::auth::domain::{RegisterInput, LoginInput};
    /// use std::sync::Arc;
    /// let svc = AuthService::new(Arc::new(MockCredentialStore::default()), AuthConfig::default()).unwrap();
    /// let _ = tokio_test::block_on(svc.register(RegisterInput { username: "alice".into(), password: "Secret123!".into() }));
    /// let ok = tokio_test::block_on(svc.login(LoginInput { username: "alice".into(), password: "Secret123!".into() })).unwrap();
    /// assert!(ok.is_success());
    /// let bad = tokio_test::block_on(svc.login(LoginInput { username: "alice".into(), password: "wrong".into() })).unwrap();
    /// assert_eq!(bad.message(), "Wrong password");
    /// ```
    #[instrument(skip(self, input), fields(username = %input.username))]
    pub async fn login(&self, input: LoginInput) -> Result<ServiceResponse<UserId>, AuthError> {
        let outcome = self.try_login(input).await;
        match &outcome {
            Ok(id) => info!(user_id = id, "user_logged_in"),
            Err(e) => warn!(code = e.code(), error = %e, "login_failed"),
        }
        let outcome = match outcome {
            Err(AuthError::NotFound | AuthError::WrongPassword) if self.cfg.hardened_login => {
                return Ok(ServiceResponse::failure(GENERIC_LOGIN_FAILURE));
            }
            other => other,
        };
        envelope(outcome)
    }

    #[instrument(skip(self))]
    pub async fn get_user(&self, id: UserId) -> Result<Option<User>, AuthError> {
        self.store.get_by_id(id).await
    }

    fn validate(&self, input: &RegisterInput) -> Result<(), AuthError> {
        let username = input.username.trim();
        if username.is_empty() {
            return Err(AuthError::Validation("Username must not be empty".into()));
        }
        if username.chars().count() > USERNAME_MAX_LEN {
            return Err(AuthError::Validation(format!("Username must be at most {USERNAME_MAX_LEN} characters")));
        }
        if input.password.is_empty() {
            return Err(AuthError::Validation("Password must not be empty".into()));
        }
        if input.password.chars().count() < self.cfg.min_password_len {
            return Err(AuthError::Validation(format!(
                "Password must be at least {} characters",
                self.cfg.min_password_len
            )));
        }
        Ok(())
    }

    async fn try_register(&self, input: RegisterInput) -> Result<UserId, AuthError> {
        self.validate(&input)?;
        let digest = self.hash_blocking(input.password).await?;
        self.store.create(&input.username, &digest.hash, &digest.salt).await
    }

    async fn try_login(&self, input: LoginInput) -> Result<UserId, AuthError> {
        let Some(user) = self.store.get_by_username(&input.username).await? else {
            if self.cfg.hardened_login {
                self.burn_blocking(input.password).await?;
            }
            return Err(AuthError::NotFound);
        };
        let matched = self.verify_blocking(input.password, user.password_hash, user.password_salt).await?;
        if !matched {
            return Err(AuthError::WrongPassword);
        }
        debug!(user_id = user.id, "password verified");
        Ok(user.id)
    }

    // Argon2 is CPU-bound on purpose; keep it off the async workers.
    async fn hash_blocking(&self, password: String) -> Result<PasswordDigest, AuthError> {
        let kdf = Arc::clone(&self.kdf);
        tokio::task::spawn_blocking(move || kdf.hash(&password))
            .await
            .map_err(|e| AuthError::Hash(format!("hash task failed: {e}")))?
    }

    async fn verify_blocking(&self, password: String, hash: String, salt: String) -> Result<bool, AuthError> {
        let kdf = Arc::clone(&self.kdf);
        tokio::task::spawn_blocking(move || kdf.verify(&password, &hash, &salt))
            .await
            .map_err(|e| AuthError::Hash(format!("verify task failed: {e}")))?
    }

    async fn burn_blocking(&self, password: String) -> Result<(), AuthError> {
        let kdf = Arc::clone(&self.kdf);
        tokio::task::spawn_blocking(move || kdf.burn(&password))
            .await
            .map_err(|e| AuthError::Hash(format!("burn task failed: {e}")))?
    }
}

#[async_trait]
impl<S: CredentialStore> Authenticator for AuthService<S> {
    async fn register(&self, input: RegisterInput) -> Result<ServiceResponse<UserId>, AuthError> {
        AuthService::register(self, input).await
    }

    async fn login(&self, input: LoginInput) -> Result<ServiceResponse<UserId>, AuthError> {
        AuthService::login(self, input).await
    }

    async fn get_user(&self, id: UserId) -> Result<Option<User>, AuthError> {
        AuthService::get_user(self, id).await
    }
}
