//! Registration and login

use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::{
    error::{AppError, AppResult},
    models::user::{Credential, LoginResponse},
    repository::{Store, Transaction},
};

use super::tokens::TokenIssuer;

#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn Store>,
    tokens: TokenIssuer,
    hasher: Argon2<'static>,
    default_role: String,
}

impl AuthService {
    pub fn new(store: Arc<dyn Store>, tokens: TokenIssuer, hasher: Argon2<'static>, default_role: String) -> Self {
        Self {
            store,
            tokens,
            hasher,
            default_role,
        }
    }

    /// Store a new credential with the default role
    pub async fn register(&self, username: &str, password: &str) -> AppResult<i32> {
        let password_hash = self.hash_password(password)?;

        let mut tx = Transaction::begin(self.store.as_ref(), "auth.register").await?;
        let result: AppResult<_> = async {
            let uow = tx.uow();
            if uow.users_get_by_username(username).await?.is_some() {
                return Err(AppError::Conflict("Username already exists".to_string()));
            }
            uow.users_create(username, &password_hash, &self.default_role).await
        }
        .await;
        let id = tx.finish(result).await?;

        tracing::info!(user_id = id, username, "user registered");
        Ok(id)
    }

    /// Check the password and issue a session token
    pub async fn login(&self, username: &str, password: &str) -> AppResult<LoginResponse> {
        let mut tx = Transaction::begin(self.store.as_ref(), "auth.login").await?;
        let result = tx.uow().users_get_by_username(username).await;
        let credential = tx
            .finish(result)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        if !self.verify_password(&credential, password)? {
            tracing::warn!(username, "login rejected");
            return Err(AppError::InvalidCredentials);
        }

        let token = self.tokens.issue(&credential)?;
        tracing::info!(user_id = credential.id, "token issued");

        Ok(LoginResponse {
            token,
            token_type: "Bearer".to_string(),
            expires_in: self.tokens.ttl().num_seconds(),
        })
    }

    fn verify_password(&self, credential: &Credential, password: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(&credential.password_hash)
            .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
        Ok(self
            .hasher
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .hasher
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        clock::ManualClock,
        repository::MemoryStore,
        services::tokens::TokenError,
    };
    use argon2::{Algorithm, Params, Version};
    use chrono::{Duration, Utc};

    fn cheap_hasher() -> Argon2<'static> {
        let params = Params::new(8, 1, 1, None).unwrap();
        Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
    }

    fn service() -> (AuthService, MemoryStore, ManualClock) {
        let memory = MemoryStore::new();
        let clock = ManualClock::new(Utc::now());
        let tokens = TokenIssuer::new("secret", "eFilm APIs", Duration::hours(1), Arc::new(clock.clone()));
        let service = AuthService::new(Arc::new(memory.clone()), tokens, cheap_hasher(), "Member".to_string());
        (service, memory, clock)
    }

    #[tokio::test]
    async fn test_register_twice_is_conflict() {
        let (service, memory, _) = service();
        service.register("dimas", "secret123").await.unwrap();

        let err = service.register("dimas", "other-password").await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(memory.write_count(), 1);
    }

    #[tokio::test]
    async fn test_password_is_stored_hashed() {
        let (service, memory, _) = service();
        service.register("dimas", "secret123").await.unwrap();

        let mut uow = memory.begin().await.unwrap();
        let credential = uow.users_get_by_username("dimas").await.unwrap().unwrap();
        assert_ne!(credential.password_hash, "secret123");
        assert!(credential.password_hash.starts_with("$argon2id$"));
        assert_eq!(credential.role, "Member");
    }

    #[tokio::test]
    async fn test_login_issues_token_that_expires() {
        let (service, _, clock) = service();
        service.register("dimas", "secret123").await.unwrap();

        let login = service.login("dimas", "secret123").await.unwrap();
        assert_eq!(login.expires_in, 3600);
        let claims = service.tokens.validate(&login.token).unwrap();
        assert_eq!(claims.username, "dimas");

        clock.advance(Duration::hours(1) + Duration::seconds(1));
        assert_eq!(service.tokens.validate(&login.token), Err(TokenError::Expired));
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let (service, _, _) = service();
        service.register("dimas", "secret123").await.unwrap();

        let err = service.login("dimas", "wrong-password").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_login_unknown_user() {
        let (service, _, _) = service();
        let err = service.login("nobody", "secret123").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
