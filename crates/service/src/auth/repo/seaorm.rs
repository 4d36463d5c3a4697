use chrono::Utc;
use sea_orm::DatabaseConnection;
use tracing::debug;

use crate::auth::domain::{User, UserId, UsernamePolicy};
use crate::auth::errors::AuthError;
use crate::auth::repository::CredentialStore;

/// Credential store over the `app_user` table.
///
/// Duplicate detection relies on the unique index on `username_key`; the
/// insert itself is the compare-and-insert, so there is no read-then-write
/// window between two registrations.
pub struct SeaOrmCredentialStore {
    pub db: DatabaseConnection,
    pub policy: UsernamePolicy,
}

impl SeaOrmCredentialStore {
    pub fn new(db: DatabaseConnection, policy: UsernamePolicy) -> Self { Self { db, policy } }
}

impl From<models::app_user::Model> for User {
    fn from(m: models::app_user::Model) -> Self {
        User {
            id: m.id,
            username: m.username,
            password_hash: m.password_hash,
            password_salt: m.password_salt,
            created_at: m.created_at.with_timezone(&Utc),
        }
    }
}

#[async_trait::async_trait]
impl CredentialStore for SeaOrmCredentialStore {
    async fn create(&self, username: &str, password_hash: &str, password_salt: &str) -> Result<UserId, AuthError> {
        let key = self.policy.key(username);
        let created = models::app_user::create(&self.db, username.trim(), &key, password_hash, password_salt).await?;
        debug!(user_id = created.id, "credential row inserted");
        Ok(created.id)
    }

    async fn get_by_id(&self, id: UserId) -> Result<Option<User>, AuthError> {
        let res = models::app_user::find_by_id(&self.db, id).await?;
        Ok(res.map(User::from))
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>, AuthError> {
        let res = models::app_user::find_by_username_key(&self.db, &self.policy.key(username)).await?;
        Ok(res.map(User::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::memory_db;

    #[tokio::test]
    async fn create_then_lookup() -> anyhow::Result<()> {
        let store = SeaOrmCredentialStore::new(memory_db().await?, UsernamePolicy::CaseInsensitive);
        let id = store.create(" Alice ", "aGFzaA==", "c2FsdA==").await?;
        assert_eq!(id, 1);

        let by_id = store.get_by_id(id).await?.expect("user by id");
        assert_eq!(by_id.username, "Alice");
        assert_eq!(by_id.password_salt, "c2FsdA==");

        let by_name = store.get_by_username("ALICE").await?.expect("user by name");
        assert_eq!(by_name, by_id);
        Ok(())
    }

    #[tokio::test]
    async fn unknown_keys_are_none() -> anyhow::Result<()> {
        let store = SeaOrmCredentialStore::new(memory_db().await?, UsernamePolicy::default());
        assert!(store.get_by_id(999).await?.is_none());
        assert!(store.get_by_username("ghost").await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected() -> anyhow::Result<()> {
        let store = SeaOrmCredentialStore::new(memory_db().await?, UsernamePolicy::CaseInsensitive);
        store.create("alice", "aA==", "cw==").await?;
        let err = store.create("Alice", "aA==", "cw==").await.unwrap_err();
        assert!(matches!(err, AuthError::DuplicateUsername), "got {err:?}");
        Ok(())
    }

    #[tokio::test]
    async fn case_sensitive_policy_keeps_both() -> anyhow::Result<()> {
        let store = SeaOrmCredentialStore::new(memory_db().await?, UsernamePolicy::CaseSensitive);
        let a = store.create("alice", "aA==", "cw==").await?;
        let b = store.create("Alice", "aA==", "cw==").await?;
        assert_ne!(a, b);
        assert_eq!(store.get_by_username("Alice").await?.map(|u| u.id), Some(b));
        Ok(())
    }

    #[tokio::test]
    async fn closed_connection_is_storage_unavailable() -> anyhow::Result<()> {
        let db = memory_db().await?;
        let store = SeaOrmCredentialStore::new(db.clone(), UsernamePolicy::default());
        db.close().await?;
        assert!(matches!(store.get_by_id(1).await, Err(AuthError::StorageUnavailable(_))));
        Ok(())
    }
}
