use async_trait::async_trait;

use super::domain::{User, UserId};
use super::errors::AuthError;

/// Persistence for credential records.
///
/// Implementations own username uniqueness: `create` must check and insert
/// atomically, so concurrent calls with the same normalized username yield
/// exactly one id and `DuplicateUsername` for every other caller. Lookups
/// return `Ok(None)` for unknown keys; only an unreachable backend is an
/// error (`StorageUnavailable`).
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn create(&self, username: &str, password_hash: &str, password_salt: &str) -> Result<UserId, AuthError>;
    async fn get_by_id(&self, id: UserId) -> Result<Option<User>, AuthError>;
    async fn get_by_username(&self, username: &str) -> Result<Option<User>, AuthError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Mutex, MutexGuard};

    use chrono::Utc;

    use crate::auth::domain::UsernamePolicy;

    #[derive(Default)]
    struct State {
        users: HashMap<UserId, User>,
        by_key: HashMap<String, UserId>, // key: normalized username
        last_id: UserId,
    }

    #[derive(Default)]
    pub struct MockCredentialStore {
        policy: UsernamePolicy,
        state: Mutex<State>,
        unavailable: AtomicBool,
    }

    impl MockCredentialStore {
        pub fn new(policy: UsernamePolicy) -> Self {
            Self { policy, ..Self::default() }
        }

        /// Make every call fail as if the backend were unreachable.
        pub fn set_unavailable(&self, down: bool) {
            self.unavailable.store(down, Ordering::SeqCst);
        }

        pub fn len(&self) -> usize {
            self.state.lock().map(|s| s.users.len()).unwrap_or_default()
        }

        pub fn is_empty(&self) -> bool {
            self.len() == 0
        }

        fn state(&self) -> Result<MutexGuard<'_, State>, AuthError> {
            if self.unavailable.load(Ordering::SeqCst) {
                return Err(AuthError::StorageUnavailable("mock store offline".into()));
            }
            self.state.lock().map_err(|_| AuthError::StorageUnavailable("mock store poisoned".into()))
        }
    }

    #[async_trait]
    impl CredentialStore for MockCredentialStore {
        async fn create(&self, username: &str, password_hash: &str, password_salt: &str) -> Result<UserId, AuthError> {
            let key = self.policy.key(username);
            let mut state = self.state()?;
            if state.by_key.contains_key(&key) {
                return Err(AuthError::DuplicateUsername);
            }
            state.last_id += 1;
            let id = state.last_id;
            let user = User {
                id,
                username: username.trim().to_string(),
                password_hash: password_hash.to_string(),
                password_salt: password_salt.to_string(),
                created_at: Utc::now(),
            };
            state.by_key.insert(key, id);
            state.users.insert(id, user);
            Ok(id)
        }

        async fn get_by_id(&self, id: UserId) -> Result<Option<User>, AuthError> {
            Ok(self.state()?.users.get(&id).cloned())
        }

        async fn get_by_username(&self, username: &str) -> Result<Option<User>, AuthError> {
            let key = self.policy.key(username);
            let state = self.state()?;
            Ok(state.by_key.get(&key).and_then(|id| state.users.get(id)).cloned())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn ids_are_sequential_from_one() {
            let store = MockCredentialStore::default();
            assert_eq!(store.create("alice", "h", "s").await.unwrap(), 1);
            assert_eq!(store.create("bob", "h", "s").await.unwrap(), 2);
            assert_eq!(store.len(), 2);
        }

        #[tokio::test]
        async fn duplicate_respects_policy() {
            let insensitive = MockCredentialStore::new(UsernamePolicy::CaseInsensitive);
            insensitive.create("alice", "h", "s").await.unwrap();
            assert!(matches!(insensitive.create("ALICE", "h", "s").await, Err(AuthError::DuplicateUsername)));

            let sensitive = MockCredentialStore::new(UsernamePolicy::CaseSensitive);
            sensitive.create("alice", "h", "s").await.unwrap();
            assert_eq!(sensitive.create("ALICE", "h", "s").await.unwrap(), 2);
        }

        #[tokio::test]
        async fn offline_store_reports_unavailable() {
            let store = MockCredentialStore::default();
            store.set_unavailable(true);
            assert!(matches!(store.get_by_id(1).await, Err(AuthError::StorageUnavailable(_))));
            store.set_unavailable(false);
            assert!(store.get_by_id(1).await.unwrap().is_none());
            assert!(store.is_empty());
        }
    }
}
