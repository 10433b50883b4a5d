use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::models::{NewUser, User};

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Username already exists")]
    UsernameTaken,

    #[error("Registry backend error: {0}")]
    Backend(String),
}

/// Account storage keyed by unique username.
///
/// Handlers only see this trait through `AppState`, so a persistent backend
/// can replace [`MemoryUserStore`] without touching them.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RegistryError>;

    /// Insert a new account, assigning its id. Fails with
    /// [`RegistryError::UsernameTaken`] if the username is already present.
    async fn insert(&self, new_user: NewUser) -> Result<User, RegistryError>;

    async fn count(&self) -> Result<usize, RegistryError>;
}

/// In-memory registry. Ids are sequential from 1 and never reused.
pub struct MemoryUserStore {
    inner: RwLock<Accounts>,
}

struct Accounts {
    by_username: HashMap<String, User>,
    next_id: u64,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Accounts {
                by_username: HashMap::new(),
                next_id: 1,
            }),
        }
    }
}

impl Default for MemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RegistryError> {
        let accounts = self.inner.read().await;
        Ok(accounts.by_username.get(username).cloned())
    }

    async fn insert(&self, new_user: NewUser) -> Result<User, RegistryError> {
        // Check and insert under the same write guard.
        let mut accounts = self.inner.write().await;
        if accounts.by_username.contains_key(&new_user.username) {
            return Err(RegistryError::UsernameTaken);
        }

        let user = User {
            id: accounts.next_id,
            username: new_user.username,
            password_hash: new_user.password_hash,
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            profile_image: new_user.profile_image,
        };
        accounts.next_id += 1;
        accounts
            .by_username
            .insert(user.username.clone(), user.clone());

        tracing::debug!("Registered user {} with id {}", user.username, user.id);
        Ok(user)
    }

    async fn count(&self) -> Result<usize, RegistryError> {
        Ok(self.inner.read().await.by_username.len())
    }
}
