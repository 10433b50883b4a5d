use std::sync::Arc;

use tokio::sync::OnceCell;

use crate::auth::password;
use crate::auth::session::{MemorySessionStore, SessionStore};
use crate::config::Config;
use crate::error::AppResult;
use crate::registry::{MemoryUserStore, UserStore};

const DUMMY_PASSWORD: &str = "wallfeed-unknown-user";

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub users: Arc<dyn UserStore>,
    pub sessions: Arc<dyn SessionStore>,
    pub(crate) dummy_hash: Arc<OnceCell<String>>,
}

impl AppState {
    /// State backed by the in-memory registry and session store.
    pub fn new(config: Config) -> Self {
        let sessions = Arc::new(MemorySessionStore::new(config.session_ttl()));
        Self::with_stores(config, Arc::new(MemoryUserStore::new()), sessions)
    }

    pub fn with_stores(
        config: Config,
        users: Arc<dyn UserStore>,
        sessions: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            config,
            users,
            sessions,
            dummy_hash: Arc::new(OnceCell::new()),
        }
    }

    /// A hash at the configured cost that no submitted password is checked
    /// against for real. Login verifies unknown usernames against it.
    pub async fn dummy_hash(&self) -> AppResult<String> {
        let hash = self
            .dummy_hash
            .get_or_try_init(|| {
                password::hash_password(DUMMY_PASSWORD.to_string(), self.config.auth.bcrypt_cost)
            })
            .await?;
        Ok(hash.clone())
    }
}
