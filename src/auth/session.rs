use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::models::PublicUser;

/// Floor for the sweep period; `tokio::time::interval` rejects zero.
const MIN_SWEEP_PERIOD: StdDuration = StdDuration::from_millis(10);

/// A live login. Holds the password-free user record only.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user: PublicUser,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Session backend error: {0}")]
    Backend(String),
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Issue a fresh session for `user`.
    async fn create(&self, user: PublicUser) -> Result<Session, SessionError>;

    /// Look up a session. Expired entries are removed and reported as absent.
    async fn get(&self, token: &str) -> Result<Option<Session>, SessionError>;

    /// Remove a session. Returns whether it existed.
    async fn destroy(&self, token: &str) -> Result<bool, SessionError>;

    /// Drop every expired entry, returning how many went.
    async fn sweep_expired(&self) -> Result<usize, SessionError>;

    async fn len(&self) -> Result<usize, SessionError>;
}

/// In-memory session map with a fixed lifetime per entry. Unbounded.
pub struct MemorySessionStore {
    sessions: Mutex<HashMap<String, Session>>,
    ttl: Duration,
}

impl MemorySessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            ttl,
        }
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(&self, user: PublicUser) -> Result<Session, SessionError> {
        let session = Session {
            token: generate_token(),
            user,
            expires_at: Utc::now() + self.ttl,
        };

        let mut sessions = self.sessions.lock().await;
        sessions.insert(session.token.clone(), session.clone());
        Ok(session)
    }

    async fn get(&self, token: &str) -> Result<Option<Session>, SessionError> {
        let mut sessions = self.sessions.lock().await;
        let expired = match sessions.get(token) {
            Some(session) => session.is_expired_at(Utc::now()),
            None => return Ok(None),
        };

        if expired {
            tracing::debug!("Rejecting expired session");
            sessions.remove(token);
            return Ok(None);
        }
        Ok(sessions.get(token).cloned())
    }

    async fn destroy(&self, token: &str) -> Result<bool, SessionError> {
        Ok(self.sessions.lock().await.remove(token).is_some())
    }

    async fn sweep_expired(&self) -> Result<usize, SessionError> {
        let now = Utc::now();
        let mut sessions = self.sessions.lock().await;
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired_at(now));
        Ok(before - sessions.len())
    }

    async fn len(&self) -> Result<usize, SessionError> {
        Ok(self.sessions.lock().await.len())
    }
}

/// Periodically prune expired sessions. Lookups reject expired entries on
/// their own, so this only bounds memory.
pub fn spawn_sweeper(store: Arc<dyn SessionStore>, period: StdDuration) -> JoinHandle<()> {
    let period = period.max(MIN_SWEEP_PERIOD);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            match store.sweep_expired().await {
                Ok(0) => {}
                Ok(removed) => tracing::info!("Swept {} expired sessions", removed),
                Err(e) => tracing::warn!("Session sweep failed: {}", e),
            }
        }
    })
}

/// Generate a cryptographically random 32-byte hex token.
fn generate_token() -> String {
    let mut rng = rand::thread_rng();
    let bytes: [u8; 32] = rng.gen();
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> PublicUser {
        PublicUser {
            id: 1,
            username: "a@b.com".to_string(),
            first_name: Some("A".to_string()),
            last_name: Some("B".to_string()),
            profile_image: None,
        }
    }

    #[test]
    fn generate_token_is_64_hex_chars() {
        let token = generate_token();
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn generate_token_is_unique() {
        let t1 = generate_token();
        let t2 = generate_token();
        assert_ne!(t1, t2);
    }

    #[tokio::test]
    async fn create_then_get_returns_the_user() {
        let store = MemorySessionStore::new(Duration::hours(24));
        let session = store.create(user()).await.unwrap();

        let found = store.get(&session.token).await.unwrap().unwrap();
        assert_eq!(found.user, user());
        assert!(found.expires_at > Utc::now() + Duration::hours(23));
    }

    #[tokio::test]
    async fn unknown_token_is_absent() {
        let store = MemorySessionStore::new(Duration::hours(24));
        assert!(store.get("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn destroy_removes_the_session() {
        let store = MemorySessionStore::new(Duration::hours(24));
        let session = store.create(user()).await.unwrap();

        assert!(store.destroy(&session.token).await.unwrap());
        assert!(store.get(&session.token).await.unwrap().is_none());
        assert!(!store.destroy(&session.token).await.unwrap());
    }

    #[tokio::test]
    async fn expired_session_is_rejected_on_lookup() {
        let store = MemorySessionStore::new(Duration::zero());
        let session = store.create(user()).await.unwrap();

        assert!(store.get(&session.token).await.unwrap().is_none());
        assert_eq!(store.len().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn sweep_drops_only_expired_entries() {
        let expired = MemorySessionStore::new(Duration::zero());
        expired.create(user()).await.unwrap();
        expired.create(user()).await.unwrap();
        assert_eq!(expired.sweep_expired().await.unwrap(), 2);
        assert_eq!(expired.len().await.unwrap(), 0);

        let live = MemorySessionStore::new(Duration::hours(1));
        live.create(user()).await.unwrap();
        assert_eq!(live.sweep_expired().await.unwrap(), 0);
        assert_eq!(live.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn sessions_for_the_same_user_are_independent() {
        let store = MemorySessionStore::new(Duration::hours(1));
        let first = store.create(user()).await.unwrap();
        let second = store.create(user()).await.unwrap();
        assert_ne!(first.token, second.token);

        store.destroy(&first.token).await.unwrap();
        assert!(store.get(&second.token).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn sweeper_prunes_in_the_background() {
        let store: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::new(Duration::zero()));
        store.create(user()).await.unwrap();
        assert_eq!(store.len().await.unwrap(), 1);

        let handle = spawn_sweeper(store.clone(), StdDuration::from_millis(20));
        tokio::time::sleep(StdDuration::from_millis(150)).await;
        handle.abort();

        assert_eq!(store.len().await.unwrap(), 0);
    }
}
