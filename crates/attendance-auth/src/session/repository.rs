//! Session persistence behind a pluggable trait.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;

use attendance_core::config::SessionConfig;
use attendance_core::result::AppResult;

use super::model::{ApplicationSession, SessionId};

/// Storage for application sessions, keyed by session id.
#[async_trait]
pub trait SessionRepository: Send + Sync + std::fmt::Debug + 'static {
    /// Look up a live session.
    async fn get(&self, id: &SessionId) -> AppResult<Option<ApplicationSession>>;

    /// Store (or replace) a session.
    async fn set(&self, session: ApplicationSession) -> AppResult<()>;

    /// Forget a session. Unknown ids are ignored.
    async fn destroy(&self, id: &SessionId) -> AppResult<()>;
}

/// In-memory repository with a fixed time-to-live.
#[derive(Debug, Clone)]
pub struct MemorySessionRepository {
    /// Sessions by raw id.
    cache: Cache<String, Arc<ApplicationSession>>,
}

impl MemorySessionRepository {
    /// Create a repository from configuration.
    pub fn new(config: &SessionConfig) -> Self {
        Self::with_ttl(
            Duration::from_secs(config.ttl_hours * 3600),
            config.max_capacity,
        )
    }

    /// Create a repository with an explicit lifetime and capacity.
    pub fn with_ttl(ttl: Duration, max_capacity: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(ttl)
            .build();
        Self { cache }
    }

    /// Number of sessions currently held (approximate).
    pub fn len(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Whether no sessions are held (approximate).
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl SessionRepository for MemorySessionRepository {
    async fn get(&self, id: &SessionId) -> AppResult<Option<ApplicationSession>> {
        Ok(self
            .cache
            .get(id.as_str())
            .await
            .map(|s| s.as_ref().clone()))
    }

    async fn set(&self, session: ApplicationSession) -> AppResult<()> {
        self.cache
            .insert(session.id.as_str().to_string(), Arc::new(session))
            .await;
        Ok(())
    }

    async fn destroy(&self, id: &SessionId) -> AppResult<()> {
        self.cache.invalidate(id.as_str()).await;
        Ok(())
    }
}
