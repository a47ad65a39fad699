//! Event service: record scans and list them newest first.

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::info;

use attendance_auth::CredentialResolver;
use attendance_core::error::AppError;
use attendance_core::result::AppResult;
use attendance_core::types::{FindQuery, Page, PageCursor, PageLimit, SortField};
use attendance_entity::event::model::EVENT_KIND;
use attendance_entity::event::{EventRecord, sort_newest_first};

use crate::context::RequestContext;
use crate::query::QueryExecutor;

/// Optional equality filters for the event listing.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Only events of this type code.
    pub type_code: Option<String>,
    /// Only events recorded by this user.
    pub created_by: Option<String>,
}

impl EventFilter {
    /// The store selector for this filter. Blank values are ignored.
    pub fn selector(&self) -> Map<String, Value> {
        let mut selector = Map::new();
        selector.insert("kind".into(), Value::from(EVENT_KIND));
        if let Some(t) = self.type_code.as_deref().filter(|t| !t.is_empty()) {
            selector.insert("type".into(), Value::from(t));
        }
        if let Some(c) = self.created_by.as_deref().filter(|c| !c.is_empty()) {
            selector.insert("createdBy".into(), Value::from(c));
        }
        selector
    }
}

/// Records and lists scan events with the caller's own store credential.
#[derive(Debug, Clone)]
pub struct EventService {
    /// Credential resolver.
    resolver: Arc<CredentialResolver>,
    /// Query strategy.
    executor: QueryExecutor,
}

impl EventService {
    /// Creates a new event service.
    pub fn new(resolver: Arc<CredentialResolver>) -> Self {
        Self {
            resolver,
            executor: QueryExecutor::new(),
        }
    }

    /// Lists one page of events, newest first.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        filter: &EventFilter,
        limit: PageLimit,
        cursor: Option<PageCursor>,
    ) -> AppResult<Page<EventRecord>> {
        let client = self.resolver.user_client(&ctx.session);
        let query = FindQuery::new(filter.selector())
            .sorted_by(vec![SortField::desc("ts")])
            .with_limit(limit)
            .with_bookmark(cursor);

        self.executor
            .page(&client, &query, EventRecord::from_document, sort_newest_first)
            .await
    }

    /// Records a new event attributed to the caller.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        type_code: &str,
        payload: &str,
    ) -> AppResult<EventRecord> {
        let type_code = type_code.trim();
        if type_code.is_empty() || payload.is_empty() {
            return Err(AppError::validation("type and qrData required"));
        }

        let client = self.resolver.user_client(&ctx.session);
        let event = EventRecord::new(type_code, payload, ctx.user_name());
        client.put(&event.id, &event.to_document()).await?;

        info!(
            event_id = %event.id,
            event_type = %event.type_code,
            user = %ctx.user_name(),
            "Event recorded"
        );
        Ok(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use attendance_auth::SessionBridge;
    use attendance_auth::session::MemorySessionRepository;
    use attendance_core::config::{SessionConfig, StoreConfig};
    use attendance_core::error::ErrorKind;
    use attendance_store::memory::MemoryDocumentStore;
    use serde_json::json;

    async fn setup() -> (EventService, RequestContext) {
        let store = Arc::new(
            MemoryDocumentStore::new()
                .with_database("attendance")
                .with_user("bob", "pw", &["staff"]),
        );
        let config = StoreConfig {
            url: "memory://".into(),
            ..Default::default()
        };
        let resolver = Arc::new(CredentialResolver::new(store.clone(), &config));
        let bridge = SessionBridge::new(
            store,
            Arc::new(MemorySessionRepository::new(&SessionConfig::default())),
        );
        let session = bridge.login("bob", "pw").await.unwrap();
        (EventService::new(resolver), RequestContext::new(session))
    }

    #[test]
    fn test_filter_selector_skips_blank_values() {
        let filter = EventFilter {
            type_code: Some("in".into()),
            created_by: Some(String::new()),
        };
        assert_eq!(
            Value::Object(filter.selector()),
            json!({ "kind": "event", "type": "in" })
        );
    }

    #[tokio::test]
    async fn test_create_then_list() {
        let (service, ctx) = setup().await;
        let first = service.create(&ctx, "in", "badge-1").await.unwrap();
        let second = service.create(&ctx, "out", "badge-1").await.unwrap();
        assert_eq!(first.created_by, "bob");

        let page = service
            .list(&ctx, &EventFilter::default(), PageLimit::default(), None)
            .await
            .unwrap();
        let ids: Vec<&str> = page.rows.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids.len(), 2);
        assert!(page.rows[0].timestamp >= page.rows[1].timestamp);
        assert!(ids.contains(&first.id.as_str()) && ids.contains(&second.id.as_str()));

        let only_out = service
            .list(
                &ctx,
                &EventFilter {
                    type_code: Some("out".into()),
                    created_by: None,
                },
                PageLimit::default(),
                None,
            )
            .await
            .unwrap();
        assert_eq!(only_out.rows.len(), 1);
        assert_eq!(only_out.rows[0].id, second.id);
    }

    #[tokio::test]
    async fn test_create_requires_type_and_payload() {
        let (service, ctx) = setup().await;
        let err = service.create(&ctx, "in", "").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        let err = service.create(&ctx, " ", "x").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }
}
