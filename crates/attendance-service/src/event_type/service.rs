//! Event type service: public listing and admin CRUD.

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value, json};
use tracing::info;

use attendance_auth::{CredentialResolver, RoleEnforcer, ScopedClient};
use attendance_core::error::{AppError, ErrorKind};
use attendance_core::result::AppResult;
use attendance_core::types::{FindQuery, PageCursor, PageLimit, SortField};
use attendance_entity::event_type::model::EVENT_TYPE_KIND;
use attendance_entity::event_type::{EventTypeCode, EventTypeRecord, sort_by_name};

use crate::context::RequestContext;
use crate::query::QueryExecutor;

/// Upper bound on pages fetched for a full catalogue listing.
const MAX_LISTING_PAGES: usize = 50;

/// Request to create an event type.
#[derive(Debug, Clone, Default)]
pub struct NewEventType {
    /// Raw code as submitted.
    pub code: String,
    /// Display name; the code is used when absent or blank.
    pub name: Option<String>,
    /// Whether the type is offered to users; defaults to `true`.
    pub active: Option<bool>,
}

/// Partial update of an event type. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct EventTypePatch {
    /// New display name; blank resets it to the code.
    pub name: Option<String>,
    /// New active flag.
    pub active: Option<bool>,
}

/// Manages the event type catalogue.
#[derive(Debug, Clone)]
pub struct EventTypeService {
    /// Credential resolver.
    resolver: Arc<CredentialResolver>,
    /// Role enforcer for admin operations.
    roles: Arc<RoleEnforcer>,
    /// Query strategy.
    executor: QueryExecutor,
}

impl EventTypeService {
    /// Creates a new event type service.
    pub fn new(resolver: Arc<CredentialResolver>, roles: Arc<RoleEnforcer>) -> Self {
        Self {
            resolver,
            roles,
            executor: QueryExecutor::new(),
        }
    }

    /// Active types only, by name.
    pub async fn list_active(&self, ctx: &RequestContext) -> AppResult<Vec<EventTypeRecord>> {
        let mut selector = Map::new();
        selector.insert("kind".into(), Value::from(EVENT_TYPE_KIND));
        selector.insert("active".into(), json!({ "$ne": false }));
        self.list(ctx, selector).await
    }

    /// Every type including inactive ones, by name. Admin only.
    pub async fn list_all(&self, ctx: &RequestContext) -> AppResult<Vec<EventTypeRecord>> {
        self.roles.require_admin(&ctx.session)?;
        let mut selector = Map::new();
        selector.insert("kind".into(), Value::from(EVENT_TYPE_KIND));
        self.list(ctx, selector).await
    }

    /// Creates a type. Admin only; an existing code is a `Conflict`.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        req: NewEventType,
    ) -> AppResult<EventTypeRecord> {
        self.roles.require_admin(&ctx.session)?;
        let code = EventTypeCode::parse(&req.code)?;

        let doc = EventTypeRecord::new_document(
            &code,
            req.name.as_deref(),
            req.active.unwrap_or(true),
            &now(),
        );
        let client = self.resolver.user_client(&ctx.session);
        client.put(&code.document_id(), &doc).await.map_err(|e| {
            if e.kind == ErrorKind::Conflict {
                AppError::conflict("Type exists").with_backend_status(409)
            } else {
                e
            }
        })?;

        info!(code = %code, user = %ctx.user_name(), "Event type created");
        EventTypeRecord::from_document(&doc)
            .ok_or_else(|| AppError::internal("Created event type could not be read back"))
    }

    /// Applies a partial update. Admin only.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        code: &str,
        patch: EventTypePatch,
    ) -> AppResult<EventTypeRecord> {
        self.roles.require_admin(&ctx.session)?;
        let code = existing_code(code)?;
        let client = self.resolver.user_client(&ctx.session);

        let mut doc = fetch(&client, &code).await?;
        let Some(fields) = doc.as_object_mut() else {
            return Err(AppError::internal("Event type document is not an object"));
        };
        if let Some(name) = patch.name {
            let name = name.trim();
            let name = if name.is_empty() { code.as_str() } else { name };
            fields.insert("name".into(), Value::from(name));
        }
        if let Some(active) = patch.active {
            fields.insert("active".into(), Value::from(active));
        }
        fields.insert("updatedAt".into(), Value::from(now()));

        client.put(&code.document_id(), &doc).await?;
        info!(code = %code, user = %ctx.user_name(), "Event type updated");

        EventTypeRecord::from_document(&doc)
            .ok_or_else(|| AppError::internal("Updated event type could not be read back"))
    }

    /// Deletes a type. Admin only.
    pub async fn delete(&self, ctx: &RequestContext, code: &str) -> AppResult<()> {
        self.roles.require_admin(&ctx.session)?;
        let code = existing_code(code)?;
        let client = self.resolver.user_client(&ctx.session);

        let doc = fetch(&client, &code).await?;
        let rev = doc
            .get("_rev")
            .and_then(Value::as_str)
            .ok_or_else(|| AppError::internal("Event type document has no revision"))?;
        client.delete(&code.document_id(), rev).await?;

        info!(code = %code, user = %ctx.user_name(), "Event type deleted");
        Ok(())
    }

    /// Follow bookmarks until the catalogue is exhausted, then sort by name.
    async fn list(
        &self,
        ctx: &RequestContext,
        selector: Map<String, Value>,
    ) -> AppResult<Vec<EventTypeRecord>> {
        let client = self.resolver.user_client(&ctx.session);
        let base = FindQuery::new(selector)
            .sorted_by(vec![SortField::asc("name")])
            .with_limit(PageLimit::clamped(i64::MAX))
            .with_fields(&["_id", "code", "name", "active"]);

        let mut records = Vec::new();
        let mut cursor: Option<PageCursor> = None;
        for _ in 0..MAX_LISTING_PAGES {
            let query = base.clone().with_bookmark(cursor.take());
            let page = self
                .executor
                .page(&client, &query, EventTypeRecord::from_document, |_| {})
                .await?;
            records.extend(page.rows);
            match page.next_cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        sort_by_name(&mut records);
        Ok(records)
    }
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Codes that cannot be valid cannot exist either.
fn existing_code(raw: &str) -> AppResult<EventTypeCode> {
    EventTypeCode::parse(raw).map_err(|_| AppError::not_found("Not found"))
}

async fn fetch(client: &ScopedClient, code: &EventTypeCode) -> AppResult<Value> {
    client
        .get(&code.document_id())
        .await?
        .ok_or_else(|| AppError::not_found("Not found"))
}
