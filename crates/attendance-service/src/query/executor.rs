//! Two-step query strategy over the store's `_find` API.
//!
//! 1. `SortedAttempt`: the query as given, sort included
//! 2. `UnsortedAttempt`: on any failure, the same selector and cursor
//!    without the sort
//!
//! A refused session token is never retried.
//!
//! Whichever attempt answers, the page is then normalized in memory so the
//! caller always sees the requested order, even from a store that silently
//! ignores the sort.

use std::fmt;

use serde_json::Value;
use tracing::{debug, warn};

use attendance_auth::ScopedClient;
use attendance_core::error::AppError;
use attendance_core::result::AppResult;
use attendance_core::types::{FindQuery, FindResponse, Page, PageCursor};

/// Which attempt produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStep {
    /// The store honoured the sorted query.
    SortedAttempt,
    /// The store answered only the unsorted retry.
    UnsortedAttempt,
}

impl fmt::Display for QueryStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SortedAttempt => write!(f, "sorted"),
            Self::UnsortedAttempt => write!(f, "unsorted"),
        }
    }
}

/// Raw answer plus the step that produced it.
#[derive(Debug, Clone)]
pub struct QueryOutcome {
    pub response: FindResponse,
    pub step: QueryStep,
}

/// Runs queries with the sorted-then-unsorted fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryExecutor;

impl QueryExecutor {
    /// Creates a new executor.
    pub fn new() -> Self {
        Self
    }

    /// Step 1: the query exactly as given.
    pub async fn sorted_attempt(
        &self,
        client: &ScopedClient,
        query: &FindQuery,
    ) -> AppResult<FindResponse> {
        client.find(query).await
    }

    /// Step 2: the same selector, limit and cursor with the sort removed.
    pub async fn unsorted_attempt(
        &self,
        client: &ScopedClient,
        query: &FindQuery,
    ) -> AppResult<FindResponse> {
        client.find(&query.without_sort()).await
    }

    /// Run both steps as needed.
    ///
    /// When both fail the result is `QueryFailed` carrying the status the
    /// store last reported, except that a pure transport failure on the
    /// retry stays `BackendUnavailable`.
    pub async fn run(&self, client: &ScopedClient, query: &FindQuery) -> AppResult<QueryOutcome> {
        let first = match self.sorted_attempt(client, query).await {
            Ok(response) => {
                return Ok(QueryOutcome {
                    response,
                    step: QueryStep::SortedAttempt,
                });
            }
            Err(e) if e.is_session_rejected() => return Err(e),
            Err(e) => e,
        };

        warn!(
            db = %client.database(),
            error = %first,
            status = ?first.backend_status,
            "Sorted query failed, retrying without sort"
        );

        match self.unsorted_attempt(client, query).await {
            Ok(response) => Ok(QueryOutcome {
                response,
                step: QueryStep::UnsortedAttempt,
            }),
            Err(second) if second.is_session_rejected() => Err(second),
            Err(second) => Err(combine_failures(first, second)),
        }
    }

    /// Run the query and shape the answer into a page.
    ///
    /// `decode` turns documents into rows (undecodable documents are
    /// skipped); `normalize` puts rows into display order. The next cursor
    /// is present only when a full page came back with a bookmark.
    pub async fn page<T, D, N>(
        &self,
        client: &ScopedClient,
        query: &FindQuery,
        decode: D,
        normalize: N,
    ) -> AppResult<Page<T>>
    where
        D: Fn(&Value) -> Option<T>,
        N: Fn(&mut [T]),
    {
        let outcome = self.run(client, query).await?;
        debug!(
            db = %client.database(),
            step = %outcome.step,
            returned = outcome.response.docs.len(),
            "Query answered"
        );
        Ok(to_page(outcome.response, query, decode, normalize))
    }
}

/// Normalize a raw answer into a page.
pub fn to_page<T, D, N>(response: FindResponse, query: &FindQuery, decode: D, normalize: N) -> Page<T>
where
    D: Fn(&Value) -> Option<T>,
    N: Fn(&mut [T]),
{
    let returned = response.docs.len();
    let mut rows: Vec<T> = response.docs.iter().filter_map(decode).collect();
    normalize(&mut rows);

    let next_cursor = if returned < query.limit.get() as usize {
        None
    } else {
        response.bookmark.and_then(PageCursor::from_raw)
    };
    Page { rows, next_cursor }
}

fn combine_failures(first: AppError, second: AppError) -> AppError {
    if second.is_backend_unavailable() && second.backend_status.is_none() {
        return second;
    }
    let err = AppError::query_failed("find_failed");
    match second.backend_status.or(first.backend_status) {
        Some(status) => err.with_backend_status(status),
        None => err,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use serde_json::{Map, json};

    use attendance_core::error::ErrorKind;
    use attendance_core::traits::DocumentStore;
    use attendance_core::types::{BackendCredential, PageLimit, SortField};
    use attendance_entity::event::{EventRecord, sort_newest_first};
    use attendance_store::memory::MemoryDocumentStore;

    fn admin() -> BackendCredential {
        BackendCredential::basic("admin", "secret")
    }

    async fn seeded(stamps: &[&str]) -> (Arc<MemoryDocumentStore>, ScopedClient) {
        let store = Arc::new(
            MemoryDocumentStore::new()
                .with_database("attendance")
                .with_admin("admin", "secret"),
        );
        // Ids run opposite to time so id order is visibly not ts order.
        for (i, ts) in stamps.iter().enumerate() {
            store
                .put(
                    &admin(),
                    "attendance",
                    &format!("event:{i}"),
                    &json!({ "kind": "event", "ts": ts, "type": "in", "qrData": "x", "createdBy": "bob" }),
                )
                .await
                .unwrap();
        }
        let client = ScopedClient::new(store.clone(), admin(), "attendance");
        (store, client)
    }

    fn events_query(limit: i64) -> FindQuery {
        let selector: Map<String, Value> = json!({ "kind": "event" }).as_object().cloned().unwrap();
        FindQuery::new(selector)
            .sorted_by(vec![SortField::desc("ts")])
            .with_limit(PageLimit::clamped(limit))
    }

    fn stamps(page: &Page<EventRecord>) -> Vec<&str> {
        page.rows.iter().map(|e| e.timestamp.as_str()).collect()
    }

    #[tokio::test]
    async fn test_sorted_path() {
        let (_, client) = seeded(&["2024-01-01", "2024-01-03", "2024-01-02"]).await;
        let executor = QueryExecutor::new();
        let outcome = executor.run(&client, &events_query(10)).await.unwrap();
        assert_eq!(outcome.step, QueryStep::SortedAttempt);

        let page = executor
            .page(&client, &events_query(10), EventRecord::from_document, sort_newest_first)
            .await
            .unwrap();
        assert_eq!(stamps(&page), vec!["2024-01-03", "2024-01-02", "2024-01-01"]);
        assert!(page.next_cursor.is_none());
    }

    #[tokio::test]
    async fn test_fallback_path_is_still_newest_first() {
        let (store, client) = seeded(&["2024-01-01", "2024-01-03", "2024-01-02"]).await;
        store.set_sort_index(false);
        let executor = QueryExecutor::new();

        let outcome = executor.run(&client, &events_query(10)).await.unwrap();
        assert_eq!(outcome.step, QueryStep::UnsortedAttempt);

        let page = executor
            .page(&client, &events_query(10), EventRecord::from_document, sort_newest_first)
            .await
            .unwrap();
        assert_eq!(stamps(&page), vec!["2024-01-03", "2024-01-02", "2024-01-01"]);
    }

    #[tokio::test]
    async fn test_full_page_carries_cursor() {
        let (_, client) = seeded(&["2024-01-01", "2024-01-03", "2024-01-02"]).await;
        let executor = QueryExecutor::new();
        let page = executor
            .page(&client, &events_query(2), EventRecord::from_document, sort_newest_first)
            .await
            .unwrap();
        assert_eq!(page.rows.len(), 2);
        let cursor = page.next_cursor.clone().unwrap();

        let next = executor
            .page(
                &client,
                &events_query(2).with_bookmark(Some(cursor)),
                EventRecord::from_document,
                sort_newest_first,
            )
            .await
            .unwrap();
        assert_eq!(stamps(&next), vec!["2024-01-01"]);
        assert!(next.next_cursor.is_none());
    }

    #[tokio::test]
    async fn test_both_attempts_fail() {
        let (_, client) = seeded(&[]).await;
        let bad_db = client.in_database("missing");
        let err = QueryExecutor::new()
            .run(&bad_db, &events_query(10))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::QueryFailed);
        assert_eq!(err.backend_status, Some(404));
    }

    #[tokio::test]
    async fn test_refused_token_is_not_retried() {
        let (store, _) = seeded(&["2024-01-01"]).await;
        let stale = ScopedClient::new(
            store.clone(),
            BackendCredential::SessionToken {
                token: "revoked".into(),
            },
            "attendance",
        );
        let err = QueryExecutor::new()
            .run(&stale, &events_query(10))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthenticated);
        assert!(err.is_session_rejected());
    }

    #[tokio::test]
    async fn test_transport_failure_stays_unavailable() {
        let (store, client) = seeded(&[]).await;
        store.set_online(false);
        let err = QueryExecutor::new()
            .run(&client, &events_query(10))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::BackendUnavailable);
    }

    #[test]
    fn test_normalize_short_page_has_no_cursor() {
        let response = FindResponse {
            docs: vec![
                json!({ "_id": "event:a", "ts": "2024-01-01" }),
                json!({ "_id": "event:b", "ts": "2024-02-01" }),
                json!({ "no_id": true }),
            ],
            bookmark: Some("bm".into()),
            warning: None,
        };
        let page = to_page(response, &events_query(5), EventRecord::from_document, sort_newest_first);
        assert_eq!(stamps(&page), vec!["2024-02-01", "2024-01-01"]);
        assert!(page.next_cursor.is_none());
    }
}
