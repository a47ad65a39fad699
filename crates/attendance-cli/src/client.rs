//! HTTP client for the attendance server's JSON API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{COOKIE, SET_COOKIE};
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;

use attendance_core::error::{AppError, ErrorKind};
use attendance_core::result::AppResult;
use attendance_core::types::{Page, PageCursor, PageLimit};
use attendance_entity::{EventRecord, EventTypeRecord};

use crate::navigator::PageSource;

/// Signed-in user as reported by `/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionUser {
    pub name: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

#[derive(Deserialize)]
struct LoginBody {
    user: SessionUser,
}

#[derive(Deserialize)]
struct EventsBody {
    rows: Vec<EventRecord>,
    bookmark: Option<String>,
}

#[derive(Deserialize)]
struct RowsBody<T> {
    rows: Vec<T>,
}

#[derive(Deserialize)]
struct CreatedBody {
    id: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

/// A logged-in connection to the server.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base: Url,
    /// `name=value` of the session cookie once logged in.
    session: Option<String>,
}

impl ApiClient {
    /// Client for the server at `base`, not yet logged in.
    pub fn new(base: &str) -> AppResult<Self> {
        let base = Url::parse(base)
            .map_err(|e| AppError::configuration(format!("Invalid server URL '{base}': {e}")))?;
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            base,
            session: None,
        })
    }

    /// Log in and keep the session cookie for later calls.
    pub async fn login(&mut self, username: &str, password: &str) -> AppResult<SessionUser> {
        let resp = self
            .send(
                self.http
                    .post(self.url("/login"))
                    .json(&json!({ "username": username, "password": password })),
            )
            .await?;

        let cookie = resp
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .filter_map(|v| v.split(';').next())
            .next()
            .map(str::to_string)
            .ok_or_else(|| AppError::internal("Server set no session cookie"))?;

        let body: LoginBody = read_json(resp).await?;
        self.session = Some(cookie);
        Ok(body.user)
    }

    /// End the server session.
    pub async fn logout(&mut self) -> AppResult<()> {
        if self.session.is_some() {
            self.send(self.authed(self.http.post(self.url("/logout"))))
                .await?;
            self.session = None;
        }
        Ok(())
    }

    /// One page of events.
    pub async fn events(
        &self,
        filter: &EventQuery,
        cursor: Option<&PageCursor>,
    ) -> AppResult<Page<EventRecord>> {
        let mut url = self.url("/api/events");
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("limit", &filter.limit.get().to_string());
            if let Some(t) = filter.type_code.as_deref() {
                pairs.append_pair("type", t);
            }
            if let Some(u) = filter.created_by.as_deref() {
                pairs.append_pair("createdBy", u);
            }
            if let Some(c) = cursor {
                pairs.append_pair("bookmark", c.as_str());
            }
        }

        let resp = self.send(self.authed(self.http.get(url))).await?;
        let body: EventsBody = read_json(resp).await?;
        Ok(Page {
            rows: body.rows,
            next_cursor: body.bookmark.and_then(PageCursor::from_raw),
        })
    }

    /// Record a scan; returns the new event id.
    pub async fn record(&self, type_code: &str, payload: &str) -> AppResult<String> {
        let req = self
            .http
            .post(self.url("/api/events"))
            .json(&json!({ "type": type_code, "qrData": payload }));
        let resp = self.send(self.authed(req)).await?;
        let body: CreatedBody = read_json(resp).await?;
        Ok(body.id)
    }

    /// Active event types, by name.
    pub async fn event_types(&self) -> AppResult<Vec<EventTypeRecord>> {
        let resp = self
            .send(self.authed(self.http.get(self.url("/api/event-types"))))
            .await?;
        let body: RowsBody<EventTypeRecord> = read_json(resp).await?;
        Ok(body.rows)
    }

    fn url(&self, path: &str) -> Url {
        let mut url = self.base.clone();
        url.set_path(path);
        url
    }

    fn authed(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.session {
            Some(cookie) => req.header(COOKIE, cookie),
            None => req,
        }
    }

    /// Send and turn non-success answers into errors.
    async fn send(&self, req: RequestBuilder) -> AppResult<Response> {
        let resp = req.send().await.map_err(|e| {
            AppError::backend_unavailable(format!("Server unreachable: {e}"))
        })?;
        let status = resp.status();
        debug!(status = %status, url = %resp.url().path(), "Server answered");
        if status.is_success() {
            return Ok(resp);
        }

        let message = match resp.json::<ErrorBody>().await {
            Ok(body) if !body.message.is_empty() => body.message,
            _ => status.to_string(),
        };
        Err(AppError::new(error_kind(status), message).with_backend_status(status.as_u16()))
    }
}

/// Filters and page size for event browsing.
#[derive(Debug, Clone, Default)]
pub struct EventQuery {
    pub type_code: Option<String>,
    pub created_by: Option<String>,
    pub limit: PageLimit,
}

/// Event pages for the navigator.
pub struct EventPages {
    pub client: ApiClient,
    pub query: EventQuery,
}

#[async_trait]
impl PageSource for EventPages {
    type Row = EventRecord;

    async fn fetch(&self, cursor: Option<&PageCursor>) -> AppResult<Page<EventRecord>> {
        self.client.events(&self.query, cursor).await
    }
}

fn error_kind(status: StatusCode) -> ErrorKind {
    match status {
        StatusCode::BAD_REQUEST => ErrorKind::Validation,
        StatusCode::UNAUTHORIZED => ErrorKind::Unauthenticated,
        StatusCode::FORBIDDEN => ErrorKind::Forbidden,
        StatusCode::NOT_FOUND => ErrorKind::NotFound,
        StatusCode::CONFLICT => ErrorKind::Conflict,
        StatusCode::SERVICE_UNAVAILABLE => ErrorKind::FeatureUnavailable,
        _ => ErrorKind::BackendUnavailable,
    }
}

async fn read_json<T: DeserializeOwned>(resp: Response) -> AppResult<T> {
    resp.json()
        .await
        .map_err(|e| AppError::internal(format!("Unexpected server answer: {e}")))
}
