//! HTTP connection management for a CouchDB-compatible server.

use std::time::Duration;

use reqwest::header::{COOKIE, SET_COOKIE};
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use tracing::info;

use attendance_core::config::StoreConfig;
use attendance_core::error::{AppError, ErrorKind};
use attendance_core::result::AppResult;
use attendance_core::types::BackendCredential;

/// Name of the session cookie the store issues.
pub const AUTH_COOKIE: &str = "AuthSession";

/// Shared HTTP client bound to one store base URL.
///
/// Cloning is cheap; all clones share the connection pool.
#[derive(Debug, Clone)]
pub struct CouchClient {
    /// Pooled HTTP client with the per-call timeout applied.
    http: Client,
    /// Store base URL.
    base: Url,
}

impl CouchClient {
    /// Create a client from configuration.
    pub fn connect(config: &StoreConfig) -> AppResult<Self> {
        let base = Url::parse(&config.url).map_err(|e| {
            AppError::configuration(format!("Invalid store URL '{}': {e}", config.url))
        })?;
        if base.cannot_be_a_base() {
            return Err(AppError::configuration(format!(
                "Store URL '{}' cannot be used as a base",
                config.url
            )));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Failed to build HTTP client", e)
            })?;

        info!(url = %mask_url(&base), "Configured document store client");
        Ok(Self { http, base })
    }

    /// URL for a sequence of raw path segments, each percent-encoded.
    pub fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Start a request without credentials.
    pub fn request(&self, method: reqwest::Method, url: Url) -> RequestBuilder {
        self.http.request(method, url)
    }

    /// Start a request carrying `credential`.
    pub fn authorized(
        &self,
        method: reqwest::Method,
        url: Url,
        credential: &BackendCredential,
    ) -> RequestBuilder {
        let request = self.request(method, url);
        match credential {
            BackendCredential::SessionToken { token } => {
                request.header(COOKIE, format!("{AUTH_COOKIE}={token}"))
            }
            BackendCredential::Basic { username, password } => {
                request.basic_auth(username, Some(password))
            }
        }
    }

    /// Send a request, mapping transport failures to `BackendUnavailable`.
    pub async fn send(&self, request: RequestBuilder, context: &str) -> AppResult<Response> {
        request.send().await.map_err(|e| transport_error(context, e))
    }
}

/// Map a transport-level failure.
pub fn transport_error(context: &str, err: reqwest::Error) -> AppError {
    let reason = if err.is_timeout() {
        "timed out"
    } else if err.is_connect() {
        "connection failed"
    } else {
        "request failed"
    };
    AppError::with_source(
        ErrorKind::BackendUnavailable,
        format!("{context}: {reason}"),
        err,
    )
}

/// Map a non-success store answer into the error taxonomy.
pub fn status_error(context: &str, status: StatusCode) -> AppError {
    let err = match status {
        StatusCode::BAD_REQUEST => AppError::validation(format!("{context}: rejected by store")),
        StatusCode::UNAUTHORIZED => {
            AppError::unauthenticated(format!("{context}: store session rejected"))
        }
        StatusCode::FORBIDDEN => AppError::forbidden(format!("{context}: forbidden by store")),
        StatusCode::NOT_FOUND => AppError::not_found(format!("{context}: not found")),
        StatusCode::CONFLICT | StatusCode::PRECONDITION_FAILED => {
            AppError::conflict(format!("{context}: revision conflict"))
        }
        _ => AppError::backend_unavailable(format!("{context}: store answered {status}")),
    };
    err.with_backend_status(status.as_u16())
}

/// Decode a JSON body, treating garbage as a backend failure.
pub async fn json_body<T: serde::de::DeserializeOwned>(
    response: Response,
    context: &str,
) -> AppResult<T> {
    let status = response.status().as_u16();
    response.json::<T>().await.map_err(|e| {
        AppError::with_source(
            ErrorKind::BackendUnavailable,
            format!("{context}: malformed response"),
            e,
        )
        .with_backend_status(status)
    })
}

/// Pull the session token out of the store's `Set-Cookie` headers.
pub fn session_token(response: &Response) -> Option<String> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(|cookie| {
            let pair = cookie.split(';').next()?.trim();
            let value = pair.strip_prefix(AUTH_COOKIE)?.strip_prefix('=')?;
            (!value.is_empty()).then(|| value.to_string())
        })
}

/// Mask credentials embedded in a URL for safe logging.
fn mask_url(url: &Url) -> String {
    let mut masked = url.clone();
    if masked.password().is_some() {
        let _ = masked.set_password(Some("****"));
    }
    masked.to_string()
}
