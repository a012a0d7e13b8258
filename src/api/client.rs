//! Movie library backend client
//!
//! One method per REST endpoint. Non-2xx responses are decoded into
//! [`ApiError`]: status 422 carries per-field validation issues, every
//! other status carries the backend's `detail.message` when present.

use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::models::{Message, Movie, MovieFile, MovieUpdate, Property, PropertyKind, PropertyName};

/// Backend origin used when nothing is configured
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

/// Status reserved for form-field validation failures
pub const VALIDATION_STATUS: StatusCode = StatusCode::UNPROCESSABLE_ENTITY;

/// Status line text when the backend gives no usable message
pub const UNKNOWN_SERVER_ERROR: &str = "Unknown server error";

/// One field-level problem reported with a validation failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub field: String,
    pub message: String,
}

/// Backend error types
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation failed: {}", summarize(.0))]
    Validation(Vec<FieldIssue>),

    #[error("{} ({})", .message.as_deref().unwrap_or(UNKNOWN_SERVER_ERROR), .status)]
    Server { status: u16, message: Option<String> },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
}

fn summarize(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(|i| format!("{}: {}", i.field, i.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl ApiError {
    pub fn is_validation(&self) -> bool {
        matches!(self, ApiError::Validation(_))
    }

    /// HTTP status of the failed response, if one was received
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Validation(_) => Some(VALIDATION_STATUS.as_u16()),
            ApiError::Server { status, .. } => Some(*status),
            ApiError::RequestFailed(e) => e.status().map(|s| s.as_u16()),
            ApiError::InvalidResponse(_) => None,
        }
    }

    /// Text for the status line.
    ///
    /// `None` for validation failures: those are rendered next to the
    /// offending form fields instead.
    pub fn status_message(&self) -> Option<String> {
        match self {
            ApiError::Validation(_) => None,
            ApiError::Server {
                message: Some(message),
                ..
            } if !message.is_empty() => Some(message.clone()),
            _ => Some(UNKNOWN_SERVER_ERROR.to_string()),
        }
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Movie library backend client
#[derive(Debug, Clone)]
pub struct MovieManagerClient {
    base_url: String,
    client: reqwest::Client,
}

impl Default for MovieManagerClient {
    fn default() -> Self {
        Self::new(DEFAULT_BACKEND_URL)
    }
}

impl MovieManagerClient {
    /// Create a client for the given backend origin
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, endpoint: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, endpoint);
        self.client
            .request(method, url)
            .header("Accept", "application/json")
    }

    /// Send a request and decode either the payload or the error body
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<T> {
        let response = request.send().await?;
        let status = response.status();
        let url = response.url().path().to_string();
        let body = response.text().await?;

        if status.is_success() {
            tracing::debug!(%status, path = %url, "backend response");
            return serde_json::from_str(&body)
                .map_err(|e| ApiError::InvalidResponse(format!("JSON parse error: {}", e)));
        }

        let error = decode_error(status, &body);
        tracing::warn!(%status, path = %url, error = %error, "backend rejected request");
        Err(error)
    }

    // -------------------------------------------------------------------------
    // Movies
    // -------------------------------------------------------------------------

    /// List all movie files
    pub async fn movies(&self) -> ApiResult<Vec<MovieFile>> {
        self.send(self.request(Method::GET, "/movies")).await
    }

    /// Get the full record of one movie
    pub async fn movie(&self, id: u64) -> ApiResult<Movie> {
        self.send(self.request(Method::GET, &format!("/movies/{}", id)))
            .await
    }

    /// Rescan the backend's movie directory and import new files
    pub async fn import_movies(&self) -> ApiResult<Vec<MovieFile>> {
        self.send(self.request(Method::POST, "/movies")).await
    }

    /// Update name, series and studio of a movie
    pub async fn update_movie(&self, id: u64, update: &MovieUpdate) -> ApiResult<Movie> {
        self.send(
            self.request(Method::PUT, &format!("/movies/{}", id))
                .json(update),
        )
        .await
    }

    /// Remove a movie from the catalog
    pub async fn delete_movie(&self, id: u64) -> ApiResult<Message> {
        self.send(self.request(Method::DELETE, &format!("/movies/{}", id)))
            .await
    }

    // -------------------------------------------------------------------------
    // Reference data
    // -------------------------------------------------------------------------

    /// List all entries of one kind
    pub async fn properties(&self, kind: PropertyKind) -> ApiResult<Vec<Property>> {
        self.send(self.request(Method::GET, kind.endpoint())).await
    }

    pub async fn add_property(&self, kind: PropertyKind, name: &str) -> ApiResult<Property> {
        let body = PropertyName {
            name: name.to_string(),
        };
        self.send(self.request(Method::POST, kind.endpoint()).json(&body))
            .await
    }

    pub async fn update_property(
        &self,
        kind: PropertyKind,
        id: u64,
        name: &str,
    ) -> ApiResult<Property> {
        let body = PropertyName {
            name: name.to_string(),
        };
        self.send(
            self.request(Method::PUT, &format!("{}/{}", kind.endpoint(), id))
                .json(&body),
        )
        .await
    }

    pub async fn delete_property(&self, kind: PropertyKind, id: u64) -> ApiResult<Message> {
        self.send(self.request(Method::DELETE, &format!("{}/{}", kind.endpoint(), id)))
            .await
    }

    // -------------------------------------------------------------------------
    // Associations
    // -------------------------------------------------------------------------

    /// Link an actor to a movie; returns the updated movie
    pub async fn add_movie_actor(&self, movie_id: u64, actor_id: u64) -> ApiResult<Movie> {
        self.association(Method::POST, "/movie_actor", movie_id, "actor_id", actor_id)
            .await
    }

    /// Unlink an actor from a movie; returns the updated movie
    pub async fn remove_movie_actor(&self, movie_id: u64, actor_id: u64) -> ApiResult<Movie> {
        self.association(Method::DELETE, "/movie_actor", movie_id, "actor_id", actor_id)
            .await
    }

    pub async fn add_movie_category(&self, movie_id: u64, category_id: u64) -> ApiResult<Movie> {
        self.association(
            Method::POST,
            "/movie_category",
            movie_id,
            "category_id",
            category_id,
        )
        .await
    }

    pub async fn remove_movie_category(
        &self,
        movie_id: u64,
        category_id: u64,
    ) -> ApiResult<Movie> {
        self.association(
            Method::DELETE,
            "/movie_category",
            movie_id,
            "category_id",
            category_id,
        )
        .await
    }

    async fn association(
        &self,
        method: Method,
        endpoint: &str,
        movie_id: u64,
        other_key: &str,
        other_id: u64,
    ) -> ApiResult<Movie> {
        let movie_id = movie_id.to_string();
        let other_id = other_id.to_string();
        let query = [("movie_id", movie_id.as_str()), (other_key, other_id.as_str())];
        self.send(self.request(method, endpoint).query(&query)).await
    }
}

// =============================================================================
// Error Bodies (internal deserialization)
// =============================================================================

/// `{"detail": {"message": "..."}}`
#[derive(Debug, Deserialize)]
struct HttpExceptionBody {
    detail: MessageDetail,
}

#[derive(Debug, Deserialize)]
struct MessageDetail {
    message: Option<String>,
}

/// `{"detail": [{"loc": ["body", "name"], "msg": "..."}]}`
#[derive(Debug, Deserialize)]
struct ValidationBody {
    detail: Vec<ValidationItem>,
}

#[derive(Debug, Deserialize)]
struct ValidationItem {
    #[serde(default)]
    loc: Vec<serde_json::Value>,
    #[serde(default)]
    msg: String,
}

impl ValidationItem {
    fn into_issue(self) -> FieldIssue {
        // Last path segment names the field; "body"/"query" prefixes are noise
        let field = self
            .loc
            .iter()
            .rev()
            .find_map(|v| match v {
                serde_json::Value::String(s) => Some(s.clone()),
                serde_json::Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .unwrap_or_default();
        FieldIssue {
            field,
            message: self.msg,
        }
    }
}

fn decode_error(status: StatusCode, body: &str) -> ApiError {
    if status == VALIDATION_STATUS {
        let issues = serde_json::from_str::<ValidationBody>(body)
            .map(|v| v.detail.into_iter().map(ValidationItem::into_issue).collect())
            .unwrap_or_default();
        return ApiError::Validation(issues);
    }

    let message = serde_json::from_str::<HttpExceptionBody>(body)
        .ok()
        .and_then(|b| b.detail.message);
    ApiError::Server {
        status: status.as_u16(),
        message,
    }
}
