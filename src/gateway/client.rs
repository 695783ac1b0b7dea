use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::types::{Activity, ActivityDraft, ActivityId, Country, CountryId};

pub const DEFAULT_ERROR_STATUS: u16 = 500;
pub const DEFAULT_ERROR_MESSAGE: &str = "Unknown error";
pub const DEFAULT_ERROR_DESCRIPTION: &str = "An unexpected error occurred";

/// Errors that can occur while talking to the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayError {
    /// Request never produced a response (connection refused, DNS, timeout).
    Transport(String),
    /// Backend answered with a non-2xx status.
    Server {
        status: u16,
        /// Canonical reason phrase, if the status has one.
        status_text: Option<String>,
        /// The `error` field of a JSON error body, if any.
        detail: Option<String>,
    },
    /// 2xx response whose body was not the JSON we expected.
    Decode(String),
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatewayError::Transport(msg) => write!(f, "transport error: {msg}"),
            GatewayError::Server { status, detail, .. } => match detail {
                Some(detail) => write!(f, "server error (HTTP {status}): {detail}"),
                None => write!(f, "server error (HTTP {status})"),
            },
            GatewayError::Decode(msg) => write!(f, "decode error: {msg}"),
        }
    }
}

impl std::error::Error for GatewayError {}

/// The error shape shown to the user. Every gateway failure is folded into
/// one of these before it reaches the store.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: u16,
    pub message: String,
    pub description: String,
}

impl Default for ApiError {
    fn default() -> Self {
        Self {
            status: DEFAULT_ERROR_STATUS,
            message: DEFAULT_ERROR_MESSAGE.to_string(),
            description: DEFAULT_ERROR_DESCRIPTION.to_string(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.status, self.message, self.description)
    }
}

impl std::error::Error for ApiError {}

impl From<&GatewayError> for ApiError {
    fn from(err: &GatewayError) -> Self {
        let fallback = ApiError::default();
        match err {
            GatewayError::Transport(msg) | GatewayError::Decode(msg) => ApiError {
                message: non_empty(msg).unwrap_or(fallback.message),
                ..fallback
            },
            GatewayError::Server {
                status,
                status_text,
                detail,
            } => ApiError {
                status: *status,
                message: status_text
                    .as_deref()
                    .and_then(non_empty)
                    .unwrap_or_else(|| format!("Request failed with status code {status}")),
                description: detail
                    .as_deref()
                    .and_then(non_empty)
                    .unwrap_or(fallback.description),
            },
        }
    }
}

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        ApiError::from(&err)
    }
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Remote source of countries and activities.
///
/// Every call is fire-once: no retries, no caching. Callers are expected to
/// wrap calls in a loading scope (see `intents`).
#[async_trait]
pub trait CountryGateway: Send + Sync {
    /// `GET /countries`
    async fn fetch_all_countries(&self) -> Result<Vec<Country>, GatewayError>;

    /// `GET /countries?name=<term>`. The term is sent as given (minus
    /// surrounding whitespace); routing empty terms to
    /// `fetch_all_countries` is the caller's job.
    async fn fetch_countries_by_name(&self, term: &str) -> Result<Vec<Country>, GatewayError>;

    /// `GET /activities`
    async fn fetch_activities(&self) -> Result<Vec<Activity>, GatewayError>;

    /// `POST /activities`. Returns the activity with its server-assigned id.
    async fn create_activity(
        &self,
        draft: &ActivityDraft,
        country_ids: &[CountryId],
    ) -> Result<Activity, GatewayError>;

    /// `DELETE /activities/:id`
    async fn delete_activity(&self, id: &ActivityId) -> Result<(), GatewayError>;
}
