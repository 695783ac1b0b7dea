//! reqwest-backed implementation of [`CountryGateway`].

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::{Response, Url};
use serde::de::DeserializeOwned;

use super::client::{CountryGateway, GatewayError};
use super::types::{Activity, ActivityDraft, ActivityId, Country, CountryId, CreateActivityRequest};
use crate::core::config::ResolvedConfig;

pub struct HttpGateway {
    base_url: String,
    client: reqwest::Client,
}

impl HttpGateway {
    /// Gateway with reqwest's default client (no request timeout).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn from_config(config: &ResolvedConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        info!(
            "HTTP gateway: base_url={}, timeout={}s",
            config.api_base_url, config.request_timeout_secs
        );

        Ok(Self {
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `/activities/<id>` with the id percent-encoded as one path segment.
    fn activity_url(&self, id: &ActivityId) -> Result<Url, GatewayError> {
        let mut url =
            Url::parse(&self.url("/activities")).map_err(|e| GatewayError::Transport(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| GatewayError::Transport(format!("not a base URL: {}", self.base_url)))?
            .push(id.as_str());
        Ok(url)
    }
}

/// Turns non-2xx responses into `GatewayError::Server`, pulling the `error`
/// field out of a JSON body when there is one.
async fn check_status(response: Response) -> Result<Response, GatewayError> {
    let status = response.status();
    debug!("Response status: {}", status);
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string));

    warn!("Backend error: {} - {}", status.as_u16(), body);
    Err(GatewayError::Server {
        status: status.as_u16(),
        status_text: status.canonical_reason().map(str::to_string),
        detail,
    })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, GatewayError> {
    let response = check_status(response).await?;
    let bytes = response
        .bytes()
        .await
        .map_err(|e| GatewayError::Transport(e.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|e| {
        warn!("Failed to decode response body ({} bytes): {}", bytes.len(), e);
        GatewayError::Decode(e.to_string())
    })
}

fn transport(e: reqwest::Error) -> GatewayError {
    warn!("Request failed: {}", e);
    GatewayError::Transport(e.to_string())
}

#[async_trait]
impl CountryGateway for HttpGateway {
    async fn fetch_all_countries(&self) -> Result<Vec<Country>, GatewayError> {
        info!("GET /countries");
        let response = self
            .client
            .get(self.url("/countries"))
            .send()
            .await
            .map_err(transport)?;
        let countries: Vec<Country> = decode(response).await?;
        debug!("Received {} countries", countries.len());
        Ok(countries)
    }

    async fn fetch_countries_by_name(&self, term: &str) -> Result<Vec<Country>, GatewayError> {
        let term = term.trim();
        info!("GET /countries?name={}", term);
        let response = self
            .client
            .get(self.url("/countries"))
            .query(&[("name", term)])
            .send()
            .await
            .map_err(transport)?;
        let countries: Vec<Country> = decode(response).await?;
        debug!("Search {:?} matched {} countries", term, countries.len());
        Ok(countries)
    }

    async fn fetch_activities(&self) -> Result<Vec<Activity>, GatewayError> {
        info!("GET /activities");
        let response = self
            .client
            .get(self.url("/activities"))
            .send()
            .await
            .map_err(transport)?;
        let activities: Vec<Activity> = decode(response).await?;
        debug!("Received {} activities", activities.len());
        Ok(activities)
    }

    async fn create_activity(
        &self,
        draft: &ActivityDraft,
        country_ids: &[CountryId],
    ) -> Result<Activity, GatewayError> {
        info!(
            "POST /activities: name={:?}, countries={}",
            draft.name,
            country_ids.len()
        );
        let body = CreateActivityRequest {
            activity: draft,
            countries: country_ids,
        };
        let response = self
            .client
            .post(self.url("/activities"))
            .json(&body)
            .send()
            .await
            .map_err(transport)?;
        let created: Activity = decode(response).await?;
        info!("Created activity {} ({})", created.id, created.name);
        Ok(created)
    }

    async fn delete_activity(&self, id: &ActivityId) -> Result<(), GatewayError> {
        info!("DELETE /activities/{}", id);
        let response = self
            .client
            .delete(self.activity_url(id)?)
            .send()
            .await
            .map_err(transport)?;
        check_status(response).await?;
        Ok(())
    }
}
