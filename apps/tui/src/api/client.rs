//! HTTP client for the conflict-events REST API.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use serde::de::DeserializeOwned;
use url::Url;

use super::error::ApiError;
use super::models::{ConflictEvent, HeatCell, Lookups, Page, RegionAgg, TimePoint};
use crate::filters::{query, FilterState};

const USER_AGENT_VALUE: &str = concat!("conflict-explorer/", env!("CARGO_PKG_VERSION"));

/// Thin typed wrapper over the REST endpoints.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl ApiClient {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Network(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            timeout,
        })
    }

    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub async fn events(
        &self,
        filters: &FilterState,
        page: u32,
        page_size: u32,
    ) -> Result<Page<ConflictEvent>, ApiError> {
        let url = self.filtered_url(
            "api/events",
            filters,
            &[("page", page.to_string()), ("pageSize", page_size.to_string())],
        )?;
        self.get_json(url).await
    }

    pub async fn event(&self, id: &str) -> Result<ConflictEvent, ApiError> {
        let mut url = self.endpoint("api/events")?;
        url.path_segments_mut()
            .map_err(|()| ApiError::NotConfigured("API base URL cannot be a base".into()))?
            .push(id);

        match self.get_json(url).await {
            Err(ApiError::NotFound(_)) => Err(ApiError::NotFound(format!("event {id}"))),
            other => other,
        }
    }

    pub async fn lookups(&self) -> Result<Lookups, ApiError> {
        let url = self.endpoint("api/lookups")?;
        self.get_json(url).await
    }

    pub async fn series(&self, filters: &FilterState) -> Result<Vec<TimePoint>, ApiError> {
        let url = self.filtered_url("api/stats/series", filters, &[])?;
        self.get_json(url).await
    }

    pub async fn regions(&self, filters: &FilterState) -> Result<Vec<RegionAgg>, ApiError> {
        let url = self.filtered_url("api/stats/by-region", filters, &[])?;
        self.get_json(url).await
    }

    pub async fn heat(&self, filters: &FilterState) -> Result<Vec<HeatCell>, ApiError> {
        let url = self.filtered_url("api/stats/heat", filters, &[])?;
        self.get_json(url).await
    }

    /// `HEAD /api/health`; `false` on any failure.
    pub async fn is_available(&self) -> bool {
        let Ok(url) = self.endpoint("api/health") else {
            return false;
        };
        self.client
            .head(url)
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .is_ok_and(|response| response.status().is_success())
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        endpoint_url(&self.base_url, path)
    }

    fn filtered_url(
        &self,
        path: &str,
        filters: &FilterState,
        extra: &[(&str, String)],
    ) -> Result<Url, ApiError> {
        let mut url = self.endpoint(path)?;
        url.query_pairs_mut()
            .extend_pairs(query::encode_pairs(filters))
            .extend_pairs(extra);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        tracing::debug!(%url, "GET");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(url.path().to_string()));
        }
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: status
                    .canonical_reason()
                    .unwrap_or("unexpected status")
                    .to_string(),
            });
        }

        let body = response.bytes().await.map_err(|e| self.classify(e))?;
        serde_json::from_slice(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    fn classify(&self, err: reqwest::Error) -> ApiError {
        match ApiError::from(err) {
            ApiError::Timeout(_) => ApiError::Timeout(self.timeout),
            other => other,
        }
    }
}

/// Joins `path` onto the base URL, treating the base as a directory.
pub fn endpoint_url(base: &Url, path: &str) -> Result<Url, ApiError> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let directory = format!("{}/", base.path());
        base.set_path(&directory);
    }
    base.join(path)
        .map_err(|e| ApiError::NotConfigured(format!("invalid API path {path}: {e}")))
}
