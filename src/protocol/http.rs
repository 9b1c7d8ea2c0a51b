// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP implementation of the remote API.

use std::time::Duration;

use reqwest::header::RETRY_AFTER;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::command::DeviceCommand;
use crate::error::ApiError;
use crate::model::RemoteDeviceStatus;
use crate::protocol::{DeviceApi, DeviceSummary, PagedResult, SceneSummary};

// ============================================================================
// ApiConfig - Connection parameters
// ============================================================================

/// Configuration for the remote API client.
///
/// # Examples
///
/// ```
/// use smartdeck_lib::protocol::ApiConfig;
/// use std::time::Duration;
///
/// // Production endpoint
/// let config = ApiConfig::new();
/// assert_eq!(config.base_url(), "https://api.smartthings.com/v1");
///
/// // Local mock with a short timeout
/// let config = ApiConfig::new()
///     .with_base_url("http://127.0.0.1:8080/")
///     .with_timeout(Duration::from_secs(2));
/// assert_eq!(config.base_url(), "http://127.0.0.1:8080");
/// ```
#[derive(Debug, Clone)]
pub struct ApiConfig {
    base_url: String,
    timeout: Duration,
}

impl ApiConfig {
    /// Default API root.
    pub const DEFAULT_BASE_URL: &'static str = "https://api.smartthings.com/v1";
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Sets the API root. A trailing slash is ignored.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the API root.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Creates an `HttpClient` from this configuration.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidAddress` if the base URL is not an HTTP(S)
    /// URL, or `ApiError::Http` if the client cannot be created.
    pub fn into_client(self) -> Result<HttpClient, ApiError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ApiError::InvalidAddress(self.base_url));
        }

        let client = Client::builder().timeout(self.timeout).build()?;

        Ok(HttpClient {
            base_url: self.base_url,
            timeout: self.timeout,
            client,
        })
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// HttpClient
// ============================================================================

/// Client for the remote REST API.
///
/// Every request carries `Authorization: Bearer <token>`; the token is never
/// logged. Path ids are percent-encoded.
///
/// # Examples
///
/// ```no_run
/// use smartdeck_lib::protocol::{DeviceApi, HttpClient};
///
/// # async fn example() -> Result<(), smartdeck_lib::error::ApiError> {
/// let client = HttpClient::new()?;
/// let status = client.device_status("device-id", "token").await?;
/// println!("door: {:?}", status.door_value());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    base_url: String,
    timeout: Duration,
    client: Client,
}

impl HttpClient {
    /// Creates a client for the production endpoint.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn new() -> Result<Self, ApiError> {
        ApiConfig::new().into_client()
    }

    /// Returns the API root.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds the URL of a resource below a collection.
    fn resource_url(&self, collection: &str, id: &str, action: &str) -> String {
        format!(
            "{}/{collection}/{}/{action}",
            self.base_url,
            urlencoding::encode(id)
        )
    }

    fn collection_url(&self, collection: &str) -> String {
        format!("{}/{collection}", self.base_url)
    }

    /// Sends a request and returns the body of a successful response.
    async fn execute(&self, request: RequestBuilder, token: &str) -> Result<String, ApiError> {
        let response = request
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let response = Self::check_status(response).await?;
        let body = response.text().await.map_err(|e| self.transport_error(e))?;

        tracing::trace!(body = %body, "Received API response");

        Ok(body)
    }

    async fn check_status(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse().ok());
        let body = response.text().await.unwrap_or_default();

        tracing::debug!(status = status.as_u16(), "API request failed");

        Err(ApiError::from_status(status.as_u16(), retry_after, body))
    }

    fn transport_error(&self, error: reqwest::Error) -> ApiError {
        if error.is_timeout() {
            ApiError::Timeout(u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX))
        } else {
            ApiError::Http(error)
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, token: &str) -> Result<T, ApiError> {
        tracing::debug!(url = %url, "Sending API query");

        let body = self.execute(self.client.get(url), token).await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Malformed(e.to_string()))
    }
}

impl DeviceApi for HttpClient {
    async fn device_status(
        &self,
        device_id: &str,
        token: &str,
    ) -> Result<RemoteDeviceStatus, ApiError> {
        let url = self.resource_url("devices", device_id, "status");
        self.get_json(&url, token).await
    }

    async fn send_command(
        &self,
        device_id: &str,
        token: &str,
        command: &DeviceCommand,
    ) -> Result<(), ApiError> {
        let url = self.resource_url("devices", device_id, "commands");

        tracing::debug!(url = %url, command = %command, "Sending device command");

        self.execute(self.client.post(&url).json(&[command]), token)
            .await
            .map(drop)
    }

    async fn execute_scene(&self, scene_id: &str, token: &str) -> Result<(), ApiError> {
        let url = self.resource_url("scenes", scene_id, "execute");

        tracing::debug!(url = %url, "Executing scene");

        self.execute(self.client.post(&url), token).await.map(drop)
    }

    async fn list_devices(&self, token: &str) -> Result<Vec<DeviceSummary>, ApiError> {
        let page: PagedResult<DeviceSummary> =
            self.get_json(&self.collection_url("devices"), token).await?;
        Ok(page.items)
    }

    async fn list_scenes(&self, token: &str) -> Result<Vec<SceneSummary>, ApiError> {
        let page: PagedResult<SceneSummary> =
            self.get_json(&self.collection_url("scenes"), token).await?;
        Ok(page.items)
    }
}
