//! Portal REST Client
//!
//! `reqwest` implementation of the check-in services.
//!
//! | call                     | request                              |
//! |--------------------------|--------------------------------------|
//! | saved contacts           | `GET  {base}/checkIn/contacts/{user}` |
//! | holds                    | `GET  {base}/checkIn/holds/{user}`    |
//! | submit                   | `POST {base}/checkIn/submit`          |

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error, info};
use reqwest::{Client, RequestBuilder, StatusCode, Url};

use crate::config::Settings;
use crate::workflow::model::{EmergencyContact, Holds};
use crate::workflow::payload::SubmissionPayload;

use super::{ContactService, HoldService, ServiceError, SubmissionService};

/// HTTP client for the student portal API.
#[derive(Debug, Clone)]
pub struct PortalClient {
    http: Client,
    base_url: Url,
    token: Option<String>,
}

impl PortalClient {
    /// Builds a client from settings.
    pub fn new(settings: &Settings) -> Result<Self, ServiceError> {
        let raw = settings.api_base_url.trim();
        if raw.is_empty() {
            return Err(ServiceError::Config("api_base_url is empty".to_string()));
        }

        let base_url = Url::parse(raw)
            .map_err(|e| ServiceError::Config(format!("invalid api_base_url '{}': {}", raw, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ServiceError::Config(format!(
                "api_base_url '{}' cannot hold a path",
                raw
            )));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url,
            token: settings.token.clone(),
        })
    }

    /// Absolute URL for an API path. Each segment is percent-encoded, so a
    /// username can never add path components of its own.
    pub fn url(&self, segments: &[&str]) -> Result<Url, ServiceError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ServiceError::Config("api_base_url cannot hold a path".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[async_trait]
impl ContactService for PortalClient {
    async fn get_emergency_contacts(
        &self,
        username: &str,
    ) -> Result<Vec<EmergencyContact>, ServiceError> {
        let url = self.url(&["checkIn", "contacts", username])?;
        debug!("GET {}", url);

        let response = self.authorize(self.http.get(url)).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(ServiceError::NotFound);
        }
        if !response.status().is_success() {
            return Err(ServiceError::Status(response.status().as_u16()));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl HoldService for PortalClient {
    async fn get_holds(&self, username: &str) -> Result<Holds, ServiceError> {
        let url = self.url(&["checkIn", "holds", username])?;
        debug!("GET {}", url);

        let response = self.authorize(self.http.get(url)).send().await?;
        match response.status() {
            StatusCode::NOT_FOUND => Err(ServiceError::NotFound),
            status if !status.is_success() => Err(ServiceError::Status(status.as_u16())),
            _ => Ok(response.json().await?),
        }
    }
}

#[async_trait]
impl SubmissionService for PortalClient {
    async fn submit(&self, payload: &SubmissionPayload) -> Result<(), ServiceError> {
        let url = self.url(&["checkIn", "submit"])?;
        info!("Submitting check-in for {}", payload.username);

        let response = self
            .authorize(self.http.post(url))
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        if status == StatusCode::BAD_REQUEST || status == StatusCode::UNPROCESSABLE_ENTITY {
            let reason = response.text().await.unwrap_or_default();
            error!("Check-in rejected ({}): {}", status, reason);
            return Err(ServiceError::Rejected(reason));
        }

        error!("Check-in submission failed with status {}", status);
        Err(ServiceError::Status(status.as_u16()))
    }
}
