use std::time::Duration;

use serde::de::DeserializeOwned;
use tracker_core::{JobHandle, JobParameters, StatusSnapshot};
use tracker_logging::{tracker_debug, tracker_warn};
use url::Url;

use crate::wire::{StatusResponse, SubmitResponse};
use crate::{ClientError, FailureKind};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// Root of the analysis service; endpoint paths are appended to it.
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Transport to the analysis service. Implementations keep no per-job state.
#[async_trait::async_trait]
pub trait JobClient: Send + Sync {
    async fn submit(&self, params: &JobParameters) -> Result<JobHandle, ClientError>;

    async fn fetch_status(&self, handle: &JobHandle) -> Result<StatusSnapshot, ClientError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestJobClient {
    base_url: Url,
    client: reqwest::Client,
}

impl ReqwestJobClient {
    pub fn new(settings: ClientSettings) -> Result<Self, ClientError> {
        let base_url = Url::parse(settings.base_url.trim())
            .map_err(|err| ClientError::new(FailureKind::InvalidUrl, err.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::new(
                FailureKind::InvalidUrl,
                format!("{base_url} cannot be used as a base URL"),
            ));
        }

        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ClientError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self { base_url, client })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                ClientError::new(FailureKind::InvalidUrl, "base URL cannot carry a path")
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ClientError> {
        tracker_debug!("GET {}", url);
        let response = self.client.get(url).send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let body = response.bytes().await.map_err(map_reqwest_error)?;
        serde_json::from_slice(&body)
            .map_err(|err| ClientError::new(FailureKind::Decode, err.to_string()))
    }
}

#[async_trait::async_trait]
impl JobClient for ReqwestJobClient {
    async fn submit(&self, params: &JobParameters) -> Result<JobHandle, ClientError> {
        let mut url = self.endpoint(&["analyse-start"])?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("url", params.url().as_str());
            if let Some(max_references) = params.max_references() {
                query.append_pair("max_references", &max_references.to_string());
            }
            if let Some(days_old) = params.days_old() {
                query.append_pair("days_old", &days_old.to_string());
            }
        }

        let response: SubmitResponse = self.get_json(url).await.inspect_err(|err| {
            tracker_warn!("submit for {} failed: {}", params.url(), err);
        })?;
        if response.analysis_id.trim().is_empty() {
            return Err(ClientError::new(
                FailureKind::Decode,
                "service returned an empty analysis id",
            ));
        }
        Ok(response.into_handle())
    }

    async fn fetch_status(&self, handle: &JobHandle) -> Result<StatusSnapshot, ClientError> {
        let url = self.endpoint(&["analyse-status", handle.as_str()])?;
        let response: StatusResponse = self.get_json(url).await.inspect_err(|err| {
            tracker_warn!("status check for {} failed: {}", handle, err);
        })?;
        Ok(response.into_snapshot())
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ClientError {
    if err.is_timeout() {
        return ClientError::new(FailureKind::Timeout, err.to_string());
    }
    ClientError::new(FailureKind::Network, err.to_string())
}
