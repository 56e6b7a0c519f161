use std::time::Duration;

use gitsearch_logging::gs_debug;
use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use url::Url;

use crate::{FailureKind, FetchError, ProfilePayload, RecordPayload};

pub const GITHUB_API_ROOT: &str = "https://api.github.com/";
pub const GITHUB_ACCEPT: &str = "application/vnd.github+json";

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub api_root: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub user_agent: String,
    pub accept: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            api_root: GITHUB_API_ROOT.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            user_agent: concat!("gitsearch/", env!("CARGO_PKG_VERSION")).to_string(),
            accept: GITHUB_ACCEPT.to_string(),
        }
    }
}

/// Remote source of profiles and their paginated records.
#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch_profile(&self, identifier: &str) -> Result<ProfilePayload, FetchError>;

    /// `page` is 1-based.
    async fn fetch_records(
        &self,
        identifier: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<RecordPayload>, FetchError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    settings: FetchSettings,
    client: reqwest::Client,
}

impl ReqwestFetcher {
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    fn user_url(&self, identifier: &str, tail: Option<&str>) -> Result<Url, FetchError> {
        let mut url = Url::parse(&self.settings.api_root)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
        {
            let mut segments = url.path_segments_mut().map_err(|()| {
                FetchError::new(FailureKind::InvalidUrl, "api root cannot be a base")
            })?;
            segments.pop_if_empty().push("users").push(identifier);
            if let Some(tail) = tail {
                segments.push(tail);
            }
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, FetchError> {
        gs_debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .header(ACCEPT, self.settings.accept.as_str())
            .header(USER_AGENT, self.settings.user_agent.as_str())
            .send()
            .await
            .map_err(map_reqwest_error)?;

        // Only a plain 200 counts as success.
        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let body = response.text().await.map_err(map_reqwest_error)?;
        serde_json::from_str(&body)
            .map_err(|err| FetchError::new(FailureKind::Decode, err.to_string()))
    }
}

#[async_trait::async_trait]
impl Fetcher for ReqwestFetcher {
    async fn fetch_profile(&self, identifier: &str) -> Result<ProfilePayload, FetchError> {
        let url = self.user_url(identifier, None)?;
        self.get_json(url).await
    }

    async fn fetch_records(
        &self,
        identifier: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<RecordPayload>, FetchError> {
        let mut url = self.user_url(identifier, Some("repos"))?;
        url.query_pairs_mut()
            .append_pair("per_page", &per_page.to_string())
            .append_pair("page", &page.to_string());
        self.get_json(url).await
    }
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return FetchError::new(FailureKind::Decode, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}
