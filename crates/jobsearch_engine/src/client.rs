use std::time::Duration;

use futures_util::StreamExt;
use jobsearch_logging::search_debug;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use url::Url;

use crate::{FailureKind, FetchError, Scalar};

pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:8000";

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub api_base: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
    /// Sent as `authorization: Bearer <token>` when set.
    pub bearer_token: Option<String>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_bytes: 5 * 1024 * 1024,
            bearer_token: None,
        }
    }
}

/// Resolve `path` against `base` and append every present parameter.
///
/// A missing trailing slash on `base` and a leading slash on `path` are both
/// tolerated, so `http://host/api` + `/jobs` yields `http://host/api/jobs`.
pub fn api_url(base: &str, path: &str, params: &[(String, Option<Scalar>)]) -> Result<Url, FetchError> {
    let base = if base.ends_with('/') {
        base.to_string()
    } else {
        format!("{base}/")
    };
    let mut url = Url::parse(&base)
        .and_then(|base| base.join(path.trim_start_matches('/')))
        .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;

    let mut present = params
        .iter()
        .filter_map(|(name, value)| value.as_ref().map(|value| (name, value)))
        .peekable();
    if present.peek().is_some() {
        let mut pairs = url.query_pairs_mut();
        for (name, value) in present {
            pairs.append_pair(name, &value.to_string());
        }
    }
    Ok(url)
}

/// Read-only JSON transport: GET `path` with query parameters.
#[async_trait::async_trait]
pub trait QueryClient: Send + Sync {
    async fn fetch_json(
        &self,
        path: &str,
        params: &[(String, Option<Scalar>)],
    ) -> Result<serde_json::Value, FetchError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestQueryClient {
    settings: ClientSettings,
    client: reqwest::Client,
}

impl ReqwestQueryClient {
    pub fn new(settings: ClientSettings) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(token) = settings.bearer_token.as_deref() {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .default_headers(headers)
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self { settings, client })
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }
}

#[async_trait::async_trait]
impl QueryClient for ReqwestQueryClient {
    async fn fetch_json(
        &self,
        path: &str,
        params: &[(String, Option<Scalar>)],
    ) -> Result<serde_json::Value, FetchError> {
        let url = api_url(&self.settings.api_base, path, params)?;
        search_debug!("GET {}", url);

        let response = self.client.get(url).send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.canonical_reason().unwrap_or_default(),
            ));
        }

        if let Some(content_len) = response.content_length() {
            if content_len > self.settings.max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.settings.max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.settings.max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.settings.max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }

        serde_json::from_slice(&bytes)
            .map_err(|err| FetchError::new(FailureKind::InvalidJson, err.to_string()))
    }
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}
