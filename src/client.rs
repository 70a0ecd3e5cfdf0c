use indicatif::{ProgressBar, ProgressStyle};
use reqwest::blocking::{Client as HttpClient, RequestBuilder, Response};
use reqwest::StatusCode;
use reqwest::header::{
    ACCEPT, AUTHORIZATION, CONTENT_ENCODING, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::auth::{CredentialProvider, OAuthClientCredentials};
use crate::config::Settings;
use crate::data_models::DataModelsResource;
use crate::error::{Error, Result, api_error};
use crate::time_series::TimeSeriesResource;
use crate::units::UnitsResource;
use crate::util::{append_query, gzip, urljoin};

/// Version reported in the `x-cdp-sdk` header.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Base URL of a cluster: `https://{cluster}.cognitedata.com`.
pub fn base_url_for(cluster: &str) -> String {
    format!("https://{}.cognitedata.com", cluster)
}

#[derive(Clone)]
pub struct ClientConfig {
    /// Application name, sent as `x-cdp-app`.
    pub client_name: String,
    pub cluster: String,
    pub project: String,
    pub credentials: Arc<dyn CredentialProvider>,
    /// Replaces the URL derived from `cluster`, e.g. for a proxy.
    pub base_url: Option<String>,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(
        client_name: impl Into<String>,
        cluster: impl Into<String>,
        project: impl Into<String>,
        credentials: impl CredentialProvider + 'static,
    ) -> Self {
        Self {
            client_name: client_name.into(),
            cluster: cluster.into(),
            project: project.into(),
            credentials: Arc::new(credentials),
            base_url: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("client_name", &self.client_name)
            .field("cluster", &self.cluster)
            .field("project", &self.project)
            .field("credentials", &self.credentials)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Client for one project.
///
/// Cheap to clone; all clones share the same immutable state, so a client can
/// be used from several threads at once.
#[derive(Debug, Clone)]
pub struct Client {
    inner: Arc<ApiClient>,
}

/// State shared by the client and every resource handle.
#[derive(Debug, Clone)]
pub(crate) struct ApiClient {
    client_name: String,
    cluster: String,
    project: String,
    base_url: String,
    headers: HeaderMap,
    progress: bool,
    http: HttpClient,
}

impl Client {
    /// Creates a client from environment variables and/or `.cdfapirc`, using
    /// Azure AD client credentials.
    pub fn from_env() -> Result<Self> {
        Self::from_settings(Settings::from_env()?)
    }

    pub fn from_settings(settings: Settings) -> Result<Self> {
        let credentials = OAuthClientCredentials::azure_ad(
            &settings.client_id,
            &settings.client_secret,
            &settings.tenant_id,
            &settings.cluster,
        )?;
        Self::new(ClientConfig::new(
            settings.client_name,
            settings.cluster,
            settings.project,
            credentials,
        ))
    }

    /// Fetches a token from the configured credentials and builds a client
    /// whose every request carries it.
    pub fn new(config: ClientConfig) -> Result<Self> {
        if config.cluster.trim().is_empty() {
            return Err(Error::Config("cluster must not be empty".to_string()));
        }

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| base_url_for(&config.cluster));

        let token = config.credentials.fetch_token()?;
        let headers = default_headers(&config.client_name, &token)?;

        let http = HttpClient::builder()
            .default_headers(headers.clone())
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))?;

        debug!(
            project = %config.project,
            base_url = %base_url,
            "created client"
        );

        Ok(Self {
            inner: Arc::new(ApiClient {
                client_name: config.client_name,
                cluster: config.cluster,
                project: config.project,
                base_url,
                headers,
                progress: false,
                http,
            }),
        })
    }

    /// Shows a terminal spinner while bulk datapoint requests are in flight.
    pub fn with_progress(mut self, progress: bool) -> Self {
        Arc::make_mut(&mut self.inner).progress = progress;
        self
    }

    pub fn time_series(&self) -> TimeSeriesResource {
        TimeSeriesResource::new(Arc::clone(&self.inner))
    }

    pub fn units(&self) -> UnitsResource {
        UnitsResource::new(Arc::clone(&self.inner))
    }

    pub fn data_models(&self) -> DataModelsResource {
        DataModelsResource::new(Arc::clone(&self.inner))
    }

    pub fn client_name(&self) -> &str {
        &self.inner.client_name
    }

    pub fn cluster(&self) -> &str {
        &self.inner.cluster
    }

    pub fn project(&self) -> &str {
        &self.inner.project
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Headers attached to every request.
    pub fn headers(&self) -> &HeaderMap {
        &self.inner.headers
    }
}

fn default_headers(client_name: &str, token: &str) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();

    let mut bearer = HeaderValue::from_str(&format!("Bearer {}", token))
        .map_err(|_| Error::Auth("access token is not a valid header value".to_string()))?;
    bearer.set_sensitive(true);
    headers.insert(AUTHORIZATION, bearer);

    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(
        "x-cdp-app",
        HeaderValue::from_str(client_name)
            .map_err(|_| Error::Config(format!("invalid client name {:?}", client_name)))?,
    );
    headers.insert(
        "x-cdp-sdk",
        HeaderValue::from_str(&format!("cdfapi-rs:{}", SDK_VERSION))
            .unwrap_or(HeaderValue::from_static("cdfapi-rs")),
    );
    headers.insert("cdf-version", HeaderValue::from_static("beta"));
    headers.insert(
        USER_AGENT,
        HeaderValue::from_str(&format!("cdfapi-rs/{}", SDK_VERSION))
            .unwrap_or(HeaderValue::from_static("cdfapi-rs")),
    );

    Ok(headers)
}

impl ApiClient {
    /// Full URL of a project-scoped API path such as `/timeseries`.
    pub(crate) fn endpoint(&self, path: &str) -> String {
        urljoin(
            &self.base_url,
            &format!("/api/v1/projects/{}{}", self.project, path),
        )
    }

    pub(crate) fn get_json<TResp: DeserializeOwned>(
        &self,
        path: &str,
        query: &str,
    ) -> Result<TResp> {
        let url = append_query(&self.endpoint(path), query);
        let resp = self.send("GET", &url, self.http.get(&url))?;
        read_json(resp, &url)
    }

    pub(crate) fn post_json<TReq: Serialize + ?Sized, TResp: DeserializeOwned>(
        &self,
        path: &str,
        request: &TReq,
    ) -> Result<TResp> {
        let url = self.endpoint(path);
        let resp = self.send("POST", &url, self.http.post(&url).json(request))?;
        read_json(resp, &url)
    }

    /// Posts `request` as gzip-compressed JSON and decodes a protobuf reply.
    pub(crate) fn post_protobuf<TReq: Serialize + ?Sized, TResp: prost::Message + Default>(
        &self,
        path: &str,
        request: &TReq,
    ) -> Result<TResp> {
        let url = self.endpoint(path);
        let json = serde_json::to_vec(request).map_err(|e| Error::Encode(e.to_string()))?;
        let body = gzip(&json)?;
        debug!(
            raw_bytes = json.len(),
            compressed_bytes = body.len(),
            "compressed request body"
        );

        let req = self
            .http
            .post(&url)
            .header(ACCEPT, "application/protobuf")
            .header(CONTENT_ENCODING, "gzip")
            .body(body);
        let resp = self.send("POST", &url, req)?;

        let bytes = resp.bytes().map_err(|source| Error::Transport {
            url: url.clone(),
            source,
        })?;
        TResp::decode(bytes.as_ref()).map_err(|source| Error::Protobuf { url, source })
    }

    pub(crate) fn spinner(&self, message: &str) -> Option<ProgressBar> {
        if !self.progress {
            return None;
        }
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.green} {msg} [{elapsed}]") {
            pb.set_style(style);
        }
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    }

    fn send(&self, method: &str, url: &str, req: RequestBuilder) -> Result<Response> {
        debug!(method, url, "sending request");
        let started = Instant::now();

        let resp = req.send().map_err(|source| Error::Transport {
            url: url.to_string(),
            source,
        })?;

        let status = resp.status();
        debug!(
            method,
            url,
            %status,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "received response"
        );

        // Every endpoint answers 200; any other status, 2xx included, is an error.
        if status != StatusCode::OK {
            let body = error_body(resp.text());
            warn!(method, url, %status, "request failed");
            return Err(api_error(status, url, body));
        }

        Ok(resp)
    }
}

fn error_body<E: fmt::Display>(text: std::result::Result<String, E>) -> String {
    text.unwrap_or_else(|e| format!("error reading response body: {}", e))
}

fn read_json<TResp: DeserializeOwned>(resp: Response, url: &str) -> Result<TResp> {
    let text = resp.text().map_err(|source| Error::Transport {
        url: url.to_string(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| Error::Json {
        url: url.to_string(),
        source,
    })
}
