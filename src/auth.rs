use reqwest::blocking::Client as HttpClient;
use std::fmt;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::error::{Error, Result};

/// Tokens are treated as expired this long before the identity provider says so.
const EXPIRY_MARGIN_SECS: u64 = 60;
/// Lifetime assumed when the token response carries no `expires_in`.
const DEFAULT_TOKEN_TTL_SECS: u64 = 3600;

/// Source of bearer tokens for [`Client`](crate::Client).
pub trait CredentialProvider: fmt::Debug + Send + Sync {
    fn fetch_token(&self) -> Result<String>;
}

/// A pre-acquired access token.
#[derive(Clone)]
pub struct Token {
    access_token: String,
}

impl Token {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
        }
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token").field("access_token", &"<redacted>").finish()
    }
}

impl CredentialProvider for Token {
    fn fetch_token(&self) -> Result<String> {
        Ok(self.access_token.clone())
    }
}

#[derive(Debug, serde::Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

#[derive(Debug, serde::Deserialize)]
struct TokenErrorResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

/// OAuth2 client-credentials grant against an authority such as Azure AD.
///
/// Tokens are cached until shortly before they expire; [`fetch_token`]
/// reuses the cached token silently and only goes back to the token endpoint
/// once it is stale.
///
/// [`fetch_token`]: CredentialProvider::fetch_token
pub struct OAuthClientCredentials {
    client_id: String,
    client_secret: String,
    authority_uri: String,
    cluster: String,
    token_url: Option<String>,
    scopes: Vec<String>,
    http: HttpClient,
    cache: Mutex<Option<CachedToken>>,
}

impl OAuthClientCredentials {
    /// Credentials for an Azure AD tenant, scoped to the given cluster.
    pub fn azure_ad(
        client_id: &str,
        client_secret: &str,
        tenant_id: &str,
        cluster: &str,
    ) -> Result<Self> {
        Self::new(
            client_id,
            client_secret,
            &format!("https://login.microsoftonline.com/{}", tenant_id),
            cluster,
        )
    }

    pub fn new(
        client_id: &str,
        client_secret: &str,
        authority_uri: &str,
        cluster: &str,
    ) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            authority_uri: authority_uri.trim_end_matches('/').to_string(),
            cluster: cluster.to_string(),
            token_url: None,
            scopes: vec![format!("https://{}.cognitedata.com/.default", cluster)],
            http,
            cache: Mutex::new(None),
        })
    }

    /// Overrides the token endpoint, which otherwise is
    /// `{authority}/oauth2/v2.0/token`.
    pub fn with_token_url(mut self, token_url: impl Into<String>) -> Self {
        self.token_url = Some(token_url.into());
        self
    }

    pub fn with_scopes(mut self, scopes: Vec<String>) -> Self {
        self.scopes = scopes;
        self
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn authority_uri(&self) -> &str {
        &self.authority_uri
    }

    pub fn cluster(&self) -> &str {
        &self.cluster
    }

    pub fn scopes(&self) -> &[String] {
        &self.scopes
    }

    pub fn token_url(&self) -> String {
        self.token_url
            .clone()
            .unwrap_or_else(|| format!("{}/oauth2/v2.0/token", self.authority_uri))
    }

    fn request_token(&self) -> Result<CachedToken> {
        let url = self.token_url();
        let scope = self.scopes.join(" ");
        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("scope", scope.as_str()),
        ];

        let resp = self
            .http
            .post(&url)
            .form(&form)
            .send()
            .map_err(|source| Error::Transport {
                url: url.clone(),
                source,
            })?;

        let status = resp.status();
        let text = resp.text().map_err(|source| Error::Transport {
            url: url.clone(),
            source,
        })?;

        if !status.is_success() {
            let detail = match serde_json::from_str::<TokenErrorResponse>(&text) {
                Ok(e) => format!(
                    "{}: {}",
                    e.error.as_deref().unwrap_or("error"),
                    e.error_description.as_deref().unwrap_or("")
                ),
                Err(_) => text.trim().to_string(),
            };
            return Err(Error::Auth(format!(
                "token endpoint returned HTTP {} ({})\n{}",
                status, url, detail
            )));
        }

        let token: TokenResponse =
            serde_json::from_str(&text).map_err(|source| Error::Json { url, source })?;
        Ok(CachedToken {
            access_token: token.access_token,
            expires_at: expires_at(Instant::now(), token.expires_in),
        })
    }
}

/// When a token issued at `now` stops being reused. Lifetimes too large to
/// represent fall back to the default.
fn expires_at(now: Instant, expires_in: Option<u64>) -> Instant {
    let ttl = |secs: u64| Duration::from_secs(secs.saturating_sub(EXPIRY_MARGIN_SECS));
    now.checked_add(ttl(expires_in.unwrap_or(DEFAULT_TOKEN_TTL_SECS)))
        .unwrap_or_else(|| now + ttl(DEFAULT_TOKEN_TTL_SECS))
}

impl CredentialProvider for OAuthClientCredentials {
    fn fetch_token(&self) -> Result<String> {
        let mut cache = self
            .cache
            .lock()
            .map_err(|_| Error::Auth("token cache lock poisoned".to_string()))?;

        if let Some(cached) = cache.as_ref() {
            if cached.expires_at > Instant::now() {
                debug!(client_id = %self.client_id, "reusing cached access token");
                return Ok(cached.access_token.clone());
            }
        }

        debug!(
            client_id = %self.client_id,
            authority = %self.authority_uri,
            "acquiring access token with client credentials"
        );
        let fresh = self.request_token()?;
        let access_token = fresh.access_token.clone();
        *cache = Some(fresh);
        Ok(access_token)
    }
}

impl fmt::Debug for OAuthClientCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthClientCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("authority_uri", &self.authority_uri)
            .field("cluster", &self.cluster)
            .field("scopes", &self.scopes)
            .finish_non_exhaustive()
    }
}
