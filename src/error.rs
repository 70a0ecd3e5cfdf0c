use reqwest::StatusCode;
use serde_json::Value;

/// Result type used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors returned by the client.
///
/// Nothing is retried internally: every failure surfaces to the caller.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The request never produced a response (DNS, TLS, connection reset, timeout).
    #[error("request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("API request failed: HTTP {status} for url ({url})\n{message}")]
    Api {
        status: StatusCode,
        url: String,
        message: String,
        body: String,
    },

    #[error("failed to parse API JSON (url={url})")]
    Json {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to decode protobuf response (url={url})")]
    Protobuf {
        url: String,
        #[source]
        source: prost::DecodeError,
    },

    #[error("failed to encode request body: {0}")]
    Encode(String),

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    /// A data-point item arrived without any of the numeric, string or aggregate payloads.
    #[error("datapoints for {0} carry no recognised datapoint type")]
    UnknownDatapointType(String),

    #[error("datapoints for {0} are not numeric")]
    NotNumeric(String),

    #[cfg(feature = "plot")]
    #[error("failed to render chart: {0}")]
    Plot(String),
}

impl Error {
    /// HTTP status of an [`Error::Api`], if that is what this is.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Debug, serde::Deserialize)]
pub(crate) struct CdfErrorResponse {
    pub(crate) error: CdfErrorBody,
}

#[derive(Debug, serde::Deserialize)]
pub(crate) struct CdfErrorBody {
    #[serde(default)]
    pub(crate) code: Option<u16>,
    #[serde(default)]
    pub(crate) message: Option<String>,
    #[serde(default)]
    pub(crate) missing: Vec<Value>,
    #[serde(default)]
    pub(crate) duplicated: Vec<Value>,
}

/// Builds an [`Error::Api`] from a failed response, using the platform error
/// document in `body` when there is one.
pub(crate) fn api_error(status: StatusCode, url: &str, body: String) -> Error {
    let message = match serde_json::from_str::<CdfErrorResponse>(&body) {
        Ok(parsed) => format_cdf_error(status, &parsed.error),
        Err(_) => body.trim().to_string(),
    };

    Error::Api {
        status,
        url: url.to_string(),
        message,
        body,
    }
}

fn format_cdf_error(status: StatusCode, e: &CdfErrorBody) -> String {
    let message = e.message.as_deref().unwrap_or("");
    let code = e.code.unwrap_or(status.as_u16());

    let mut out = if code != status.as_u16() {
        format!("{} (code {})", message, code)
    } else {
        message.to_string()
    };

    if status == StatusCode::UNAUTHORIZED {
        out.push_str(
            "\n- Check CLIENT_ID / CLIENT_SECRET / TENANT_ID\n- Ensure the token was issued for this cluster (scope https://<cluster>.cognitedata.com/.default)",
        );
    } else if status == StatusCode::FORBIDDEN {
        out.push_str(
            "\n- The service principal lacks capabilities for this resource in the project\n- Check group membership and the dataset scope of its capabilities",
        );
    }

    if !e.missing.is_empty() {
        out.push_str(&format!("\nmissing: {}", join_values(&e.missing)));
    }
    if !e.duplicated.is_empty() {
        out.push_str(&format!("\nduplicated: {}", join_values(&e.duplicated)));
    }

    out
}

fn join_values(values: &[Value]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_body_is_kept_verbatim() {
        let err = api_error(
            StatusCode::BAD_GATEWAY,
            "https://x/api",
            " upstream down ".to_string(),
        );
        let text = err.to_string();
        assert!(text.contains("502 Bad Gateway"));
        assert!(text.contains("upstream down"));
        assert_eq!(err.status(), Some(StatusCode::BAD_GATEWAY));
    }

    #[test]
    fn platform_error_document_is_parsed() {
        let body = r#"{"error":{"code":400,"message":"Time series not found","missing":[{"externalId":"abc"}]}}"#;
        let err = api_error(StatusCode::BAD_REQUEST, "https://x/api", body.to_string());

        match &err {
            Error::Api { message, body: raw, .. } => {
                assert!(message.starts_with("Time series not found"));
                assert!(message.contains(r#"missing: {"externalId":"abc"}"#));
                assert_eq!(raw, body);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains("400 Bad Request"));
    }

    #[test]
    fn unauthorized_adds_hints() {
        let body = r#"{"error":{"code":401,"message":"Unauthorized"}}"#;
        let err = api_error(StatusCode::UNAUTHORIZED, "u", body.to_string());
        let text = err.to_string();
        assert!(text.contains("401 Unauthorized"));
        assert!(text.contains("CLIENT_SECRET"));
    }

    #[test]
    fn mismatched_code_is_reported() {
        let body = r#"{"error":{"code":409,"message":"conflict"}}"#;
        let err = api_error(StatusCode::BAD_REQUEST, "u", body.to_string());
        assert!(err.to_string().contains("conflict (code 409)"));
    }

    #[test]
    fn non_api_errors_have_no_status() {
        assert_eq!(Error::Config("x".into()).status(), None);
    }
}
