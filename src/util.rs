use flate2::Compression;
use flate2::write::GzEncoder;
use std::io::Write;
use url::form_urlencoded;

use crate::error::{Error, Result};

/// A single query-string value.
///
/// `Null`, empty text and empty lists are dropped by [`build_query_params`].
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    Null,
    Text(String),
    Int(i64),
    Bool(bool),
    IntList(Vec<i64>),
    TextList(Vec<String>),
}

impl QueryValue {
    fn render(&self) -> Option<String> {
        match self {
            QueryValue::Null => None,
            QueryValue::Text(s) if s.is_empty() => None,
            QueryValue::Text(s) => Some(s.clone()),
            QueryValue::Int(i) => Some(i.to_string()),
            QueryValue::Bool(b) => Some(b.to_string()),
            QueryValue::IntList(v) if v.is_empty() => None,
            // Lists go out as JSON arrays, which is what the list endpoints accept.
            QueryValue::IntList(v) => serde_json::to_string(v).ok(),
            QueryValue::TextList(v) if v.is_empty() => None,
            QueryValue::TextList(v) => serde_json::to_string(v).ok(),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(v: &str) -> Self {
        QueryValue::Text(v.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(v: String) -> Self {
        QueryValue::Text(v)
    }
}

impl From<i64> for QueryValue {
    fn from(v: i64) -> Self {
        QueryValue::Int(v)
    }
}

impl From<u32> for QueryValue {
    fn from(v: u32) -> Self {
        QueryValue::Int(i64::from(v))
    }
}

impl From<bool> for QueryValue {
    fn from(v: bool) -> Self {
        QueryValue::Bool(v)
    }
}

impl From<Vec<i64>> for QueryValue {
    fn from(v: Vec<i64>) -> Self {
        QueryValue::IntList(v)
    }
}

impl From<Vec<String>> for QueryValue {
    fn from(v: Vec<String>) -> Self {
        QueryValue::TextList(v)
    }
}

impl<T: Into<QueryValue>> From<Option<T>> for QueryValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(QueryValue::Null)
    }
}

/// Renders `params` as a URL-encoded query string, skipping empty values.
///
/// Parameters keep their input order and are joined by `&`.
pub fn build_query_params(params: &[(&str, QueryValue)]) -> String {
    let mut out = form_urlencoded::Serializer::new(String::new());
    for (key, value) in params {
        if let Some(v) = value.render() {
            out.append_pair(key, &v);
        }
    }
    out.finish()
}

pub(crate) fn append_query(url: &str, query: &str) -> String {
    if query.is_empty() {
        return url.to_string();
    }
    let sep = if url.contains('?') { '&' } else { '?' };
    format!("{}{}{}", url, sep, query)
}

pub(crate) fn urljoin(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{}{}", base, path)
    } else {
        format!("{}/{}", base, path)
    }
}

pub(crate) fn gzip(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::with_capacity(bytes.len() / 4), Compression::default());
    encoder
        .write_all(bytes)
        .map_err(|e| Error::Encode(format!("gzip: {e}")))?;
    encoder
        .finish()
        .map_err(|e| Error::Encode(format!("gzip: {e}")))
}
