//! A small Rust client for the Cognite Data Fusion (CDF) REST API.
//!
//! Covers time series (including bulk datapoint retrieval over protobuf), the
//! unit catalog and data modeling (listing models, instance search and
//! GraphQL).
//!
//! ## Quick start
//! - Configure a service principal via environment variables (`CLIENT_ID`,
//!   `CLIENT_SECRET`, `TENANT_ID`, `CDF_CLUSTER`, `CDF_PROJECT`) or a
//!   `.cdfapirc` file in the current or home directory.
//! - Build a [`Client`] and call the resource accessors.
//!
//! ```no_run
//! use cdfapi::Client;
//! use cdfapi::dto::{Aggregate, DataPointsQuery, DataPointsQueryItem, TimeSeriesListParams};
//!
//! fn main() -> cdfapi::Result<()> {
//!     let client = Client::from_env()?;
//!
//!     let page = client.time_series().list(&TimeSeriesListParams::with_limit(100))?;
//!     println!("{} time series", page.items.len());
//!
//!     let query = DataPointsQuery::new(vec![DataPointsQueryItem {
//!         start: Some("30d-ago".into()),
//!         aggregates: vec![Aggregate::Average],
//!         granularity: Some("1h".into()),
//!         ..DataPointsQueryItem::external_id("my-sensor")
//!     }]);
//!     let response = client.time_series().retrieve_data(&query)?;
//!     for item in &response.items {
//!         println!("{}: {} datapoints", item.external_id, item.datapoints()?.len());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! Requests are never retried; every failure is returned as an [`Error`].

#![forbid(unsafe_code)]

mod auth;
mod client;
mod config;
mod data_models;
pub mod dto;
mod error;
#[cfg(feature = "plot")]
pub mod plot;
mod time_series;
mod units;
mod util;

pub use auth::{CredentialProvider, OAuthClientCredentials, Token};
pub use client::{Client, ClientConfig, SDK_VERSION, base_url_for};
pub use config::{DEFAULT_CLIENT_NAME, Settings};
pub use data_models::DataModelsResource;
pub use error::{Error, Result};
pub use time_series::TimeSeriesResource;
pub use units::UnitsResource;
pub use util::{QueryValue, build_query_params};
