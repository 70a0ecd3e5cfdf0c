use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::common::{Identity, InstanceId, Metadata, TimestampRange};
use crate::util::{QueryValue, build_query_params};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeries {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_id: Option<InstanceId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub is_string: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_external_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_id: Option<i64>,
    #[serde(default)]
    pub is_step: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub security_categories: Vec<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_set_id: Option<i64>,
    pub created_time: i64,
    pub last_updated_time: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesList {
    pub items: Vec<TimeSeries>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

/// Query parameters of `GET /timeseries`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeSeriesListParams {
    pub limit: Option<u32>,
    pub include_metadata: Option<bool>,
    pub cursor: Option<String>,
    pub partition: Option<String>,
    pub asset_ids: Vec<i64>,
    pub root_asset_ids: Vec<i64>,
    pub external_id_prefix: Option<String>,
}

impl TimeSeriesListParams {
    pub fn with_limit(limit: u32) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }

    pub(crate) fn to_query(&self) -> String {
        build_query_params(&[
            ("limit", self.limit.into()),
            ("includeMetadata", self.include_metadata.into()),
            ("cursor", self.cursor.clone().into()),
            ("partition", self.partition.clone().into()),
            ("assetIds", QueryValue::from(self.asset_ids.clone())),
            ("rootAssetIds", QueryValue::from(self.root_asset_ids.clone())),
            ("externalIdPrefix", self.external_id_prefix.clone().into()),
        ])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_external_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_quantity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_string: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_step: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub asset_ids: Vec<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub asset_external_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub root_asset_ids: Vec<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub asset_subtree_ids: Vec<Identity>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub data_set_ids: Vec<Identity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id_prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_time: Option<TimestampRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated_time: Option<TimestampRange>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesSortItem {
    pub property: Vec<String>,
    /// `asc` or `desc`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
    /// `first`, `last` or `auto`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nulls: Option<String>,
}

/// Body of `POST /timeseries/list`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesFilterRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<TimeSeriesFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advanced_filter: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partition: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sort: Vec<TimeSeriesSortItem>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Aggregate {
    Average,
    Max,
    Min,
    Count,
    Sum,
    Interpolation,
    StepInterpolation,
    TotalVariation,
    ContinuousVariance,
    DiscreteVariance,
    CountGood,
    CountUncertain,
    CountBad,
    DurationGood,
    DurationUncertain,
    DurationBad,
}

/// Start or end of a datapoint query: epoch milliseconds or a relative
/// expression such as `300d-ago` or `now`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimeBound {
    Millis(i64),
    Relative(String),
}

impl From<i64> for TimeBound {
    fn from(v: i64) -> Self {
        TimeBound::Millis(v)
    }
}

impl From<&str> for TimeBound {
    fn from(v: &str) -> Self {
        TimeBound::Relative(v.to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataPointsQueryItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_id: Option<InstanceId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<TimeBound>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<TimeBound>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub aggregates: Vec<Aggregate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub granularity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_unit_system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_outside_points: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_status: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignore_bad_data_points: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub treat_uncertain_as_bad: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

impl DataPointsQueryItem {
    pub fn external_id(external_id: impl Into<String>) -> Self {
        Self {
            external_id: Some(external_id.into()),
            ..Self::default()
        }
    }

    pub fn id(id: i64) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }
}

/// Body of `POST /timeseries/data/list`. Top-level fields are defaults for
/// every item and are only sent when set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataPointsQuery {
    pub items: Vec<DataPointsQueryItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<TimeBound>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<TimeBound>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub aggregates: Vec<Aggregate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub granularity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_outside_points: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignore_unknown_ids: Option<bool>,
}

impl DataPointsQuery {
    pub fn new(items: Vec<DataPointsQueryItem>) -> Self {
        Self {
            items,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestDataPointsQueryItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_id: Option<InstanceId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<TimeBound>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_unit_system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_status: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignore_bad_data_points: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub treat_uncertain_as_bad: Option<bool>,
}

impl LatestDataPointsQueryItem {
    pub fn external_id(external_id: impl Into<String>) -> Self {
        Self {
            external_id: Some(external_id.into()),
            ..Self::default()
        }
    }
}

/// Body of `POST /timeseries/data/latest`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestDataPointsQuery {
    pub items: Vec<LatestDataPointsQueryItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignore_unknown_ids: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DatapointValue {
    Numeric(f64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatapointStatus {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub symbol: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatestDatapoint {
    pub timestamp: i64,
    /// Absent for datapoints with a bad status.
    #[serde(default)]
    pub value: Option<DatapointValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<DatapointStatus>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestDatapoints {
    pub id: i64,
    #[serde(default)]
    pub external_id: Option<String>,
    #[serde(default)]
    pub instance_id: Option<InstanceId>,
    #[serde(default)]
    pub is_string: bool,
    #[serde(default)]
    pub is_step: bool,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub unit_external_id: Option<String>,
    pub datapoints: Vec<LatestDatapoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatestDataPointsList {
    pub items: Vec<LatestDatapoints>,
}
