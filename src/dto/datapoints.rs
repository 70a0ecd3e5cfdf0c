//! Protobuf messages returned by `POST /timeseries/data/list`.
//!
//! The schema is fixed by the service; field tags must match it exactly.

use crate::dto::time_series::Aggregate;
use crate::dto::common::InstanceId as JsonInstanceId;
use crate::error::{Error, Result};

pub use data_point_list_item::DatapointType;

#[derive(Clone, PartialEq, prost::Message)]
pub struct Status {
    #[prost(int64, tag = "1")]
    pub code: i64,
    #[prost(string, tag = "2")]
    pub symbol: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct NumericDatapoint {
    #[prost(int64, tag = "1")]
    pub timestamp: i64,
    #[prost(double, tag = "2")]
    pub value: f64,
    #[prost(message, optional, tag = "3")]
    pub status: Option<Status>,
    #[prost(bool, tag = "4")]
    pub null_value: bool,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct NumericDatapoints {
    #[prost(message, repeated, tag = "1")]
    pub datapoints: Vec<NumericDatapoint>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct StringDatapoint {
    #[prost(int64, tag = "1")]
    pub timestamp: i64,
    #[prost(string, tag = "2")]
    pub value: String,
    #[prost(message, optional, tag = "3")]
    pub status: Option<Status>,
    #[prost(bool, tag = "4")]
    pub null_value: bool,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct StringDatapoints {
    #[prost(message, repeated, tag = "1")]
    pub datapoints: Vec<StringDatapoint>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct AggregateDatapoint {
    #[prost(int64, tag = "1")]
    pub timestamp: i64,
    #[prost(double, tag = "2")]
    pub average: f64,
    #[prost(double, tag = "3")]
    pub max: f64,
    #[prost(double, tag = "4")]
    pub min: f64,
    #[prost(double, tag = "5")]
    pub count: f64,
    #[prost(double, tag = "6")]
    pub sum: f64,
    #[prost(double, tag = "7")]
    pub interpolation: f64,
    #[prost(double, tag = "8")]
    pub step_interpolation: f64,
    #[prost(double, tag = "9")]
    pub continuous_variance: f64,
    #[prost(double, tag = "10")]
    pub discrete_variance: f64,
    #[prost(double, tag = "11")]
    pub total_variation: f64,
    #[prost(double, tag = "12")]
    pub count_good: f64,
    #[prost(double, tag = "13")]
    pub count_uncertain: f64,
    #[prost(double, tag = "14")]
    pub count_bad: f64,
    #[prost(double, tag = "15")]
    pub duration_good: f64,
    #[prost(double, tag = "16")]
    pub duration_uncertain: f64,
    #[prost(double, tag = "17")]
    pub duration_bad: f64,
}

impl AggregateDatapoint {
    pub fn get(&self, aggregate: Aggregate) -> f64 {
        match aggregate {
            Aggregate::Average => self.average,
            Aggregate::Max => self.max,
            Aggregate::Min => self.min,
            Aggregate::Count => self.count,
            Aggregate::Sum => self.sum,
            Aggregate::Interpolation => self.interpolation,
            Aggregate::StepInterpolation => self.step_interpolation,
            Aggregate::ContinuousVariance => self.continuous_variance,
            Aggregate::DiscreteVariance => self.discrete_variance,
            Aggregate::TotalVariation => self.total_variation,
            Aggregate::CountGood => self.count_good,
            Aggregate::CountUncertain => self.count_uncertain,
            Aggregate::CountBad => self.count_bad,
            Aggregate::DurationGood => self.duration_good,
            Aggregate::DurationUncertain => self.duration_uncertain,
            Aggregate::DurationBad => self.duration_bad,
        }
    }
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct AggregateDatapoints {
    #[prost(message, repeated, tag = "1")]
    pub datapoints: Vec<AggregateDatapoint>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct InstanceId {
    #[prost(string, tag = "1")]
    pub space: String,
    #[prost(string, tag = "2")]
    pub external_id: String,
}

impl From<InstanceId> for JsonInstanceId {
    fn from(id: InstanceId) -> Self {
        JsonInstanceId {
            space: id.space,
            external_id: id.external_id,
        }
    }
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct DataPointListItem {
    #[prost(int64, tag = "1")]
    pub id: i64,
    #[prost(string, tag = "2")]
    pub external_id: String,
    #[prost(bool, tag = "6")]
    pub is_string: bool,
    #[prost(bool, tag = "7")]
    pub is_step: bool,
    #[prost(string, tag = "8")]
    pub unit: String,
    #[prost(string, tag = "9")]
    pub next_cursor: String,
    #[prost(string, tag = "10")]
    pub unit_external_id: String,
    #[prost(message, optional, tag = "11")]
    pub instance_id: Option<InstanceId>,
    #[prost(oneof = "data_point_list_item::DatapointType", tags = "3, 4, 5")]
    pub datapoint_type: Option<DatapointType>,
}

pub mod data_point_list_item {
    #[derive(Clone, PartialEq, prost::Oneof)]
    pub enum DatapointType {
        #[prost(message, tag = "3")]
        NumericDatapoints(super::NumericDatapoints),
        #[prost(message, tag = "4")]
        StringDatapoints(super::StringDatapoints),
        #[prost(message, tag = "5")]
        AggregateDatapoints(super::AggregateDatapoints),
    }
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct DataPointListResponse {
    #[prost(message, repeated, tag = "1")]
    pub items: Vec<DataPointListItem>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatapointKind {
    Numeric,
    String,
    Aggregate,
}

impl DatapointType {
    pub fn kind(&self) -> DatapointKind {
        match self {
            DatapointType::NumericDatapoints(_) => DatapointKind::Numeric,
            DatapointType::StringDatapoints(_) => DatapointKind::String,
            DatapointType::AggregateDatapoints(_) => DatapointKind::Aggregate,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            DatapointType::NumericDatapoints(d) => d.datapoints.len(),
            DatapointType::StringDatapoints(d) => d.datapoints.len(),
            DatapointType::AggregateDatapoints(d) => d.datapoints.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DataPointListItem {
    /// Name used in error messages: external id, else instance id, else numeric id.
    pub fn display_id(&self) -> String {
        if !self.external_id.is_empty() {
            return self.external_id.clone();
        }
        match &self.instance_id {
            Some(i) => format!("{}:{}", i.space, i.external_id),
            None => self.id.to_string(),
        }
    }

    /// The datapoint payload of this item.
    ///
    /// Fails with [`Error::UnknownDatapointType`] when the response carried no
    /// payload this client knows how to decode.
    pub fn datapoints(&self) -> Result<&DatapointType> {
        self.datapoint_type
            .as_ref()
            .ok_or_else(|| Error::UnknownDatapointType(self.display_id()))
    }

    /// `(timestamp_ms, value)` pairs for numeric series.
    ///
    /// Raw numeric samples are returned as-is, skipping null values; for
    /// aggregate responses `aggregate` selects the field.
    ///
    /// Only ask for aggregates the query requested. The wire format cannot
    /// tell an absent aggregate from `0.0`, so any other field reads as zero.
    pub fn numeric_series(&self, aggregate: Aggregate) -> Result<Vec<(i64, f64)>> {
        match self.datapoints()? {
            DatapointType::NumericDatapoints(d) => Ok(d
                .datapoints
                .iter()
                .filter(|p| !p.null_value)
                .map(|p| (p.timestamp, p.value))
                .collect()),
            DatapointType::AggregateDatapoints(d) => Ok(d
                .datapoints
                .iter()
                .map(|p| (p.timestamp, p.get(aggregate)))
                .collect()),
            DatapointType::StringDatapoints(_) => Err(Error::NotNumeric(self.display_id())),
        }
    }
}
