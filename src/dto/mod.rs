//! Request and response shapes of the REST API.
//!
//! JSON types mirror the documented resources with camelCase field names.
//! The bulk data-point response is protobuf and lives in [`datapoints`].

mod common;
pub mod datapoints;
mod data_models;
mod time_series;
mod units;

pub use common::{Identity, InstanceId, Metadata, TimestampRange};
pub use data_models::{
    DataModelItem, DataModelList, DataModelListParams, DataModelReference, GraphQlError,
    GraphQlRequest, GraphQlResponse, InstancesSearchRequest, NodeDefinition, NodeList,
    SearchSort, TargetUnitsDm, UnitReferenceDm, ViewReference,
};
pub use datapoints::{
    AggregateDatapoint, AggregateDatapoints, DataPointListItem, DataPointListResponse,
    DatapointKind, DatapointType, NumericDatapoint, NumericDatapoints, StringDatapoint,
    StringDatapoints,
};
pub use time_series::{
    Aggregate, DataPointsQuery, DataPointsQueryItem, DatapointStatus, DatapointValue,
    LatestDataPointsList, LatestDataPointsQuery, LatestDataPointsQueryItem, LatestDatapoint,
    LatestDatapoints, TimeBound, TimeSeries, TimeSeriesFilter, TimeSeriesFilterRequest,
    TimeSeriesList, TimeSeriesListParams, TimeSeriesSortItem,
};
pub use units::{Unit, UnitConversion, UnitList};
