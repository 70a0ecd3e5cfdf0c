use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

use crate::client::ApiClient;
use crate::dto::{
    DataPointListResponse, DataPointsQuery, LatestDataPointsList, LatestDataPointsQuery,
    TimeSeriesFilterRequest, TimeSeriesList, TimeSeriesListParams,
};
use crate::error::Result;

/// Time series endpoints: `/timeseries/...`.
#[derive(Debug, Clone)]
pub struct TimeSeriesResource {
    pub(crate) api: Arc<ApiClient>,
}

impl TimeSeriesResource {
    pub(crate) fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    /// Lists time series, one page at a time.
    pub fn list(&self, params: &TimeSeriesListParams) -> Result<TimeSeriesList> {
        self.api.get_json("/timeseries", &params.to_query())
    }

    /// Lists time series matching a filter.
    pub fn filter(&self, request: &TimeSeriesFilterRequest) -> Result<TimeSeriesList> {
        self.api.post_json("/timeseries/list", request)
    }

    /// Retrieves raw or aggregated datapoints.
    ///
    /// The request goes out gzip-compressed and the response is decoded from
    /// protobuf; inspect each item with
    /// [`DataPointListItem::datapoints`](crate::dto::DataPointListItem::datapoints).
    pub fn retrieve_data(&self, query: &DataPointsQuery) -> Result<DataPointListResponse> {
        let spinner = self.api.spinner("Retrieving datapoints");
        let started = Instant::now();

        let result: Result<DataPointListResponse> =
            self.api.post_protobuf("/timeseries/data/list", query);

        if let Some(pb) = spinner {
            pb.finish_and_clear();
        }
        if let Ok(resp) = &result {
            debug!(
                items = resp.items.len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "retrieved datapoints"
            );
        }
        result
    }

    /// Retrieves the latest datapoint of each requested time series.
    pub fn retrieve_latest(&self, query: &LatestDataPointsQuery) -> Result<LatestDataPointsList> {
        self.api.post_json("/timeseries/data/latest", query)
    }
}
