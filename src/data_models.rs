use serde_json::Value;
use std::sync::Arc;

use crate::client::ApiClient;
use crate::dto::{
    DataModelList, DataModelListParams, DataModelReference, GraphQlRequest, GraphQlResponse,
    InstancesSearchRequest, NodeList,
};
use crate::error::Result;

/// Data modeling endpoints: `/models/...` and the per-model GraphQL API.
#[derive(Debug, Clone)]
pub struct DataModelsResource {
    pub(crate) api: Arc<ApiClient>,
}

impl DataModelsResource {
    pub(crate) fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub fn list(&self, params: &DataModelListParams) -> Result<DataModelList> {
        self.api.get_json("/models/datamodels", &params.to_query())
    }

    /// Full-text search over the instances of a view.
    pub fn search_instances(&self, request: &InstancesSearchRequest) -> Result<NodeList> {
        self.api.post_json("/models/instances/search", request)
    }

    /// Runs a GraphQL query against one data model version.
    ///
    /// A 200 response may still carry GraphQL errors in
    /// [`GraphQlResponse::errors`].
    pub fn graphql(
        &self,
        model: &DataModelReference,
        query: &str,
        variables: Option<&Value>,
    ) -> Result<GraphQlResponse> {
        let path = format!(
            "/userapis/spaces/{}/datamodels/{}/versions/{}/graphql",
            model.space, model.external_id, model.version
        );
        self.api
            .post_json(&path, &GraphQlRequest { query, variables })
    }
}
