use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::common::InstanceId;
use crate::util::build_query_params;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewReference {
    #[serde(rename = "type")]
    pub kind: String,
    pub space: String,
    pub external_id: String,
    pub version: String,
}

impl ViewReference {
    pub fn view(
        space: impl Into<String>,
        external_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            kind: "view".to_string(),
            space: space.into(),
            external_id: external_id.into(),
            version: version.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataModelItem {
    pub space: String,
    pub external_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub version: String,
    /// View references, or full view definitions when listed with `inlineViews`.
    #[serde(default)]
    pub views: Vec<Value>,
    pub created_time: i64,
    pub last_updated_time: i64,
    #[serde(default)]
    pub is_global: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataModelList {
    pub items: Vec<DataModelItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

/// Query parameters of `GET /models/datamodels`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataModelListParams {
    pub limit: Option<u32>,
    pub cursor: Option<String>,
    pub space: Option<String>,
    pub inline_views: Option<bool>,
    pub all_versions: Option<bool>,
    pub include_global: Option<bool>,
}

impl DataModelListParams {
    pub(crate) fn to_query(&self) -> String {
        build_query_params(&[
            ("limit", self.limit.into()),
            ("cursor", self.cursor.clone().into()),
            ("space", self.space.clone().into()),
            ("inlineViews", self.inline_views.into()),
            ("allVersions", self.all_versions.into()),
            ("includeGlobal", self.include_global.into()),
        ])
    }
}

/// Identifies one version of a data model, as used by the GraphQL endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataModelReference {
    pub space: String,
    pub external_id: String,
    pub version: String,
}

impl DataModelReference {
    pub fn new(
        space: impl Into<String>,
        external_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            space: space.into(),
            external_id: external_id.into(),
            version: version.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDefinition {
    pub instance_type: String,
    pub version: i64,
    pub space: String,
    pub external_id: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub node_type: Option<InstanceId>,
    pub created_time: i64,
    pub last_updated_time: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_time: Option<i64>,
    /// `{space: {"view/version": {property: value}}}`
    #[serde(default)]
    pub properties: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeList {
    pub items: Vec<NodeDefinition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typing: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitReferenceDm {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_system_name: Option<String>,
}

/// Converts `property` into `unit` in search results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetUnitsDm {
    pub property: String,
    pub unit: UnitReferenceDm,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchSort {
    pub property: Vec<String>,
    /// `ascending` or `descending`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
}

/// Body of `POST /models/instances/search`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstancesSearchRequest {
    pub view: ViewReference,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_type: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub target_units: Vec<TargetUnitsDm>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sort: Vec<SearchSort>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl InstancesSearchRequest {
    pub fn new(view: ViewReference) -> Self {
        Self {
            view,
            query: None,
            instance_type: None,
            properties: Vec::new(),
            target_units: Vec::new(),
            filter: None,
            sort: Vec::new(),
            limit: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphQlRequest<'a> {
    pub query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<&'a Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQlError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Value>,
}

/// GraphQL reports query errors in-band with a 200 status; check `errors`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQlResponse {
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<GraphQlError>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn list_params_render_only_set_values() {
        let params = DataModelListParams {
            limit: Some(5),
            all_versions: Some(true),
            include_global: Some(false),
            ..DataModelListParams::default()
        };
        assert_eq!(params.to_query(), "limit=5&allVersions=true&includeGlobal=false");
    }

    #[test]
    fn search_request_shape() {
        let mut req = InstancesSearchRequest::new(ViewReference::view(
            "cdf_cdm",
            "CogniteTimeSeries",
            "v1",
        ));
        req.properties = vec!["name".into(), "description".into()];
        req.limit = Some(3);
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({
                "view": {"type": "view", "space": "cdf_cdm", "externalId": "CogniteTimeSeries", "version": "v1"},
                "properties": ["name", "description"],
                "limit": 3
            })
        );
    }

    #[test]
    fn node_list_keeps_nested_properties() {
        let list: NodeList = serde_json::from_value(json!({
            "items": [{
                "instanceType": "node",
                "version": 2,
                "space": "sp",
                "externalId": "ts-1",
                "createdTime": 1,
                "lastUpdatedTime": 2,
                "properties": {"cdf_cdm": {"CogniteTimeSeries/v1": {"name": "Flow"}}}
            }]
        }))
        .unwrap();
        assert_eq!(list.items.len(), 1);
        assert_eq!(
            list.items[0].properties["cdf_cdm"]["CogniteTimeSeries/v1"]["name"],
            "Flow"
        );
        assert!(list.typing.is_none());
    }

    #[test]
    fn graphql_errors_default_to_empty() {
        let resp: GraphQlResponse = serde_json::from_value(json!({"data": {"x": 1}})).unwrap();
        assert!(resp.errors.is_empty());
        let resp: GraphQlResponse =
            serde_json::from_value(json!({"errors": [{"message": "bad field"}]})).unwrap();
        assert_eq!(resp.errors[0].message, "bad field");
        assert!(resp.data.is_none());
    }
}
