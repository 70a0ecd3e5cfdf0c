mod common;

use cdfapi::dto::{DataModelListParams, DataModelReference, InstancesSearchRequest, ViewReference};
use httpmock::prelude::*;
use serde_json::json;

#[test]
fn list_sends_flags_as_query() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(Method::GET)
            .path(common::path("/models/datamodels"))
            .query_param("limit", "10")
            .query_param("includeGlobal", "true");
        then.status(200).json_body(json!({
            "items": [{
                "space": "cdf_cdm",
                "externalId": "CogniteCore",
                "name": "Core",
                "version": "v1",
                "views": [{"type": "view", "space": "cdf_cdm", "externalId": "CogniteAsset", "version": "v1"}],
                "createdTime": 1,
                "lastUpdatedTime": 2,
                "isGlobal": true
            }]
        }));
    });

    let models = common::client(&server)
        .data_models()
        .list(&DataModelListParams {
            limit: Some(10),
            include_global: Some(true),
            ..DataModelListParams::default()
        })
        .unwrap();

    mock.assert();
    assert_eq!(models.items.len(), 1);
    assert_eq!(models.items[0].external_id, "CogniteCore");
    assert!(models.items[0].is_global);
    assert_eq!(models.items[0].views.len(), 1);
}

#[test]
fn search_instances_posts_view_and_query() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(Method::POST)
            .path(common::path("/models/instances/search"))
            .json_body(json!({
                "view": {"type": "view", "space": "cdf_cdm", "externalId": "CogniteTimeSeries", "version": "v1"},
                "query": "pressure",
                "limit": 5
            }));
        then.status(200).json_body(json!({
            "items": [{
                "instanceType": "node",
                "version": 3,
                "space": "sensors",
                "externalId": "pressure-1",
                "createdTime": 1,
                "lastUpdatedTime": 2,
                "properties": {
                    "cdf_cdm": {"CogniteTimeSeries/v1": {"name": "Pressure 1"}}
                }
            }]
        }));
    });

    let mut request =
        InstancesSearchRequest::new(ViewReference::view("cdf_cdm", "CogniteTimeSeries", "v1"));
    request.query = Some("pressure".into());
    request.limit = Some(5);
    let nodes = common::client(&server)
        .data_models()
        .search_instances(&request)
        .unwrap();

    mock.assert();
    assert_eq!(nodes.items.len(), 1);
    let node = &nodes.items[0];
    assert_eq!(node.external_id, "pressure-1");
    assert_eq!(
        node.properties["cdf_cdm"]["CogniteTimeSeries/v1"]["name"],
        "Pressure 1"
    );
}

#[test]
fn graphql_targets_model_version() {
    let server = MockServer::start();
    let query = "{ listCogniteAsset(first: 2) { items { externalId } } }";
    let mock = server.mock(|when, then| {
        when.method(Method::POST)
            .path(common::path(
                "/userapis/spaces/cdf_cdm/datamodels/CogniteCore/versions/v1/graphql",
            ))
            .json_body(json!({"query": query}));
        then.status(200).json_body(json!({
            "data": {"listCogniteAsset": {"items": [{"externalId": "a1"}, {"externalId": "a2"}]}}
        }));
    });

    let response = common::client(&server)
        .data_models()
        .graphql(&DataModelReference::new("cdf_cdm", "CogniteCore", "v1"), query, None)
        .unwrap();

    mock.assert();
    assert!(response.errors.is_empty());
    let data = response.data.unwrap();
    let items = &data["listCogniteAsset"]["items"];
    assert_eq!(items.as_array().map(Vec::len), Some(2));
}

#[test]
fn graphql_errors_are_returned_in_body() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(Method::POST)
            .path(common::path("/userapis/spaces/space/datamodels/Model/versions/1/graphql"))
            .json_body(json!({"query": "{ nope }", "variables": {"first": 1}}));
        then.status(200).json_body(json!({
            "data": null,
            "errors": [{"message": "Field 'nope' not found", "locations": [{"line": 1, "column": 3}]}]
        }));
    });

    let vars = json!({"first": 1});
    let response = common::client(&server)
        .data_models()
        .graphql(
            &DataModelReference::new("space", "Model", "1"),
            "{ nope }",
            Some(&vars),
        )
        .unwrap();

    assert!(response.data.is_none());
    assert_eq!(response.errors.len(), 1);
    assert_eq!(response.errors[0].message, "Field 'nope' not found");
}
