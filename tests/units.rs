mod common;

use cdfapi::Error;
use httpmock::prelude::*;
use serde_json::json;

fn unit_json(external_id: &str, quantity: &str) -> serde_json::Value {
    json!({
        "externalId": external_id,
        "name": external_id.to_uppercase(),
        "longName": format!("long {external_id}"),
        "symbol": "x",
        "aliasNames": [],
        "quantity": quantity,
        "conversion": {"multiplier": 1.0, "offset": 0.0}
    })
}

#[test]
fn list_returns_catalog() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(Method::GET).path(common::path("/units"));
        then.status(200).json_body(json!({
            "items": [
                unit_json("pressure:bar", "Pressure"),
                unit_json("temperature:deg_c", "Temperature")
            ]
        }));
    });

    let units = common::client(&server).units().list().unwrap();

    mock.assert();
    assert_eq!(units.items.len(), 2);
    assert_eq!(units.items[0].external_id, "pressure:bar");
    assert_eq!(units.items[1].quantity, "Temperature");
}

#[test]
fn retrieve_posts_external_ids() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(Method::POST)
            .path(common::path("/units/byids"))
            .json_body(json!({"items": [{"externalId": "temperature:deg_c"}]}));
        then.status(200)
            .json_body(json!({"items": [unit_json("temperature:deg_c", "Temperature")]}));
    });

    let units = common::client(&server)
        .units()
        .retrieve(&["temperature:deg_c"])
        .unwrap();

    mock.assert();
    assert_eq!(units.items.len(), 1);
    assert_eq!(units.items[0].long_name, "long temperature:deg_c");
}

#[test]
fn retrieve_unknown_unit_reports_missing() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(Method::POST).path(common::path("/units/byids"));
        then.status(400).json_body(json!({
            "error": {
                "code": 400,
                "message": "Units not found",
                "missing": [{"externalId": "nope"}]
            }
        }));
    });

    let err = common::client(&server)
        .units()
        .retrieve(&[String::from("nope")])
        .unwrap_err();
    let text = err.to_string();
    assert!(text.contains("Units not found"), "{text}");
    assert!(text.contains("missing"), "{text}");
    assert!(text.contains("nope"), "{text}");
}

#[test]
fn success_other_than_200_is_an_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(Method::GET).path(common::path("/units"));
        then.status(201).json_body(json!({"items": []}));
    });

    let err = common::client(&server).units().list().unwrap_err();
    assert!(matches!(err, Error::Api { .. }), "{err:?}");
    assert_eq!(err.status().map(|s| s.as_u16()), Some(201));
    assert!(err.to_string().contains("201 Created"));
}
