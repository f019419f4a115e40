use httpmock::MockServer;
use serde_json::json;
use wiremock_admin::{common::data::LoggedRequest, prelude::*};

fn logged_request() -> serde_json::Value {
    json!({
        "url": "/todo/items?done=false",
        "absoluteUrl": "http://localhost:8080/todo/items?done=false",
        "method": "GET",
        "headers": {"Accept": "application/json"},
        "body": "",
        "loggedDate": 1700000000000u64,
        "loggedDateString": "2023-11-14T22:13:20Z"
    })
}

#[test]
fn get_all_requests_test() {
    // Arrange
    let server = MockServer::start();
    let journal_mock = server.mock(|when, then| {
        when.method("GET").path("/__admin/requests");
        then.status(200).json_body(json!({
            "requests": [{
                "id": "45760a03-eebb-4387-ad0d-bb89b5d3d662",
                "request": logged_request(),
                "responseDefinition": {"status": 200},
                "wasMatched": true
            }],
            "meta": {"total": 1},
            "requestJournalDisabled": false
        }));
    });
    let request_mock = server.mock(|when, then| {
        when.method("GET")
            .path("/__admin/requests/45760a03-eebb-4387-ad0d-bb89b5d3d662");
        then.status(200).json_body(json!({
            "id": "45760a03-eebb-4387-ad0d-bb89b5d3d662",
            "request": logged_request(),
            "wasMatched": true
        }));
    });
    let wiremock = WireMock::connect(AdminConfig::new("127.0.0.1", server.port())).unwrap();

    // Act
    let all = wiremock.get_all_requests().unwrap();
    let single = wiremock
        .get_request("45760a03-eebb-4387-ad0d-bb89b5d3d662")
        .unwrap();

    // Assert
    journal_mock.assert();
    request_mock.assert();
    assert_eq!(1, all.meta.total);
    assert!(!all.request_journal_disabled);
    assert_eq!(all.requests[0].request, single.request);
    assert_eq!("/todo/items?done=false", single.request.url);
    assert_eq!("GET", single.request.method);
    assert!(single.was_matched);
    // Fields without a typed counterpart are kept.
    assert_eq!(json!(1700000000000u64), single.request.other["loggedDate"]);
}

#[test]
fn find_and_reset_requests_test() {
    // Arrange
    let server = MockServer::start();
    let find_mock = server.mock(|when, then| {
        when.method("POST")
            .path("/__admin/requests/find")
            .json_body(json!({
                "method": "POST",
                "urlPath": "/todo/items",
                "bodyPatterns": [{"matches": ".*milk.*"}]
            }));
        then.status(200).json_body(json!({
            "requests": [{"url": "/todo/items", "method": "POST", "body": "Buy milk"}]
        }));
    });
    let unmatched_mock = server.mock(|when, then| {
        when.method("GET").path("/__admin/requests/unmatched");
        then.status(200).json_body(json!({"requests": []}));
    });
    let reset_mock = server.mock(|when, then| {
        when.method("DELETE").path("/__admin/requests");
        then.status(200);
    });
    let wiremock = WireMock::connect(AdminConfig::new("127.0.0.1", server.port())).unwrap();

    // Act
    let found = wiremock
        .find_requests_matching(
            &post(url_path_equal_to("/todo/items")).with_request_body(matching(".*milk.*")),
        )
        .unwrap();
    let unmatched = wiremock.find_unmatched_requests().unwrap();
    wiremock.reset_requests().unwrap();

    // Assert
    find_mock.assert();
    unmatched_mock.assert();
    reset_mock.assert();
    assert_eq!(Some("Buy milk".to_string()), found.requests[0].body);
    assert!(unmatched.requests.is_empty());
}

#[test]
fn near_misses_test() {
    // Arrange
    let server = MockServer::start();
    let near_miss = json!({
        "request": {"url": "/todo/item", "method": "GET"},
        "stubMapping": {
            "id": "e9b7d5c6-9a0f-4a39-9a8b-3c3f0f0a1b2c",
            "request": {"method": "GET", "url": "/todo/items"},
            "response": {"status": 200}
        },
        "matchResult": {"distance": 0.06}
    });
    let unmatched_mock = server.mock(|when, then| {
        when.method("GET").path("/__admin/requests/unmatched/near-misses");
        then.status(200).json_body(json!({"nearMisses": [near_miss.clone()]}));
    });
    let request_mock = server.mock(|when, then| {
        when.method("POST")
            .path("/__admin/near-misses/request")
            .json_body(json!({"url": "/todo/item", "method": "GET"}));
        then.status(200).json_body(json!({"nearMisses": [near_miss.clone()]}));
    });
    let pattern_mock = server.mock(|when, then| {
        when.method("POST")
            .path("/__admin/near-misses/request-pattern")
            .json_body(json!({"method": "GET", "url": "/todo/items"}));
        then.status(200).json_body(json!({"nearMisses": []}));
    });
    let wiremock = WireMock::connect(AdminConfig::new("127.0.0.1", server.port())).unwrap();
    let request: LoggedRequest =
        serde_json::from_value(json!({"url": "/todo/item", "method": "GET"})).unwrap();

    // Act
    let for_unmatched = wiremock.find_near_misses_for_unmatched_requests().unwrap();
    let for_request = wiremock.find_top_near_misses_for_request(&request).unwrap();
    let for_pattern = wiremock
        .find_top_near_misses_for_pattern(&get(url_equal_to("/todo/items")))
        .unwrap();

    // Assert
    unmatched_mock.assert();
    request_mock.assert();
    pattern_mock.assert();
    assert_eq!(1, for_unmatched.near_misses.len());
    assert_eq!(0.06, for_request.near_misses[0].match_result.distance);
    assert_eq!(
        Some("e9b7d5c6-9a0f-4a39-9a8b-3c3f0f0a1b2c"),
        for_request.near_misses[0]
            .stub_mapping
            .as_ref()
            .and_then(|m| m.id())
    );
    assert!(for_pattern.near_misses.is_empty());
}
