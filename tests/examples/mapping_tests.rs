use assert_json_diff::assert_json_eq;
use httpmock::MockServer;
use serde_json::json;
use wiremock_admin::prelude::*;

fn connect(server: &MockServer) -> WireMock {
    WireMock::connect(AdminConfig::new("127.0.0.1", server.port())).unwrap()
}

#[test]
fn list_stub_mappings_test() {
    // Arrange
    let server = MockServer::start();
    let list_mock = server.mock(|when, then| {
        when.method("GET").path("/__admin/mappings");
        then.status(200).json_body(json!({
            "mappings": [
                {
                    "id": "76ada7b0-49ae-4229-91c4-396a36f18e09",
                    "request": {"method": "GET", "url": "/search"},
                    "response": {"status": 200, "jsonBody": {"results": []}},
                    "scenarioName": "Search",
                    "requiredScenarioState": "Started"
                }
            ],
            "meta": {"total": 1}
        }));
    });
    let wiremock = connect(&server);

    // Act
    let result = wiremock.list_stub_mappings().unwrap();

    // Assert
    list_mock.assert();
    assert_eq!(1, result.meta.total);
    assert_eq!(
        Some("76ada7b0-49ae-4229-91c4-396a36f18e09"),
        result.mappings[0].id()
    );

    let stub = result.mappings[0].to_stub(None).unwrap();
    assert_eq!(Some("Search"), stub.scenario_name());
    assert_json_eq!(
        stub.serialize().unwrap(),
        json!({
            "request": {"method": "GET", "url": "/search"},
            "response": {"status": 200, "jsonBody": {"results": []}},
            "scenarioName": "Search",
            "requiredScenarioState": "Started"
        })
    );
}

#[test]
fn edit_and_remove_stub_mapping_test() {
    // Arrange
    let server = MockServer::start();
    let id = "2f7a5b0e-0b0c-4b52-9d5b-4e0b0e5c1a11";
    let stub = stub_for(put(url_path_matching("/items/[0-9]+")))
        .with_name("update item")
        .at_priority(1)
        .will_return(a_response().with_status(200).with_json_body(json!({"ok": true})));

    let edit_mock = server.mock(|when, then| {
        when.method("PUT")
            .path(format!("/__admin/mappings/{}", id))
            .json_body(json!({
                "name": "update item",
                "request": {"method": "PUT", "urlPathPattern": "/items/[0-9]+"},
                "response": {"status": 200, "jsonBody": {"ok": true}},
                "priority": 1
            }));
        then.status(200).json_body(json!({
            "id": id,
            "name": "update item",
            "request": {"method": "PUT", "urlPathPattern": "/items/[0-9]+"},
            "response": {"status": 200, "jsonBody": {"ok": true}},
            "priority": 1
        }));
    });
    let remove_mock = server.mock(|when, then| {
        when.method("DELETE").path(format!("/__admin/mappings/{}", id));
        then.status(200);
    });
    let wiremock = connect(&server);

    // Act
    let edited = wiremock.edit_stub_mapping(id, &stub).unwrap();
    wiremock.remove_stub_mapping(id).unwrap();

    // Assert
    edit_mock.assert();
    remove_mock.assert();
    assert_eq!(Some(id), edited.id());
    assert_eq!(stub, edited.to_stub(None).unwrap());
}

#[test]
fn reset_and_save_mappings_test() {
    // Arrange
    let server = MockServer::start();
    let reset_default_mock = server.mock(|when, then| {
        when.method("POST").path("/__admin/mappings/reset");
        then.status(200);
    });
    let reset_mock = server.mock(|when, then| {
        when.method("DELETE").path("/__admin/mappings");
        then.status(200);
    });
    let save_mock = server.mock(|when, then| {
        when.method("POST").path("/__admin/mappings/save");
        then.status(200);
    });
    let reset_all_mock = server.mock(|when, then| {
        when.method("POST").path("/__admin/reset");
        then.status(200);
    });
    let wiremock = connect(&server);

    // Act
    wiremock.reset_to_default_mappings().unwrap();
    wiremock.reset_mappings().unwrap();
    wiremock.save_mappings().unwrap();
    wiremock.reset_all().unwrap();

    // Assert
    reset_default_mock.assert();
    reset_mock.assert();
    save_mock.assert();
    reset_all_mock.assert();
}

#[test]
fn unknown_mapping_is_reported_with_status_and_body_test() {
    // Arrange
    let server = MockServer::start();
    let get_mock = server.mock(|when, then| {
        when.method("GET").path("/__admin/mappings/does-not-exist");
        then.status(404).body("Stub mapping not found");
    });
    let wiremock = connect(&server);

    // Act
    let err = wiremock.get_stub_mapping("does-not-exist").unwrap_err();

    // Assert
    get_mock.assert();
    match err {
        AdminError::UpstreamError(msg) => {
            assert!(msg.contains("404"), "{}", msg);
            assert!(msg.contains("Stub mapping not found"), "{}", msg);
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn incomplete_stub_is_not_sent_test() {
    // Arrange
    let server = MockServer::start();
    let add_mock = server.mock(|when, then| {
        when.method("POST").path("/__admin/mappings");
        then.status(201);
    });
    let wiremock = connect(&server);

    // Act
    let err = wiremock
        .register(&stub_for(get(url_equal_to("/no-response"))))
        .unwrap_err();

    // Assert
    assert!(matches!(err, AdminError::InvalidMapping(Error::InvalidState(_))));
    add_mock.assert_hits(0);
}

#[test]
fn unreachable_server_is_a_transport_error_test() {
    // Bind and release a port so that nothing listens on it.
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();

    let wiremock = WireMock::connect(AdminConfig::new("127.0.0.1", port)).unwrap();

    let err = wiremock.list_stub_mappings().unwrap_err();

    assert!(matches!(err, AdminError::Transport(_)));
}
