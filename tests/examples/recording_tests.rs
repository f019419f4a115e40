use httpmock::MockServer;
use serde_json::json;
use wiremock_admin::{common::data::RecordingStatus, prelude::*};

#[test]
fn record_and_stop_test() {
    let _ = env_logger::try_init();

    // Arrange
    let server = MockServer::start();
    let start_mock = server.mock(|when, then| {
        when.method("POST")
            .path("/__admin/recordings/start")
            .json_body(json!({
                "targetBaseUrl": "http://example.mocklab.io",
                "filters": {"method": "GET", "urlPathPattern": "/api/.*"},
                "captureHeaders": {"Accept": {}},
                "persist": false
            }));
        then.status(200);
    });
    let status_mock = server.mock(|when, then| {
        when.method("GET").path("/__admin/recordings/status");
        then.status(200).json_body(json!({"status": "Recording"}));
    });
    let stop_mock = server.mock(|when, then| {
        when.method("POST").path("/__admin/recordings/stop");
        then.status(200).json_body(json!({
            "mappings": [{
                "id": "093f1027-e5e0-4921-9e6d-e6bd1e2d3ade",
                "request": {"method": "GET", "url": "/api/recordables/123"},
                "response": {"status": 200, "body": "{\"id\":\"123\"}"},
                "persistent": false
            }]
        }));
    });
    let wiremock = WireMock::connect(AdminConfig::new("127.0.0.1", server.port())).unwrap();

    let spec = record_spec()
        .for_target("http://example.mocklab.io")
        .unwrap()
        .only_requests_matching(get(url_path_matching("/api/.*")))
        .capture_header("Accept")
        .make_stubs_persistent(false);

    // Act
    wiremock.start_recording(&spec).unwrap();
    let status = wiremock.get_recording_status().unwrap();
    let result = wiremock.stop_recording().unwrap();

    // Assert
    start_mock.assert();
    status_mock.assert();
    stop_mock.assert();
    assert_eq!(RecordingStatus::Recording, status.status);
    assert_eq!(1, result.mappings.len());
    assert_eq!(
        Some("093f1027-e5e0-4921-9e6d-e6bd1e2d3ade"),
        result.mappings[0].id()
    );
}

#[test]
fn snapshot_with_ids_only_test() {
    // Arrange
    let server = MockServer::start();
    let snapshot_mock = server.mock(|when, then| {
        when.method("POST")
            .path("/__admin/recordings/snapshot")
            .json_body(json!({"outputFormat": "IDS", "repeatsAsScenarios": false}));
        then.status(200).json_body(json!({"ids": ["a1", "b2"]}));
    });
    let wiremock = WireMock::connect(AdminConfig::new("127.0.0.1", server.port())).unwrap();

    let spec = record_spec()
        .output_format(OutputFormat::Ids)
        .ignore_repeat_requests();

    // Act
    let result = wiremock.snapshot_record(Some(&spec)).unwrap();

    // Assert
    snapshot_mock.assert();
    assert_eq!(vec!["a1".to_string(), "b2".to_string()], result.ids);
    assert!(result.mappings.is_empty());
}

#[test]
fn recording_without_target_is_rejected_test() {
    let server = MockServer::start();
    let start_mock = server.mock(|when, then| {
        when.method("POST").path("/__admin/recordings/start");
        then.status(200);
    });
    let wiremock = WireMock::connect(AdminConfig::new("127.0.0.1", server.port())).unwrap();

    let err = wiremock
        .start_recording(&record_spec().capture_header("Accept"))
        .unwrap_err();

    assert!(matches!(err, AdminError::InvalidMapping(Error::InvalidState(_))));
    start_mock.assert_hits(0);
}
