use httpmock::MockServer;
use serde_json::json;
use wiremock_admin::prelude::*;

#[test]
fn verify_passes_on_matching_count_test() {
    let _ = env_logger::try_init();

    // Arrange
    let server = MockServer::start();
    let count_mock = server.mock(|when, then| {
        when.method("POST")
            .path("/__admin/requests/count")
            .json_body(json!({
                "method": "GET",
                "url": "/api/default/get",
                "headers": {"Accept": {"equalTo": "text/plain"}}
            }));
        then.status(200).json_body(json!({"count": 2}));
    });
    let wiremock = WireMock::connect(AdminConfig::new("127.0.0.1", server.port())).unwrap();

    // Act
    let result = wiremock.verify(
        2,
        &get(url_equal_to("/api/default/get")).with_header("Accept", "text/plain"),
    );

    // Assert
    count_mock.assert();
    assert!(result.is_ok());
}

#[test]
fn verify_fails_on_count_mismatch_test() {
    // Arrange
    let server = MockServer::start();
    let count_mock = server.mock(|when, then| {
        when.method("POST").path("/__admin/requests/count");
        then.status(200).json_body(json!({"count": 1}));
    });
    let wiremock = WireMock::connect(AdminConfig::new("127.0.0.1", server.port())).unwrap();

    // Act
    let err = wiremock
        .verify(
            2,
            &post(url_matching("/api/default/post")).with_request_body(matching("some content")),
        )
        .unwrap_err();

    // Assert
    count_mock.assert();
    let msg = err.to_string();
    assert!(msg.contains('2'), "{}", msg);
    assert!(msg.contains('1'), "{}", msg);
    assert!(matches!(
        err,
        VerificationError::CountMismatch {
            expected: 2,
            actual: 1
        }
    ));
}

#[tokio::test]
async fn verify_async_surfaces_admin_errors_test() {
    // Arrange
    let server = MockServer::start_async().await;
    let count_mock = server
        .mock_async(|when, then| {
            when.method("POST").path("/__admin/requests/count");
            then.status(500).body("Request journal is disabled");
        })
        .await;
    let wiremock = WireMock::connect_async(AdminConfig::new("127.0.0.1", server.port()))
        .await
        .unwrap();

    // Act
    let err = wiremock
        .verify_async(0, &delete(url_path_equal_to("/api/default/delete")))
        .await
        .unwrap_err();

    // Assert
    count_mock.assert_async().await;
    assert!(matches!(
        err,
        VerificationError::Admin(AdminError::UpstreamError(_))
    ));
}
