use httpmock::MockServer;
use serde_json::json;
use wiremock_admin::prelude::*;

#[test]
fn getting_started_test() {
    let _ = env_logger::try_init();

    // Start a server that answers like the WireMock admin API would.
    let server = MockServer::start();
    let admin_mock = server.mock(|when, then| {
        when.method("POST")
            .path("/__admin/mappings")
            .header("content-type", "application/json")
            .json_body(json!({
                "request": {"method": "GET", "url": "/api/defined/test"},
                "response": {"status": 200, "body": "defined content"}
            }));
        then.status(201).json_body(json!({
            "id": "8c5db8b0-2db4-4ad7-a99f-38c9b00da3f7",
            "request": {"method": "GET", "url": "/api/defined/test"},
            "response": {"status": 200, "body": "defined content"},
            "uuid": "8c5db8b0-2db4-4ad7-a99f-38c9b00da3f7"
        }));
    });

    // Describe the stub and register it.
    let stub = stub_for(get(url_equal_to("/api/defined/test")))
        .will_return(a_response().with_status(200).with_body("defined content"));

    let wiremock = WireMock::connect(AdminConfig::new("127.0.0.1", server.port())).unwrap();
    let mapping = wiremock.register(&stub).unwrap();

    // Ensure the admin API was called exactly as expected.
    admin_mock.assert();
    assert_eq!(Some("8c5db8b0-2db4-4ad7-a99f-38c9b00da3f7"), mapping.id());

    // The stored mapping describes the same stub again.
    let stored = mapping.to_stub(Some("defined content")).unwrap();
    assert_eq!(stub.serialize().unwrap(), stored.serialize().unwrap());
}

#[tokio::test]
async fn async_getting_started_test() {
    let _ = env_logger::try_init();

    let server = MockServer::start_async().await;
    let admin_mock = server
        .mock_async(|when, then| {
            when.method("POST").path("/__admin/mappings");
            then.status(201).json_body(json!({
                "id": "f2b1f0c4-2d5d-4d0c-8b24-6bb0d5f49f3b",
                "request": {"method": "ANY", "urlPath": "/hello"},
                "response": {"status": 204}
            }));
        })
        .await;

    let wiremock = WireMock::connect_async(AdminConfig::new("127.0.0.1", server.port()))
        .await
        .unwrap();

    let stub = stub_for(any(url_path_equal_to("/hello"))).will_return(a_response().with_status(204));
    let mapping = wiremock.register_async(&stub).await.unwrap();

    admin_mock.assert_async().await;
    assert_eq!(Some("f2b1f0c4-2d5d-4d0c-8b24-6bb0d5f49f3b"), mapping.id());
}

#[test]
fn url_prefix_test() {
    let server = MockServer::start();
    let admin_mock = server.mock(|when, then| {
        when.method("GET").path("/wiremock/__admin/mappings");
        then.status(200)
            .json_body(json!({"mappings": [], "meta": {"total": 0}}));
    });

    let config = AdminConfig::new("127.0.0.1", server.port()).with_url_prefix("/wiremock");
    let wiremock = WireMock::connect(config).unwrap();

    assert_eq!(
        format!("http://127.0.0.1:{}/wiremock/__admin", server.port()),
        wiremock.admin_url()
    );

    let result = wiremock.list_stub_mappings().unwrap();

    admin_mock.assert();
    assert_eq!(0, result.meta.total);
}
