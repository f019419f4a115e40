use httpmock::MockServer;
use serde_json::json;
use wiremock_admin::prelude::*;

#[test]
fn to_do_list_scenario_test() {
    let _ = env_logger::try_init();

    // Arrange
    let server = MockServer::start();
    let first_mock = server.mock(|when, then| {
        when.method("POST").path("/__admin/mappings").json_body(json!({
            "request": {"method": "GET", "url": "/todo/items"},
            "response": {"status": 200, "body": "<items><item>Buy milk</item></items>"},
            "scenarioName": "To do list",
            "requiredScenarioState": "Started"
        }));
        then.status(201)
            .json_body(json!({"id": "1", "request": {"method": "GET", "url": "/todo/items"}, "response": {"status": 200}}));
    });
    let second_mock = server.mock(|when, then| {
        when.method("POST").path("/__admin/mappings").json_body(json!({
            "request": {
                "method": "POST",
                "url": "/todo/items",
                "bodyPatterns": [{"matches": ".*Cancel newspaper subscription.*"}]
            },
            "response": {"status": 201},
            "scenarioName": "To do list",
            "requiredScenarioState": "Started",
            "newScenarioState": "Cancel newspaper item added"
        }));
        then.status(201)
            .json_body(json!({"id": "2", "request": {"method": "POST", "url": "/todo/items"}, "response": {"status": 201}}));
    });
    let scenarios_mock = server.mock(|when, then| {
        when.method("GET").path("/__admin/scenarios");
        then.status(200).json_body(json!({
            "scenarios": [{
                "id": "to-do-list",
                "name": "To do list",
                "state": "Cancel newspaper item added",
                "possibleStates": ["Started", "Cancel newspaper item added"]
            }]
        }));
    });
    let reset_mock = server.mock(|when, then| {
        when.method("POST").path("/__admin/scenarios/reset");
        then.status(200);
    });
    let wiremock = WireMock::connect(AdminConfig::new("127.0.0.1", server.port())).unwrap();

    // Act
    wiremock
        .register(
            &stub_for(get(url_equal_to("/todo/items")))
                .in_scenario("To do list")
                .when_scenario_state_is(STARTED)
                .will_return(ok().with_body("<items><item>Buy milk</item></items>")),
        )
        .unwrap();
    wiremock
        .register(
            &stub_for(
                post(url_equal_to("/todo/items"))
                    .with_request_body(matching(".*Cancel newspaper subscription.*")),
            )
            .in_scenario("To do list")
            .when_scenario_state_is(STARTED)
            .will_set_state_to("Cancel newspaper item added")
            .will_return(a_response().with_status(201)),
        )
        .unwrap();
    let scenarios = wiremock.get_scenarios().unwrap();
    wiremock.reset_scenarios().unwrap();

    // Assert
    first_mock.assert();
    second_mock.assert();
    scenarios_mock.assert();
    reset_mock.assert();
    assert_eq!("To do list", scenarios.scenarios[0].name);
    assert_eq!("Cancel newspaper item added", scenarios.scenarios[0].state);
    assert_eq!(2, scenarios.scenarios[0].possible_states.len());
}

#[test]
fn state_without_scenario_is_not_sent_test() {
    let server = MockServer::start();
    let add_mock = server.mock(|when, then| {
        when.method("POST").path("/__admin/mappings").json_body(json!({
            "request": {"method": "GET", "url": "/todo/items"},
            "response": {"status": 200}
        }));
        then.status(201)
            .json_body(json!({"id": "3", "request": {"method": "GET", "url": "/todo/items"}, "response": {"status": 200}}));
    });
    let wiremock = WireMock::connect(AdminConfig::new("127.0.0.1", server.port())).unwrap();

    wiremock
        .register(
            &stub_for(get(url_equal_to("/todo/items")))
                .when_scenario_state_is(STARTED)
                .will_set_state_to("Next")
                .will_return(ok()),
        )
        .unwrap();

    add_mock.assert();
}
