//! Talks to a standalone WireMock server, by default on `localhost:8080`. Start one with
//! `docker run --rm -p 8080:8080 wiremock/wiremock` and run
//! `cargo run --example standalone`. Use `WIREMOCK_HOST` and `WIREMOCK_PORT` to point
//! elsewhere.
use bytes::Bytes;
use http::Request;
use wiremock_admin::{prelude::*, HttpClient, HyperHttpClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = env_logger::try_init();

    let config = AdminConfig::from_env()?;
    let base_url = config.base_url()?;
    let wiremock = WireMock::connect_async(config).await?;

    // Define a stub
    let new_request = get(url_equal_to("/api/defined/get"));
    let new_stub = stub_for(new_request.clone())
        .with_name("defined get")
        .will_return(a_response().with_status(200).with_body("defined content"));
    let mapping = wiremock.register_async(&new_stub).await?;
    println!("Registered mapping {}", mapping.id().unwrap_or("<no id>"));

    // Call it like the system under test would
    let client = HyperHttpClient::new(None)?;
    let response = client
        .send(
            Request::builder()
                .uri(format!("{}/api/defined/get", base_url))
                .body(Bytes::new())?,
        )
        .await?;
    println!(
        "GET /api/defined/get -> {} '{}'",
        response.status(),
        String::from_utf8_lossy(response.body())
    );

    // Verify and show what the server saw
    wiremock.verify_async(1, &new_request).await?;
    for event in wiremock.get_all_requests_async().await?.requests {
        println!(
            "{} {} (matched: {})",
            event.request.method, event.request.url, event.was_matched
        );
    }

    // Clean up
    if let Some(id) = mapping.id() {
        wiremock.remove_stub_mapping_async(id).await?;
    }
    wiremock.reset_requests_async().await?;

    Ok(())
}
