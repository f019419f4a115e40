//! `wiremock-admin` is a client for the admin API of a [WireMock](https://wiremock.org)
//! server. It contains two major components:
//!
//! * **builders** that describe stub mappings ("when a request matching this pattern
//!   arrives, respond like this") and serialize them to the JSON documents the server
//!   expects, and
//! * an **admin client** ([WireMock]) that registers, lists, edits and removes mappings,
//!   queries the request journal, controls recordings and verifies how many requests
//!   matched a pattern.
//!
//! # Getting Started
//! Add `wiremock-admin` to your `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! wiremock-admin = "0.1"
//! ```
//!
//! Stubs are composed from a request pattern and a response definition:
//!
//! ```
//! use wiremock_admin::prelude::*;
//!
//! let stub = stub_for(get(url_equal_to("/api/defined/test")))
//!     .will_return(a_response().with_status(200).with_body("defined content"));
//!
//! assert_eq!(
//!     stub.to_json().unwrap(),
//!     r#"{"request":{"method":"GET","url":"/api/defined/test"},"response":{"status":200,"body":"defined content"}}"#
//! );
//! ```
//!
//! The admin client sends them to a running server and checks the request journal
//! afterwards:
//!
//! ```no_run
//! use wiremock_admin::prelude::*;
//!
//! let wiremock = WireMock::connect(AdminConfig::new("localhost", 8080)).unwrap();
//!
//! wiremock
//!     .register(
//!         &stub_for(post(url_path_equal_to("/todo/items")))
//!             .will_return(a_response().with_status(201)),
//!     )
//!     .unwrap();
//!
//! // ... exercise the system under test ...
//!
//! wiremock.verify(1, &post(url_path_equal_to("/todo/items"))).unwrap();
//! ```
//!
//! # Scenarios
//! Stubs can be bound to the state of a named scenario. Every scenario starts in
//! [STARTED]; a served stub may move it on to another state:
//!
//! ```
//! use wiremock_admin::prelude::*;
//!
//! let first = stub_for(get(url_equal_to("/todo/items")))
//!     .in_scenario("To do list")
//!     .when_scenario_state_is(STARTED)
//!     .will_set_state_to("Cancel newspaper item added")
//!     .will_return(ok().with_body("<items><item>Buy milk</item></items>"));
//!
//! assert_eq!(first.serialize().unwrap()["scenarioName"], "To do list");
//! ```
//!
//! # Configuration
//! [WireMock::connect_from_env] reads the server address from `WIREMOCK_HOST`,
//! `WIREMOCK_PORT`, `WIREMOCK_URL_PREFIX` and `WIREMOCK_SCHEME` (defaults:
//! `http://localhost:8080`, no prefix). HTTPS requires the `https` feature.
//!
//! # Logging
//! The crate logs through `tracing`. Every admin request is logged at `debug` level.
//! Records are forwarded to the `log` crate, so `env_logger` can be used to see them in
//! tests.
pub use api::{
    AdminAdapter, AdminError, OutputFormat, RecordSpec, RecordSpecBuilder, RemoteAdminAdapter,
    RequestPatternBuilder, ResponseDefinitionBuilder, Stub, VerificationError, WireMock,
};
pub use common::{
    config::AdminConfig,
    data::{Error, Method, UrlMatcher, STARTED},
    http::{HttpClient, HyperHttpClient},
};

pub mod api;
pub mod common;

/// Everything needed to build stubs and talk to a server.
pub mod prelude {
    pub use crate::api::{
        dsl::{
            a_response, any, delete, get, head, ok, options, patch, post, put, record_spec,
            stub_for, trace,
        },
        matchers::{
            equal_to_json, equal_to_xml, matching, matching_xpath, not_matching, url_equal_to,
            url_matching, url_path_equal_to, url_path_matching,
        },
        AdminError, OutputFormat, RecordSpecBuilder, RequestPatternBuilder,
        ResponseDefinitionBuilder, Stub, VerificationError, WireMock,
    };
    pub use crate::common::{
        config::AdminConfig,
        data::{
            BodyMatchClause, Error, GlobalSettings, MappingRecord, MatchKind, Method,
            ResponseHeaderValue, UrlMatcher, ValueConstraint, STARTED,
        },
    };
}
