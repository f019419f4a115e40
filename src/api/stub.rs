use crate::{
    api::{request::RequestPatternBuilder, response::ResponseDefinitionBuilder},
    common::data::{Error, MappingRecord, RequestPattern, ResponseDefinition, StubMapping},
};
use serde_json::Value;

/// A stub mapping: a request pattern paired with the response the server returns for
/// matching requests, optionally bound to a scenario state.
///
/// Scenario annotations only describe where the stub sits in a server side state machine:
/// [Stub::when_scenario_state_is] restricts the stub to a state and
/// [Stub::will_set_state_to] moves the scenario on when the stub is served. Both are only
/// sent together with [Stub::in_scenario]. Without a scenario name they are left out of the
/// serialized document.
///
/// # Example
/// ```
/// use wiremock_admin::prelude::*;
///
/// let stub = stub_for(post(url_equal_to("/todo/items")))
///     .in_scenario("To do list")
///     .when_scenario_state_is(STARTED)
///     .will_set_state_to("Cancel newspaper item added")
///     .will_return(a_response().with_status(201));
///
/// let json = stub.serialize().unwrap();
/// assert_eq!(json["newScenarioState"], "Cancel newspaper item added");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Stub {
    request: RequestPatternBuilder,
    response: Option<ResponseDefinitionBuilder>,
    name: Option<String>,
    priority: Option<u32>,
    persistent: Option<bool>,
    scenario_name: Option<String>,
    required_scenario_state: Option<String>,
    new_scenario_state: Option<String>,
}

impl Stub {
    /// Creates a stub without a response. One must be attached with [Stub::will_return]
    /// before the stub can be serialized.
    pub fn for_request(request: RequestPatternBuilder) -> Self {
        Self {
            request,
            response: None,
            name: None,
            priority: None,
            persistent: None,
            scenario_name: None,
            required_scenario_state: None,
            new_scenario_state: None,
        }
    }

    pub fn new(request: RequestPatternBuilder, response: ResponseDefinitionBuilder) -> Self {
        Self::for_request(request).will_return(response)
    }

    /// Attaches the response, replacing any response attached before.
    pub fn will_return(mut self, response: ResponseDefinitionBuilder) -> Self {
        self.response = Some(response);
        self
    }

    pub fn in_scenario<IntoString: Into<String>>(mut self, name: IntoString) -> Self {
        self.scenario_name = Some(name.into());
        self
    }

    pub fn when_scenario_state_is<IntoString: Into<String>>(mut self, state: IntoString) -> Self {
        self.required_scenario_state = Some(state.into());
        self
    }

    pub fn will_set_state_to<IntoString: Into<String>>(mut self, state: IntoString) -> Self {
        self.new_scenario_state = Some(state.into());
        self
    }

    /// A human readable name shown by the server's admin tooling.
    pub fn with_name<IntoString: Into<String>>(mut self, name: IntoString) -> Self {
        self.name = Some(name.into());
        self
    }

    /// When several stubs match, the one with the lowest priority value wins.
    pub fn at_priority(mut self, priority: u32) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Asks the server to write the stub to its mapping files on creation.
    pub fn persistent(mut self, persistent: bool) -> Self {
        self.persistent = Some(persistent);
        self
    }

    pub fn request(&self) -> &RequestPatternBuilder {
        &self.request
    }

    pub fn response(&self) -> Option<&ResponseDefinitionBuilder> {
        self.response.as_ref()
    }

    pub fn scenario_name(&self) -> Option<&str> {
        self.scenario_name.as_deref()
    }

    pub fn build(&self) -> Result<StubMapping, Error> {
        let response = self.response.as_ref().ok_or_else(|| {
            Error::InvalidState("a stub requires a response, see Stub::will_return".to_string())
        })?;

        let (required_scenario_state, new_scenario_state) = match &self.scenario_name {
            Some(_) => (
                self.required_scenario_state.clone(),
                self.new_scenario_state.clone(),
            ),
            None => {
                if self.required_scenario_state.is_some() || self.new_scenario_state.is_some() {
                    tracing::warn!(
                        "scenario states set on a stub for '{}' without a scenario name are ignored",
                        self.request.url().expression()
                    );
                }
                (None, None)
            }
        };

        Ok(StubMapping {
            name: self.name.clone(),
            request: self.request.build(),
            response: response.build()?,
            priority: self.priority,
            persistent: self.persistent,
            scenario_name: self.scenario_name.clone(),
            required_scenario_state,
            new_scenario_state,
        })
    }

    pub fn serialize(&self) -> Result<Value, Error> {
        Ok(serde_json::to_value(self.build()?)?)
    }

    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string(&self.build()?)?)
    }

    /// Rebuilds a stub from a mapping document returned by the server.
    ///
    /// The textual response body is taken from `response_body` only, never from the
    /// document: some servers transmit the literal body separately from the mapping
    /// metadata. Without it the rebuilt stub has no text body, so a round trip is lossy.
    /// Server assigned fields (`id`, `uuid`, ...) are ignored.
    pub fn deserialize(mapping: &Value, response_body: Option<&str>) -> Result<Self, Error> {
        let request = mapping.get("request").ok_or_else(|| {
            Error::InvalidArgument("stub mapping does not contain a request".to_string())
        })?;
        let request = RequestPattern::from_json(request)?;

        let response = mapping.get("response").ok_or_else(|| {
            Error::InvalidArgument("stub mapping does not contain a response".to_string())
        })?;
        let mut response: ResponseDefinition = serde_json::from_value(response.clone())?;
        response.body = None;

        let mut response = ResponseDefinitionBuilder::from(response);
        if let Some(body) = response_body {
            response = response.with_body(body);
        }

        let field = |name: &str| mapping.get(name).and_then(Value::as_str).map(String::from);

        Ok(Self {
            request: request.into(),
            response: Some(response),
            name: field("name"),
            priority: mapping
                .get("priority")
                .and_then(Value::as_u64)
                .and_then(|p| u32::try_from(p).ok()),
            persistent: mapping.get("persistent").and_then(Value::as_bool),
            scenario_name: field("scenarioName"),
            required_scenario_state: field("requiredScenarioState"),
            new_scenario_state: field("newScenarioState"),
        })
    }
}

impl MappingRecord {
    /// See [Stub::deserialize].
    pub fn to_stub(&self, response_body: Option<&str>) -> Result<Stub, Error> {
        Stub::deserialize(self.as_json(), response_body)
    }
}
