use crate::common::data::{
    BodyMatchClause, Error, HeaderConstraint, Method, RequestPattern, UrlMatcher,
    ValueConstraint,
};
use serde_json::Value;
use std::collections::BTreeMap;

/// Describes which requests a stub applies to, or which logged requests a verification
/// counts.
///
/// Every request pattern has exactly one HTTP method and one [UrlMatcher]. Header, query
/// parameter and body constraints are optional and are combined as a conjunction by the
/// server.
///
/// # Example
/// ```
/// use wiremock_admin::prelude::*;
///
/// let pattern = post(url_path_equal_to("/todo/items"))
///     .with_header("Content-Type", "text/plain")
///     .with_request_body(matching(".*newspaper.*"));
///
/// let json = pattern.serialize().unwrap();
/// assert_eq!(json["urlPath"], "/todo/items");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RequestPatternBuilder {
    method: Method,
    url: UrlMatcher,
    headers: BTreeMap<String, HeaderConstraint>,
    query_parameters: BTreeMap<String, ValueConstraint>,
    body_patterns: Vec<BodyMatchClause>,
}

impl RequestPatternBuilder {
    pub fn new(method: Method, url: UrlMatcher) -> Self {
        Self {
            method,
            url,
            headers: BTreeMap::new(),
            query_parameters: BTreeMap::new(),
            body_patterns: Vec::new(),
        }
    }

    /// Like [RequestPatternBuilder::new], but takes the method as a string token.
    /// Fails with [Error::InvalidArgument] if the token is not a known method.
    pub fn try_new(method: &str, url: UrlMatcher) -> Result<Self, Error> {
        Ok(Self::new(method.parse()?, url))
    }

    /// Reads a pattern from the JSON form the server uses (e.g. the `request` object of a
    /// stub mapping).
    pub fn from_json(value: &Value) -> Result<Self, Error> {
        Ok(RequestPattern::from_json(value)?.into())
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn url(&self) -> &UrlMatcher {
        &self.url
    }

    /// The header must be present and equal to `value`. Setting the same header again
    /// replaces the earlier constraint.
    pub fn with_header<KeyString: Into<String>, ValueString: Into<String>>(
        mut self,
        name: KeyString,
        value: ValueString,
    ) -> Self {
        self.headers
            .insert(name.into(), ValueConstraint::equal_to(value));
        self
    }

    /// Adds a header constraint with options, e.g.
    /// `ValueConstraint::equal_to("text/plain").case_insensitive()`.
    pub fn with_header_constraint<IntoString: Into<String>>(
        mut self,
        name: IntoString,
        constraint: HeaderConstraint,
    ) -> Self {
        self.headers.insert(name.into(), constraint);
        self
    }

    /// The header must not be present.
    pub fn without_header<IntoString: Into<String>>(mut self, name: IntoString) -> Self {
        self.headers.insert(name.into(), ValueConstraint::absent());
        self
    }

    /// The query parameter must be present and equal to `value`.
    pub fn with_query_param<KeyString: Into<String>, ValueString: Into<String>>(
        mut self,
        name: KeyString,
        value: ValueString,
    ) -> Self {
        self.query_parameters
            .insert(name.into(), ValueConstraint::equal_to(value));
        self
    }

    /// The query parameter must not be present.
    pub fn without_query_param<IntoString: Into<String>>(mut self, name: IntoString) -> Self {
        self.query_parameters
            .insert(name.into(), ValueConstraint::absent());
        self
    }

    /// Appends a body clause. Clauses are evaluated by the server in the order they were
    /// added.
    pub fn with_request_body(mut self, clause: BodyMatchClause) -> Self {
        self.body_patterns.push(clause);
        self
    }

    pub fn build(&self) -> RequestPattern {
        RequestPattern {
            method: self.method,
            url: self.url.clone(),
            headers: self.headers.clone(),
            query_parameters: self.query_parameters.clone(),
            body_patterns: self.body_patterns.clone(),
        }
    }

    pub fn serialize(&self) -> Result<Value, Error> {
        Ok(serde_json::to_value(self.build())?)
    }

    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string(&self.build())?)
    }
}

impl From<RequestPattern> for RequestPatternBuilder {
    fn from(value: RequestPattern) -> Self {
        Self {
            method: value.method,
            url: value.url,
            headers: value.headers,
            query_parameters: value.query_parameters,
            body_patterns: value.body_patterns,
        }
    }
}
