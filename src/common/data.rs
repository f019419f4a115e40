use serde::{
    de::{self, Deserializer},
    ser::{SerializeMap, Serializer},
    Deserialize, Serialize,
};
use serde_json::{Map, Value};
use std::{
    collections::BTreeMap,
    convert::TryFrom,
    fmt,
    fmt::Display,
    str::FromStr,
};

/// The name of the state every scenario starts in (and returns to after a scenario reset).
pub const STARTED: &str = "Started";

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("invalid state: {0}")]
    InvalidState(String),
    #[error("not implemented: {0}")]
    NotImplemented(String),
    #[error("cannot convert mapping to/from JSON: {0}")]
    JsonConversionError(#[from] serde_json::Error),
}

// ===============================================================================================
// Method
// ===============================================================================================

/// Represents an HTTP method as understood by the mock server. `ANY` matches every method.
#[allow(clippy::upper_case_acronyms)]
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(try_from = "String")]
pub enum Method {
    GET,
    HEAD,
    POST,
    PUT,
    DELETE,
    PATCH,
    OPTIONS,
    TRACE,
    #[default]
    ANY,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GET => "GET",
            Method::HEAD => "HEAD",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::DELETE => "DELETE",
            Method::PATCH => "PATCH",
            Method::OPTIONS => "OPTIONS",
            Method::TRACE => "TRACE",
            Method::ANY => "ANY",
        }
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::GET),
            "HEAD" => Ok(Method::HEAD),
            "POST" => Ok(Method::POST),
            "PUT" => Ok(Method::PUT),
            "DELETE" => Ok(Method::DELETE),
            "PATCH" => Ok(Method::PATCH),
            "OPTIONS" => Ok(Method::OPTIONS),
            "TRACE" => Ok(Method::TRACE),
            "ANY" => Ok(Method::ANY),
            _ => Err(Error::InvalidArgument(format!(
                "'{}' is not a valid HTTP method",
                input
            ))),
        }
    }
}

impl TryFrom<&str> for Method {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<String> for Method {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ===============================================================================================
// URL matching
// ===============================================================================================

/// A single URL matching expression. The variant decides under which key the expression
/// is sent to the server.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub enum UrlMatcher {
    /// Exact match on path and query (`url`).
    #[serde(rename = "url")]
    Equal(String),
    /// Regular expression on path and query (`urlPattern`).
    #[serde(rename = "urlPattern")]
    Matching(String),
    /// Exact match on the path only (`urlPath`).
    #[serde(rename = "urlPath")]
    PathEqual(String),
    /// Regular expression on the path only (`urlPathPattern`).
    #[serde(rename = "urlPathPattern")]
    PathMatching(String),
}

impl UrlMatcher {
    pub(crate) const KEYS: [&'static str; 4] = ["url", "urlPattern", "urlPath", "urlPathPattern"];

    /// The JSON key this matcher is serialized under.
    pub fn key(&self) -> &'static str {
        match self {
            UrlMatcher::Equal(_) => "url",
            UrlMatcher::Matching(_) => "urlPattern",
            UrlMatcher::PathEqual(_) => "urlPath",
            UrlMatcher::PathMatching(_) => "urlPathPattern",
        }
    }

    pub fn expression(&self) -> &str {
        match self {
            UrlMatcher::Equal(e)
            | UrlMatcher::Matching(e)
            | UrlMatcher::PathEqual(e)
            | UrlMatcher::PathMatching(e) => e,
        }
    }

    /// Reads the URL matcher out of a serialized request object. Exactly one of the
    /// known URL keys must be present and it must hold a string.
    pub fn from_request_json(request: &Map<String, Value>) -> Result<Self, Error> {
        let mut found = UrlMatcher::KEYS
            .iter()
            .filter_map(|key| request.get(*key).map(|value| (*key, value)));

        let (key, value) = found.next().ok_or_else(|| {
            Error::InvalidArgument("request pattern does not contain a URL matcher".to_string())
        })?;

        if let Some((other, _)) = found.next() {
            return Err(Error::InvalidArgument(format!(
                "request pattern contains more than one URL matcher ('{}' and '{}')",
                key, other
            )));
        }

        let expression = value.as_str().ok_or_else(|| {
            Error::InvalidArgument(format!("URL matcher '{}' must be a string", key))
        })?;

        Ok(match key {
            "url" => UrlMatcher::Equal(expression.to_string()),
            "urlPattern" => UrlMatcher::Matching(expression.to_string()),
            "urlPath" => UrlMatcher::PathEqual(expression.to_string()),
            _ => UrlMatcher::PathMatching(expression.to_string()),
        })
    }
}

// ===============================================================================================
// Body matching
// ===============================================================================================

/// The closed set of strategies the server can apply to a request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchKind {
    Matches,
    DoesNotMatch,
    EqualToXml,
    MatchesXPath,
    EqualToJson,
}

impl MatchKind {
    const ALL: [MatchKind; 5] = [
        MatchKind::Matches,
        MatchKind::DoesNotMatch,
        MatchKind::EqualToXml,
        MatchKind::MatchesXPath,
        MatchKind::EqualToJson,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            MatchKind::Matches => "matches",
            MatchKind::DoesNotMatch => "doesNotMatch",
            MatchKind::EqualToXml => "equalToXml",
            MatchKind::MatchesXPath => "matchesXPath",
            MatchKind::EqualToJson => "equalToJson",
        }
    }

    fn from_key(key: &str) -> Option<Self> {
        MatchKind::ALL.iter().copied().find(|kind| kind.key() == key)
    }
}

/// One clause of a request body match. Serializes to `{"<kind>": "<value>"}` followed by
/// any boolean flags that modify the strategy (e.g. `ignoreArrayOrder`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyMatchClause {
    kind: MatchKind,
    value: String,
    flags: BTreeMap<String, bool>,
}

impl BodyMatchClause {
    pub fn new<IntoString: Into<String>>(kind: MatchKind, value: IntoString) -> Self {
        Self {
            kind,
            value: value.into(),
            flags: BTreeMap::new(),
        }
    }

    pub fn kind(&self) -> MatchKind {
        self.kind
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn flags(&self) -> &BTreeMap<String, bool> {
        &self.flags
    }

    pub fn with_flag<IntoString: Into<String>>(mut self, name: IntoString, value: bool) -> Self {
        self.flags.insert(name.into(), value);
        self
    }

    /// Array element order is not significant (`equalToJson`).
    pub fn ignoring_array_order(self) -> Self {
        self.with_flag("ignoreArrayOrder", true)
    }

    /// Elements present in the request but not in the expected document are tolerated
    /// (`equalToJson`).
    pub fn ignoring_extra_elements(self) -> Self {
        self.with_flag("ignoreExtraElements", true)
    }
}

impl Serialize for BodyMatchClause {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(1 + self.flags.len()))?;
        map.serialize_entry(self.kind.key(), &self.value)?;
        for (name, value) in &self.flags {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for BodyMatchClause {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let object = Map::<String, Value>::deserialize(deserializer)?;

        let mut clause: Option<BodyMatchClause> = None;
        let mut flags = BTreeMap::new();

        for (key, value) in object {
            match MatchKind::from_key(&key) {
                Some(kind) if clause.is_none() => {
                    // The server echoes structured equalToJson values as objects.
                    let value = match value {
                        Value::String(s) => s,
                        other => other.to_string(),
                    };
                    clause = Some(BodyMatchClause::new(kind, value));
                }
                Some(_) => {
                    return Err(de::Error::custom(
                        "body pattern contains more than one match strategy",
                    ))
                }
                None => {
                    if let Value::Bool(b) = value {
                        flags.insert(key, b);
                    }
                }
            }
        }

        let mut clause = clause
            .ok_or_else(|| de::Error::custom("body pattern without a known match strategy"))?;
        clause.flags = flags;
        Ok(clause)
    }
}

// ===============================================================================================
// Header / query parameter constraints
// ===============================================================================================

/// What a [ValueConstraint] requires of the named value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstraintKind {
    EqualTo(String),
    Absent,
}

/// A constraint on a single named value (header or query parameter). Boolean options
/// such as `caseInsensitive` travel next to the operator key, as for body clauses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueConstraint {
    kind: ConstraintKind,
    flags: BTreeMap<String, bool>,
}

pub type HeaderConstraint = ValueConstraint;

impl ValueConstraint {
    pub fn equal_to<IntoString: Into<String>>(value: IntoString) -> Self {
        Self {
            kind: ConstraintKind::EqualTo(value.into()),
            flags: BTreeMap::new(),
        }
    }

    pub fn absent() -> Self {
        Self {
            kind: ConstraintKind::Absent,
            flags: BTreeMap::new(),
        }
    }

    pub fn kind(&self) -> &ConstraintKind {
        &self.kind
    }

    pub fn flags(&self) -> &BTreeMap<String, bool> {
        &self.flags
    }

    pub fn with_flag<IntoString: Into<String>>(mut self, name: IntoString, value: bool) -> Self {
        self.flags.insert(name.into(), value);
        self
    }

    pub fn case_insensitive(self) -> Self {
        self.with_flag("caseInsensitive", true)
    }
}

impl Serialize for ValueConstraint {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(1 + self.flags.len()))?;
        match &self.kind {
            ConstraintKind::EqualTo(expected) => map.serialize_entry("equalTo", expected)?,
            ConstraintKind::Absent => map.serialize_entry("absent", &true)?,
        }
        for (name, value) in &self.flags {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ValueConstraint {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let object = Map::<String, Value>::deserialize(deserializer)?;

        let mut kind: Option<ConstraintKind> = None;
        let mut flags = BTreeMap::new();

        for (key, value) in object {
            let parsed = match (key.as_str(), value) {
                ("equalTo", Value::String(expected)) => ConstraintKind::EqualTo(expected),
                ("absent", Value::Bool(true)) => ConstraintKind::Absent,
                ("equalTo", _) | ("absent", _) => {
                    return Err(de::Error::custom(format!(
                        "invalid value for '{}' in value constraint",
                        key
                    )))
                }
                (_, Value::Bool(b)) => {
                    flags.insert(key, b);
                    continue;
                }
                (_, _) => {
                    return Err(de::Error::custom(format!(
                        "unsupported value constraint '{}'",
                        key
                    )))
                }
            };

            if kind.replace(parsed).is_some() {
                return Err(de::Error::custom(
                    "a value constraint needs exactly one of 'equalTo' or 'absent: true'",
                ));
            }
        }

        let kind = kind.ok_or_else(|| {
            de::Error::custom("a value constraint needs exactly one of 'equalTo' or 'absent: true'")
        })?;

        Ok(Self { kind, flags })
    }
}

// ===============================================================================================
// Mapping documents
// ===============================================================================================

/// The request half of a stub mapping, in the shape the admin API expects.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RequestPattern {
    #[serde(default)]
    pub method: Method,
    #[serde(flatten)]
    pub url: UrlMatcher,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, HeaderConstraint>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub query_parameters: BTreeMap<String, ValueConstraint>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub body_patterns: Vec<BodyMatchClause>,
}

impl RequestPattern {
    /// Reads a request pattern from the JSON the server sends back. Fails with
    /// [Error::InvalidArgument] if the document has no (or more than one) URL matcher.
    pub fn from_json(value: &Value) -> Result<Self, Error> {
        let object = value.as_object().ok_or_else(|| {
            Error::InvalidArgument("request pattern must be a JSON object".to_string())
        })?;
        UrlMatcher::from_request_json(object)?;
        if let Some(method) = object.get("method").and_then(Value::as_str) {
            method.parse::<Method>()?;
        }
        Ok(serde_json::from_value(value.clone())?)
    }
}

/// A response header. The server returns repeated headers (e.g. `Set-Cookie`) as a list.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum ResponseHeaderValue {
    Single(String),
    Multiple(Vec<String>),
}

impl From<String> for ResponseHeaderValue {
    fn from(value: String) -> Self {
        ResponseHeaderValue::Single(value)
    }
}

impl From<&str> for ResponseHeaderValue {
    fn from(value: &str) -> Self {
        ResponseHeaderValue::Single(value.to_string())
    }
}

impl From<Vec<String>> for ResponseHeaderValue {
    fn from(values: Vec<String>) -> Self {
        ResponseHeaderValue::Multiple(values)
    }
}

/// The response half of a stub mapping.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResponseDefinition {
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json_body: Option<Value>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, ResponseHeaderValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_delay_milliseconds: Option<u64>,
}

/// A complete stub mapping document as accepted by `POST /__admin/mappings`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StubMapping {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub request: RequestPattern,
    pub response: ResponseDefinition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persistent: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scenario_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_scenario_state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_scenario_state: Option<String>,
}

/// A stub mapping as stored by the server. The document is kept verbatim; the server
/// assigned identifier is available through [MappingRecord::id].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(transparent)]
pub struct MappingRecord(Value);

impl MappingRecord {
    pub fn new(document: Value) -> Self {
        Self(document)
    }

    /// The server assigned identifier (`id`, falling back to `uuid`).
    pub fn id(&self) -> Option<&str> {
        self.0
            .get("id")
            .or_else(|| self.0.get("uuid"))
            .and_then(Value::as_str)
    }

    pub fn as_json(&self) -> &Value {
        &self.0
    }

    pub fn into_json(self) -> Value {
        self.0
    }
}

// ===============================================================================================
// Admin API results
// ===============================================================================================

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Meta {
    pub total: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ListStubMappingsResult {
    #[serde(default)]
    pub mappings: Vec<MappingRecord>,
    #[serde(default)]
    pub meta: Meta,
}

/// A request as recorded in the server's request journal.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoggedRequest {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub absolute_url: Option<String>,
    pub method: String,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub headers: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logged_date_string: Option<String>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// One entry of the request journal: the request plus what the server did with it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ServeEvent {
    pub id: String,
    pub request: LoggedRequest,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_definition: Option<Value>,
    #[serde(default)]
    pub was_matched: bool,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ServeEventsResult {
    #[serde(default)]
    pub requests: Vec<ServeEvent>,
    #[serde(default)]
    pub meta: Meta,
    #[serde(default)]
    pub request_journal_disabled: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FindRequestsResult {
    #[serde(default)]
    pub requests: Vec<LoggedRequest>,
    #[serde(default)]
    pub request_journal_disabled: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountResult {
    pub count: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub distance: f64,
}

/// A request/stub pair that did not match but came close.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NearMiss {
    pub request: LoggedRequest,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stub_mapping: Option<MappingRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_pattern: Option<Value>,
    pub match_result: MatchResult,
}

/// Near misses, closest first. How many are returned is decided by the server.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NearMissesResult {
    #[serde(default)]
    pub near_misses: Vec<NearMiss>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingStatus {
    NeverStarted,
    Recording,
    Stopped,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordingStatusResult {
    pub status: RecordingStatus,
}

/// What a stopped recording or a snapshot produced: full mappings or only their ids,
/// depending on the requested output format.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct SnapshotRecordResult {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mappings: Vec<MappingRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ids: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub state: String,
    #[serde(default)]
    pub possible_states: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct GetScenariosResult {
    #[serde(default)]
    pub scenarios: Vec<Scenario>,
}

/// Server wide settings (`POST /__admin/settings`).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct GlobalSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_delay: Option<u64>,
}
