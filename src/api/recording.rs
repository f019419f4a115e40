use crate::{
    api::request::RequestPatternBuilder,
    common::data::{Error, RequestPattern},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use url::Url;

/// Whether a recording returns the generated stub mappings in full or only their ids.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum OutputFormat {
    Full,
    Ids,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct CaptureHeader {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_insensitive: Option<bool>,
}

/// Size thresholds above which recorded bodies are written to files instead of being
/// inlined in the generated mappings.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ExtractBodyCriteria {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_size_threshold: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binary_size_threshold: Option<String>,
}

/// How request bodies of recorded traffic are turned into body patterns.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RequestBodyPatternSpec {
    pub matcher: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignore_array_order: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignore_extra_elements: Option<bool>,
}

/// The record spec document for `POST /__admin/recordings/start` and (without a target)
/// `POST /__admin/recordings/snapshot`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct RecordSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<RequestPattern>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub capture_headers: BTreeMap<String, CaptureHeader>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_body_pattern: Option<RequestBodyPatternSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extract_body_criteria: Option<ExtractBodyCriteria>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_format: Option<OutputFormat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persist: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeats_as_scenarios: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transformers: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub transformer_parameters: BTreeMap<String, Value>,
}

/// Describes a recording session: which upstream to proxy to and how captured traffic is
/// turned into stub mappings. Only the target is required, every other option is left out
/// of the document unless it was set.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecordSpecBuilder {
    spec: RecordSpec,
}

impl RecordSpecBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base URL traffic is proxied to while recording. Fails with
    /// [Error::InvalidArgument] if `url` is not an absolute URL.
    pub fn for_target<IntoString: Into<String>>(mut self, url: IntoString) -> Result<Self, Error> {
        let url = url.into();
        Url::parse(&url).map_err(|e| {
            Error::InvalidArgument(format!("'{}' is not a valid target URL: {}", url, e))
        })?;
        self.spec.target_base_url = Some(url);
        Ok(self)
    }

    /// Only requests matching the pattern are recorded.
    pub fn only_requests_matching(mut self, pattern: RequestPatternBuilder) -> Self {
        self.spec.filters = Some(pattern.build());
        self
    }

    /// Records the header as an exact constraint of the generated request patterns.
    pub fn capture_header<IntoString: Into<String>>(mut self, name: IntoString) -> Self {
        self.spec
            .capture_headers
            .insert(name.into(), CaptureHeader::default());
        self
    }

    pub fn capture_header_case_insensitive<IntoString: Into<String>>(
        mut self,
        name: IntoString,
    ) -> Self {
        self.spec.capture_headers.insert(
            name.into(),
            CaptureHeader {
                case_insensitive: Some(true),
            },
        );
        self
    }

    pub fn extract_text_bodies_over(mut self, bytes: u64) -> Self {
        let criteria = self.spec.extract_body_criteria.get_or_insert_with(Default::default);
        criteria.text_size_threshold = Some(bytes.to_string());
        self
    }

    pub fn extract_binary_bodies_over(mut self, bytes: u64) -> Self {
        let criteria = self.spec.extract_body_criteria.get_or_insert_with(Default::default);
        criteria.binary_size_threshold = Some(bytes.to_string());
        self
    }

    /// Generated stubs match request bodies with `equalToJson`.
    pub fn match_request_body_with_equal_to_json(
        mut self,
        ignore_array_order: bool,
        ignore_extra_elements: bool,
    ) -> Self {
        self.spec.request_body_pattern = Some(RequestBodyPatternSpec {
            matcher: "equalToJson".to_string(),
            ignore_array_order: Some(ignore_array_order),
            ignore_extra_elements: Some(ignore_extra_elements),
        });
        self
    }

    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.spec.output_format = Some(format);
        self
    }

    pub fn make_stubs_persistent(mut self, persist: bool) -> Self {
        self.spec.persist = Some(persist);
        self
    }

    /// Identical requests produce a single stub instead of a scenario of responses.
    pub fn ignore_repeat_requests(mut self) -> Self {
        self.spec.repeats_as_scenarios = Some(false);
        self
    }

    pub fn transformers<IntoString: Into<String>>(mut self, names: Vec<IntoString>) -> Self {
        self.spec
            .transformers
            .extend(names.into_iter().map(Into::into));
        self
    }

    pub fn transformer_parameter<IntoString: Into<String>, IntoValue: Into<Value>>(
        mut self,
        name: IntoString,
        value: IntoValue,
    ) -> Self {
        self.spec
            .transformer_parameters
            .insert(name.into(), value.into());
        self
    }

    /// The spec for starting a recording. Fails with [Error::InvalidState] if no target
    /// was set.
    pub fn build(&self) -> Result<RecordSpec, Error> {
        if self.spec.target_base_url.is_none() {
            return Err(Error::InvalidState(
                "a record spec requires a target base URL, see RecordSpecBuilder::for_target"
                    .to_string(),
            ));
        }
        Ok(self.spec.clone())
    }

    pub fn serialize(&self) -> Result<Value, Error> {
        Ok(serde_json::to_value(self.build()?)?)
    }

    /// The spec for a snapshot of already journaled traffic. A target is not used.
    pub fn build_snapshot(&self) -> RecordSpec {
        RecordSpec {
            target_base_url: None,
            ..self.spec.clone()
        }
    }

    pub fn serialize_snapshot(&self) -> Result<Value, Error> {
        Ok(serde_json::to_value(self.build_snapshot())?)
    }
}
