use crate::common::data::{Error, ResponseDefinition, ResponseHeaderValue};
use serde_json::Value;
use std::{collections::BTreeMap, path::Path};

#[derive(Debug, Clone, PartialEq)]
enum ResponseBody {
    Text(String),
    Json(Value),
}

/// Describes the response the server returns when a stub matches.
///
/// A status code is mandatory: [ResponseDefinitionBuilder::build] fails with
/// [Error::InvalidState] if none was set. A body that was never configured is left out
/// of the serialized document, which the server treats differently from an empty body.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResponseDefinitionBuilder {
    status: Option<u16>,
    body: Option<ResponseBody>,
    headers: BTreeMap<String, ResponseHeaderValue>,
    fixed_delay_milliseconds: Option<u64>,
}

impl ResponseDefinitionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shortcut for a response with a status code and a text body.
    pub fn with<IntoString: Into<String>>(status: u16, body: IntoString) -> Self {
        Self::new().with_status(status).with_body(body)
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets a text body. Replaces a JSON body set earlier.
    pub fn with_body<IntoString: Into<String>>(mut self, body: IntoString) -> Self {
        self.body = Some(ResponseBody::Text(body.into()));
        self
    }

    /// Sets a JSON body (`jsonBody`). Replaces a text body set earlier.
    pub fn with_json_body<IntoValue: Into<Value>>(mut self, body: IntoValue) -> Self {
        self.body = Some(ResponseBody::Json(body.into()));
        self
    }

    pub fn with_header<KeyString: Into<String>, ValueString: Into<String>>(
        mut self,
        name: KeyString,
        value: ValueString,
    ) -> Self {
        self.headers
            .insert(name.into(), ResponseHeaderValue::Single(value.into()));
        self
    }

    /// Sends the header once per value, e.g. several `Set-Cookie` headers.
    pub fn with_header_values<KeyString: Into<String>, ValueString: Into<String>>(
        mut self,
        name: KeyString,
        values: Vec<ValueString>,
    ) -> Self {
        let values = values.into_iter().map(Into::into).collect();
        self.headers
            .insert(name.into(), ResponseHeaderValue::Multiple(values));
        self
    }

    /// Delays the response by the given number of milliseconds.
    pub fn with_fixed_delay(mut self, milliseconds: u64) -> Self {
        self.fixed_delay_milliseconds = Some(milliseconds);
        self
    }

    /// Serving a body from a file requires the file to exist in the server's `__files`
    /// directory, which this client does not manage. Always fails with
    /// [Error::NotImplemented].
    pub fn with_body_file<P: AsRef<Path>>(self, path: P) -> Result<Self, Error> {
        Err(Error::NotImplemented(format!(
            "response bodies from files are not supported (requested '{}')",
            path.as_ref().display()
        )))
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn body(&self) -> Option<&str> {
        match &self.body {
            Some(ResponseBody::Text(text)) => Some(text),
            _ => None,
        }
    }

    pub fn build(&self) -> Result<ResponseDefinition, Error> {
        let status = self.status.ok_or_else(|| {
            Error::InvalidState("a response definition requires a status code".to_string())
        })?;

        let (body, json_body) = match &self.body {
            Some(ResponseBody::Text(text)) => (Some(text.clone()), None),
            Some(ResponseBody::Json(json)) => (None, Some(json.clone())),
            None => (None, None),
        };

        Ok(ResponseDefinition {
            status,
            body,
            json_body,
            headers: self.headers.clone(),
            fixed_delay_milliseconds: self.fixed_delay_milliseconds,
        })
    }

    pub fn serialize(&self) -> Result<Value, Error> {
        Ok(serde_json::to_value(self.build()?)?)
    }
}

impl From<ResponseDefinition> for ResponseDefinitionBuilder {
    fn from(value: ResponseDefinition) -> Self {
        let body = match (value.body, value.json_body) {
            (Some(text), _) => Some(ResponseBody::Text(text)),
            (None, Some(json)) => Some(ResponseBody::Json(json)),
            (None, None) => None,
        };

        Self {
            status: Some(value.status),
            body,
            headers: value.headers,
            fixed_delay_milliseconds: value.fixed_delay_milliseconds,
        }
    }
}
