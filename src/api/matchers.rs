//! Constructors for URL matchers and request body match clauses.
//!
//! None of these validate their argument. Whether a regular expression, an XPath expression
//! or an expected JSON document is well formed is decided by the mock server.

use crate::common::data::{BodyMatchClause, MatchKind, UrlMatcher};

/// Matches the path and query of a request exactly (`url`).
pub fn url_equal_to<IntoString: Into<String>>(url: IntoString) -> UrlMatcher {
    UrlMatcher::Equal(url.into())
}

/// Matches the path and query of a request against a regular expression (`urlPattern`).
pub fn url_matching<IntoString: Into<String>>(regex: IntoString) -> UrlMatcher {
    UrlMatcher::Matching(regex.into())
}

/// Matches only the path of a request exactly (`urlPath`).
pub fn url_path_equal_to<IntoString: Into<String>>(path: IntoString) -> UrlMatcher {
    UrlMatcher::PathEqual(path.into())
}

/// Matches only the path of a request against a regular expression (`urlPathPattern`).
pub fn url_path_matching<IntoString: Into<String>>(regex: IntoString) -> UrlMatcher {
    UrlMatcher::PathMatching(regex.into())
}

/// The body must match the regular expression.
pub fn matching<IntoString: Into<String>>(regex: IntoString) -> BodyMatchClause {
    BodyMatchClause::new(MatchKind::Matches, regex)
}

/// The body must not match the regular expression.
pub fn not_matching<IntoString: Into<String>>(regex: IntoString) -> BodyMatchClause {
    BodyMatchClause::new(MatchKind::DoesNotMatch, regex)
}

/// The body must be semantically equal to the XML document.
pub fn equal_to_xml<IntoString: Into<String>>(xml: IntoString) -> BodyMatchClause {
    BodyMatchClause::new(MatchKind::EqualToXml, xml)
}

/// The body must be an XML document matching the XPath expression.
pub fn matching_xpath<IntoString: Into<String>>(xpath: IntoString) -> BodyMatchClause {
    BodyMatchClause::new(MatchKind::MatchesXPath, xpath)
}

/// The body must be semantically equal to the JSON document.
pub fn equal_to_json<IntoString: Into<String>>(json: IntoString) -> BodyMatchClause {
    BodyMatchClause::new(MatchKind::EqualToJson, json)
}
