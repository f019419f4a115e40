//! Short constructor functions so that stubs read close to how they are described:
//! `stub_for(get(url_equal_to("/x"))).will_return(a_response().with_status(200))`.

use crate::{
    api::{
        recording::RecordSpecBuilder, request::RequestPatternBuilder,
        response::ResponseDefinitionBuilder, stub::Stub,
    },
    common::data::{Method, UrlMatcher},
};

pub fn get(url: UrlMatcher) -> RequestPatternBuilder {
    RequestPatternBuilder::new(Method::GET, url)
}

pub fn head(url: UrlMatcher) -> RequestPatternBuilder {
    RequestPatternBuilder::new(Method::HEAD, url)
}

pub fn post(url: UrlMatcher) -> RequestPatternBuilder {
    RequestPatternBuilder::new(Method::POST, url)
}

pub fn put(url: UrlMatcher) -> RequestPatternBuilder {
    RequestPatternBuilder::new(Method::PUT, url)
}

pub fn delete(url: UrlMatcher) -> RequestPatternBuilder {
    RequestPatternBuilder::new(Method::DELETE, url)
}

pub fn patch(url: UrlMatcher) -> RequestPatternBuilder {
    RequestPatternBuilder::new(Method::PATCH, url)
}

pub fn options(url: UrlMatcher) -> RequestPatternBuilder {
    RequestPatternBuilder::new(Method::OPTIONS, url)
}

pub fn trace(url: UrlMatcher) -> RequestPatternBuilder {
    RequestPatternBuilder::new(Method::TRACE, url)
}

/// Matches requests of every method.
pub fn any(url: UrlMatcher) -> RequestPatternBuilder {
    RequestPatternBuilder::new(Method::ANY, url)
}

pub fn a_response() -> ResponseDefinitionBuilder {
    ResponseDefinitionBuilder::new()
}

/// A response with status 200 and no body.
pub fn ok() -> ResponseDefinitionBuilder {
    ResponseDefinitionBuilder::new().with_status(200)
}

pub fn stub_for(request: RequestPatternBuilder) -> Stub {
    Stub::for_request(request)
}

pub fn record_spec() -> RecordSpecBuilder {
    RecordSpecBuilder::new()
}
