use thiserror::Error;

use crate::{
    api::{adapter::AdminError, request::RequestPatternBuilder, server::WireMock},
    common::util::Join,
};

#[derive(Error, Debug)]
pub enum VerificationError {
    #[error("Assertion failed. Expected count: {expected} Actual count: {actual}")]
    CountMismatch { expected: usize, actual: usize },
    #[error("cannot verify requests: {0}")]
    Admin(#[from] AdminError),
}

/// Compares a single point in time count against the expectation.
pub(crate) fn check_count(expected: usize, actual: usize) -> Result<(), VerificationError> {
    if expected != actual {
        tracing::debug!(
            "Request count mismatch (expected {}, actual {})",
            expected,
            actual
        );
        return Err(VerificationError::CountMismatch { expected, actual });
    }
    Ok(())
}

impl WireMock {
    /// Fails unless exactly `expected` requests in the server's journal match `pattern`.
    /// The count is queried once, there is no waiting for requests that are still under way.
    ///
    /// **Example**:
    /// ```no_run
    /// use wiremock_admin::prelude::*;
    ///
    /// let wiremock = WireMock::connect(AdminConfig::default()).unwrap();
    ///
    /// wiremock
    ///     .verify(1, &post(url_path_equal_to("/orders")).with_header("Accept", "application/json"))
    ///     .unwrap();
    /// ```
    pub fn verify(
        &self,
        expected: usize,
        pattern: &RequestPatternBuilder,
    ) -> Result<(), VerificationError> {
        self.verify_async(expected, pattern).join()
    }

    pub async fn verify_async(
        &self,
        expected: usize,
        pattern: &RequestPatternBuilder,
    ) -> Result<(), VerificationError> {
        let result = self.count_requests_matching_async(pattern).await?;
        check_count(expected, result.count)
    }
}
