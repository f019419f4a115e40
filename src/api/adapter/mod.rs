use async_trait::async_trait;

use crate::{
    api::{recording::RecordSpec, stub::Stub},
    common::data::{
        CountResult, Error as MappingError, FindRequestsResult, GetScenariosResult,
        GlobalSettings, ListStubMappingsResult, LoggedRequest, MappingRecord, NearMissesResult,
        RecordingStatusResult, RequestPattern, ServeEvent, ServeEventsResult,
        SnapshotRecordResult,
    },
};

use thiserror::Error;

pub mod remote;

#[derive(Error, Debug)]
pub enum AdminError {
    #[error("invalid mapping: {0}")]
    InvalidMapping(#[from] MappingError),
    #[error("cannot serialize JSON: {0}")]
    JsonSerializationError(serde_json::Error),
    #[error("cannot deserialize JSON: {0}")]
    JsonDeserializationError(serde_json::Error),
    #[error("cannot build request: {0}")]
    RequestBuildError(#[from] http::Error),
    #[error("transport error: {0}")]
    Transport(#[from] crate::common::http::Error),
    #[error("adapter error: {0}")]
    UpstreamError(String),
    #[error("cannot start runtime: {0}")]
    RuntimeError(#[from] std::io::Error),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// One method per admin API operation. Implementations serialize the given domain object,
/// perform a single exchange with the server and parse the answer.
#[async_trait]
pub trait AdminAdapter {
    fn admin_url(&self) -> &str;

    async fn list_stub_mappings(&self) -> Result<ListStubMappingsResult, AdminError>;
    async fn add_stub_mapping(&self, stub: &Stub) -> Result<MappingRecord, AdminError>;
    async fn get_stub_mapping(&self, id: &str) -> Result<MappingRecord, AdminError>;
    async fn edit_stub_mapping(&self, id: &str, stub: &Stub)
        -> Result<MappingRecord, AdminError>;
    async fn remove_stub_mapping(&self, id: &str) -> Result<(), AdminError>;
    async fn reset_to_default_mappings(&self) -> Result<(), AdminError>;
    async fn reset_mappings(&self) -> Result<(), AdminError>;
    async fn save_mappings(&self) -> Result<(), AdminError>;

    async fn get_all_requests(&self) -> Result<ServeEventsResult, AdminError>;
    async fn get_request(&self, id: &str) -> Result<ServeEvent, AdminError>;
    async fn reset_requests(&self) -> Result<(), AdminError>;
    async fn count_requests_matching(
        &self,
        pattern: &RequestPattern,
    ) -> Result<CountResult, AdminError>;
    async fn find_requests_matching(
        &self,
        pattern: &RequestPattern,
    ) -> Result<FindRequestsResult, AdminError>;
    async fn find_unmatched_requests(&self) -> Result<FindRequestsResult, AdminError>;

    async fn find_near_misses_for_unmatched_requests(
        &self,
    ) -> Result<NearMissesResult, AdminError>;
    async fn find_top_near_misses_for_request(
        &self,
        request: &LoggedRequest,
    ) -> Result<NearMissesResult, AdminError>;
    async fn find_top_near_misses_for_pattern(
        &self,
        pattern: &RequestPattern,
    ) -> Result<NearMissesResult, AdminError>;

    async fn start_recording(&self, spec: &RecordSpec) -> Result<(), AdminError>;
    async fn stop_recording(&self) -> Result<SnapshotRecordResult, AdminError>;
    async fn get_recording_status(&self) -> Result<RecordingStatusResult, AdminError>;
    async fn snapshot_record(
        &self,
        spec: Option<&RecordSpec>,
    ) -> Result<SnapshotRecordResult, AdminError>;

    async fn get_scenarios(&self) -> Result<GetScenariosResult, AdminError>;
    async fn reset_scenarios(&self) -> Result<(), AdminError>;

    async fn reset_all(&self) -> Result<(), AdminError>;
    async fn update_global_settings(&self, settings: &GlobalSettings) -> Result<(), AdminError>;
    async fn shutdown(&self) -> Result<(), AdminError>;
}
