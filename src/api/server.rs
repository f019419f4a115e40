use std::sync::Arc;

use tokio::runtime::Runtime;

use crate::{
    api::{
        adapter::{remote::RemoteAdminAdapter, AdminAdapter, AdminError},
        recording::RecordSpecBuilder,
        request::RequestPatternBuilder,
        stub::Stub,
    },
    common::{
        config::AdminConfig,
        data::{
            CountResult, FindRequestsResult, GetScenariosResult, GlobalSettings,
            ListStubMappingsResult, LoggedRequest, MappingRecord, NearMissesResult,
            RecordingStatusResult, ServeEvent, ServeEventsResult, SnapshotRecordResult,
        },
        http::{HttpClient, HyperHttpClient},
        util::Join,
    },
};

fn config_from_env() -> Result<AdminConfig, AdminError> {
    AdminConfig::from_env().map_err(|e| AdminError::InvalidConfig(e.to_string()))
}

/// A client for the admin API of a running WireMock server.
///
/// Every operation exists in a blocking form and in an `_async` form. The blocking form
/// requires a client created with [WireMock::connect] (or [WireMock::connect_from_env]),
/// which owns a small runtime that executes the requests. Clients created with
/// [WireMock::connect_async] run their requests on the caller's Tokio runtime and should
/// only be used through the `_async` methods.
///
/// **Example**:
/// ```no_run
/// use wiremock_admin::prelude::*;
///
/// let wiremock = WireMock::connect(AdminConfig::new("localhost", 8080)).unwrap();
///
/// let mapping = wiremock
///     .register(
///         &stub_for(get(url_equal_to("/hello")))
///             .will_return(a_response().with_status(200).with_body("Hello!")),
///     )
///     .unwrap();
///
/// wiremock.verify(0, &get(url_equal_to("/hello"))).unwrap();
/// wiremock.remove_stub_mapping(mapping.id().unwrap()).unwrap();
/// ```
pub struct WireMock {
    pub(crate) adapter: Arc<dyn AdminAdapter + Send + Sync>,
    config: Option<AdminConfig>,
    // Dropped last so that requests still in flight can finish.
    _runtime: Option<Arc<Runtime>>,
}

impl WireMock {
    /// Connects to the server described by `config`. The returned client owns a runtime,
    /// so it must not be dropped from within an asynchronous context.
    pub fn connect(config: AdminConfig) -> Result<Self, AdminError> {
        let runtime = Arc::new(
            tokio::runtime::Builder::new_multi_thread()
                .worker_threads(1)
                .thread_name("wiremock-admin")
                .enable_all()
                .build()?,
        );

        let http_client = HyperHttpClient::new(Some(runtime.clone()))?;
        Self::create(config, Arc::new(http_client), Some(runtime))
    }

    /// Connects to the server described by `config`, executing requests on the runtime
    /// of the caller.
    pub async fn connect_async(config: AdminConfig) -> Result<Self, AdminError> {
        let http_client = HyperHttpClient::new(None)?;
        Self::create(config, Arc::new(http_client), None)
    }

    /// Like [WireMock::connect] with the address read from `WIREMOCK_HOST`, `WIREMOCK_PORT`,
    /// `WIREMOCK_URL_PREFIX` and `WIREMOCK_SCHEME`.
    pub fn connect_from_env() -> Result<Self, AdminError> {
        Self::connect(config_from_env()?)
    }

    pub async fn connect_from_env_async() -> Result<Self, AdminError> {
        Self::connect_async(config_from_env()?).await
    }

    /// Connects through a custom transport.
    pub fn with_http_client(
        config: AdminConfig,
        http_client: Arc<dyn HttpClient + Send + Sync + 'static>,
    ) -> Result<Self, AdminError> {
        Self::create(config, http_client, None)
    }

    /// Wraps an existing adapter.
    pub fn with_adapter(adapter: Arc<dyn AdminAdapter + Send + Sync>) -> Self {
        Self {
            adapter,
            config: None,
            _runtime: None,
        }
    }

    fn create(
        config: AdminConfig,
        http_client: Arc<dyn HttpClient + Send + Sync + 'static>,
        runtime: Option<Arc<Runtime>>,
    ) -> Result<Self, AdminError> {
        let admin_url = config
            .admin_url()
            .map_err(|e| AdminError::InvalidConfig(e.to_string()))?;

        tracing::debug!("Using admin API at {}", admin_url);

        let adapter = RemoteAdminAdapter::new(&admin_url, http_client)?;

        Ok(Self {
            adapter: Arc::new(adapter),
            config: Some(config),
            _runtime: runtime,
        })
    }

    /// The configuration this client was created with, if any.
    pub fn config(&self) -> Option<&AdminConfig> {
        self.config.as_ref()
    }

    /// The admin API root, e.g. `http://localhost:8080/__admin`.
    pub fn admin_url(&self) -> &str {
        self.adapter.admin_url()
    }

    // ===========================================================================================
    // Stub mappings
    // ===========================================================================================

    pub fn list_stub_mappings(&self) -> Result<ListStubMappingsResult, AdminError> {
        self.list_stub_mappings_async().join()
    }

    pub async fn list_stub_mappings_async(&self) -> Result<ListStubMappingsResult, AdminError> {
        self.adapter.list_stub_mappings().await
    }

    /// Registers the stub and returns the mapping as stored by the server, including the
    /// id it assigned.
    pub fn add_stub_mapping(&self, stub: &Stub) -> Result<MappingRecord, AdminError> {
        self.add_stub_mapping_async(stub).join()
    }

    pub async fn add_stub_mapping_async(&self, stub: &Stub) -> Result<MappingRecord, AdminError> {
        self.adapter.add_stub_mapping(stub).await
    }

    /// Same as [WireMock::add_stub_mapping].
    pub fn register(&self, stub: &Stub) -> Result<MappingRecord, AdminError> {
        self.add_stub_mapping(stub)
    }

    pub async fn register_async(&self, stub: &Stub) -> Result<MappingRecord, AdminError> {
        self.add_stub_mapping_async(stub).await
    }

    pub fn get_stub_mapping(&self, id: &str) -> Result<MappingRecord, AdminError> {
        self.get_stub_mapping_async(id).join()
    }

    pub async fn get_stub_mapping_async(&self, id: &str) -> Result<MappingRecord, AdminError> {
        self.adapter.get_stub_mapping(id).await
    }

    /// Replaces the mapping with the given id.
    pub fn edit_stub_mapping(&self, id: &str, stub: &Stub) -> Result<MappingRecord, AdminError> {
        self.edit_stub_mapping_async(id, stub).join()
    }

    pub async fn edit_stub_mapping_async(
        &self,
        id: &str,
        stub: &Stub,
    ) -> Result<MappingRecord, AdminError> {
        self.adapter.edit_stub_mapping(id, stub).await
    }

    pub fn remove_stub_mapping(&self, id: &str) -> Result<(), AdminError> {
        self.remove_stub_mapping_async(id).join()
    }

    pub async fn remove_stub_mapping_async(&self, id: &str) -> Result<(), AdminError> {
        self.adapter.remove_stub_mapping(id).await
    }

    /// Removes all mappings and reloads the ones the server was started with.
    pub fn reset_to_default_mappings(&self) -> Result<(), AdminError> {
        self.reset_to_default_mappings_async().join()
    }

    pub async fn reset_to_default_mappings_async(&self) -> Result<(), AdminError> {
        self.adapter.reset_to_default_mappings().await
    }

    /// Removes all mappings, including the defaults.
    pub fn reset_mappings(&self) -> Result<(), AdminError> {
        self.reset_mappings_async().join()
    }

    pub async fn reset_mappings_async(&self) -> Result<(), AdminError> {
        self.adapter.reset_mappings().await
    }

    /// Persists all persistent mappings on the server.
    pub fn save_mappings(&self) -> Result<(), AdminError> {
        self.save_mappings_async().join()
    }

    pub async fn save_mappings_async(&self) -> Result<(), AdminError> {
        self.adapter.save_mappings().await
    }

    // ===========================================================================================
    // Request journal
    // ===========================================================================================

    pub fn get_all_requests(&self) -> Result<ServeEventsResult, AdminError> {
        self.get_all_requests_async().join()
    }

    pub async fn get_all_requests_async(&self) -> Result<ServeEventsResult, AdminError> {
        self.adapter.get_all_requests().await
    }

    pub fn get_request(&self, id: &str) -> Result<ServeEvent, AdminError> {
        self.get_request_async(id).join()
    }

    pub async fn get_request_async(&self, id: &str) -> Result<ServeEvent, AdminError> {
        self.adapter.get_request(id).await
    }

    pub fn reset_requests(&self) -> Result<(), AdminError> {
        self.reset_requests_async().join()
    }

    pub async fn reset_requests_async(&self) -> Result<(), AdminError> {
        self.adapter.reset_requests().await
    }

    pub fn count_requests_matching(
        &self,
        pattern: &RequestPatternBuilder,
    ) -> Result<CountResult, AdminError> {
        self.count_requests_matching_async(pattern).join()
    }

    pub async fn count_requests_matching_async(
        &self,
        pattern: &RequestPatternBuilder,
    ) -> Result<CountResult, AdminError> {
        self.adapter.count_requests_matching(&pattern.build()).await
    }

    pub fn find_requests_matching(
        &self,
        pattern: &RequestPatternBuilder,
    ) -> Result<FindRequestsResult, AdminError> {
        self.find_requests_matching_async(pattern).join()
    }

    pub async fn find_requests_matching_async(
        &self,
        pattern: &RequestPatternBuilder,
    ) -> Result<FindRequestsResult, AdminError> {
        self.adapter.find_requests_matching(&pattern.build()).await
    }

    /// Requests that no stub mapping matched.
    pub fn find_unmatched_requests(&self) -> Result<FindRequestsResult, AdminError> {
        self.find_unmatched_requests_async().join()
    }

    pub async fn find_unmatched_requests_async(&self) -> Result<FindRequestsResult, AdminError> {
        self.adapter.find_unmatched_requests().await
    }

    // ===========================================================================================
    // Near misses
    // ===========================================================================================

    pub fn find_near_misses_for_unmatched_requests(
        &self,
    ) -> Result<NearMissesResult, AdminError> {
        self.find_near_misses_for_unmatched_requests_async().join()
    }

    pub async fn find_near_misses_for_unmatched_requests_async(
        &self,
    ) -> Result<NearMissesResult, AdminError> {
        self.adapter.find_near_misses_for_unmatched_requests().await
    }

    /// The stub mappings that came closest to matching the given request.
    pub fn find_top_near_misses_for_request(
        &self,
        request: &LoggedRequest,
    ) -> Result<NearMissesResult, AdminError> {
        self.find_top_near_misses_for_request_async(request).join()
    }

    pub async fn find_top_near_misses_for_request_async(
        &self,
        request: &LoggedRequest,
    ) -> Result<NearMissesResult, AdminError> {
        self.adapter.find_top_near_misses_for_request(request).await
    }

    /// The logged requests that came closest to matching the given pattern.
    pub fn find_top_near_misses_for_pattern(
        &self,
        pattern: &RequestPatternBuilder,
    ) -> Result<NearMissesResult, AdminError> {
        self.find_top_near_misses_for_pattern_async(pattern).join()
    }

    pub async fn find_top_near_misses_for_pattern_async(
        &self,
        pattern: &RequestPatternBuilder,
    ) -> Result<NearMissesResult, AdminError> {
        self.adapter
            .find_top_near_misses_for_pattern(&pattern.build())
            .await
    }

    // ===========================================================================================
    // Recording
    // ===========================================================================================

    /// Starts proxying to the target of `spec` and recording the traffic. Fails with
    /// [AdminError::InvalidMapping] if the spec has no target.
    pub fn start_recording(&self, spec: &RecordSpecBuilder) -> Result<(), AdminError> {
        self.start_recording_async(spec).join()
    }

    pub async fn start_recording_async(&self, spec: &RecordSpecBuilder) -> Result<(), AdminError> {
        let spec = spec.build()?;
        self.adapter.start_recording(&spec).await
    }

    pub fn stop_recording(&self) -> Result<SnapshotRecordResult, AdminError> {
        self.stop_recording_async().join()
    }

    pub async fn stop_recording_async(&self) -> Result<SnapshotRecordResult, AdminError> {
        self.adapter.stop_recording().await
    }

    pub fn get_recording_status(&self) -> Result<RecordingStatusResult, AdminError> {
        self.get_recording_status_async().join()
    }

    pub async fn get_recording_status_async(&self) -> Result<RecordingStatusResult, AdminError> {
        self.adapter.get_recording_status().await
    }

    /// Turns the current request journal into stub mappings. Without a spec the server
    /// defaults apply.
    pub fn snapshot_record(
        &self,
        spec: Option<&RecordSpecBuilder>,
    ) -> Result<SnapshotRecordResult, AdminError> {
        self.snapshot_record_async(spec).join()
    }

    pub async fn snapshot_record_async(
        &self,
        spec: Option<&RecordSpecBuilder>,
    ) -> Result<SnapshotRecordResult, AdminError> {
        let spec = spec.map(|s| s.build_snapshot());
        self.adapter.snapshot_record(spec.as_ref()).await
    }

    // ===========================================================================================
    // Scenarios
    // ===========================================================================================

    pub fn get_scenarios(&self) -> Result<GetScenariosResult, AdminError> {
        self.get_scenarios_async().join()
    }

    pub async fn get_scenarios_async(&self) -> Result<GetScenariosResult, AdminError> {
        self.adapter.get_scenarios().await
    }

    /// Moves every scenario back to [crate::common::data::STARTED].
    pub fn reset_scenarios(&self) -> Result<(), AdminError> {
        self.reset_scenarios_async().join()
    }

    pub async fn reset_scenarios_async(&self) -> Result<(), AdminError> {
        self.adapter.reset_scenarios().await
    }

    // ===========================================================================================
    // Server
    // ===========================================================================================

    /// Resets mappings, the request journal and scenarios at once.
    pub fn reset_all(&self) -> Result<(), AdminError> {
        self.reset_all_async().join()
    }

    pub async fn reset_all_async(&self) -> Result<(), AdminError> {
        self.adapter.reset_all().await
    }

    pub fn update_global_settings(&self, settings: &GlobalSettings) -> Result<(), AdminError> {
        self.update_global_settings_async(settings).join()
    }

    pub async fn update_global_settings_async(
        &self,
        settings: &GlobalSettings,
    ) -> Result<(), AdminError> {
        self.adapter.update_global_settings(settings).await
    }

    pub fn shutdown(&self) -> Result<(), AdminError> {
        self.shutdown_async().join()
    }

    pub async fn shutdown_async(&self) -> Result<(), AdminError> {
        self.adapter.shutdown().await
    }
}
