use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use http::{Request, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use url::Url;

use crate::{
    api::{
        adapter::{
            AdminAdapter, AdminError,
            AdminError::{
                InvalidConfig, JsonDeserializationError, JsonSerializationError, UpstreamError,
            },
        },
        recording::RecordSpec,
        stub::Stub,
    },
    common::{
        data::{
            CountResult, FindRequestsResult, GetScenariosResult,
            GlobalSettings, ListStubMappingsResult, LoggedRequest, MappingRecord,
            NearMissesResult, RecordingStatusResult, RequestPattern, ServeEvent,
            ServeEventsResult, SnapshotRecordResult,
        },
        http::HttpClient,
    },
};

/// Talks to the admin API of a remote mock server over HTTP.
pub struct RemoteAdminAdapter {
    admin_url: Url,
    http_client: Arc<dyn HttpClient + Send + Sync + 'static>,
}

impl RemoteAdminAdapter {
    /// `admin_url` is the admin API root, e.g. `http://localhost:8080/__admin`.
    pub fn new(
        admin_url: &str,
        http_client: Arc<dyn HttpClient + Send + Sync + 'static>,
    ) -> Result<Self, AdminError> {
        let admin_url = Url::parse(admin_url)
            .map_err(|e| InvalidConfig(format!("invalid admin URL '{}': {}", admin_url, e)))?;

        if admin_url.cannot_be_a_base() {
            return Err(InvalidConfig(format!(
                "admin URL '{}' cannot have path segments",
                admin_url
            )));
        }

        Ok(Self {
            admin_url,
            http_client,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> String {
        let mut url = self.admin_url.clone();
        // Checked in the constructor.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url.to_string()
    }

    async fn do_request(
        &self,
        method: &str,
        segments: &[&str],
        json: Option<String>,
    ) -> Result<(StatusCode, String), AdminError> {
        let uri = self.endpoint(segments);

        let builder = Request::builder().method(method).uri(&uri);
        let request = match json {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Bytes::from(json))?,
            None => builder.body(Bytes::new())?,
        };

        let response = self.http_client.send(request).await?;
        let status = response.status();

        tracing::debug!("{} {} -> {}", method, uri, status.as_u16());

        let body = String::from_utf8(response.body().to_vec())
            .map_err(|e| UpstreamError(e.to_string()))?;

        Ok((status, body))
    }

    /// Performs the exchange and fails unless the server answers with a 2xx status.
    async fn exchange(
        &self,
        method: &str,
        segments: &[&str],
        json: Option<String>,
        action: &str,
    ) -> Result<String, AdminError> {
        let (status, body) = self.do_request(method, segments, json).await?;

        if !status.is_success() {
            return Err(UpstreamError(format!(
                "Could not {}. Expected a 2xx response status but was {} (response body = '{}')",
                action,
                status.as_u16(),
                body
            )));
        }

        Ok(body)
    }

    async fn exchange_for<T: DeserializeOwned>(
        &self,
        method: &str,
        segments: &[&str],
        json: Option<String>,
        action: &str,
    ) -> Result<T, AdminError> {
        let body = self.exchange(method, segments, json, action).await?;
        serde_json::from_str(&body).map_err(JsonDeserializationError)
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, AdminError> {
    serde_json::to_string(value).map_err(JsonSerializationError)
}

#[async_trait]
impl AdminAdapter for RemoteAdminAdapter {
    fn admin_url(&self) -> &str {
        self.admin_url.as_str()
    }

    async fn list_stub_mappings(&self) -> Result<ListStubMappingsResult, AdminError> {
        self.exchange_for("GET", &["mappings"], None, "list stub mappings")
            .await
    }

    async fn add_stub_mapping(&self, stub: &Stub) -> Result<MappingRecord, AdminError> {
        let json = stub.to_json()?;
        self.exchange_for("POST", &["mappings"], Some(json), "create stub mapping")
            .await
    }

    async fn get_stub_mapping(&self, id: &str) -> Result<MappingRecord, AdminError> {
        self.exchange_for("GET", &["mappings", id], None, "fetch stub mapping")
            .await
    }

    async fn edit_stub_mapping(
        &self,
        id: &str,
        stub: &Stub,
    ) -> Result<MappingRecord, AdminError> {
        let json = stub.to_json()?;
        self.exchange_for("PUT", &["mappings", id], Some(json), "edit stub mapping")
            .await
    }

    async fn remove_stub_mapping(&self, id: &str) -> Result<(), AdminError> {
        self.exchange("DELETE", &["mappings", id], None, "remove stub mapping")
            .await
            .map(|_| ())
    }

    async fn reset_to_default_mappings(&self) -> Result<(), AdminError> {
        self.exchange("POST", &["mappings", "reset"], None, "reset to default mappings")
            .await
            .map(|_| ())
    }

    async fn reset_mappings(&self) -> Result<(), AdminError> {
        self.exchange("DELETE", &["mappings"], None, "reset mappings")
            .await
            .map(|_| ())
    }

    async fn save_mappings(&self) -> Result<(), AdminError> {
        self.exchange("POST", &["mappings", "save"], None, "save mappings")
            .await
            .map(|_| ())
    }

    async fn get_all_requests(&self) -> Result<ServeEventsResult, AdminError> {
        self.exchange_for("GET", &["requests"], None, "fetch logged requests")
            .await
    }

    async fn get_request(&self, id: &str) -> Result<ServeEvent, AdminError> {
        self.exchange_for("GET", &["requests", id], None, "fetch logged request")
            .await
    }

    async fn reset_requests(&self) -> Result<(), AdminError> {
        self.exchange("DELETE", &["requests"], None, "reset logged requests")
            .await
            .map(|_| ())
    }

    async fn count_requests_matching(
        &self,
        pattern: &RequestPattern,
    ) -> Result<CountResult, AdminError> {
        let json = to_json(pattern)?;
        self.exchange_for("POST", &["requests", "count"], Some(json), "count requests")
            .await
    }

    async fn find_requests_matching(
        &self,
        pattern: &RequestPattern,
    ) -> Result<FindRequestsResult, AdminError> {
        let json = to_json(pattern)?;
        self.exchange_for("POST", &["requests", "find"], Some(json), "find requests")
            .await
    }

    async fn find_unmatched_requests(&self) -> Result<FindRequestsResult, AdminError> {
        self.exchange_for(
            "GET",
            &["requests", "unmatched"],
            None,
            "find unmatched requests",
        )
        .await
    }

    async fn find_near_misses_for_unmatched_requests(
        &self,
    ) -> Result<NearMissesResult, AdminError> {
        self.exchange_for(
            "GET",
            &["requests", "unmatched", "near-misses"],
            None,
            "find near misses for unmatched requests",
        )
        .await
    }

    async fn find_top_near_misses_for_request(
        &self,
        request: &LoggedRequest,
    ) -> Result<NearMissesResult, AdminError> {
        let json = to_json(request)?;
        self.exchange_for(
            "POST",
            &["near-misses", "request"],
            Some(json),
            "find near misses for request",
        )
        .await
    }

    async fn find_top_near_misses_for_pattern(
        &self,
        pattern: &RequestPattern,
    ) -> Result<NearMissesResult, AdminError> {
        let json = to_json(pattern)?;
        self.exchange_for(
            "POST",
            &["near-misses", "request-pattern"],
            Some(json),
            "find near misses for request pattern",
        )
        .await
    }

    async fn start_recording(&self, spec: &RecordSpec) -> Result<(), AdminError> {
        let json = to_json(spec)?;
        self.exchange("POST", &["recordings", "start"], Some(json), "start recording")
            .await
            .map(|_| ())
    }

    async fn stop_recording(&self) -> Result<SnapshotRecordResult, AdminError> {
        let body = self
            .exchange("POST", &["recordings", "stop"], None, "stop recording")
            .await?;

        if body.trim().is_empty() {
            return Ok(SnapshotRecordResult::default());
        }

        serde_json::from_str(&body).map_err(JsonDeserializationError)
    }

    async fn get_recording_status(&self) -> Result<RecordingStatusResult, AdminError> {
        self.exchange_for(
            "GET",
            &["recordings", "status"],
            None,
            "fetch recording status",
        )
        .await
    }

    async fn snapshot_record(
        &self,
        spec: Option<&RecordSpec>,
    ) -> Result<SnapshotRecordResult, AdminError> {
        let json = match spec {
            Some(spec) => to_json(spec)?,
            None => "{}".to_string(),
        };
        self.exchange_for(
            "POST",
            &["recordings", "snapshot"],
            Some(json),
            "take recording snapshot",
        )
        .await
    }

    async fn get_scenarios(&self) -> Result<GetScenariosResult, AdminError> {
        self.exchange_for("GET", &["scenarios"], None, "fetch scenarios")
            .await
    }

    async fn reset_scenarios(&self) -> Result<(), AdminError> {
        self.exchange("POST", &["scenarios", "reset"], None, "reset scenarios")
            .await
            .map(|_| ())
    }

    async fn reset_all(&self) -> Result<(), AdminError> {
        self.exchange("POST", &["reset"], None, "reset the mock server")
            .await
            .map(|_| ())
    }

    async fn update_global_settings(&self, settings: &GlobalSettings) -> Result<(), AdminError> {
        let json = to_json(settings)?;
        self.exchange("POST", &["settings"], Some(json), "update global settings")
            .await
            .map(|_| ())
    }

    async fn shutdown(&self) -> Result<(), AdminError> {
        self.exchange("POST", &["shutdown"], None, "shut down the mock server")
            .await
            .map(|_| ())
    }
}
