//! Problem notification payloads and the problem-details API client.

use std::collections::BTreeMap;

use monconf_core::config::ApiConfig;
use serde::{Deserialize, Serialize};

use crate::traits::{NotifyError, ProblemSource};

/// Title the tenant sends when a notification integration is tested.
pub const TEST_RUN_TITLE: &str = "Dynatrace problem notification test run";
/// Problem id the tenant sends when a notification integration is tested.
pub const TEST_RUN_PID: &str = "999999";

/// Body of the default problem notification template.
///
/// Every field is optional; custom payload templates may drop any of them.
/// Unmodelled keys are kept in `extra` so verbose logging shows the whole
/// payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DefaultNotification {
    #[serde(rename = "PID", default, skip_serializing_if = "Option::is_none")]
    pub pid: Option<String>,
    #[serde(rename = "ProblemID", default, skip_serializing_if = "Option::is_none")]
    pub problem_id: Option<String>,
    #[serde(rename = "ProblemTitle", default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "State", default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(rename = "ProblemImpact", default, skip_serializing_if = "Option::is_none")]
    pub impact: Option<String>,
    #[serde(rename = "ProblemSeverity", default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    #[serde(rename = "ProblemURL", default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(rename = "Tags", default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl DefaultNotification {
    /// Connectivity check sent by the tenant, not a real problem.
    pub fn is_test_run(&self) -> bool {
        self.title.as_deref() == Some(TEST_RUN_TITLE) || self.pid.as_deref() == Some(TEST_RUN_PID)
    }

    /// Problem id, treating an empty string as absent.
    pub fn pid(&self) -> Option<&str> {
        self.pid.as_deref().filter(|p| !p.is_empty())
    }
}

/// Problem details as returned by the v1 problem API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<i64>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

#[derive(Deserialize)]
struct ProblemDetails {
    result: Problem,
}

#[derive(Deserialize)]
struct ClusterVersion {
    version: String,
}

/// Client for the tenant REST API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    /// Base URL without trailing slash.
    base_url: String,
    token: String,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Build from environment configuration; URL and token are both required.
    pub fn from_config(config: &ApiConfig) -> Result<Self, NotifyError> {
        match (&config.url, &config.token) {
            (Some(url), Some(token)) => Ok(Self::new(url.as_str(), token.as_str())),
            (None, _) => Err(NotifyError::Config("MONCONF_API_URL is not set".into())),
            (_, None) => Err(NotifyError::Config("MONCONF_API_TOKEN is not set".into())),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Base URL extended by `segments`, each percent-encoded as a single
    /// path segment.
    fn endpoint(&self, segments: &[&str]) -> Result<reqwest::Url, NotifyError> {
        let invalid = || NotifyError::Config(format!("invalid API URL '{}'", self.base_url));
        let mut url = reqwest::Url::parse(&self.base_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, segments: &[&str]) -> Result<T, NotifyError> {
        let url = self.endpoint(segments)?;
        let response = self
            .client
            .get(url.clone())
            .header(reqwest::header::AUTHORIZATION, format!("Api-Token {}", self.token))
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            tracing::warn!(%url, %status, "API returned non-2xx status");
            return Err(NotifyError::Status { status, body });
        }

        tracing::debug!(%url, %status, "API request succeeded");
        Ok(response.json().await?)
    }

    /// Version string of the cluster; used as a startup connectivity probe.
    pub async fn cluster_version(&self) -> Result<String, NotifyError> {
        let body: ClusterVersion = self.get(&["api", "v1", "config", "clusterversion"]).await?;
        Ok(body.version)
    }
}

#[async_trait::async_trait]
impl ProblemSource for ApiClient {
    async fn problem(&self, pid: &str) -> Result<Problem, NotifyError> {
        let details: ProblemDetails = self
            .get(&["api", "v1", "problem", "details", pid])
            .await?;
        Ok(details.result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_default_notification() {
        let body = r#"{
            "PID": "-4412205346712853915_1600000000000V2",
            "ProblemID": "1234",
            "ProblemTitle": "CPU saturation",
            "State": "OPEN",
            "ImpactedEntity": "host-1"
        }"#;
        let notification: DefaultNotification = serde_json::from_str(body).unwrap();
        assert_eq!(notification.pid(), Some("-4412205346712853915_1600000000000V2"));
        assert_eq!(notification.title.as_deref(), Some("CPU saturation"));
        assert!(!notification.is_test_run());
        assert_eq!(notification.extra["ImpactedEntity"], "host-1");
    }

    #[test]
    fn detects_test_runs() {
        let by_title: DefaultNotification =
            serde_json::from_str(r#"{"ProblemTitle": "Dynatrace problem notification test run"}"#).unwrap();
        assert!(by_title.is_test_run());

        let by_pid: DefaultNotification = serde_json::from_str(r#"{"PID": "999999"}"#).unwrap();
        assert!(by_pid.is_test_run());
    }

    #[test]
    fn empty_pid_is_absent() {
        let notification: DefaultNotification = serde_json::from_str(r#"{"PID": ""}"#).unwrap();
        assert_eq!(notification.pid(), None);
    }

    #[test]
    fn parses_problem_details_envelope() {
        let body = r#"{"result": {"id": "-1_2V2", "displayName": "42", "status": "OPEN", "rankedEvents": []}}"#;
        let details: ProblemDetails = serde_json::from_str(body).unwrap();
        assert_eq!(details.result.id, "-1_2V2");
        assert_eq!(details.result.status.as_deref(), Some("OPEN"));
        assert!(details.result.extra.contains_key("rankedEvents"));
    }

    #[test]
    fn from_config_requires_url_and_token() {
        let missing = ApiConfig {
            url: Some("https://tenant.example.com".into()),
            token: None,
        };
        assert!(matches!(
            ApiClient::from_config(&missing),
            Err(NotifyError::Config(_))
        ));

        let complete = ApiConfig {
            url: Some("https://tenant.example.com/".into()),
            token: Some("secret".into()),
        };
        let client = ApiClient::from_config(&complete).unwrap();
        assert_eq!(client.base_url(), "https://tenant.example.com");
    }

    #[test]
    fn endpoint_keeps_base_path() {
        let client = ApiClient::new("https://tenant.example.com/e/abc123/", "secret");
        let url = client.endpoint(&["api", "v1", "problem", "details", "-17_42V2"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://tenant.example.com/e/abc123/api/v1/problem/details/-17_42V2"
        );
    }

    #[test]
    fn endpoint_encodes_pid_as_one_segment() {
        let client = ApiClient::new("https://tenant.example.com", "secret");
        let url = client
            .endpoint(&["api", "v1", "problem", "details", "../../config/clusterversion?x=1"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://tenant.example.com/api/v1/problem/details/..%2F..%2Fconfig%2Fclusterversion%3Fx=1"
        );
        assert_eq!(url.query(), None);
    }

    #[test]
    fn endpoint_rejects_invalid_base() {
        let client = ApiClient::new("not a url", "secret");
        assert!(matches!(client.endpoint(&["api"]), Err(NotifyError::Config(_))));
    }
}
