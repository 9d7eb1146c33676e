//! Inboxing deployment API client.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use futures::TryStreamExt;
use reqwest::Client;
use serde::Deserialize;

use crate::error::{ProviderError, Result};
use crate::http::HttpUtils;
use crate::traits::DeploymentProvider;
use crate::types::{JobArtifact, JobStatusSnapshot, JobSubmission};

pub(crate) const INBOXING_API_BASE: &str = "https://app.inboxing.com/api/v1";

/// Default connect timeout (seconds).
const CONNECT_TIMEOUT_SECS: u64 = 10;
/// Request timeout for status polls (seconds). The provider is known to be
/// occasionally slow; a poll must never pin a worker longer than this.
const STATUS_TIMEOUT_SECS: u64 = 10;
/// Request timeout for job submission (seconds).
const SUBMIT_TIMEOUT_SECS: u64 = 30;
/// Transient-failure retries for job submission. Status polls never retry.
const SUBMIT_MAX_RETRIES: u32 = 2;

/// Response envelope used by every Inboxing endpoint.
///
/// The `data` payload may carry a `parameters` echo of the submission; the
/// typed payloads below deliberately have no field for it, so it is dropped
/// at parse time and can never reach callers.
#[derive(Debug, Deserialize)]
pub(crate) struct InboxingEnvelope<T> {
    #[allow(dead_code)]
    pub status: Option<String>,
    pub data: Option<T>,
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SubmitJobData {
    job_id: String,
}

#[derive(Debug, Deserialize)]
struct JobStatusData {
    status: String,
    error: Option<String>,
}

/// HTTP client for the Inboxing bulk deployment API.
///
/// Constructed explicitly and injected where needed — never a process-wide
/// singleton. Holds only the transient connection pool and the static API
/// key; no local persistence.
pub struct InboxingClient {
    pub(crate) client: Client,
    pub(crate) api_key: String,
    pub(crate) base_url: String,
}

impl InboxingClient {
    /// Create a client against the production API endpoint.
    #[must_use]
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, INBOXING_API_BASE.to_string())
    }

    /// Create a client against a custom endpoint (staging, tests).
    #[must_use]
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            client: create_http_client(),
            api_key,
            base_url,
        }
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.client
            .get(format!("{}{path}", self.base_url))
            .header("X-API-Key", &self.api_key)
    }

    /// Map a non-2xx response to a provider error.
    ///
    /// 404 handling differs per endpoint and is done at the call sites.
    fn map_failure(status: u16, body: &str) -> ProviderError {
        let detail = HttpUtils::parse_json::<InboxingEnvelope<serde_json::Value>>(body)
            .ok()
            .and_then(|envelope| envelope.error)
            .unwrap_or_else(|| body.to_string());

        match status {
            401 | 403 => ProviderError::InvalidCredentials {
                raw_message: Some(detail),
            },
            500..=599 => ProviderError::Server { status, detail },
            _ => ProviderError::Rejected { status, detail },
        }
    }
}

/// Create an HTTP client with a bounded connect timeout.
///
/// No whole-request timeout here: artifact downloads stream unbounded CSV
/// bodies. Submission and status polls set per-request timeouts instead.
fn create_http_client() -> Client {
    Client::builder()
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .build()
        .unwrap_or_default()
}

#[async_trait]
impl DeploymentProvider for InboxingClient {
    fn id(&self) -> &'static str {
        "inboxing"
    }

    async fn submit_job(&self, submission: &JobSubmission) -> Result<String> {
        let request = self
            .client
            .post(format!("{}/jobs", self.base_url))
            .header("X-API-Key", &self.api_key)
            .timeout(Duration::from_secs(SUBMIT_TIMEOUT_SECS))
            .json(submission);

        let (status, body) =
            HttpUtils::execute_request_with_retry(request, "POST", "/jobs", SUBMIT_MAX_RETRIES)
                .await?;

        if !(200..300).contains(&status) {
            return Err(Self::map_failure(status, &body));
        }

        let envelope: InboxingEnvelope<SubmitJobData> = HttpUtils::parse_json(&body)?;
        let data = envelope.data.ok_or_else(|| ProviderError::ParseError {
            detail: "submission response did not contain a job_id".to_string(),
        })?;

        log::info!("[inboxing] Job submitted: {}", data.job_id);
        Ok(data.job_id)
    }

    async fn fetch_status(&self, job_id: &str) -> Result<JobStatusSnapshot> {
        let path = format!("/jobs/{job_id}/status");
        let request = self
            .get(&path)
            .timeout(Duration::from_secs(STATUS_TIMEOUT_SECS));

        // No retry here: status retry policy belongs to the reconciler
        let (status, body) = HttpUtils::execute_request(request, "GET", &path).await?;

        if status == 404 {
            return Err(ProviderError::JobNotFound {
                job_id: job_id.to_string(),
            });
        }
        if !(200..300).contains(&status) {
            return Err(Self::map_failure(status, &body));
        }

        let envelope: InboxingEnvelope<JobStatusData> = HttpUtils::parse_json(&body)?;
        let data = envelope.data.ok_or_else(|| ProviderError::ParseError {
            detail: "status response did not contain a data payload".to_string(),
        })?;

        Ok(JobStatusSnapshot {
            job_id: job_id.to_string(),
            raw_status: data.status,
            error: data.error,
            fetched_at: Utc::now(),
        })
    }

    async fn fetch_result_artifact(&self, job_id: &str) -> Result<JobArtifact> {
        let path = format!("/jobs/{job_id}/download_csv");
        log::debug!("[inboxing] GET {path}");

        // Streaming download: the body is consumed by the caller, so this
        // bypasses HttpUtils and maps errors inline.
        let response = self.get(&path).send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout {
                    detail: e.to_string(),
                }
            } else {
                ProviderError::Unavailable {
                    detail: e.to_string(),
                }
            }
        })?;

        let status = response.status().as_u16();
        log::debug!("[inboxing] Response Status: {status}");

        match status {
            404 => {
                return Err(ProviderError::JobNotFound {
                    job_id: job_id.to_string(),
                });
            }
            409 => {
                return Err(ProviderError::ArtifactNotReady {
                    job_id: job_id.to_string(),
                });
            }
            s if !(200..300).contains(&s) => {
                let body = response.text().await.unwrap_or_default();
                return Err(Self::map_failure(s, &body));
            }
            _ => {}
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("text/csv")
            .to_string();

        let stream = response
            .bytes_stream()
            .map_err(|e| ProviderError::Unavailable {
                detail: e.to_string(),
            });

        Ok(JobArtifact {
            content_type,
            stream: Box::pin(stream),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ---- map_failure ----

    #[test]
    fn map_failure_401_invalid_credentials() {
        let err = InboxingClient::map_failure(401, r#"{"status":"error","error":"bad key"}"#);
        assert!(matches!(
            err,
            ProviderError::InvalidCredentials { raw_message: Some(msg) } if msg == "bad key"
        ));
    }

    #[test]
    fn map_failure_403_invalid_credentials() {
        let err = InboxingClient::map_failure(403, "{}");
        assert!(matches!(err, ProviderError::InvalidCredentials { .. }));
    }

    #[test]
    fn map_failure_400_rejected_with_provider_detail() {
        let err = InboxingClient::map_failure(
            400,
            r#"{"status":"error","error":"Missing required fields: domainId or parameters."}"#,
        );
        assert!(matches!(
            err,
            ProviderError::Rejected { status: 400, detail }
                if detail == "Missing required fields: domainId or parameters."
        ));
    }

    #[test]
    fn map_failure_422_rejected() {
        let err = InboxingClient::map_failure(422, "not json at all");
        assert!(matches!(
            err,
            ProviderError::Rejected { status: 422, detail } if detail == "not json at all"
        ));
    }

    #[test]
    fn map_failure_500_server() {
        let err = InboxingClient::map_failure(500, r#"{"error":"boom"}"#);
        assert!(matches!(
            err,
            ProviderError::Server { status: 500, detail } if detail == "boom"
        ));
    }

    // ---- envelope parsing ----

    #[test]
    fn envelope_strips_parameters_echo() {
        let body = r#"{
            "status": "success",
            "data": {
                "job_id": "job-1",
                "status": "PROCESSING",
                "parameters": { "password_base_word": "hunter2" }
            }
        }"#;
        let envelope: InboxingEnvelope<JobStatusData> =
            HttpUtils::parse_json(body).expect("parse");
        let data = envelope.data.expect("data");
        assert_eq!(data.status, "PROCESSING");
        // JobStatusData has no parameters field — the echo is gone at parse time
        let json = serde_json::to_string(&serde_json::json!({"status": data.status}))
            .expect("serialize");
        assert!(!json.contains("hunter2"));
    }

    #[test]
    fn envelope_submit_payload() {
        let body = r#"{"status":"success","data":{"job_id":"job-42"}}"#;
        let envelope: InboxingEnvelope<SubmitJobData> = HttpUtils::parse_json(body).expect("parse");
        assert_eq!(envelope.data.expect("data").job_id, "job-42");
    }

    #[test]
    fn client_uses_production_base_by_default() {
        let client = InboxingClient::new("key".to_string());
        assert_eq!(client.base_url, INBOXING_API_BASE);
        assert_eq!(client.id(), "inboxing");
    }
}
