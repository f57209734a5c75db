//! HTTP client for the external media generation service.
//!
//! ```text
//! POST {base}/jobs       {kind, title, text}  -> {id}
//! GET  {base}/jobs/{id}                       -> {status, result_url?, error?}
//! GET  {result_url}                           -> artifact bytes
//! ```

use std::time::Duration;

use async_trait::async_trait;
use fathom_core::generation::GenerationKind;
use serde::{Deserialize, Serialize};

use super::GenerationError;

/// Body of a job submission.
#[derive(Debug, Clone, Serialize)]
pub struct JobRequest {
    pub kind: GenerationKind,
    pub title: String,
    pub text: String,
}

/// Job state as reported by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    Running,
    Done { result_url: String },
    Failed { error: String },
}

/// Something that can turn lesson text into a media artifact.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Queue a job and return the service-assigned job id.
    async fn submit(&self, job: &JobRequest) -> Result<String, GenerationError>;

    async fn poll(&self, job_id: &str) -> Result<JobStatus, GenerationError>;

    /// Fetch the finished artifact.
    async fn download(&self, result_url: &str) -> Result<Vec<u8>, GenerationError>;
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    status: String,
    result_url: Option<String>,
    error: Option<String>,
}

impl StatusResponse {
    fn into_status(self, job_id: &str) -> Result<JobStatus, GenerationError> {
        match self.status.as_str() {
            "pending" | "queued" => Ok(JobStatus::Pending),
            "running" => Ok(JobStatus::Running),
            "done" | "completed" => match self.result_url {
                Some(result_url) => Ok(JobStatus::Done { result_url }),
                None => Err(GenerationError::JobFailed {
                    job_id: job_id.to_string(),
                    reason: "finished without a result_url".into(),
                }),
            },
            "failed" | "error" => Ok(JobStatus::Failed {
                error: self.error.unwrap_or_else(|| "unknown error".into()),
            }),
            other => Err(GenerationError::JobFailed {
                job_id: job_id.to_string(),
                reason: format!("unknown job status '{other}'"),
            }),
        }
    }
}

/// [`ContentGenerator`] backed by the generation service's REST API.
pub struct HttpContentGenerator {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpContentGenerator {
    /// Create a client for the service at `base_url` (no trailing slash).
    ///
    /// `request_timeout` bounds each individual HTTP call, not the job.
    pub fn new(
        base_url: String,
        api_key: Option<String>,
        request_timeout: Duration,
    ) -> Result<Self, GenerationError> {
        let client = reqwest::Client::builder().timeout(request_timeout).build()?;
        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => builder.bearer_auth(key),
            None => builder,
        }
    }

    /// Relative result URLs are resolved against the service base URL.
    fn resolve(&self, url: &str) -> String {
        if url.starts_with('/') {
            format!("{}{url}", self.base_url)
        } else {
            url.to_string()
        }
    }

    /// Whether `url` shares scheme, host and port with the service. The API
    /// key is only sent there, never to a CDN or presigned store URL.
    fn is_service_origin(&self, url: &str) -> bool {
        match (reqwest::Url::parse(&self.base_url), reqwest::Url::parse(url)) {
            (Ok(base), Ok(target)) => base.origin() == target.origin(),
            _ => false,
        }
    }

    // ---- private helpers ----

    /// Return the response unchanged on success, or a
    /// [`GenerationError::Service`] with the status and body text.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, GenerationError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(GenerationError::Service {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl ContentGenerator for HttpContentGenerator {
    async fn submit(&self, job: &JobRequest) -> Result<String, GenerationError> {
        let request = self
            .client
            .post(format!("{}/jobs", self.base_url))
            .json(job);
        let response = Self::ensure_success(self.authorized(request).send().await?).await?;
        let body: SubmitResponse = response.json().await?;
        Ok(body.id)
    }

    async fn poll(&self, job_id: &str) -> Result<JobStatus, GenerationError> {
        let request = self.client.get(format!("{}/jobs/{job_id}", self.base_url));
        let response = Self::ensure_success(self.authorized(request).send().await?).await?;
        let body: StatusResponse = response.json().await?;
        body.into_status(job_id)
    }

    async fn download(&self, result_url: &str) -> Result<Vec<u8>, GenerationError> {
        let url = self.resolve(result_url);
        let mut request = self.client.get(&url);
        if self.is_service_origin(&url) {
            request = self.authorized(request);
        }
        let response = Self::ensure_success(request.send().await?).await?;
        Ok(response.bytes().await?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn status(s: &str, url: Option<&str>, error: Option<&str>) -> StatusResponse {
        StatusResponse {
            status: s.to_string(),
            result_url: url.map(String::from),
            error: error.map(String::from),
        }
    }

    #[test]
    fn maps_service_statuses() {
        assert_eq!(status("pending", None, None).into_status("j").unwrap(), JobStatus::Pending);
        assert_eq!(status("running", None, None).into_status("j").unwrap(), JobStatus::Running);
        assert_eq!(
            status("done", Some("/files/1.pdf"), None).into_status("j").unwrap(),
            JobStatus::Done {
                result_url: "/files/1.pdf".into()
            }
        );
        assert_eq!(
            status("failed", None, Some("tts quota")).into_status("j").unwrap(),
            JobStatus::Failed {
                error: "tts quota".into()
            }
        );
    }

    #[test]
    fn done_without_url_is_a_failure() {
        assert_matches!(
            status("done", None, None).into_status("j"),
            Err(GenerationError::JobFailed { .. })
        );
        assert_matches!(
            status("exploded", None, None).into_status("j"),
            Err(GenerationError::JobFailed { .. })
        );
    }

    #[test]
    fn resolves_relative_result_urls() {
        let client =
            HttpContentGenerator::new("http://gen:9000".into(), None, Duration::from_secs(5)).unwrap();
        assert_eq!(client.resolve("/files/a.mp3"), "http://gen:9000/files/a.mp3");
        assert_eq!(client.resolve("https://cdn/x.pdf"), "https://cdn/x.pdf");
    }

    #[test]
    fn api_key_stays_on_the_service_origin() {
        let client = HttpContentGenerator::new(
            "http://gen:9000".into(),
            Some("gen-key".into()),
            Duration::from_secs(5),
        )
        .unwrap();
        assert!(client.is_service_origin(&client.resolve("/files/a.mp3")));
        assert!(client.is_service_origin("http://gen:9000/other/b.pdf"));
        assert!(!client.is_service_origin("https://cdn.example.com/x.pdf"));
        assert!(!client.is_service_origin("http://gen:9001/files/a.mp3"));
        assert!(!client.is_service_origin("https://gen:9000/files/a.mp3"));
        assert!(!client.is_service_origin("not a url"));
    }
}
