/// Resume API client: the single point of entry for all backend calls.
///
/// ARCHITECTURAL RULE: controllers never build HTTP requests themselves.
/// They hold an `Arc<dyn ResumeApi>` so tests can swap in a scripted backend.
///
/// Every call is one-shot: no retries, no caching, no cancellation.
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{multipart, Client, Response};
use tracing::{debug, warn};

use crate::errors::ApiError;
use crate::models::{Resume, ResumeFile, ResumeId};

#[cfg(test)]
pub mod fake;
pub mod wire;

const RESUMES_PATH: &str = "/resumes";
const UPLOAD_FIELD: &str = "file";

#[async_trait]
pub trait ResumeApi: Send + Sync {
    /// Sends the file as the sole payload and returns the analysed record.
    async fn upload_resume(&self, file: &ResumeFile) -> Result<Resume, ApiError>;

    /// Lists prior uploads. Records carry summary fields only.
    async fn fetch_resumes(&self) -> Result<Vec<Resume>, ApiError>;

    /// Full record including `llm_analysis`, skills and work history.
    async fn fetch_resume_details(&self, id: ResumeId) -> Result<Resume, ApiError>;

    /// Removes a record and returns it as it was before deletion.
    async fn delete_resume(&self, id: ResumeId) -> Result<Resume, ApiError>;
}

/// HTTP implementation of [`ResumeApi`] against the backend's `/resumes` routes.
#[derive(Clone)]
pub struct HttpResumeApi {
    client: Client,
    base_url: String,
    list_limit: u32,
}

impl HttpResumeApi {
    pub fn new(base_url: &str, list_limit: u32) -> Result<Self> {
        let client = Client::builder()
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            list_limit,
        })
    }

    fn resumes_url(&self) -> String {
        format!("{}{}", self.base_url, RESUMES_PATH)
    }

    fn resume_url(&self, id: ResumeId) -> String {
        format!("{}{}/{}", self.base_url, RESUMES_PATH, id)
    }
}

#[async_trait]
impl ResumeApi for HttpResumeApi {
    async fn upload_resume(&self, file: &ResumeFile) -> Result<Resume, ApiError> {
        let url = format!("{}/upload", self.resumes_url());
        let part = multipart::Part::bytes(file.content.to_vec())
            .file_name(file.file_name.clone())
            .mime_str(file.content_type())?;
        let form = multipart::Form::new().part(UPLOAD_FIELD, part);

        debug!("POST {url} ({} bytes)", file.content.len());
        let response = self.client.post(&url).multipart(form).send().await?;
        let body = read_success_body(response).await?;
        wire::parse_upload(&body)
    }

    async fn fetch_resumes(&self) -> Result<Vec<Resume>, ApiError> {
        // Trailing slash matches the backend's collection route without a redirect.
        let url = format!("{}/", self.resumes_url());
        debug!("GET {url}");
        let response = self
            .client
            .get(&url)
            .query(&[("skip", 0u32), ("limit", self.list_limit)])
            .send()
            .await?;
        let body = read_success_body(response).await?;
        wire::parse_list(&body)
    }

    async fn fetch_resume_details(&self, id: ResumeId) -> Result<Resume, ApiError> {
        let url = self.resume_url(id);
        debug!("GET {url}");
        let response = self.client.get(&url).send().await?;
        let body = read_success_body(response).await?;
        wire::parse_record(&body, id)
    }

    async fn delete_resume(&self, id: ResumeId) -> Result<Resume, ApiError> {
        let url = self.resume_url(id);
        debug!("DELETE {url}");
        let response = self.client.delete(&url).send().await?;
        let body = read_success_body(response).await?;
        wire::parse_record(&body, id)
    }
}

/// Returns the body of a 2xx response, or a `Server` error carrying the
/// backend's message for anything else.
async fn read_success_body(response: Response) -> Result<String, ApiError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        warn!("Backend returned {status}: {body}");
        return Err(ApiError::Server {
            status: status.as_u16(),
            message: wire::error_message(&body),
        });
    }

    Ok(body)
}
