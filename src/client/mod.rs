// API client - the two HTTP calls everything else is built on
mod error;

pub use error::ApiError;

use reqwest::multipart;
use serde_json::Value;
use tokio_util::codec::{BytesCodec, FramedRead};
use tracing::debug;

use crate::ApiConfig;
use crate::upload::PendingFile;
use crate::urls::resolve_endpoints;

/// The multipart field name the upload endpoint expects files under.
pub const UPLOAD_FIELD: &str = "photos";

/// Client for the external photo API: one endpoint to list photos, one to
/// receive uploads. Requests have no timeout, matching the page this
/// replaces; a hung request blocks its flow until the server gives up.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    list_endpoint: String,
    upload_endpoint: String,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let (list_endpoint, upload_endpoint) = resolve_endpoints(config);
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            list_endpoint,
            upload_endpoint,
        })
    }

    pub fn list_endpoint(&self) -> &str {
        &self.list_endpoint
    }

    pub fn upload_endpoint(&self) -> &str {
        &self.upload_endpoint
    }

    /// GET the photo list. A non-success status, transport fault, or body
    /// that is not JSON are all errors; making sense of the JSON itself is
    /// the normalizer's job.
    pub async fn fetch_photo_list(&self) -> Result<Value, ApiError> {
        debug!("Fetching photo list from {}", self.list_endpoint);
        let response = self.http.get(&self.list_endpoint).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status));
        }
        Ok(response.json().await?)
    }

    /// POST one file as multipart form content, streamed from disk. Success
    /// is any 2xx; the response body is not inspected beyond an optional
    /// JSON parse whose result is discarded.
    pub async fn upload_file(&self, file: &PendingFile) -> Result<(), ApiError> {
        debug!("Uploading {} to {}", file.name, self.upload_endpoint);
        let handle = tokio::fs::File::open(&file.path).await?;
        let stream = FramedRead::new(handle, BytesCodec::new());
        let part = multipart::Part::stream_with_length(reqwest::Body::wrap_stream(stream), file.size)
            .file_name(file.name.clone())
            .mime_str(&file.mime)?;
        let form = multipart::Form::new().part(UPLOAD_FIELD, part);

        let response = self
            .http
            .post(&self.upload_endpoint)
            .multipart(form)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status));
        }

        let _ = response.json::<Value>().await.ok();
        Ok(())
    }
}
