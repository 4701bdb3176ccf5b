//! The process endpoint seam and its reqwest implementation.

use std::path::Path;

use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client,
};
use shared::protocol::{ProcessForm, ProcessResponse, IMAGE_FIELD, PROCESS_PATH};
use tracing::{debug, info};
use url::Url;

use crate::error::TransportError;

/// An image picked by the user, held in memory until it is submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub filename: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn from_bytes(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        let filename = filename.into();
        let mime_type = mime_guess::from_path(&filename)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        Self {
            filename,
            mime_type,
            bytes,
        }
    }

    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        Ok(Self::from_bytes(filename, bytes))
    }
}

/// One request to the process endpoint.
#[derive(Debug, Clone)]
pub struct Submission {
    pub file: SelectedFile,
    pub form: ProcessForm,
}

#[async_trait]
pub trait ProcessTransport: Send + Sync {
    /// Sends one submission and returns the parsed body, whatever the HTTP
    /// status was.
    async fn submit(&self, submission: Submission) -> Result<ProcessResponse, TransportError>;

    /// Downloads the bytes behind a preview URL returned by `submit`.
    async fn fetch_preview(&self, url: &str) -> Result<Vec<u8>, TransportError>;
}

/// Joins a server-relative URL such as `/static/outputs/x.png` onto `base`.
/// Absolute URLs are returned unchanged.
pub fn resolve_url(base: &Url, reference: &str) -> Result<Url, TransportError> {
    base.join(reference).map_err(|source| TransportError::Url {
        url: reference.to_string(),
        source,
    })
}

pub struct HttpProcessClient {
    http: Client,
    server_url: Url,
    process_path: String,
}

impl HttpProcessClient {
    pub fn new(server_url: &str) -> Result<Self, TransportError> {
        let server_url = Url::parse(server_url).map_err(|source| TransportError::Url {
            url: server_url.to_string(),
            source,
        })?;
        Ok(Self {
            http: Client::new(),
            server_url,
            process_path: PROCESS_PATH.to_string(),
        })
    }

    pub fn with_process_path(mut self, process_path: impl Into<String>) -> Self {
        self.process_path = process_path.into();
        self
    }

    pub fn server_url(&self) -> &Url {
        &self.server_url
    }

    pub fn endpoint(&self) -> Result<Url, TransportError> {
        resolve_url(&self.server_url, &self.process_path)
    }
}

#[async_trait]
impl ProcessTransport for HttpProcessClient {
    async fn submit(&self, submission: Submission) -> Result<ProcessResponse, TransportError> {
        let endpoint = self.endpoint()?;
        let Submission { file, form } = submission;

        let image = Part::bytes(file.bytes)
            .file_name(file.filename.clone())
            .mime_str(&file.mime_type)?;
        let mut body = Form::new().part(IMAGE_FIELD, image);
        for (name, value) in form.text_parts() {
            body = body.text(name, value);
        }

        info!(
            endpoint = %endpoint,
            operation = %form.operation,
            filename = %file.filename,
            "submitting image for processing"
        );
        let response = self.http.post(endpoint).multipart(body).send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        debug!(%status, body_len = bytes.len(), "process endpoint responded");

        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn fetch_preview(&self, url: &str) -> Result<Vec<u8>, TransportError> {
        let url = resolve_url(&self.server_url, url)?;
        debug!(url = %url, "fetching preview");
        let bytes = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        Ok(bytes.to_vec())
    }
}
