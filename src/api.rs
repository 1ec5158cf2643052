use std::path::Path;

use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::types::{AskResponse, Question, QuestionRequest, UploadReceipt};

pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors surfaced by the backend client. Every call is a single attempt.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{endpoint} returned {status}")]
    Status {
        endpoint: &'static str,
        status: StatusCode,
    },

    #[error("could not read upload: {0}")]
    Io(#[from] std::io::Error),
}

/// Thin wrapper over the RAG backend's HTTP API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        ApiClient {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn ask_question(&self, question: &str) -> Result<AskResponse> {
        debug!(question, "POST /ask");
        let response = self
            .client
            .post(self.url("/ask"))
            .json(&QuestionRequest { question })
            .send()
            .await?;

        decode("/ask", response).await
    }

    pub async fn get_history(&self) -> Result<Vec<Question>> {
        debug!("GET /history");
        let response = self.client.get(self.url("/history")).send().await?;

        decode("/history", response).await
    }

    pub async fn clear_history(&self) -> Result<()> {
        debug!("DELETE /history");
        let response = self.client.delete(self.url("/history")).send().await?;

        ensure_success("/history", &response)?;
        Ok(())
    }

    /// Sends one document to `/upload` as the multipart field `file`.
    pub async fn upload_file(&self, path: &Path) -> Result<UploadReceipt> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        debug!(file = %file_name, size = bytes.len(), "POST /upload");

        let form = Form::new().part("file", Part::bytes(bytes).file_name(file_name));
        let response = self
            .client
            .post(self.url("/upload"))
            .multipart(form)
            .send()
            .await?;

        decode("/upload", response).await
    }
}

fn ensure_success(endpoint: &'static str, response: &reqwest::Response) -> Result<()> {
    let status = response.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(ApiError::Status { endpoint, status })
    }
}

async fn decode<T: DeserializeOwned>(endpoint: &'static str, response: reqwest::Response) -> Result<T> {
    ensure_success(endpoint, &response)?;
    Ok(response.json::<T>().await?)
}
