mod http;

pub use http::{HttpTransport, RequestBody, RequestOptions};

use async_trait::async_trait;
use bytes::Bytes;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::models::{FileRecord, SelectedFile};

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP error! status: {status}")]
    Http { status: u16 },
    #[error("Failed to decode response body: {0}")]
    Decode(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// A successful response body, decoded according to its content type.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(serde_json::Value),
    Text(String),
}

impl ResponseBody {
    /// Decode into a typed value. Text bodies are parsed as JSON as a fallback
    /// for servers that omit the content type.
    pub fn decode<T: DeserializeOwned>(self) -> Result<T, TransportError> {
        match self {
            ResponseBody::Json(value) => {
                serde_json::from_value(value).map_err(|e| TransportError::Decode(e.to_string()))
            }
            ResponseBody::Text(text) => {
                serde_json::from_str(&text).map_err(|e| TransportError::Decode(e.to_string()))
            }
        }
    }
}

/// The file API as seen by the client. Every call is a single request with no retry.
#[async_trait]
pub trait FileApi: Send + Sync {
    async fn list_files(&self) -> Result<Vec<FileRecord>, TransportError>;
    async fn upload_file(&self, file: &SelectedFile) -> Result<ResponseBody, TransportError>;
    /// Ask the server for a short-lived link to the file's bytes.
    async fn generate_download_url(&self, file_id: &str) -> Result<ResponseBody, TransportError>;
    async fn update_download_count(&self, file_id: &str) -> Result<ResponseBody, TransportError>;
    /// Plain GET of a (signed) URL. Relative URLs resolve against the API base.
    async fn fetch_bytes(&self, url: &str) -> Result<Bytes, TransportError>;
}
