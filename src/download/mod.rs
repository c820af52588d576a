//! Download orchestration: signed URL, bytes, save-as, download count.

mod target;

pub use target::{safe_file_name, DirectoryTarget, ObjectUrl, SaveTarget, StagedBlob};

use std::path::PathBuf;

use bytes::Bytes;
use thiserror::Error;

use crate::models::FileRef;
use crate::transport::{FileApi, ResponseBody, TransportError};
use crate::view::{Severity, View};

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("Failed to obtain download URL: {0}")]
    UrlRequest(#[source] TransportError),
    #[error("Download URL response not understood: {0}")]
    UnrecognizedUrl(String),
    #[error("File download failed: {0}")]
    Fetch(#[source] TransportError),
    #[error("Failed to save file: {0}")]
    Save(#[from] std::io::Error),
    #[error("Failed to update download count: {0}")]
    CountUpdate(#[source] TransportError),
}

/// Pull the URL out of a `/get-url` response: a JSON string, an object with a
/// `url` field, or plain text.
pub fn signed_url(body: ResponseBody) -> Result<String, DownloadError> {
    let url = match body {
        ResponseBody::Json(serde_json::Value::String(s)) => s,
        ResponseBody::Json(serde_json::Value::Object(ref map)) => match map.get("url") {
            Some(serde_json::Value::String(s)) => s.clone(),
            _ => return Err(DownloadError::UnrecognizedUrl(format!("{map:?}"))),
        },
        ResponseBody::Json(other) => return Err(DownloadError::UnrecognizedUrl(other.to_string())),
        ResponseBody::Text(text) => text.trim().trim_matches('"').to_string(),
    };

    let url = url.trim().to_string();
    if url.is_empty() {
        return Err(DownloadError::UnrecognizedUrl("empty response".to_string()));
    }
    Ok(url)
}

pub struct Downloader<T: SaveTarget> {
    target: T,
}

impl<T: SaveTarget> Downloader<T> {
    pub fn new(target: T) -> Self {
        Self { target }
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    /// Run the whole download for one file, reporting the outcome on the status line.
    pub async fn download_file<A, V>(&self, api: &A, view: &mut V, file: &FileRef)
    where
        A: FileApi + ?Sized,
        V: View + ?Sized,
    {
        let messages = view.messages();
        view.set_status(messages.download_starting, Severity::Loading);

        match self.run(api, file).await {
            Ok(path) => {
                tracing::info!(file_id = %file.id, path = %path.display(), "File downloaded");
                view.set_status(messages.download_succeeded, Severity::Success);
            }
            Err(e) => {
                tracing::error!(file_id = %file.id, error = %e, "Download error");
                view.set_status(messages.download_failed, Severity::Error);
            }
        }
    }

    /// The download steps in order, stopping at the first failure.
    pub async fn run<A>(&self, api: &A, file: &FileRef) -> Result<PathBuf, DownloadError>
    where
        A: FileApi + ?Sized,
    {
        let body = api
            .generate_download_url(&file.id)
            .await
            .map_err(DownloadError::UrlRequest)?;
        let url = signed_url(body)?;

        let data = api.fetch_bytes(&url).await.map_err(DownloadError::Fetch)?;
        let path = self.save_blob(data, file.file_name.as_deref())?;

        api.update_download_count(&file.id)
            .await
            .map_err(DownloadError::CountUpdate)?;

        Ok(path)
    }

    /// Stage, save and release in one synchronous step. Blocking I/O on purpose:
    /// the object URL must be revoked before the task yields.
    fn save_blob(&self, data: Bytes, file_name: Option<&str>) -> Result<PathBuf, DownloadError> {
        let staged = StagedBlob::create(&self.target, data)?;
        let path = staged.save_as(&safe_file_name(file_name))?;
        Ok(path)
    }
}
