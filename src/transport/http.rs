use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, Response, Url};

use super::{FileApi, ResponseBody, TransportError};
use crate::models::{FileRecord, SelectedFile};

/// reqwest-backed transport for the file API.
pub struct HttpTransport {
    base_url: String,
    client: Client,
}

pub enum RequestBody {
    Empty,
    Multipart(Form),
    UrlEncoded(Vec<(&'static str, String)>),
}

pub struct RequestOptions {
    pub method: Method,
    pub body: RequestBody,
}

impl RequestOptions {
    pub fn get() -> Self {
        Self {
            method: Method::GET,
            body: RequestBody::Empty,
        }
    }

    pub fn post_form(fields: Vec<(&'static str, String)>) -> Self {
        Self {
            method: Method::POST,
            body: RequestBody::UrlEncoded(fields),
        }
    }

    pub fn post_multipart(form: Form) -> Self {
        Self {
            method: Method::POST,
            body: RequestBody::Multipart(form),
        }
    }
}

impl HttpTransport {
    pub fn new(base_url: &str) -> Result<Self, TransportError> {
        let client = Client::builder()
            .build()
            .map_err(|e| TransportError::Network(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// Issue one request against `base + endpoint`. Failures are logged here and
    /// returned unchanged.
    pub async fn request(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<ResponseBody, TransportError> {
        let result = self.send(endpoint, options).await;
        if let Err(ref e) = result {
            tracing::error!(endpoint = %endpoint, error = %e, "API request failed");
        }
        result
    }

    async fn send(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<ResponseBody, TransportError> {
        let url = self.endpoint_url(endpoint);
        tracing::debug!(method = %options.method, url = %url, "Sending API request");

        let builder = self.client.request(options.method, &url);
        let builder = match options.body {
            RequestBody::Empty => builder,
            RequestBody::Multipart(form) => builder.multipart(form),
            RequestBody::UrlEncoded(fields) => builder.form(&fields),
        };

        let resp = builder
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        decode_response(resp).await
    }

    fn resolve(&self, url: &str) -> Result<Url, TransportError> {
        let url = url.trim();
        // Relative links sit under the base; join() keeps absolute inputs as they are
        Url::parse(&format!("{}/", self.base_url))
            .and_then(|base| base.join(url))
            .map_err(|e| TransportError::InvalidUrl(format!("{url}: {e}")))
    }
}

async fn decode_response(resp: Response) -> Result<ResponseBody, TransportError> {
    let status = resp.status();
    if !status.is_success() {
        return Err(TransportError::Http {
            status: status.as_u16(),
        });
    }

    let is_json = resp
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.contains("application/json"))
        .unwrap_or(false);

    if is_json {
        let raw = resp
            .bytes()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;
        let value = serde_json::from_slice(&raw).map_err(|e| TransportError::Decode(e.to_string()))?;
        Ok(ResponseBody::Json(value))
    } else {
        let text = resp
            .text()
            .await
            .map_err(|e| TransportError::Decode(e.to_string()))?;
        Ok(ResponseBody::Text(text))
    }
}

#[async_trait]
impl FileApi for HttpTransport {
    async fn list_files(&self) -> Result<Vec<FileRecord>, TransportError> {
        let body = self.request("", RequestOptions::get()).await?;
        body.decode().inspect_err(|e| {
            tracing::error!(error = %e, "File list response is not a list of files");
        })
    }

    async fn upload_file(&self, file: &SelectedFile) -> Result<ResponseBody, TransportError> {
        let data = tokio::fs::read(&file.path).await.inspect_err(|e| {
            tracing::error!(path = %file.path.display(), error = %e, "Failed to read upload");
        })?;

        let part = Part::bytes(data)
            .file_name(file.file_name())
            .mime_str(&file.mime_type())
            .map_err(|e| TransportError::Decode(e.to_string()))?;
        let form = Form::new().part("file", part);

        self.request("/upload", RequestOptions::post_multipart(form))
            .await
    }

    async fn generate_download_url(&self, file_id: &str) -> Result<ResponseBody, TransportError> {
        self.request(
            "/get-url",
            RequestOptions::post_form(vec![("uuid", file_id.to_string())]),
        )
        .await
    }

    async fn update_download_count(&self, file_id: &str) -> Result<ResponseBody, TransportError> {
        self.request(
            "/update-download-count",
            RequestOptions::post_form(vec![("uuid", file_id.to_string())]),
        )
        .await
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Bytes, TransportError> {
        let url = self.resolve(url)?;
        tracing::debug!(url = %url, "Fetching file bytes");

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(TransportError::Http {
                status: resp.status().as_u16(),
            });
        }

        resp.bytes()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))
    }
}
