//! Shared fakes for orchestration tests.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;

use crate::download::{ObjectUrl, SaveTarget};
use crate::messages::{Locale, Messages};
use crate::models::{FileRecord, SelectedFile};
use crate::transport::{FileApi, ResponseBody, TransportError};
use crate::view::{Severity, View};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    List,
    Upload(PathBuf),
    GenerateUrl(String),
    FetchBytes(String),
    UpdateCount(String),
}

#[derive(Default)]
struct FakeApiState {
    files: Vec<FileRecord>,
    blobs: HashMap<String, Bytes>,
    calls: Vec<ApiCall>,
    fail_list: Option<u16>,
    fail_upload: Option<u16>,
    fail_generate_url: Option<u16>,
    fail_update_count: Option<u16>,
    panic_on_upload: bool,
}

/// In-memory file API that records every call.
#[derive(Default)]
pub struct FakeApi {
    state: Mutex<FakeApiState>,
}

impl FakeApi {
    pub fn with_files(files: Vec<FileRecord>) -> Self {
        let api = Self::default();
        api.state.lock().unwrap().files = files;
        api
    }

    pub fn put_blob(&self, id: &str, data: &'static str) {
        self.state
            .lock()
            .unwrap()
            .blobs
            .insert(id.to_string(), Bytes::from(data));
    }

    pub fn fail_list(&self, status: u16) {
        self.state.lock().unwrap().fail_list = Some(status);
    }

    pub fn fail_upload(&self, status: u16) {
        self.state.lock().unwrap().fail_upload = Some(status);
    }

    pub fn panic_on_upload(&self) {
        self.state.lock().unwrap().panic_on_upload = true;
    }

    pub fn fail_generate_url(&self, status: u16) {
        self.state.lock().unwrap().fail_generate_url = Some(status);
    }

    pub fn fail_update_count(&self, status: u16) {
        self.state.lock().unwrap().fail_update_count = Some(status);
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    fn record(&self, call: ApiCall) -> std::sync::MutexGuard<'_, FakeApiState> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        state
    }
}

#[async_trait]
impl FileApi for FakeApi {
    async fn list_files(&self) -> Result<Vec<FileRecord>, TransportError> {
        let state = self.record(ApiCall::List);
        match state.fail_list {
            Some(status) => Err(TransportError::Http { status }),
            None => Ok(state.files.clone()),
        }
    }

    async fn upload_file(&self, file: &SelectedFile) -> Result<ResponseBody, TransportError> {
        let mut state = self.record(ApiCall::Upload(file.path.clone()));
        if state.panic_on_upload {
            // release the lock first so the mutex is not poisoned
            drop(state);
            panic!("upload handler crashed");
        }
        if let Some(status) = state.fail_upload {
            return Err(TransportError::Http { status });
        }
        let record = FileRecord::new(format!("file-{}", state.files.len() + 1), file.file_name());
        state.files.push(record.clone());
        Ok(ResponseBody::Json(serde_json::to_value(record).unwrap()))
    }

    async fn generate_download_url(&self, file_id: &str) -> Result<ResponseBody, TransportError> {
        let state = self.record(ApiCall::GenerateUrl(file_id.to_string()));
        match state.fail_generate_url {
            Some(status) => Err(TransportError::Http { status }),
            None => Ok(ResponseBody::Json(serde_json::Value::String(format!(
                "fake://download/{file_id}"
            )))),
        }
    }

    async fn update_download_count(&self, file_id: &str) -> Result<ResponseBody, TransportError> {
        let state = self.record(ApiCall::UpdateCount(file_id.to_string()));
        match state.fail_update_count {
            Some(status) => Err(TransportError::Http { status }),
            None => Ok(ResponseBody::Json(serde_json::json!({"status": "updated"}))),
        }
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Bytes, TransportError> {
        let state = self.record(ApiCall::FetchBytes(url.to_string()));
        url.strip_prefix("fake://download/")
            .and_then(|id| state.blobs.get(id).cloned())
            .ok_or(TransportError::Http { status: 404 })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewOp {
    Status(String, Severity),
    Loading(bool),
    /// Ids of the rendered rows
    List(Vec<String>),
    ListError,
}

/// View that records every operation instead of drawing.
pub struct RecordingView {
    messages: &'static Messages,
    ops: Vec<ViewOp>,
    selected: Option<SelectedFile>,
}

impl RecordingView {
    pub fn new(locale: Locale) -> Self {
        Self {
            messages: Messages::for_locale(locale),
            ops: Vec::new(),
            selected: None,
        }
    }

    pub fn ops(&self) -> Vec<ViewOp> {
        self.ops.clone()
    }

    pub fn last_status(&self) -> Option<(String, Severity)> {
        self.ops.iter().rev().find_map(|op| match op {
            ViewOp::Status(msg, severity) => Some((msg.clone(), *severity)),
            _ => None,
        })
    }

    /// Ids of the last list render; `None` if the last render was the error placeholder.
    pub fn last_list(&self) -> Option<Vec<String>> {
        self.ops.iter().rev().find_map(|op| match op {
            ViewOp::List(ids) => Some(Some(ids.clone())),
            ViewOp::ListError => Some(None),
            _ => None,
        })?
    }
}

impl View for RecordingView {
    fn messages(&self) -> &'static Messages {
        self.messages
    }

    fn set_status(&mut self, message: &str, severity: Severity) {
        self.ops.push(ViewOp::Status(message.to_string(), severity));
    }

    fn set_loading(&mut self, loading: bool) {
        self.ops.push(ViewOp::Loading(loading));
    }

    fn render_files(&mut self, files: &[FileRecord]) {
        self.ops
            .push(ViewOp::List(files.iter().map(|f| f.id.clone()).collect()));
    }

    fn render_list_error(&mut self) {
        self.ops.push(ViewOp::ListError);
    }

    fn select_file(&mut self, file: Option<SelectedFile>) {
        self.selected = file;
    }

    fn selected_file(&self) -> Option<SelectedFile> {
        self.selected.clone()
    }
}

#[derive(Default)]
struct TargetState {
    next_id: usize,
    blobs: HashMap<ObjectUrl, Bytes>,
    created: usize,
    revocations: HashMap<ObjectUrl, usize>,
    saved: Vec<(String, Bytes)>,
}

/// Save target that keeps blobs in memory and counts object URL revocations.
#[derive(Default)]
pub struct RecordingTarget {
    state: Mutex<TargetState>,
    fail_saves: bool,
}

impl RecordingTarget {
    pub fn failing_saves() -> Self {
        Self {
            fail_saves: true,
            ..Default::default()
        }
    }

    pub fn created(&self) -> usize {
        self.state.lock().unwrap().created
    }

    /// Total revocations; panics if any URL was revoked more than once.
    pub fn revoked(&self) -> usize {
        let state = self.state.lock().unwrap();
        assert!(
            state.revocations.values().all(|&n| n == 1),
            "object URL revoked more than once"
        );
        state.revocations.values().sum()
    }

    pub fn saved(&self) -> Vec<(String, Bytes)> {
        self.state.lock().unwrap().saved.clone()
    }
}

impl SaveTarget for RecordingTarget {
    fn create_object_url(&self, data: Bytes) -> Result<ObjectUrl, std::io::Error> {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        state.created += 1;
        let url = ObjectUrl::new(format!("blob:test-{}", state.next_id));
        state.blobs.insert(url.clone(), data);
        Ok(url)
    }

    fn save_as(&self, url: &ObjectUrl, file_name: &str) -> Result<PathBuf, std::io::Error> {
        if self.fail_saves {
            return Err(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only target",
            ));
        }
        let mut state = self.state.lock().unwrap();
        let data = state
            .blobs
            .get(url)
            .cloned()
            .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::NotFound, "revoked"))?;
        state.saved.push((file_name.to_string(), data));
        Ok(PathBuf::from(file_name))
    }

    fn revoke_object_url(&self, url: &ObjectUrl) {
        let mut state = self.state.lock().unwrap();
        state.blobs.remove(url);
        *state.revocations.entry(url.clone()).or_default() += 1;
    }
}
