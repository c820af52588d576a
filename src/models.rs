use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// A file descriptor as returned by the list and upload endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub id: String,
    #[serde(default)]
    pub original_file_name: Option<String>,
    #[serde(default)]
    pub file_size: Option<u64>,
    #[serde(default)]
    pub content_type: Option<String>,

    /// Server fields the client does not interpret (upload date, counters, ...)
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl FileRecord {
    pub fn new(id: impl Into<String>, original_file_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            original_file_name: Some(original_file_name.into()),
            file_size: None,
            content_type: None,
            extra: HashMap::new(),
        }
    }

    /// Name shown in the list; falls back to the id when the server sent no name.
    pub fn display_name(&self) -> &str {
        self.original_file_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.id)
    }

    pub fn file_ref(&self) -> FileRef {
        FileRef {
            id: self.id.clone(),
            file_name: self.original_file_name.clone(),
        }
    }
}

/// The identity a download control carries: which file, and what to save it as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRef {
    pub id: String,
    pub file_name: Option<String>,
}

/// A local file chosen in the upload form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub path: PathBuf,
}

impl SelectedFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// File name sent in the multipart part.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "upload".to_string())
    }

    pub fn mime_type(&self) -> String {
        mime_guess::from_path(&self.path)
            .first_or_octet_stream()
            .to_string()
    }
}

/// Format a byte count for display in the file list.
pub fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    const GB: f64 = MB * 1024.0;

    let b = bytes as f64;
    if b >= GB {
        format!("{:.1} GB", b / GB)
    } else if b >= MB {
        format!("{:.1} MB", b / MB)
    } else if b >= KB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{bytes} B")
    }
}
