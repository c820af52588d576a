//! Presentation layer: the view-port the orchestration talks to, and the
//! render model for the file list.

mod terminal;

pub use terminal::TerminalView;

use thiserror::Error;

use crate::messages::Messages;
use crate::models::{format_size, FileRecord, FileRef, SelectedFile};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("No file selected")]
    NoFileSelected,
}

/// Severity tag of the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Loading,
    Success,
    Error,
    /// Cleared status line
    Empty,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Loading => "loading",
            Severity::Success => "success",
            Severity::Error => "error",
            Severity::Empty => "",
        }
    }
}

/// What a control in the file list does when activated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Download(FileRef),
}

/// Where a click in the file list landed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickTarget {
    Control(Command),
    Elsewhere,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRow {
    pub label: String,
    pub size: Option<String>,
    pub control_label: &'static str,
    pub command: Command,
}

/// Render model of the file list region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListPanel {
    Files(Vec<FileRow>),
    Empty(&'static str),
    Error(&'static str),
}

impl ListPanel {
    pub fn from_files(files: &[FileRecord], messages: &Messages) -> Self {
        if files.is_empty() {
            return ListPanel::Empty(messages.no_files);
        }

        let rows = files
            .iter()
            .map(|file| FileRow {
                label: file.display_name().to_string(),
                size: file.file_size.map(format_size),
                control_label: messages.download_button,
                command: Command::Download(file.file_ref()),
            })
            .collect();
        ListPanel::Files(rows)
    }

    pub fn list_error(messages: &Messages) -> Self {
        ListPanel::Error(messages.list_failed)
    }

    pub fn rows(&self) -> &[FileRow] {
        match self {
            ListPanel::Files(rows) => rows,
            _ => &[],
        }
    }
}

/// The capability set orchestration needs from a rendering surface.
pub trait View {
    fn messages(&self) -> &'static Messages;

    fn set_status(&mut self, message: &str, severity: Severity);

    fn clear_status(&mut self) {
        self.set_status("", Severity::Empty);
    }

    /// Disable/enable submit, swap its label and toggle the busy flag.
    fn set_loading(&mut self, loading: bool);

    fn render_files(&mut self, files: &[FileRecord]);

    fn render_list_error(&mut self);

    /// Record what the file input currently holds.
    fn select_file(&mut self, file: Option<SelectedFile>);

    fn selected_file(&self) -> Option<SelectedFile>;

    /// Clear the upload form back to its initial state.
    fn reset_form(&mut self) {
        self.select_file(None);
    }

    /// The selected file, or an error status and `NoFileSelected`.
    fn validate_selection(&mut self) -> Result<SelectedFile, ValidationError> {
        match self.selected_file() {
            Some(file) => Ok(file),
            None => {
                let msg = self.messages().choose_file;
                self.set_status(msg, Severity::Error);
                Err(ValidationError::NoFileSelected)
            }
        }
    }
}
