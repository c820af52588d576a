use std::io::Write;

use super::{ClickTarget, ListPanel, Severity, View};
use crate::messages::Messages;
use crate::models::{FileRecord, SelectedFile};

/// Line-oriented view that renders into any writer (stdout in the binary).
pub struct TerminalView<W: Write> {
    out: W,
    messages: &'static Messages,
    status: (String, Severity),
    panel: ListPanel,
    selected: Option<SelectedFile>,
    submit_enabled: bool,
    submit_label: &'static str,
    busy: bool,
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W, messages: &'static Messages) -> Self {
        Self {
            out,
            messages,
            status: (String::new(), Severity::Empty),
            panel: ListPanel::Empty(messages.no_files),
            selected: None,
            submit_enabled: true,
            submit_label: messages.submit_idle,
            busy: false,
        }
    }

    /// Resolve a 1-based row number from the last rendered list.
    pub fn click_row(&self, number: usize) -> ClickTarget {
        number
            .checked_sub(1)
            .and_then(|idx| self.panel.rows().get(idx))
            .map(|row| ClickTarget::Control(row.command.clone()))
            .unwrap_or(ClickTarget::Elsewhere)
    }

    pub fn status(&self) -> (&str, Severity) {
        (&self.status.0, self.status.1)
    }

    pub fn panel(&self) -> &ListPanel {
        &self.panel
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn submit_enabled(&self) -> bool {
        self.submit_enabled
    }

    pub fn submit_label(&self) -> &str {
        self.submit_label
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn draw_panel(&mut self) {
        let _ = writeln!(self.out, "{}", format_panel(&self.panel));
    }
}

/// Text rendering of the list region.
pub fn format_panel(panel: &ListPanel) -> String {
    match panel {
        ListPanel::Empty(placeholder) => format!("  ({placeholder})"),
        ListPanel::Error(placeholder) => format!("  !! {placeholder}"),
        ListPanel::Files(rows) => rows
            .iter()
            .enumerate()
            .map(|(i, row)| match &row.size {
                Some(size) => format!(
                    "  {:>3}. {} ({size})  [{}]",
                    i + 1,
                    row.label,
                    row.control_label
                ),
                None => format!("  {:>3}. {}  [{}]", i + 1, row.label, row.control_label),
            })
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

impl<W: Write> View for TerminalView<W> {
    fn messages(&self) -> &'static Messages {
        self.messages
    }

    fn set_status(&mut self, message: &str, severity: Severity) {
        self.status = (message.to_string(), severity);
        if !message.is_empty() {
            let _ = writeln!(self.out, "[{}] {message}", severity.as_str());
        }
    }

    fn set_loading(&mut self, loading: bool) {
        self.submit_enabled = !loading;
        self.submit_label = if loading {
            self.messages.submit_loading
        } else {
            self.messages.submit_idle
        };
        self.busy = loading;
        if loading {
            let _ = writeln!(self.out, "<{}>", self.submit_label);
        }
    }

    fn render_files(&mut self, files: &[FileRecord]) {
        self.panel = ListPanel::from_files(files, self.messages);
        self.draw_panel();
    }

    fn render_list_error(&mut self) {
        self.panel = ListPanel::list_error(self.messages);
        self.draw_panel();
    }

    fn select_file(&mut self, file: Option<SelectedFile>) {
        self.selected = file;
    }

    fn selected_file(&self) -> Option<SelectedFile> {
        self.selected.clone()
    }
}
