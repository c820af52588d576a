//! The coordinator: routes UI events to uploads, list refreshes and downloads.

use std::path::PathBuf;

use crate::download::{Downloader, SaveTarget};
use crate::models::SelectedFile;
use crate::transport::FileApi;
use crate::view::{ClickTarget, Command, Severity, View};

/// Input events from the host surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Submit,
    FileInputChanged(Option<PathBuf>),
    ListClick(ClickTarget),
    Refresh,
}

pub struct FileService<A, V, T>
where
    A: FileApi,
    V: View,
    T: SaveTarget,
{
    api: A,
    view: V,
    downloader: Downloader<T>,
}

impl<A, V, T> FileService<A, V, T>
where
    A: FileApi,
    V: View,
    T: SaveTarget,
{
    pub fn new(api: A, view: V, target: T) -> Self {
        Self {
            api,
            view,
            downloader: Downloader::new(target),
        }
    }

    /// Wire everything up and show the initial list.
    pub async fn start(api: A, view: V, target: T) -> Self {
        let mut service = Self::new(api, view, target);
        service.load_files_list().await;
        service
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn downloader(&self) -> &Downloader<T> {
        &self.downloader
    }

    pub async fn dispatch(&mut self, event: Event) {
        match event {
            Event::Submit => self.handle_upload().await,
            Event::FileInputChanged(path) => {
                self.view.select_file(path.map(SelectedFile::new));
                self.view.clear_status();
            }
            Event::ListClick(target) => self.handle_file_list_click(target).await,
            Event::Refresh => self.load_files_list().await,
        }
    }

    async fn handle_upload(&mut self) {
        let file = match self.view.validate_selection() {
            Ok(file) => file,
            Err(e) => {
                tracing::debug!(error = %e, "Upload submitted without a file");
                return;
            }
        };

        self.upload_file(&file).await;
    }

    async fn upload_file(&mut self, file: &SelectedFile) {
        let messages = self.view.messages();
        self.view.set_loading(true);
        self.view.set_status(messages.uploading, Severity::Loading);

        match self.api.upload_file(file).await {
            Ok(_) => {
                tracing::info!(path = %file.path.display(), "File uploaded");
                self.view
                    .set_status(messages.upload_succeeded, Severity::Success);
                self.view.reset_form();
                self.load_files_list().await;
            }
            Err(e) => {
                tracing::error!(path = %file.path.display(), error = %e, "Upload error");
                self.view
                    .set_status(&messages.upload_failed(&e), Severity::Error);
            }
        }

        self.view.set_loading(false);
    }

    /// Fetch and render the list; a failed fetch shows the error placeholder.
    pub async fn load_files_list(&mut self) {
        match self.api.list_files().await {
            Ok(files) => self.view.render_files(&files),
            Err(e) => {
                tracing::error!(error = %e, "Load files error");
                self.view.render_list_error();
            }
        }
    }

    async fn handle_file_list_click(&mut self, target: ClickTarget) {
        match target {
            ClickTarget::Control(Command::Download(file)) => {
                self.downloader
                    .download_file(&self.api, &mut self.view, &file)
                    .await;
            }
            ClickTarget::Elsewhere => {}
        }
    }
}
