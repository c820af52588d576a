//! Composition root. `main` builds exactly one `App` and feeds it events.

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::path::PathBuf;

use anyhow::bail;
use futures::FutureExt;

use crate::download::SaveTarget;
use crate::service::{Event, FileService};
use crate::transport::FileApi;
use crate::view::{Severity, View};

pub struct App<A, V, T>
where
    A: FileApi,
    V: View,
    T: SaveTarget,
{
    service: FileService<A, V, T>,
}

impl<A, V, T> App<A, V, T>
where
    A: FileApi,
    V: View,
    T: SaveTarget,
{
    /// Build the service and run the initial list refresh.
    pub async fn new(api: A, view: V, target: T) -> Self {
        Self {
            service: FileService::start(api, view, target).await,
        }
    }

    /// Route panics through tracing instead of the default stderr printer.
    pub fn install_panic_hook() {
        std::panic::set_hook(Box::new(|info| {
            tracing::error!(panic = %info, "Global error");
        }));
    }

    pub fn service(&self) -> &FileService<A, V, T> {
        &self.service
    }

    pub fn view(&self) -> &V {
        self.service.view()
    }

    pub async fn handle(&mut self, event: Event) {
        let outcome = AssertUnwindSafe(async {
            self.service.dispatch(event).await;
            Ok::<(), anyhow::Error>(())
        })
        .catch_unwind()
        .await;
        self.report(outcome);
    }

    /// Mirror a file input change. A path that is not a readable file is an
    /// unhandled error; returns whether the selection took effect.
    pub async fn select_path(&mut self, path: PathBuf) -> bool {
        let checked = self
            .observe(async move {
                let meta = tokio::fs::metadata(&path).await?;
                if !meta.is_file() {
                    bail!("{} is not a file", path.display());
                }
                Ok(path)
            })
            .await;

        match checked {
            Some(path) => {
                self.handle(Event::FileInputChanged(Some(path))).await;
                true
            }
            None => false,
        }
    }

    /// Submit the form, optionally selecting `path` first. A failed selection
    /// submits nothing.
    pub async fn upload(&mut self, path: Option<PathBuf>) {
        if let Some(path) = path {
            if !self.select_path(path).await {
                return;
            }
        }
        self.handle(Event::Submit).await;
    }

    /// Last-resort boundary for host-side work: a panic or an error nobody
    /// handled becomes a generic status message.
    pub async fn observe<F, R>(&mut self, task: F) -> Option<R>
    where
        F: Future<Output = anyhow::Result<R>>,
    {
        let outcome = AssertUnwindSafe(task).catch_unwind().await;
        self.report(outcome)
    }

    fn report<R>(&mut self, outcome: Result<anyhow::Result<R>, Box<dyn Any + Send>>) -> Option<R> {
        match outcome {
            Ok(Ok(value)) => Some(value),
            Ok(Err(e)) => {
                self.on_unhandled_error(&e);
                None
            }
            Err(panic) => {
                self.on_uncaught_panic(panic.as_ref());
                None
            }
        }
    }

    fn on_unhandled_error(&mut self, error: &anyhow::Error) {
        tracing::error!(error = %error, "Unhandled error");
        let view = self.service.view_mut();
        let msg = view.messages().operation_failed;
        view.set_status(msg, Severity::Error);
    }

    fn on_uncaught_panic(&mut self, payload: &(dyn Any + Send)) {
        let reason = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        tracing::error!(reason = %reason, "Uncaught panic in event handler");

        let view = self.service.view_mut();
        view.set_loading(false);
        let msg = view.messages().unexpected_error;
        view.set_status(msg, Severity::Error);
    }
}
