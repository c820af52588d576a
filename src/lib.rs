//! file-client - Upload, list and download files through a file storage API
//!
//! This crate provides the client side of the file API with:
//! - A reqwest transport that decodes JSON or text responses
//! - A view-port trait so orchestration runs against any rendering surface
//! - A download orchestrator (signed URL, bytes, save-as, download count)
//! - A coordinator that turns UI events into those actions

pub mod app;
pub mod config;
pub mod console;
pub mod download;
pub mod messages;
pub mod models;
pub mod service;
#[cfg(test)]
pub mod testutil;
pub mod transport;
pub mod view;

pub use app::App;
pub use config::Config;
