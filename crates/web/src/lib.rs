//! Vitrine Web Service
//!
//! The catalog HTTP API plus optional static hosting of the widget
//! build artifact.

pub mod server;
pub mod static_files;

pub use server::{serve, WebServer, WebServerConfig};
