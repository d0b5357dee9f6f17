//! HTTP server for Hermes.
//!
//! Serves Linked Data Notifications inboxes over axum: senders `POST`
//! notifications to an inbox, consumers `GET` the inbox listing and the
//! individual notifications as JSON-LD.

pub mod config;
pub mod context;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;

pub use config::ServerConfig;
pub use context::ContextPolicy;
pub use error::{ServerError, ServerResult};
pub use handler::{AppState, LdJson};
pub use router::{build_app, build_router};
pub use server::HermesServer;
