//! Wire protocol for the Hermes inbox.
//!
//! Defines the JSON-LD documents served to clients, the HTTP endpoint paths
//! and the media types involved.

pub mod document;
pub mod endpoint;

pub use document::{
    LdNotification, LdnInbox, ACTIVITY_STREAMS_CONTEXT, ANNOUNCE_TYPE, LDP_CONTEXT,
};
pub use endpoint::{endpoints, media_types, HealthResponse};
