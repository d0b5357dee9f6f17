//! Inbox core for the Hermes Linked Data Notifications server.
//!
//! - [`NotificationRepository`] owns the storage key scheme
//!   `<inboxID>/<notificationID>` and the create/get/list operations.
//! - [`IdentityResolver`] renders inbox and notification IRIs from two URI
//!   templates and the request's [`TransportContext`].
//! - [`presenter`] maps stored records to JSON-LD documents.
//! - [`InboxService`] composes the three for the externally visible
//!   operations.

pub mod error;
pub mod presenter;
pub mod repository;
pub mod resolver;
pub mod service;
pub mod template;

pub use error::{ErrorKind, InboxError, InboxResult};
pub use repository::{
    inbox_prefix, storage_key, NotificationPage, NotificationRepository, DEFAULT_PAGE_SIZE,
    KEY_DELIMITER,
};
pub use resolver::{
    IdentityResolver, Protocol, TransportContext, DEFAULT_INBOX_TEMPLATE,
    DEFAULT_NOTIFICATION_TEMPLATE,
};
pub use service::InboxService;
pub use template::{Placeholder, TemplateValues, UriTemplate};

// Re-export key types
pub use hermes_protocol::{LdNotification, LdnInbox};
pub use hermes_types::{InboxId, Notification, NotificationDraft, NotificationId};
