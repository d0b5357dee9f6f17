//! Foundation types for the Hermes Linked Data Notifications inbox.
//!
//! Every other Hermes crate depends on `hermes-types`.
//!
//! # Key Types
//!
//! - [`InboxId`]: caller-chosen inbox name, validated so it can be embedded
//!   in storage keys and IRIs without escaping
//! - [`NotificationId`]: server-generated random identifier (UUID v4)
//! - [`Notification`]: the persisted record
//! - [`NotificationDraft`]: the sender-supplied creation payload

pub mod error;
pub mod id;
pub mod notification;

pub use error::TypeError;
pub use id::{validate_identifier, IdKind, InboxId, NotificationId, MAX_IDENTIFIER_LEN};
pub use notification::{Notification, NotificationDraft};
