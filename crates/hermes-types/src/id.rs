//! Inbox and notification identifiers.
//!
//! Both identifiers end up in two places: the storage key
//! `<inboxID>/<notificationID>` and the rendered IRIs. A valid identifier:
//! - is 1 to [`MAX_IDENTIFIER_LEN`] characters long
//! - uses only URI unreserved characters: `A-Z a-z 0-9 - . _ ~`
//! - is not `.` or `..`
//!
//! The key delimiter `/` is outside the unreserved set, so an inbox prefix
//! scan can never match keys of another inbox.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Maximum identifier length in characters.
pub const MAX_IDENTIFIER_LEN: usize = 128;

/// Which identifier is being validated (used in error messages).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IdKind {
    Inbox,
    Notification,
}

impl IdKind {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Inbox => "inbox id",
            Self::Notification => "notification id",
        }
    }
}

fn is_unreserved(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '-' | '.' | '_' | '~')
}

/// Validate an identifier, returning `Ok(())` if it is usable as a key
/// component and IRI path segment.
///
/// # Examples
///
/// ```
/// use hermes_types::{validate_identifier, IdKind};
///
/// assert!(validate_identifier(IdKind::Inbox, "alice").is_ok());
/// assert!(validate_identifier(IdKind::Inbox, "a/b").is_err());
/// assert!(validate_identifier(IdKind::Inbox, "").is_err());
/// ```
pub fn validate_identifier(kind: IdKind, value: &str) -> Result<(), TypeError> {
    let invalid = |reason: String| TypeError::InvalidIdentifier {
        kind: kind.as_str(),
        value: value.to_string(),
        reason,
    };

    if value.is_empty() {
        return Err(invalid("must not be empty".into()));
    }
    if value.len() > MAX_IDENTIFIER_LEN {
        return Err(invalid(format!(
            "longer than {MAX_IDENTIFIER_LEN} characters"
        )));
    }
    if value == "." || value == ".." {
        return Err(invalid("must not be a dot segment".into()));
    }
    if let Some(ch) = value.chars().find(|c| !is_unreserved(*c)) {
        return Err(invalid(format!("contains forbidden character: {ch:?}")));
    }
    Ok(())
}

/// Caller-chosen inbox name.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct InboxId(String);

impl InboxId {
    pub fn new(value: impl Into<String>) -> Result<Self, TypeError> {
        let value = value.into();
        validate_identifier(IdKind::Inbox, &value)?;
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for InboxId {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<InboxId> for String {
    fn from(id: InboxId) -> Self {
        id.0
    }
}

impl fmt::Display for InboxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Server-assigned notification identifier.
///
/// Freshly generated ids are random UUID v4 values in lowercase hyphenated
/// form. Ids read back from requests or storage are only checked against the
/// identifier rules, so a lookup for a well-formed but unknown id is a miss
/// rather than a client error.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NotificationId(String);

impl NotificationId {
    /// Generate a new random notification ID (UUID v4).
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Parse an externally supplied notification ID.
    pub fn parse(value: impl Into<String>) -> Result<Self, TypeError> {
        let value = value.into();
        validate_identifier(IdKind::Notification, &value)?;
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for NotificationId {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<NotificationId> for String {
    fn from(id: NotificationId) -> Self {
        id.0
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
