use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::id::NotificationId;

/// A stored notification.
///
/// `actor`, `object`, `target` and `updated` are opaque to the inbox: they
/// are stored and returned verbatim, never parsed or dereferenced.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub actor: String,
    pub object: String,
    pub target: String,
    pub updated: String,
}

impl Notification {
    /// Bind a draft to its server-assigned ID.
    pub fn from_draft(id: NotificationId, draft: NotificationDraft) -> Self {
        Self {
            id,
            actor: draft.actor,
            object: draft.object,
            target: draft.target,
            updated: draft.updated,
        }
    }
}

/// The creation payload sent by a notification sender.
///
/// Absent fields default to the empty string. Any `id` the sender includes
/// is ignored along with other unknown fields.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationDraft {
    pub actor: String,
    pub object: String,
    pub target: String,
    pub updated: String,
}

impl NotificationDraft {
    /// Decode a draft from a JSON request body.
    pub fn from_json(payload: &[u8]) -> Result<Self, TypeError> {
        serde_json::from_slice(payload).map_err(|e| TypeError::MalformedPayload(e.to_string()))
    }
}
