use serde::{Deserialize, Serialize};

/// JSON-LD context of an inbox listing (W3C Linked Data Platform).
pub const LDP_CONTEXT: &str = "http://www.w3.org/ns/ldp";

/// JSON-LD context of a notification (W3C Activity Streams 2.0).
pub const ACTIVITY_STREAMS_CONTEXT: &str = "https://www.w3.org/ns/activitystreams";

/// Activity type stamped on every notification document.
pub const ANNOUNCE_TYPE: &str = "Announce";

/// An inbox as an LDP container listing its member IRIs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LdnInbox {
    #[serde(rename = "@context")]
    pub context: String,
    #[serde(rename = "@id")]
    pub id: String,
    pub contains: Vec<String>,
    /// IRI of the following page when the listing was cut at the page size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

impl LdnInbox {
    pub fn new(id: impl Into<String>, contains: Vec<String>) -> Self {
        Self {
            context: LDP_CONTEXT.into(),
            id: id.into(),
            contains,
            next: None,
        }
    }

    /// Attach the IRI of the next page.
    pub fn with_next(mut self, next: impl Into<String>) -> Self {
        self.next = Some(next.into());
        self
    }

    /// Whether more members exist beyond this page.
    pub fn is_truncated(&self) -> bool {
        self.next.is_some()
    }
}

/// A single notification as an Activity Streams `Announce`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LdNotification {
    #[serde(rename = "@context")]
    pub context: String,
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(rename = "@type")]
    pub kind: String,
    pub actor: String,
    pub object: String,
    pub target: String,
    pub updated: String,
}
