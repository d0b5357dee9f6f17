/// HTTP endpoint paths served by Hermes.
pub mod endpoints {
    pub const HEALTH: &str = "/v1/health";
    /// Base path of all inboxes; an inbox lives at `{MAILBOX}/{inbox_id}`.
    pub const MAILBOX: &str = "/v1/api/mailbox";
    pub const INBOX: &str = "/v1/api/mailbox/:inbox_id";
    pub const NOTIFICATION: &str = "/v1/api/mailbox/:inbox_id/:notification_id";
}

/// Media types.
pub mod media_types {
    /// JSON-LD, used for every document Hermes serves.
    pub const LD_JSON: &str = "application/ld+json";
}

/// Health check response.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".into(),
            version: env!("CARGO_PKG_VERSION").into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_response_defaults() {
        let h = HealthResponse::default();
        assert_eq!(h.status, "ok");
        assert!(!h.version.is_empty());
    }

    #[test]
    fn endpoint_paths() {
        assert_eq!(endpoints::HEALTH, "/v1/health");
        assert!(endpoints::INBOX.starts_with(endpoints::MAILBOX));
        assert!(endpoints::NOTIFICATION.starts_with(endpoints::INBOX));
    }
}
