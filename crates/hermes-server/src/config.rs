use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use hermes_inbox::{
    IdentityResolver, Protocol, DEFAULT_INBOX_TEMPLATE, DEFAULT_NOTIFICATION_TEMPLATE,
    DEFAULT_PAGE_SIZE,
};
use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};

/// Server configuration, loaded from TOML. Every field has a default.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Location of the redb database file.
    pub storage_path: PathBuf,
    pub inbox_template: String,
    pub notification_template: String,
    /// Scheme used in identifiers when no trusted header says otherwise.
    pub default_protocol: Protocol,
    /// Honour `X-Forwarded-*` and `Forwarded` headers from a reverse proxy.
    pub trust_forwarded_headers: bool,
    /// Largest number of members listed in one inbox document.
    pub max_page_size: usize,
    pub max_body_bytes: usize,
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            storage_path: PathBuf::from("./tmp/postoffice.redb"),
            inbox_template: DEFAULT_INBOX_TEMPLATE.into(),
            notification_template: DEFAULT_NOTIFICATION_TEMPLATE.into(),
            default_protocol: Protocol::Http,
            trust_forwarded_headers: false,
            max_page_size: DEFAULT_PAGE_SIZE,
            max_body_bytes: 1024 * 1024,
            request_timeout_secs: 30,
        }
    }
}

impl ServerConfig {
    pub fn from_toml_str(source: &str) -> ServerResult<Self> {
        toml::from_str(source).map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Read and parse a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> ServerResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| {
            ServerError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&source)
    }

    /// Check the configuration and build the identifier resolver it describes.
    pub fn validate(&self) -> ServerResult<IdentityResolver> {
        if self.max_page_size == 0 {
            return Err(ServerError::Config("max_page_size must be at least 1".into()));
        }
        if self.request_timeout_secs == 0 {
            return Err(ServerError::Config(
                "request_timeout_secs must be at least 1".into(),
            ));
        }
        IdentityResolver::new(&self.inbox_template, &self.notification_template)
            .map_err(|e| ServerError::Config(e.to_string()))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
