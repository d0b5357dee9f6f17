use std::fmt;
use std::str::FromStr;

use hermes_types::{InboxId, NotificationId};
use serde::{Deserialize, Serialize};

use crate::error::{InboxError, InboxResult};
use crate::template::{Placeholder, TemplateValues, UriTemplate};

/// Default inbox identifier template.
pub const DEFAULT_INBOX_TEMPLATE: &str = "{{protocol}}://{{host}}/v1/api/mailbox/{{inboxID}}";

/// Default notification identifier template.
pub const DEFAULT_NOTIFICATION_TEMPLATE: &str =
    "{{protocol}}://{{host}}/v1/api/mailbox/{{inboxID}}/{{notificationID}}";

/// URI scheme a request arrived over.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    #[default]
    Http,
    Https,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Protocol {
    type Err = InboxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "http" => Ok(Self::Http),
            "https" => Ok(Self::Https),
            other => Err(InboxError::BadRequest(format!("unsupported protocol {other:?}"))),
        }
    }
}

/// Per-request transport facts used to build absolute identifiers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransportContext {
    pub protocol: Protocol,
    /// Host as presented by the client, including the port if any.
    pub host: String,
}

impl TransportContext {
    pub fn new(protocol: Protocol, host: impl Into<String>) -> Self {
        Self {
            protocol,
            host: host.into(),
        }
    }
}

/// Renders dereferenceable IRIs for inboxes and notifications.
///
/// Both templates are checked when the resolver is built, so a resolver that
/// exists can always render:
/// - the inbox template must use `{{inboxID}}` and must not use
///   `{{notificationID}}`;
/// - the notification template must use `{{notificationID}}`.
#[derive(Clone, Debug)]
pub struct IdentityResolver {
    inbox: UriTemplate,
    notification: UriTemplate,
}

impl IdentityResolver {
    pub fn new(inbox_template: &str, notification_template: &str) -> InboxResult<Self> {
        let inbox = UriTemplate::parse(inbox_template)?;
        let notification = UriTemplate::parse(notification_template)?;

        if inbox.references(Placeholder::NotificationId) {
            return Err(InboxError::TemplateRender(format!(
                "inbox template {inbox_template:?} cannot use {}",
                Placeholder::NotificationId
            )));
        }
        if !inbox.references(Placeholder::InboxId) {
            return Err(InboxError::TemplateRender(format!(
                "inbox template {inbox_template:?} must use {}",
                Placeholder::InboxId
            )));
        }
        if !notification.references(Placeholder::NotificationId) {
            return Err(InboxError::TemplateRender(format!(
                "notification template {notification_template:?} must use {}",
                Placeholder::NotificationId
            )));
        }

        Ok(Self {
            inbox,
            notification,
        })
    }

    pub fn inbox_template(&self) -> &UriTemplate {
        &self.inbox
    }

    pub fn notification_template(&self) -> &UriTemplate {
        &self.notification
    }

    pub fn resolve_inbox_id(&self, inbox: &InboxId, ctx: &TransportContext) -> InboxResult<String> {
        self.inbox.render(&TemplateValues {
            protocol: Some(ctx.protocol.as_str()),
            host: Some(ctx.host.as_str()),
            inbox_id: Some(inbox.as_str()),
            notification_id: None,
        })
    }

    pub fn resolve_notification_id(
        &self,
        inbox: &InboxId,
        notification: &NotificationId,
        ctx: &TransportContext,
    ) -> InboxResult<String> {
        self.notification.render(&TemplateValues {
            protocol: Some(ctx.protocol.as_str()),
            host: Some(ctx.host.as_str()),
            inbox_id: Some(inbox.as_str()),
            notification_id: Some(notification.as_str()),
        })
    }
}

impl Default for IdentityResolver {
    fn default() -> Self {
        Self {
            inbox: default_template(DEFAULT_INBOX_TEMPLATE),
            notification: default_template(DEFAULT_NOTIFICATION_TEMPLATE),
        }
    }
}

fn default_template(source: &str) -> UriTemplate {
    UriTemplate::parse(source).expect("built-in template is valid")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> TransportContext {
        TransportContext::new(Protocol::Http, "example.org")
    }

    fn inbox(s: &str) -> InboxId {
        InboxId::new(s).unwrap()
    }

    #[test]
    fn resolve_inbox_example() {
        let r = IdentityResolver::default();
        assert_eq!(
            r.resolve_inbox_id(&inbox("inbox1"), &ctx()).unwrap(),
            "http://example.org/v1/api/mailbox/inbox1"
        );
    }

    #[test]
    fn resolve_notification() {
        let r = IdentityResolver::default();
        let id = NotificationId::parse("n-1").unwrap();
        let https = TransportContext::new(Protocol::Https, "example.org:8443");
        assert_eq!(
            r.resolve_notification_id(&inbox("alice"), &id, &https).unwrap(),
            "https://example.org:8443/v1/api/mailbox/alice/n-1"
        );
    }

    #[test]
    fn resolution_is_deterministic() {
        let r = IdentityResolver::default();
        let id = NotificationId::generate();
        let a = r.resolve_notification_id(&inbox("x"), &id, &ctx()).unwrap();
        let b = r.resolve_notification_id(&inbox("x"), &id, &ctx()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn custom_templates() {
        let r = IdentityResolver::new(
            "{{protocol}}://{{host}}/inboxes/{{inboxID}}/",
            "urn:ldn:{{inboxID}}:{{notificationID}}",
        )
        .unwrap();
        assert_eq!(
            r.resolve_inbox_id(&inbox("a"), &ctx()).unwrap(),
            "http://example.org/inboxes/a/"
        );
        let id = NotificationId::parse("n").unwrap();
        assert_eq!(
            r.resolve_notification_id(&inbox("a"), &id, &ctx()).unwrap(),
            "urn:ldn:a:n"
        );
    }

    #[test]
    fn reject_inbox_template_with_notification_id() {
        let err = IdentityResolver::new("{{inboxID}}/{{notificationID}}", DEFAULT_NOTIFICATION_TEMPLATE)
            .unwrap_err();
        assert!(matches!(err, InboxError::TemplateRender(_)));
    }

    #[test]
    fn reject_templates_missing_required_placeholders() {
        assert!(IdentityResolver::new("{{host}}/static", DEFAULT_NOTIFICATION_TEMPLATE).is_err());
        assert!(IdentityResolver::new(DEFAULT_INBOX_TEMPLATE, "{{host}}/{{inboxID}}").is_err());
    }

    #[test]
    fn reject_malformed_templates() {
        assert!(IdentityResolver::new("{{protocol}://{{inboxID}}", DEFAULT_NOTIFICATION_TEMPLATE).is_err());
        assert!(IdentityResolver::new(DEFAULT_INBOX_TEMPLATE, "{{nope}}").is_err());
    }

    #[test]
    fn protocol_parsing() {
        assert_eq!("http".parse::<Protocol>().unwrap(), Protocol::Http);
        assert_eq!("HTTPS".parse::<Protocol>().unwrap(), Protocol::Https);
        assert_eq!(" https ".parse::<Protocol>().unwrap(), Protocol::Https);
        assert!("ftp".parse::<Protocol>().is_err());
        assert_eq!(Protocol::default(), Protocol::Http);
        assert_eq!(Protocol::Https.to_string(), "https");
    }

    #[test]
    fn protocol_serde_is_lowercase() {
        assert_eq!(serde_json::to_string(&Protocol::Https).unwrap(), "\"https\"");
        let p: Protocol = serde_json::from_str("\"http\"").unwrap();
        assert_eq!(p, Protocol::Http);
    }
}
