//! Identifier URI templates.
//!
//! A template is literal text with `{{name}}` placeholders. Whitespace inside
//! the braces is ignored. Known placeholders:
//!
//! | placeholder          | value                              |
//! |----------------------|------------------------------------|
//! | `{{protocol}}`       | `http` or `https`                  |
//! | `{{host}}`           | request host, with port if present |
//! | `{{inboxID}}`        | inbox identifier                   |
//! | `{{notificationID}}` | notification identifier            |
//!
//! Templates are parsed once. Rendering a parsed template only fails when a
//! referenced placeholder has no value.

use std::fmt;

use crate::error::{InboxError, InboxResult};

/// A named template placeholder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Placeholder {
    Protocol,
    Host,
    InboxId,
    NotificationId,
}

impl Placeholder {
    pub const ALL: [Placeholder; 4] = [
        Self::Protocol,
        Self::Host,
        Self::InboxId,
        Self::NotificationId,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Protocol => "protocol",
            Self::Host => "host",
            Self::InboxId => "inboxID",
            Self::NotificationId => "notificationID",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{{{}}}}}", self.name())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Value(Placeholder),
}

/// Values available while rendering.
#[derive(Clone, Copy, Debug, Default)]
pub struct TemplateValues<'a> {
    pub protocol: Option<&'a str>,
    pub host: Option<&'a str>,
    pub inbox_id: Option<&'a str>,
    pub notification_id: Option<&'a str>,
}

impl<'a> TemplateValues<'a> {
    fn get(&self, placeholder: Placeholder) -> Option<&'a str> {
        match placeholder {
            Placeholder::Protocol => self.protocol,
            Placeholder::Host => self.host,
            Placeholder::InboxId => self.inbox_id,
            Placeholder::NotificationId => self.notification_id,
        }
    }
}

/// A parsed identifier template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UriTemplate {
    source: String,
    segments: Vec<Segment>,
}

impl UriTemplate {
    /// Parse a template string.
    ///
    /// Fails on an unterminated `{{`, a stray `}}`, an empty placeholder or
    /// an unknown placeholder name.
    pub fn parse(source: &str) -> InboxResult<Self> {
        let invalid = |reason: String| {
            InboxError::TemplateRender(format!("template {source:?}: {reason}"))
        };

        let mut segments = Vec::new();
        let mut rest = source;
        while !rest.is_empty() {
            let open = rest.find("{{");
            let close = rest.find("}}");
            match (open, close) {
                (None, None) => {
                    segments.push(Segment::Literal(rest.to_string()));
                    break;
                }
                (None, Some(_)) => return Err(invalid("unmatched '}}'".into())),
                (Some(o), Some(c)) if c < o => return Err(invalid("unmatched '}}'".into())),
                (Some(o), _) => {
                    if o > 0 {
                        segments.push(Segment::Literal(rest[..o].to_string()));
                    }
                    let after_open = &rest[o + 2..];
                    let end = after_open
                        .find("}}")
                        .ok_or_else(|| invalid("unterminated '{{'".into()))?;
                    let name = after_open[..end].trim();
                    if name.is_empty() {
                        return Err(invalid("empty placeholder".into()));
                    }
                    let placeholder = Placeholder::from_name(name)
                        .ok_or_else(|| invalid(format!("unknown placeholder {name:?}")))?;
                    segments.push(Segment::Value(placeholder));
                    rest = &after_open[end + 2..];
                }
            }
        }

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    /// The template text as configured.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether the template uses `placeholder` anywhere.
    pub fn references(&self, placeholder: Placeholder) -> bool {
        self.segments
            .iter()
            .any(|s| matches!(s, Segment::Value(p) if *p == placeholder))
    }

    /// Substitute placeholder values.
    pub fn render(&self, values: &TemplateValues<'_>) -> InboxResult<String> {
        let mut out = String::with_capacity(self.source.len() + 64);
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Value(p) => {
                    let value = values.get(*p).ok_or_else(|| {
                        InboxError::TemplateRender(format!(
                            "template {:?}: no value for {p}",
                            self.source
                        ))
                    })?;
                    out.push_str(value);
                }
            }
        }
        Ok(out)
    }
}

impl fmt::Display for UriTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
