//! Derives the transport context (scheme and host) of an incoming request.

use axum::http::{header, HeaderMap, Uri};
use hermes_inbox::{Protocol, TransportContext};

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};

const X_FORWARDED_PROTO: &str = "x-forwarded-proto";
const X_FORWARDED_HOST: &str = "x-forwarded-host";

/// How much of the request to believe when building identifiers.
///
/// Forwarding headers are client-controlled unless a proxy rewrites them, so
/// they are ignored unless `trust_forwarded_headers` is set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ContextPolicy {
    pub default_protocol: Protocol,
    pub trust_forwarded_headers: bool,
}

impl ContextPolicy {
    pub fn from_config(config: &ServerConfig) -> Self {
        Self {
            default_protocol: config.default_protocol,
            trust_forwarded_headers: config.trust_forwarded_headers,
        }
    }

    pub fn resolve(&self, headers: &HeaderMap, uri: &Uri) -> ServerResult<TransportContext> {
        let forwarded = if self.trust_forwarded_headers {
            headers
                .get(header::FORWARDED)
                .and_then(|v| v.to_str().ok())
                .map(parse_forwarded)
                .unwrap_or_default()
        } else {
            ForwardedElement::default()
        };

        let protocol = match self.forwarded_value(headers, X_FORWARDED_PROTO) {
            Some(proto) => parse_protocol(proto)?,
            None => match forwarded.proto {
                Some(proto) => parse_protocol(&proto)?,
                None => self.default_protocol,
            },
        };

        let host = self
            .forwarded_value(headers, X_FORWARDED_HOST)
            .map(str::to_string)
            .or(forwarded.host)
            .or_else(|| header_str(headers, header::HOST.as_str()).map(str::to_string))
            .or_else(|| uri.authority().map(|a| a.as_str().to_string()))
            .ok_or_else(|| ServerError::BadRequest("request has no host".into()))?;

        validate_host(&host)?;
        Ok(TransportContext::new(protocol, host))
    }

    /// First value of a comma-separated forwarding header, when trusted.
    fn forwarded_value<'h>(&self, headers: &'h HeaderMap, name: &str) -> Option<&'h str> {
        if !self.trust_forwarded_headers {
            return None;
        }
        header_str(headers, name)
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }
}

fn header_str<'h>(headers: &'h HeaderMap, name: &str) -> Option<&'h str> {
    headers.get(name).and_then(|v| v.to_str().ok()).map(str::trim)
}

fn parse_protocol(value: &str) -> ServerResult<Protocol> {
    value
        .parse()
        .map_err(|_| ServerError::BadRequest(format!("unsupported forwarded protocol {value:?}")))
}

#[derive(Debug, Default, PartialEq, Eq)]
struct ForwardedElement {
    proto: Option<String>,
    host: Option<String>,
}

/// Parse the first element of an RFC 7239 `Forwarded` header.
fn parse_forwarded(value: &str) -> ForwardedElement {
    let mut element = ForwardedElement::default();
    let first = value.split(',').next().unwrap_or_default();
    for pair in first.split(';') {
        let Some((key, val)) = pair.split_once('=') else {
            continue;
        };
        let val = val.trim().trim_matches('"');
        if val.is_empty() {
            continue;
        }
        match key.trim().to_ascii_lowercase().as_str() {
            "proto" => element.proto = Some(val.to_string()),
            "host" => element.host = Some(val.to_string()),
            _ => {}
        }
    }
    element
}

/// Accept `name`, `name:port`, `[v6]` and `[v6]:port`; nothing that could
/// smuggle a path, query or userinfo into an identifier.
fn validate_host(host: &str) -> ServerResult<()> {
    let invalid = || ServerError::BadRequest(format!("invalid host {host:?}"));
    let (name, port) = match host.strip_prefix('[') {
        Some(rest) => {
            let (literal, port) = rest.split_once(']').ok_or_else(invalid)?;
            let literal_ok = !literal.is_empty()
                && literal.chars().all(|c| c.is_ascii_hexdigit() || matches!(c, ':' | '.'));
            if !literal_ok {
                return Err(invalid());
            }
            (None, port)
        }
        None => match host.split_once(':') {
            Some((name, port)) => (Some(name), &host[name.len()..]),
            None => (Some(host), ""),
        },
    };

    let name_ok = name.map_or(true, |n| {
        !n.is_empty()
            && n.chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_'))
    });
    let port_ok = match port.strip_prefix(':') {
        Some(digits) => !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()),
        None => port.is_empty(),
    };
    if name_ok && port_ok {
        Ok(())
    } else {
        Err(invalid())
    }
}
