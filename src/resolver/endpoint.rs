//! Transport endpoint classification.
//!
//! Turns a raw module `source` string into a protocol tag and a
//! protocol-specific path, following the rules a git client uses for
//! transport endpoints:
//!
//! - **URL**: `scheme://...` (`https`, `ssh`, `s3`, `file`, ...)
//! - **SCP-like**: `[user@]host:path`, always `ssh`
//! - **File**: anything else that is a plausible path, including registry
//!   addresses such as `terraform-aws-modules/vpc/aws`
//!
//! A Terraform forced-getter prefix (`git::`, `s3::`, ...) is stripped before
//! classification and kept on the [`Endpoint`].

use crate::error::{ModSourceError, Result};
use regex::Regex;
use std::sync::LazyLock;

/// Default port assumed for SCP-like addresses.
const DEFAULT_SSH_PORT: u16 = 22;

static FORCED_GETTER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    // git::https://example.com/module.git -> ("git", "https://example.com/module.git")
    Regex::new(r"^([A-Za-z0-9]+)::(.+)$").expect("Invalid regex")
});

static SCHEME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^:]+://").expect("Invalid regex"));

static SCP_LIKE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(?P<user>[^@]+)@)?(?P<host>[^:\s]+):(?:(?P<port>[0-9]{1,5})/)?(?P<path>[^\\].*)$")
        .expect("Invalid regex")
});

/// A parsed source location.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Endpoint {
    /// Protocol tag (`ssh`, `file`, `https`, ...)
    pub protocol: String,
    /// Forced getter prefix, if the source had one
    pub getter: Option<String>,
    /// User name, if any
    pub user: Option<String>,
    /// Password, if any
    pub password: Option<String>,
    /// Host name, if any
    pub host: Option<String>,
    /// Port, explicit or the protocol default
    pub port: Option<u16>,
    /// Protocol-specific path
    pub path: String,
}

/// Classifies source strings into endpoints.
///
/// Implementations must be deterministic and fail with
/// [`ModSourceError::EndpointParse`] for strings that are not a location of
/// any recognised kind.
#[cfg_attr(test, mockall::automock)]
pub trait EndpointClassifier: Send + Sync {
    /// Classify a single source string.
    ///
    /// # Errors
    ///
    /// Returns an error if the source is not a valid location reference.
    fn classify(&self, source: &str) -> Result<Endpoint>;
}

/// Default classifier implementing git transport endpoint rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransportEndpointParser;

impl TransportEndpointParser {
    /// Create a new parser.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl EndpointClassifier for TransportEndpointParser {
    fn classify(&self, source: &str) -> Result<Endpoint> {
        let source = source.trim();
        let (getter, location) = split_forced_getter(source);

        let mut endpoint = if SCHEME_PATTERN.is_match(location) {
            parse_url(source, location)?
        } else if let Some(endpoint) = parse_scp_like(location) {
            endpoint
        } else {
            parse_file(source, location)?
        };
        endpoint.getter = getter;

        tracing::trace!(source = %source, protocol = %endpoint.protocol, path = %endpoint.path, "Classified endpoint");
        Ok(endpoint)
    }
}

fn split_forced_getter(source: &str) -> (Option<String>, &str) {
    FORCED_GETTER_PATTERN
        .captures(source)
        .and_then(|caps| Some((caps.get(1)?.as_str().to_string(), caps.get(2)?.as_str())))
        .map_or((None, source), |(getter, rest)| (Some(getter), rest))
}

fn parse_url(source: &str, location: &str) -> Result<Endpoint> {
    let url = url::Url::parse(location).map_err(|e| classification_error(source, &e.to_string()))?;

    let mut path = url.path().to_string();
    if let Some(query) = url.query() {
        path.push('?');
        path.push_str(query);
    }
    if let Some(fragment) = url.fragment() {
        path.push('#');
        path.push_str(fragment);
    }

    Ok(Endpoint {
        protocol: url.scheme().to_string(),
        getter: None,
        user: Some(url.username()).filter(|u| !u.is_empty()).map(String::from),
        password: url.password().map(String::from),
        host: url.host_str().map(String::from),
        port: url.port_or_known_default(),
        path,
    })
}

fn parse_scp_like(location: &str) -> Option<Endpoint> {
    let caps = SCP_LIKE_PATTERN.captures(location)?;
    let host = caps.name("host")?.as_str();

    // C:/modules/vpc is a drive letter, not a host
    if host.len() == 1 && host.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }

    let port = caps
        .name("port")
        .and_then(|p| p.as_str().parse::<u16>().ok())
        .unwrap_or(DEFAULT_SSH_PORT);

    Some(Endpoint {
        protocol: "ssh".to_string(),
        getter: None,
        user: caps.name("user").map(|u| u.as_str().to_string()),
        password: None,
        host: Some(host.to_string()),
        port: Some(port),
        path: caps.name("path")?.as_str().to_string(),
    })
}

fn parse_file(source: &str, location: &str) -> Result<Endpoint> {
    if location.is_empty() {
        return Err(classification_error(source, "source is empty"));
    }
    if location.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(classification_error(
            source,
            "not a URL, an SCP-like address or a path (contains whitespace or control characters)",
        ));
    }

    Ok(Endpoint {
        protocol: "file".to_string(),
        path: location.to_string(),
        ..Endpoint::default()
    })
}

fn classification_error(source: &str, message: &str) -> ModSourceError {
    crate::err!(EndpointParse {
        module: String::new(),
        module_source: source.to_string(),
        message: message.to_string(),
    })
}
