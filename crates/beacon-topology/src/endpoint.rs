//! Physical endpoint parsing.
//!
//! Nodes report themselves as `host` or `host:port`. The host is the
//! identity used for slot ownership; the port only affects the stored
//! canonical form. A slot whose recorded endpoint equals [`UNASSIGNED`]
//! is open for claim.

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Sentinel endpoint value marking a slot as open for claim.
///
/// This is the only placeholder the record recognises; any other value
/// means the slot is occupied.
pub const UNASSIGNED: &str = "unassigned";

/// A parsed `host[:port]` endpoint as reported by a physical node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    host: String,
    port: Option<u16>,
}

impl Endpoint {
    /// Parse a reported endpoint string.
    ///
    /// Accepts `host` and `host:port`. The sentinel value and anything
    /// with whitespace, an empty host, or a malformed port is rejected.
    pub fn parse(input: &str) -> Result<Self> {
        let invalid = |reason| Error::InvalidEndpoint {
            input: input.to_string(),
            reason,
        };

        if input.is_empty() {
            return Err(invalid("empty"));
        }
        if input.chars().any(char::is_whitespace) {
            return Err(invalid("contains whitespace"));
        }
        if input == UNASSIGNED {
            return Err(invalid("reserved sentinel value"));
        }

        let (host, port) = match input.split_once(':') {
            None => (input, None),
            Some((host, port)) => {
                if port.contains(':') {
                    return Err(invalid("more than one ':'"));
                }
                let port = port
                    .parse::<u16>()
                    .map_err(|_| invalid("port is not a number in 0-65535"))?;
                (host, Some(port))
            }
        };

        if host.is_empty() {
            return Err(invalid("empty host"));
        }

        Ok(Self {
            host: host.to_string(),
            port,
        })
    }

    /// The host portion - the identity a slot claim is keyed on.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// The explicit port, if the caller reported one.
    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// The canonical `host:port` form stored in the record.
    ///
    /// A caller that omits the port gets the mesh-wide listen port, so a
    /// re-claim without a port never strips the stored one down to a bare
    /// host.
    pub fn canonical(&self, default_port: u16) -> String {
        format!("{}:{}", self.host, self.port.unwrap_or(default_port))
    }
}

impl FromStr for Endpoint {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.port {
            Some(port) => write!(f, "{}:{}", self.host, port),
            None => write!(f, "{}", self.host),
        }
    }
}
