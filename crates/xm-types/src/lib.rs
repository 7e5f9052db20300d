//! xm-types: cross-crate stable contracts (protocol identifiers, error classification).

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Inbound protocol tag.
///
/// The set is closed on purpose: the engine wire format only understands
/// these identifiers, and dispatch over the set must stay exhaustive so a
/// new protocol is a compile-checked addition, not a runtime lookup.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    /// MTProto proxy server (shared-secret authentication).
    Mtproto,
    /// VMess proxy server.
    Vmess,
    /// VLESS proxy server.
    Vless,
    /// Trojan proxy server.
    Trojan,
    /// Shadowsocks proxy server.
    Shadowsocks,
    /// Direct forwarder with fixed destination.
    #[serde(rename = "dokodemo-door")]
    DokodemoDoor,
    /// SOCKS5 proxy server.
    Socks,
    /// HTTP CONNECT proxy server.
    Http,
    /// WireGuard endpoint.
    Wireguard,
}

impl Protocol {
    /// Return the lowercase identifier string the engine expects.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        use Protocol::*;
        match self {
            Mtproto => "mtproto",
            Vmess => "vmess",
            Vless => "vless",
            Trojan => "trojan",
            Shadowsocks => "shadowsocks",
            DokodemoDoor => "dokodemo-door",
            Socks => "socks",
            Http => "http",
            Wireguard => "wireguard",
        }
    }
}

impl Display for Protocol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// High-level classification of settings-pipeline failures.
///
/// The surrounding service maps these to operator-facing messages and
/// metrics labels; individual error variants stay the source of detail.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// JSON or tool output failed to parse structurally.
    MalformedInput,
    /// A required field or entry is absent.
    SchemaViolation,
    /// A value is present but fails a format rule.
    InvalidFormat,
}

impl ErrorKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        use ErrorKind::*;
        match self {
            MalformedInput => "malformed_input",
            SchemaViolation => "schema_violation",
            InvalidFormat => "invalid_format",
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
