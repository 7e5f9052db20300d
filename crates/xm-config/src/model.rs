//! Inbound data model and the engine wire-config shape.
//!
//! An [`Inbound`] is owned by the surrounding management layer; this crate
//! only ever touches its `settings` text, and only by whole-document
//! replacement. [`InboundConfig`] is the external contract: the JSON object
//! the proxy engine consumes to instantiate a listener.

use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use std::collections::HashSet;
use xm_types::Protocol;

use crate::error::{Result, SettingsError};

/// One configured listener entry.
///
/// `settings` is raw JSON text whose schema depends on `protocol`. After a
/// successful normalization pass it conforms to the protocol's canonical
/// shape; this crate never edits it in place.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Inbound {
    /// Protocol tag; selects the settings schema and the dispatch arm.
    pub protocol: Protocol,
    /// Protocol-specific settings as raw JSON text.
    #[serde(default)]
    pub settings: String,
    /// Listen address (IP or hostname).
    #[serde(default)]
    pub listen: String,
    /// Listen port.
    pub port: u16,
    /// Engine tag; referenced by name in routing rules. May be empty.
    #[serde(default)]
    pub tag: String,
}

impl Inbound {
    /// Build the engine wire config for this inbound.
    ///
    /// Pure per-inbound transform; see [`crate::present::to_engine_config`].
    ///
    /// # Errors
    /// Propagates the presentation layer's errors (malformed settings,
    /// non-canonical MTProto settings).
    pub fn engine_config(&self) -> Result<InboundConfig> {
        crate::present::to_engine_config(self)
    }
}

/// Wire configuration object handed to the proxy engine.
///
/// Field names and protocol identifier strings must match what the engine
/// expects exactly; `settings` carries the inbound's JSON bytes verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundConfig {
    /// Listen address, copied from the inbound.
    pub listen: String,
    /// Listen port, copied from the inbound.
    pub port: u16,
    /// Protocol identifier string (e.g. `"mtproto"`, `"vmess"`).
    pub protocol: Protocol,
    /// Settings JSON, carried byte-for-byte.
    pub settings: Box<RawValue>,
    /// Engine tag, copied from the inbound.
    pub tag: String,
}

/// Reject inbound lists that share a non-empty tag.
///
/// The engine resolves routing references by tag, so two listeners with the
/// same tag are ambiguous. Empty tags are the engine's "untagged" case and
/// may repeat.
///
/// # Errors
/// Returns [`SettingsError::DuplicateTag`] naming the first repeated tag.
pub fn validate_inbounds(inbounds: &[Inbound]) -> Result<()> {
    let mut seen = HashSet::new();
    for inbound in inbounds {
        if inbound.tag.is_empty() {
            continue;
        }
        if !seen.insert(inbound.tag.as_str()) {
            return Err(SettingsError::DuplicateTag {
                tag: inbound.tag.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inbound(tag: &str) -> Inbound {
        Inbound {
            protocol: Protocol::Vmess,
            settings: r#"{"clients":[]}"#.to_string(),
            listen: "0.0.0.0".to_string(),
            port: 443,
            tag: tag.to_string(),
        }
    }

    #[test]
    fn duplicate_tags_are_rejected() {
        let list = vec![inbound("a"), inbound("b"), inbound("a")];
        let err = validate_inbounds(&list).unwrap_err();
        assert_eq!(err, SettingsError::DuplicateTag { tag: "a".into() });
    }

    #[test]
    fn empty_tags_may_repeat() {
        let list = vec![inbound(""), inbound(""), inbound("a")];
        assert!(validate_inbounds(&list).is_ok());
    }

    #[test]
    fn inbound_deserializes_with_defaults() {
        let inbound: Inbound =
            serde_json::from_str(r#"{"protocol":"vless","port":8443}"#).unwrap();
        assert_eq!(inbound.protocol, Protocol::Vless);
        assert_eq!(inbound.port, 8443);
        assert!(inbound.settings.is_empty());
        assert!(inbound.tag.is_empty());
    }
}
