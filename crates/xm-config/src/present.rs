//! Engine configuration presentation layer.
//!
//! The single conversion point from an [`Inbound`] to the wire-format
//! [`InboundConfig`] the proxy engine consumes. Dispatch is an exhaustive
//! match over [`Protocol`], so adding a protocol is a compile-checked
//! addition of a variant and an arm.
//!
//! Generation is a pure function of its argument: no global or shared
//! state is read or written, which is what makes concurrent generation of
//! independent inbounds coordination-free.

use serde_json::value::RawValue;
use xm_types::Protocol;

use crate::error::{Result, SettingsError};
use crate::model::{Inbound, InboundConfig};
use crate::mtproto;

/// Build the engine wire config for one inbound.
///
/// MTProto settings must already be canonical (run
/// [`mtproto::normalize_inbound`] first); generation verifies that and
/// never rewrites. Every other protocol's settings pass through unchanged.
/// Empty settings text stands for the empty object.
///
/// # Errors
/// - [`SettingsError::NotCanonical`] for un-normalized MTProto settings
/// - [`SettingsError::MalformedJson`] when settings are not valid JSON
pub fn to_engine_config(inbound: &Inbound) -> Result<InboundConfig> {
    match inbound.protocol {
        Protocol::Mtproto => mtproto::ensure_canonical(&inbound.settings)?,
        // Pass-through protocols: no settings rules enforced here.
        Protocol::Vmess
        | Protocol::Vless
        | Protocol::Trojan
        | Protocol::Shadowsocks
        | Protocol::DokodemoDoor
        | Protocol::Socks
        | Protocol::Http
        | Protocol::Wireguard => {}
    }

    let text = if inbound.settings.trim().is_empty() {
        "{}".to_string()
    } else {
        inbound.settings.clone()
    };
    let settings = RawValue::from_string(text).map_err(|e| SettingsError::MalformedJson {
        context: "inbound settings",
        message: e.to_string(),
    })?;

    tracing::debug!(
        target: "xm_config::present",
        protocol = %inbound.protocol,
        tag = %inbound.tag,
        "engine inbound config generated"
    );

    Ok(InboundConfig {
        listen: inbound.listen.clone(),
        port: inbound.port,
        protocol: inbound.protocol,
        settings,
        tag: inbound.tag.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mtproto_arm_requires_canonical_settings() {
        let inbound = Inbound {
            protocol: Protocol::Mtproto,
            settings: r#"{"secret":"aabbccddeeff00112233445566778899"}"#.to_string(),
            listen: "0.0.0.0".to_string(),
            port: 443,
            tag: "mt".to_string(),
        };
        assert!(matches!(
            to_engine_config(&inbound).unwrap_err(),
            SettingsError::NotCanonical { .. }
        ));
    }

    #[test]
    fn empty_settings_become_the_empty_object() {
        let inbound = Inbound {
            protocol: Protocol::Socks,
            settings: String::new(),
            listen: "127.0.0.1".to_string(),
            port: 1080,
            tag: String::new(),
        };
        let cfg = to_engine_config(&inbound).unwrap();
        assert_eq!(cfg.settings.get(), "{}");
    }

    #[test]
    fn passthrough_rejects_broken_json() {
        let inbound = Inbound {
            protocol: Protocol::Vmess,
            settings: r#"{"clients":"#.to_string(),
            listen: String::new(),
            port: 1,
            tag: String::new(),
        };
        assert!(matches!(
            to_engine_config(&inbound).unwrap_err(),
            SettingsError::MalformedJson { .. }
        ));
    }
}
