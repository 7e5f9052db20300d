//! VLESS encryption toolchain: key-type resolution, key-tool output
//! parsing, auth selection, and persisting chosen material.
//!
//! The external key-generation tool prints one block per supported
//! authentication mode:
//!
//! ```text
//! Authentication: X25519, non post-quantum
//! "decryption": "none",
//! "encryption": "x25519:client-public-key"
//!
//! Authentication: ML-KEM-768, Post-Quantum
//! "decryption": "mlkem768:server-seed",
//! "encryption": "mlkem768:client-kem"
//! ```
//!
//! This format is not under our control, so parsing is deliberately
//! tolerant: surrounding whitespace, quotes and trailing commas are
//! stripped, and banner lines outside any block are ignored.

use serde::{Deserialize, Serialize};
use xm_types::Protocol;

use crate::error::{Result, SettingsError};
use crate::model::Inbound;

/// Supported VLESS key-exchange families.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VlessKeyType {
    /// Classical x25519 key exchange.
    X25519,
    /// Post-quantum ML-KEM-768 key encapsulation.
    Mlkem768,
}

impl VlessKeyType {
    /// Canonical lowercase name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            VlessKeyType::X25519 => "x25519",
            VlessKeyType::Mlkem768 => "mlkem768",
        }
    }
}

impl std::fmt::Display for VlessKeyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One parsed `Authentication:` block from the key tool's output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VlessEncAuth {
    /// Header text, verbatim.
    pub label: String,
    /// Key family resolved from the label.
    pub key_type: VlessKeyType,
    /// Value for the settings `decryption` member.
    pub decryption: String,
    /// Value for the settings `encryption` member.
    pub encryption: String,
}

/// Resolve a free-text label to a key family.
///
/// Matching is case-insensitive and substring-based; qualifiers such as
/// "Post-Quantum" are informational and never change the result. Markers
/// are checked in a fixed order, so a label naming both families resolves
/// to x25519.
///
/// # Errors
/// [`SettingsError::UnsupportedKeyType`] naming the input when neither
/// family marker is present.
pub fn resolve_key_type(label: &str) -> Result<VlessKeyType> {
    let lowered = label.to_ascii_lowercase();
    if lowered.contains("x25519") {
        return Ok(VlessKeyType::X25519);
    }
    if lowered.contains("mlkem") || lowered.contains("ml-kem") {
        return Ok(VlessKeyType::Mlkem768);
    }
    Err(SettingsError::UnsupportedKeyType {
        label: label.to_string(),
    })
}

struct PartialBlock {
    label: String,
    key_type: VlessKeyType,
    decryption: Option<String>,
    encryption: Option<String>,
}

impl PartialBlock {
    fn finish(self) -> Result<VlessEncAuth> {
        let PartialBlock {
            label,
            key_type,
            decryption,
            encryption,
        } = self;
        let decryption = decryption.ok_or_else(|| SettingsError::IncompleteAuthBlock {
            label: label.clone(),
            field: "decryption",
        })?;
        let encryption = encryption.ok_or_else(|| SettingsError::IncompleteAuthBlock {
            label: label.clone(),
            field: "encryption",
        })?;
        Ok(VlessEncAuth {
            label,
            key_type,
            decryption,
            encryption,
        })
    }
}

/// Extract the value of a `"<key>": "<value>",` style line.
///
/// Quotes around key and value, surrounding whitespace and a trailing
/// comma are all optional.
fn entry_value(line: &str, key: &str) -> Option<String> {
    let rest = line.trim_start().trim_start_matches('"');
    let rest = rest.strip_prefix(key)?;
    let rest = rest.trim_start_matches('"').trim_start();
    let rest = rest.strip_prefix(':')?;
    let value = rest.trim().trim_end_matches(',').trim().trim_matches('"');
    Some(value.to_string())
}

/// Parse key-tool output into ordered auth blocks.
///
/// Blocks are returned in the order their `Authentication:` headers appear;
/// callers may rely on "first block = first header". Parsing is
/// all-or-nothing: one incomplete block or unresolvable header fails the
/// whole call.
///
/// # Errors
/// - [`SettingsError::MalformedEncOutput`] when no block is found at all
/// - [`SettingsError::UnsupportedKeyType`] for an unknown header label
/// - [`SettingsError::IncompleteAuthBlock`] when a block lacks an entry
pub fn parse_enc_output(output: &str) -> Result<Vec<VlessEncAuth>> {
    let mut blocks = Vec::new();
    let mut current: Option<PartialBlock> = None;

    for line in output.lines() {
        let line = line.trim();
        if let Some(rest) = line.strip_prefix("Authentication:") {
            if let Some(done) = current.take() {
                blocks.push(done.finish()?);
            }
            let label = rest.trim().to_string();
            let key_type = resolve_key_type(&label)?;
            current = Some(PartialBlock {
                label,
                key_type,
                decryption: None,
                encryption: None,
            });
            continue;
        }
        let Some(block) = current.as_mut() else {
            // Banner or blank line before the first header.
            continue;
        };
        if let Some(value) = entry_value(line, "decryption") {
            block.decryption = Some(value);
        } else if let Some(value) = entry_value(line, "encryption") {
            block.encryption = Some(value);
        }
    }
    if let Some(done) = current.take() {
        blocks.push(done.finish()?);
    }

    if blocks.is_empty() {
        return Err(SettingsError::MalformedEncOutput {
            message: "no Authentication block found".to_string(),
        });
    }
    Ok(blocks)
}

/// Select the blocks matching a requested key type.
///
/// `requested` is free text and is resolved first; an unresolvable request
/// fails before any scan. A recognized type simply absent from `blocks`
/// yields an empty vector, not an error.
///
/// # Errors
/// [`SettingsError::UnsupportedKeyType`] from the resolver.
pub fn filter_enc_auth(blocks: &[VlessEncAuth], requested: &str) -> Result<Vec<VlessEncAuth>> {
    let requested = resolve_key_type(requested)?;
    Ok(blocks
        .iter()
        .filter(|block| block.key_type == requested)
        .cloned()
        .collect())
}

/// Persist a chosen auth block into a VLESS inbound's settings.
///
/// Sets the `decryption` and `encryption` members from the block, leaving
/// every other settings member as it was, and replaces the settings text
/// wholesale. Empty settings are treated as an empty object. On any error
/// the inbound is left untouched.
///
/// # Errors
/// [`SettingsError::ProtocolMismatch`] for non-VLESS inbounds,
/// [`SettingsError::MalformedJson`] when the existing settings text is not
/// a JSON object.
pub fn apply_enc_auth(inbound: &mut Inbound, auth: &VlessEncAuth) -> Result<()> {
    if inbound.protocol != Protocol::Vless {
        return Err(SettingsError::ProtocolMismatch {
            expected: Protocol::Vless,
            found: inbound.protocol,
        });
    }
    let mut settings: serde_json::Map<String, serde_json::Value> =
        if inbound.settings.trim().is_empty() {
            serde_json::Map::new()
        } else {
            serde_json::from_str(&inbound.settings).map_err(|e| SettingsError::MalformedJson {
                context: "vless settings",
                message: e.to_string(),
            })?
        };
    settings.insert(
        "decryption".to_string(),
        serde_json::Value::String(auth.decryption.clone()),
    );
    settings.insert(
        "encryption".to_string(),
        serde_json::Value::String(auth.encryption.clone()),
    );
    let rewritten =
        serde_json::to_string(&settings).map_err(|e| SettingsError::MalformedJson {
            context: "vless settings",
            message: e.to_string(),
        })?;
    tracing::debug!(
        target: "xm_config::vless",
        tag = %inbound.tag,
        key_type = %auth.key_type,
        "vless auth material applied"
    );
    inbound.settings = rewritten;
    Ok(())
}
