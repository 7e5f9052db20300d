//! MTProto settings normalization and validation.
//!
//! Operator-supplied settings arrive in one of two loose shapes:
//!
//! - `{"secret": "<hex>"}` — legacy single-secret form
//! - `{"users": [{"secret": "<hex>"}, ...]}` — multi-user form
//!
//! Normalization validates every secret (exactly 32 hex characters,
//! case-insensitive) and rewrites the settings to the multi-user shape
//! exclusively, with secrets lowercased and user order preserved. The
//! rewrite is all-or-nothing: validation runs over the whole input before
//! a new document replaces the old one, so a failing call leaves the
//! inbound's settings untouched.

use serde::{Deserialize, Serialize};
use xm_types::Protocol;

use crate::error::{Result, SettingsError};
use crate::model::Inbound;

/// Required secret length in hex characters.
pub const SECRET_HEX_LEN: usize = 32;

/// Single user entry in canonical MTProto settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct MtprotoUser {
    /// Shared secret, 32 lowercase hex characters.
    pub secret: String,
}

/// Canonical MTProto settings shape.
///
/// Strict on purpose (`deny_unknown_fields`): canonical documents contain
/// the `users` array and nothing else, which makes "already canonical"
/// mechanically checkable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct MtprotoSettings {
    /// User entries, in input order.
    pub users: Vec<MtprotoUser>,
}

/// Tolerant view of operator input; both shapes, extra fields ignored.
#[derive(Deserialize)]
struct RawSettings {
    #[serde(default)]
    secret: Option<String>,
    #[serde(default)]
    users: Option<Vec<RawUser>>,
}

#[derive(Deserialize)]
struct RawUser {
    #[serde(default)]
    secret: Option<String>,
}

fn validate_secret(secret: &str) -> Result<String> {
    if secret.len() != SECRET_HEX_LEN {
        return Err(SettingsError::SecretLength { len: secret.len() });
    }
    if !secret.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(SettingsError::SecretNotHex {
            secret: secret.to_string(),
        });
    }
    Ok(secret.to_ascii_lowercase())
}

fn serialize_canonical(settings: &MtprotoSettings) -> Result<String> {
    serde_json::to_string(settings).map_err(|e| SettingsError::MalformedJson {
        context: "mtproto settings",
        message: e.to_string(),
    })
}

/// Validate MTProto settings text and return its canonical form.
///
/// Accepts both input shapes; `users` takes precedence when both keys are
/// present. The returned document always has the `{"users": [...]}` shape
/// with lowercase secrets, and re-canonicalizing it is a no-op.
///
/// # Errors
/// - [`SettingsError::MalformedJson`] when the text is not a JSON object
/// - [`SettingsError::EmptySettings`] when neither shape carries a secret
/// - [`SettingsError::MissingSecret`] for a user entry without `secret`
/// - [`SettingsError::SecretLength`] / [`SettingsError::SecretNotHex`] for
///   format violations
pub fn canonicalize_settings(settings: &str) -> Result<String> {
    let raw: RawSettings =
        serde_json::from_str(settings).map_err(|e| SettingsError::MalformedJson {
            context: "mtproto settings",
            message: e.to_string(),
        })?;

    let users = match (raw.users, raw.secret) {
        (Some(users), _) => {
            if users.is_empty() {
                return Err(SettingsError::EmptySettings);
            }
            let mut out = Vec::with_capacity(users.len());
            for user in users {
                let secret = user.secret.ok_or(SettingsError::MissingSecret)?;
                out.push(MtprotoUser {
                    secret: validate_secret(&secret)?,
                });
            }
            out
        }
        (None, Some(secret)) => vec![MtprotoUser {
            secret: validate_secret(&secret)?,
        }],
        (None, None) => return Err(SettingsError::EmptySettings),
    };

    serialize_canonical(&MtprotoSettings { users })
}

/// Normalize an MTProto inbound's settings in place.
///
/// The settings text is replaced wholesale with the canonical form; on any
/// error the inbound is left exactly as it was.
///
/// # Errors
/// [`SettingsError::ProtocolMismatch`] for non-MTProto inbounds, plus
/// everything [`canonicalize_settings`] reports.
pub fn normalize_inbound(inbound: &mut Inbound) -> Result<()> {
    if inbound.protocol != Protocol::Mtproto {
        return Err(SettingsError::ProtocolMismatch {
            expected: Protocol::Mtproto,
            found: inbound.protocol,
        });
    }
    let canonical = canonicalize_settings(&inbound.settings)?;
    tracing::debug!(
        target: "xm_config::mtproto",
        tag = %inbound.tag,
        "mtproto settings canonicalized"
    );
    inbound.settings = canonical;
    Ok(())
}

/// Check that settings text is already in canonical form, without rewriting.
///
/// Used by the presentation layer: generation never mutates, so it verifies
/// the normalization step already ran instead of silently repeating it.
///
/// # Errors
/// [`SettingsError::MalformedJson`] for unparsable text,
/// [`SettingsError::NotCanonical`] for valid JSON in a non-canonical shape
/// (legacy `secret` key, extra fields, uppercase hex), plus the secret
/// format errors.
pub fn ensure_canonical(settings: &str) -> Result<()> {
    let parsed: MtprotoSettings = match serde_json::from_str(settings) {
        Ok(parsed) => parsed,
        Err(e) => {
            // Distinguish structurally broken JSON from a wrong shape.
            return if serde_json::from_str::<serde_json::Value>(settings).is_err() {
                Err(SettingsError::MalformedJson {
                    context: "mtproto settings",
                    message: e.to_string(),
                })
            } else {
                Err(SettingsError::NotCanonical {
                    message: e.to_string(),
                })
            };
        }
    };
    if parsed.users.is_empty() {
        return Err(SettingsError::EmptySettings);
    }
    for user in &parsed.users {
        let normalized = validate_secret(&user.secret)?;
        if normalized != user.secret {
            return Err(SettingsError::NotCanonical {
                message: format!("secret {:?} is not lowercased", user.secret),
            });
        }
    }
    Ok(())
}
